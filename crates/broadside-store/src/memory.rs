//! In-memory [`RoomStore`] backend.
//!
//! Each room document lives in a `tokio::sync::watch` channel: the
//! sender holds the authoritative copy, receivers are the subscriptions.
//! A single async mutex over the room map serializes every write, which
//! makes the transaction contract trivial — the lock is held from the
//! transactional read through the commit, so no other writer can slip in
//! between.

use std::collections::HashMap;
use std::sync::Arc;

use broadside_model::{apply_all, Room, RoomCode, RoomPatch};
use tokio::sync::{watch, Mutex};

use crate::{RoomStore, RoomWatch, StoreError, Tx, TxOutcome};

/// Process-local document store. Cheap to clone; clones share the same
/// rooms.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rooms: Arc<Mutex<HashMap<RoomCode, watch::Sender<Room>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops a room document. Outstanding watches on it see
    /// [`StoreError::Closed`] on their next wait.
    pub async fn remove(&self, code: &RoomCode) -> Result<(), StoreError> {
        self.rooms
            .lock()
            .await
            .remove(code)
            .map(|_| tracing::info!(%code, "room removed"))
            .ok_or_else(|| StoreError::NotFound(code.clone()))
    }

    /// Number of rooms currently held.
    pub async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}

impl RoomStore for MemoryStore {
    async fn read(&self, code: &RoomCode) -> Result<Room, StoreError> {
        let rooms = self.rooms.lock().await;
        let doc = rooms
            .get(code)
            .ok_or_else(|| StoreError::NotFound(code.clone()))?;
        Ok(doc.borrow().clone())
    }

    async fn create(&self, code: &RoomCode, room: Room) -> Result<(), StoreError> {
        let mut rooms = self.rooms.lock().await;
        if rooms.contains_key(code) {
            return Err(StoreError::AlreadyExists(code.clone()));
        }
        let (tx, _rx) = watch::channel(room);
        rooms.insert(code.clone(), tx);
        tracing::info!(%code, "room created");
        Ok(())
    }

    async fn update(&self, code: &RoomCode, patches: &[RoomPatch]) -> Result<Room, StoreError> {
        let rooms = self.rooms.lock().await;
        let doc = rooms
            .get(code)
            .ok_or_else(|| StoreError::NotFound(code.clone()))?;
        let mut room = doc.borrow().clone();
        apply_all(&mut room, patches);
        doc.send_replace(room.clone());
        tracing::debug!(%code, patches = patches.len(), "room updated");
        Ok(room)
    }

    async fn transact<F>(&self, code: &RoomCode, mut decide: F) -> Result<TxOutcome, StoreError>
    where
        F: FnMut(&Room) -> Tx + Send,
    {
        // Lock held across read, decision, and publish: the closure's
        // view cannot go stale before the commit lands.
        let rooms = self.rooms.lock().await;
        let doc = rooms
            .get(code)
            .ok_or_else(|| StoreError::NotFound(code.clone()))?;
        let snapshot = doc.borrow().clone();
        match decide(&snapshot) {
            Tx::Commit(patches) => {
                let mut room = snapshot;
                apply_all(&mut room, &patches);
                doc.send_replace(room.clone());
                tracing::debug!(%code, patches = patches.len(), "transaction committed");
                Ok(TxOutcome::Committed(room))
            }
            Tx::Abort => {
                tracing::debug!(%code, "transaction aborted by caller");
                Ok(TxOutcome::Aborted)
            }
        }
    }

    async fn subscribe(&self, code: &RoomCode) -> Result<RoomWatch, StoreError> {
        let rooms = self.rooms.lock().await;
        let doc = rooms
            .get(code)
            .ok_or_else(|| StoreError::NotFound(code.clone()))?;
        Ok(RoomWatch::new(doc.subscribe()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broadside_model::{RoomStatus, Slot, Uid};

    fn code() -> RoomCode {
        RoomCode::new("ABCDE")
    }

    fn seed_room() -> Room {
        Room::create(Uid::new("host"), "Alice", 1_000)
    }

    #[tokio::test]
    async fn test_create_then_read_round_trips() {
        let store = MemoryStore::new();
        store.create(&code(), seed_room()).await.unwrap();
        let room = store.read(&code()).await.unwrap();
        assert_eq!(room.host, Uid::new("host"));
        assert_eq!(room.status, RoomStatus::Waiting);
    }

    #[tokio::test]
    async fn test_create_rejects_taken_code() {
        let store = MemoryStore::new();
        store.create(&code(), seed_room()).await.unwrap();
        assert_eq!(
            store.create(&code(), seed_room()).await,
            Err(StoreError::AlreadyExists(code()))
        );
    }

    #[tokio::test]
    async fn test_read_missing_room_is_not_found() {
        let store = MemoryStore::new();
        assert_eq!(
            store.read(&code()).await,
            Err(StoreError::NotFound(code()))
        );
    }

    #[tokio::test]
    async fn test_update_applies_patches_and_returns_document() {
        let store = MemoryStore::new();
        store.create(&code(), seed_room()).await.unwrap();
        let room = store
            .update(&code(), &[RoomPatch::Status(RoomStatus::Prepare)])
            .await
            .unwrap();
        assert_eq!(room.status, RoomStatus::Prepare);
        assert_eq!(store.read(&code()).await.unwrap().status, RoomStatus::Prepare);
    }

    #[tokio::test]
    async fn test_aborted_transaction_writes_nothing() {
        let store = MemoryStore::new();
        store.create(&code(), seed_room()).await.unwrap();
        let outcome = store
            .transact(&code(), |room| {
                assert_eq!(room.status, RoomStatus::Waiting);
                Tx::Abort
            })
            .await
            .unwrap();
        assert_eq!(outcome, TxOutcome::Aborted);
        assert_eq!(store.read(&code()).await.unwrap(), seed_room());
    }

    #[tokio::test]
    async fn test_committed_transaction_is_visible_to_readers() {
        let store = MemoryStore::new();
        store.create(&code(), seed_room()).await.unwrap();
        let outcome = store
            .transact(&code(), |_| {
                Tx::Commit(vec![RoomPatch::CurrentTurn(Some(Uid::new("host")))])
            })
            .await
            .unwrap();
        let TxOutcome::Committed(room) = outcome else {
            panic!("expected commit");
        };
        assert_eq!(room.current_turn, Some(Uid::new("host")));
        assert_eq!(store.read(&code()).await.unwrap(), room);
    }

    #[tokio::test]
    async fn test_concurrent_transactions_serialize() {
        // Two writers both append to the same hits list through
        // read-modify-write transactions. Serialized execution means
        // neither append is lost.
        let store = MemoryStore::new();
        store.create(&code(), seed_room()).await.unwrap();

        let a = store.clone();
        let b = store.clone();
        let t1 = tokio::spawn(async move {
            a.transact(&code(), |room| {
                let mut hits = room.players.player1.hits_received.clone();
                hits.push(1);
                Tx::Commit(vec![RoomPatch::HitsReceived(Slot::Player1, hits)])
            })
            .await
        });
        let t2 = tokio::spawn(async move {
            b.transact(&code(), |room| {
                let mut hits = room.players.player1.hits_received.clone();
                hits.push(2);
                Tx::Commit(vec![RoomPatch::HitsReceived(Slot::Player1, hits)])
            })
            .await
        });
        t1.await.unwrap().unwrap();
        t2.await.unwrap().unwrap();

        let mut hits = store.read(&code()).await.unwrap().players.player1.hits_received;
        hits.sort_unstable();
        assert_eq!(hits, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_subscription_sees_each_committed_write() {
        let store = MemoryStore::new();
        store.create(&code(), seed_room()).await.unwrap();
        let mut watch = store.subscribe(&code()).await.unwrap();
        assert_eq!(watch.current().status, RoomStatus::Waiting);

        store
            .update(&code(), &[RoomPatch::Status(RoomStatus::Prepare)])
            .await
            .unwrap();
        let room = watch.changed().await.unwrap();
        assert_eq!(room.status, RoomStatus::Prepare);
    }

    #[tokio::test]
    async fn test_watch_closes_when_room_removed() {
        let store = MemoryStore::new();
        store.create(&code(), seed_room()).await.unwrap();
        let mut watch = store.subscribe(&code()).await.unwrap();
        store.remove(&code()).await.unwrap();
        assert_eq!(watch.changed().await, Err(StoreError::Closed));
    }
}
