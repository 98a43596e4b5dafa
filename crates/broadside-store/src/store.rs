//! The [`RoomStore`] trait: the storage surface the rest of Broadside is
//! written against.
//!
//! The trait mirrors what a hosted document database offers — point
//! reads, create-if-absent, field patches, serializable read-modify-write
//! transactions, and change subscriptions — so the in-memory backend used
//! in tests and local play is swappable for a networked one without
//! touching the session layer.

use broadside_model::{Room, RoomCode, RoomPatch};
use tokio::sync::watch;

use crate::StoreError;

/// Decision returned by a transaction closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tx {
    /// Apply these patches atomically to the document the closure saw.
    Commit(Vec<RoomPatch>),
    /// Write nothing. The document is left exactly as read.
    Abort,
}

/// How a transaction ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxOutcome {
    /// The patches were applied; this is the document after the write.
    Committed(Room),
    /// The closure chose [`Tx::Abort`]; nothing was written.
    Aborted,
}

/// A shared document store holding one [`Room`] per room code.
///
/// # Transaction contract
///
/// `transact` must run the closure against a document no other writer
/// can touch before the decision is applied: the closure's view and the
/// subsequent commit form one serializable step. Two concurrent
/// transactions on the same room observe each other's committed writes,
/// never a torn intermediate state. This is the property every turn
/// handoff and slot claim in the game relies on.
pub trait RoomStore: Send + Sync + 'static {
    /// Point-reads the current document.
    async fn read(&self, code: &RoomCode) -> Result<Room, StoreError>;

    /// Creates the document, failing with [`StoreError::AlreadyExists`]
    /// if the code is taken.
    async fn create(&self, code: &RoomCode, room: Room) -> Result<(), StoreError>;

    /// Applies patches unconditionally (last-writer-wins) and returns
    /// the document after the write.
    async fn update(&self, code: &RoomCode, patches: &[RoomPatch]) -> Result<Room, StoreError>;

    /// Runs `decide` against the freshly read document and atomically
    /// applies its patches if it commits.
    async fn transact<F>(&self, code: &RoomCode, decide: F) -> Result<TxOutcome, StoreError>
    where
        F: FnMut(&Room) -> Tx + Send;

    /// Subscribes to the document. The watch starts at the current
    /// state and yields each subsequent committed write.
    async fn subscribe(&self, code: &RoomCode) -> Result<RoomWatch, StoreError>;
}

/// A live subscription to one room document.
///
/// # Why `watch` and not `broadcast`?
///
/// A `broadcast` channel delivers every message and lags (or drops)
/// slow consumers; a `watch` channel keeps only the latest value. For a
/// state-sync protocol the latest document is all that matters: every
/// consumer fully recomputes its view from the whole document, never
/// from a sequence of deltas, so skipping intermediate states is safe —
/// and a consumer that wakes up late converges on the same state as one
/// that saw every write.
#[derive(Debug)]
pub struct RoomWatch {
    rx: watch::Receiver<Room>,
}

impl RoomWatch {
    pub(crate) fn new(rx: watch::Receiver<Room>) -> Self {
        Self { rx }
    }

    /// The most recently committed document, without waiting.
    pub fn current(&self) -> Room {
        self.rx.borrow().clone()
    }

    /// Waits for the next committed write and returns the document.
    ///
    /// Returns [`StoreError::Closed`] once the room is dropped from the
    /// store.
    pub async fn changed(&mut self) -> Result<Room, StoreError> {
        self.rx.changed().await.map_err(|_| StoreError::Closed)?;
        Ok(self.rx.borrow_and_update().clone())
    }
}
