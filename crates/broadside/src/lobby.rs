//! Room creation and joining.
//!
//! A room is addressed by a short code players exchange out of band.
//! Creation is create-if-absent with a fresh code per attempt; joining
//! is a transactional slot claim, so two clients racing for the last
//! seat serialize and exactly one gets it.

use std::time::{SystemTime, UNIX_EPOCH};

use broadside_model::{Player, Room, RoomCode, RoomPatch, Slot};
use broadside_store::{RoomStore, StoreError, Tx, TxOutcome, UserProfile};
use rand::Rng;

use crate::BroadsideError;

const CODE_LEN: usize = 5;
// No digits: codes are read aloud, and 0/O or 1/I confusions are worse
// than a smaller alphabet.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";

/// A fresh random room code.
pub fn generate_code() -> RoomCode {
    let mut rng = rand::rng();
    let code: String = (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect();
    RoomCode::new(code)
}

/// Milliseconds since the Unix epoch, for `createdAt`.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Creates a new room hosted by `profile` and returns its code.
///
/// Code collisions are resolved by retrying with a fresh code; the
/// store's create-if-absent guarantees two hosts can never share one.
pub async fn create_room<S: RoomStore>(
    store: &S,
    profile: &UserProfile,
) -> Result<RoomCode, BroadsideError> {
    loop {
        let code = generate_code();
        let room = Room::create(profile.uid.clone(), &profile.display_name, now_millis());
        match store.create(&code, room).await {
            Ok(()) => {
                tracing::info!(%code, host = %profile.uid, "room created");
                return Ok(code);
            }
            Err(StoreError::AlreadyExists(_)) => continue,
            Err(err) => return Err(err.into()),
        }
    }
}

/// Claims a slot in an existing room and returns it.
///
/// Re-joining with a uid already present in the document re-attaches to
/// the same slot without writing — a client that reconnects mid-game
/// gets its seat back. Otherwise the first vacant slot is claimed
/// transactionally; losing the race for it yields
/// [`BroadsideError::RoomFull`].
pub async fn join_room<S: RoomStore>(
    store: &S,
    code: &RoomCode,
    profile: &UserProfile,
) -> Result<Slot, BroadsideError> {
    let mut claimed: Option<Slot> = None;
    let mut rejection: Option<BroadsideError> = None;

    store
        .transact(code, |room| {
            if let Some(slot) = room.slot_of(&profile.uid) {
                claimed = Some(slot);
                return Tx::Abort;
            }
            if !room.status.is_joinable() {
                rejection = Some(BroadsideError::Conflict("room is no longer joinable"));
                return Tx::Abort;
            }
            match room.vacant_slot() {
                Some(slot) => {
                    claimed = Some(slot);
                    Tx::Commit(vec![RoomPatch::Player(
                        slot,
                        Player::occupied(profile.uid.clone(), &profile.display_name),
                    )])
                }
                None => {
                    rejection = Some(BroadsideError::RoomFull);
                    Tx::Abort
                }
            }
        })
        .await
        .map(|outcome| {
            if let TxOutcome::Committed(_) = outcome {
                tracing::info!(%code, player = %profile.uid, "player joined");
            }
        })?;

    claimed.ok_or_else(|| rejection.unwrap_or(BroadsideError::Store(StoreError::Aborted)))
}
