//! Shot resolution.
//!
//! `resolve` is pure: it inspects a room document and produces the patch
//! list a shot would commit. The caller MUST run it inside the store's
//! transaction primitive against the freshly read document, so that two
//! concurrent shots at the same cell serialize — the loser re-reads the
//! already-updated document inside its own transaction and rejects
//! `AlreadyShot`, and a turn handoff can never be lost to a race.

use broadside_model::{grid, Room, RoomPatch, RoomStatus, ShipClass, Slot, Uid};

use crate::{win, ShotError};

/// What a shot did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    Hit,
    Miss,
}

/// The result of an accepted shot: the outcome, the patches to commit
/// atomically, and the unconditional turn handoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShotResult {
    pub outcome: ShotOutcome,
    /// Set when this hit completed a ship.
    pub sunk: Option<ShipClass>,
    /// The other player's uid — the turn always passes, hit or miss.
    pub next_turn: Uid,
    /// Updates to `hitsReceived`/`missesReceived` of the target plus
    /// `currentTurn`. Commit as one atomic write.
    pub patches: Vec<RoomPatch>,
}

/// Resolves a shot by the player in `shooter` against the opposite slot.
///
/// Preconditions are checked against `room` as passed in — hand this the
/// transaction-scoped document, never a cached snapshot.
pub fn resolve(room: &Room, shooter: Slot, index: usize) -> Result<ShotResult, ShotError> {
    if room.status == RoomStatus::Finished || win::winner(room).is_some() {
        return Err(ShotError::GameOver);
    }
    if !grid::in_bounds(index) {
        return Err(ShotError::OffBoard);
    }

    let target_slot = shooter.opposite();
    let target = room.player(target_slot);
    let next_turn = target.uid.clone().ok_or(ShotError::OpponentMissing)?;

    // Checked before the turn: a shot that lost a race for this cell
    // reads as a repeat, not as an out-of-turn attempt.
    if target.was_shot(index) {
        return Err(ShotError::AlreadyShot);
    }

    let shooter_uid = room.uid_of(shooter).ok_or(ShotError::NotYourTurn)?;
    if room.current_turn.as_ref() != Some(shooter_uid) {
        return Err(ShotError::NotYourTurn);
    }

    let struck = target.ships.iter().find(|ship| ship.contains(index));

    let (outcome, sunk, patch) = match struck {
        Some(ship) => {
            let mut hits = target.hits_received.clone();
            hits.push(index);
            let sunk = win::ship_sunk(ship, &hits).then_some(ship.class);
            (
                ShotOutcome::Hit,
                sunk,
                RoomPatch::HitsReceived(target_slot, hits),
            )
        }
        None => {
            let mut misses = target.misses_received.clone();
            misses.push(index);
            (
                ShotOutcome::Miss,
                None,
                RoomPatch::MissesReceived(target_slot, misses),
            )
        }
    };

    Ok(ShotResult {
        outcome,
        sunk,
        next_turn: next_turn.clone(),
        patches: vec![patch, RoomPatch::CurrentTurn(Some(next_turn))],
    })
}
