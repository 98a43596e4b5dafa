//! Field-path merge updates for the room document.
//!
//! The store never accepts a whole replacement document from a running
//! game — every write names the specific sub-paths it touches, and the
//! store folds them into the current document. This is what lets plain
//! updates on a player's own record coexist with transactional updates on
//! contested fields: a patch can only clobber the paths it names.

use serde::{Deserialize, Serialize};

use crate::{Player, Room, RoomStatus, Ship, Slot, Uid};

/// A single named-field update to a room document.
///
/// Each variant corresponds to one updatable sub-path of [`Room`].
///
/// # Why an enum and not a closure?
///
/// A patch could be any `FnOnce(&mut Room)`, but an enum keeps updates
/// *data*: they can be logged, compared in tests, batched into one
/// atomic commit, and — unlike an opaque closure — the complete set of
/// writable paths is visible right here. If a field isn't in this list,
/// no store write can touch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomPatch {
    /// `status`
    Status(RoomStatus),
    /// `currentTurn`
    CurrentTurn(Option<Uid>),
    /// `host`
    Host(Uid),
    /// `players.<slot>` — whole player record (join, setup confirmation).
    Player(Slot, Player),
    /// `players.<slot>.ready`
    Ready(Slot, bool),
    /// `players.<slot>.ships`
    Ships(Slot, Vec<Ship>),
    /// `players.<slot>.hitsReceived`
    HitsReceived(Slot, Vec<usize>),
    /// `players.<slot>.missesReceived`
    MissesReceived(Slot, Vec<usize>),
}

impl RoomPatch {
    /// Folds this patch into the document, leaving every other path
    /// untouched.
    pub fn apply(&self, room: &mut Room) {
        match self {
            RoomPatch::Status(status) => room.status = *status,
            RoomPatch::CurrentTurn(turn) => room.current_turn = turn.clone(),
            RoomPatch::Host(uid) => room.host = uid.clone(),
            RoomPatch::Player(slot, player) => *room.player_mut(*slot) = player.clone(),
            RoomPatch::Ready(slot, ready) => room.player_mut(*slot).ready = *ready,
            RoomPatch::Ships(slot, ships) => room.player_mut(*slot).ships = ships.clone(),
            RoomPatch::HitsReceived(slot, hits) => {
                room.player_mut(*slot).hits_received = hits.clone();
            }
            RoomPatch::MissesReceived(slot, misses) => {
                room.player_mut(*slot).misses_received = misses.clone();
            }
        }
    }
}

/// Applies a batch of patches in order.
pub fn apply_all(room: &mut Room, patches: &[RoomPatch]) {
    for patch in patches {
        patch.apply(room);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, ShipClass};

    fn full_room() -> Room {
        let mut room = Room::create(Uid::new("h"), "Alice", 0);
        room.players.player2 = Player::occupied(Uid::new("g"), "Bob");
        room
    }

    #[test]
    fn test_status_patch_only_touches_status() {
        let mut room = full_room();
        let before = room.clone();
        RoomPatch::Status(RoomStatus::Prepare).apply(&mut room);

        assert_eq!(room.status, RoomStatus::Prepare);
        assert_eq!(room.players, before.players);
        assert_eq!(room.current_turn, before.current_turn);
    }

    #[test]
    fn test_per_slot_patches_leave_other_slot_alone() {
        let mut room = full_room();
        RoomPatch::Ready(Slot::Player1, true).apply(&mut room);
        RoomPatch::HitsReceived(Slot::Player2, vec![42]).apply(&mut room);

        assert!(room.players.player1.ready);
        assert!(!room.players.player2.ready);
        assert_eq!(room.players.player2.hits_received, vec![42]);
        assert!(room.players.player1.hits_received.is_empty());
    }

    #[test]
    fn test_apply_all_is_ordered() {
        let mut room = full_room();
        apply_all(
            &mut room,
            &[
                RoomPatch::Status(RoomStatus::Playing),
                RoomPatch::CurrentTurn(Some(Uid::new("h"))),
                RoomPatch::Status(RoomStatus::Finished),
            ],
        );
        // Later patches win on the same path.
        assert_eq!(room.status, RoomStatus::Finished);
        assert_eq!(room.current_turn, Some(Uid::new("h")));
    }

    #[test]
    fn test_ships_patch_replaces_fleet() {
        let mut room = full_room();
        let ships = vec![Ship {
            class: ShipClass::Small,
            direction: Direction::Vertical,
            positions: vec![0, 10],
        }];
        RoomPatch::Ships(Slot::Player1, ships.clone()).apply(&mut room);
        assert_eq!(room.players.player1.ships, ships);
    }

    #[test]
    fn test_player_patch_replaces_whole_record() {
        let mut room = full_room();
        let replacement = Player::occupied(Uid::new("new"), "Carol");
        RoomPatch::Player(Slot::Player2, replacement.clone()).apply(&mut room);
        assert_eq!(room.players.player2, replacement);
    }
}
