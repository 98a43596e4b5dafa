//! Room lifecycle transitions.
//!
//! ```text
//! waiting → prepare → playing → finished
//!              ↑__________________|        (rematch)
//! ```
//!
//! Each builder takes a room document, re-verifies its guard, and returns
//! the patch list for the transition — or `None` when the guard does not
//! hold. Callers run the builder inside `RoomStore::transact`, so a guard
//! observed on a stale snapshot is re-checked against the fresh document
//! at commit time and a raced transition aborts instead of double-firing.
//!
//! There is no error state: a malformed document simply produces `None`.

use broadside_model::{Room, RoomPatch, RoomStatus, Slot, Uid};

use crate::{fleet, win};

/// `waiting → prepare`: the host opens setup once both slots are
/// occupied.
pub fn open_prepare(room: &Room) -> Option<Vec<RoomPatch>> {
    (room.status == RoomStatus::Waiting && room.is_full())
        .then(|| vec![RoomPatch::Status(RoomStatus::Prepare)])
}

/// `prepare → playing`: fires exactly once when both players are ready
/// with complete, valid fleets.
///
/// Turn policy: the host fires first. Placement fields are left as they
/// stand — they were populated fresh during prepare; clearing happens
/// only on the rematch edge.
pub fn begin_playing(room: &Room) -> Option<Vec<RoomPatch>> {
    if room.status != RoomStatus::Prepare {
        return None;
    }
    for slot in Slot::BOTH {
        let player = room.player(slot);
        if player.is_vacant() || !player.ready || fleet::validate_fleet(&player.ships).is_err() {
            return None;
        }
    }

    let first_turn = first_turn(room)?;
    Some(vec![
        RoomPatch::Status(RoomStatus::Playing),
        RoomPatch::CurrentTurn(Some(first_turn)),
    ])
}

/// `playing → finished`: fires when the win detector reports a winner.
/// `currentTurn` is left untouched — informational only from here on.
pub fn finish(room: &Room) -> Option<Vec<RoomPatch>> {
    (room.status == RoomStatus::Playing && win::winner(room).is_some())
        .then(|| vec![RoomPatch::Status(RoomStatus::Finished)])
}

/// `finished → prepare`: explicit "play again". Clears readiness,
/// fleets, and shot records for both slots but keeps player identities.
pub fn reset_for_rematch(room: &Room) -> Option<Vec<RoomPatch>> {
    if room.status != RoomStatus::Finished {
        return None;
    }
    let mut patches = vec![
        RoomPatch::Status(RoomStatus::Prepare),
        RoomPatch::CurrentTurn(None),
    ];
    for slot in Slot::BOTH {
        patches.push(RoomPatch::Ready(slot, false));
        patches.push(RoomPatch::Ships(slot, Vec::new()));
        patches.push(RoomPatch::HitsReceived(slot, Vec::new()));
        patches.push(RoomPatch::MissesReceived(slot, Vec::new()));
    }
    Some(patches)
}

/// The uid that takes the first turn: the host's, falling back to
/// whoever occupies `player1` if the host somehow left the document.
fn first_turn(room: &Room) -> Option<Uid> {
    room.slot_of(&room.host)
        .and_then(|slot| room.uid_of(slot))
        .or_else(|| room.uid_of(Slot::Player1))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use broadside_model::{apply_all, Direction, Player, ShipClass, Uid};

    fn full_fleet() -> Vec<broadside_model::Ship> {
        let mut ships = Vec::new();
        for (class, anchor) in [
            (ShipClass::Small, 0),
            (ShipClass::Medium, 20),
            (ShipClass::Large, 40),
            (ShipClass::Xlarge, 60),
        ] {
            ships.push(fleet::place(&ships, class, anchor, Direction::Horizontal).unwrap());
        }
        ships
    }

    fn two_player_room() -> Room {
        let mut room = Room::create(Uid::new("h"), "Alice", 0);
        room.players.player2 = Player::occupied(Uid::new("g"), "Bob");
        room
    }

    #[test]
    fn test_open_prepare_requires_full_room() {
        let solo = Room::create(Uid::new("h"), "Alice", 0);
        assert_eq!(open_prepare(&solo), None);

        let full = two_player_room();
        let patches = open_prepare(&full).unwrap();
        assert_eq!(patches, vec![RoomPatch::Status(RoomStatus::Prepare)]);
    }

    #[test]
    fn test_open_prepare_noop_outside_waiting() {
        let mut room = two_player_room();
        room.status = RoomStatus::Prepare;
        assert_eq!(open_prepare(&room), None);
    }

    #[test]
    fn test_begin_playing_requires_both_ready_with_valid_fleets() {
        let mut room = two_player_room();
        room.status = RoomStatus::Prepare;
        assert_eq!(begin_playing(&room), None);

        room.players.player1.ships = full_fleet();
        room.players.player1.ready = true;
        // Opponent not ready yet.
        assert_eq!(begin_playing(&room), None);

        room.players.player2.ships = full_fleet();
        room.players.player2.ready = true;
        let patches = begin_playing(&room).unwrap();
        apply_all(&mut room, &patches);
        assert_eq!(room.status, RoomStatus::Playing);
        assert_eq!(room.current_turn, Some(Uid::new("h")));
    }

    #[test]
    fn test_begin_playing_rejects_ready_flag_without_fleet() {
        // ready=true with an empty ship list is a malformed document:
        // the transition must not fire on it.
        let mut room = two_player_room();
        room.status = RoomStatus::Prepare;
        room.players.player1.ready = true;
        room.players.player2.ready = true;
        assert_eq!(begin_playing(&room), None);
    }

    #[test]
    fn test_begin_playing_fires_only_from_prepare() {
        let mut room = two_player_room();
        room.players.player1.ships = full_fleet();
        room.players.player2.ships = full_fleet();
        room.players.player1.ready = true;
        room.players.player2.ready = true;

        room.status = RoomStatus::Playing;
        // Already started — a second observer must not double-fire.
        assert_eq!(begin_playing(&room), None);
    }

    #[test]
    fn test_finish_requires_winner() {
        let mut room = two_player_room();
        room.status = RoomStatus::Playing;
        room.players.player1.ships = full_fleet();
        room.players.player2.ships = full_fleet();
        room.current_turn = Some(Uid::new("h"));
        assert_eq!(finish(&room), None);

        room.players.player2.hits_received = room.players.player2.ships
            .iter()
            .flat_map(|s| s.positions.clone())
            .collect();
        let patches = finish(&room).unwrap();
        apply_all(&mut room, &patches);
        assert_eq!(room.status, RoomStatus::Finished);
        // currentTurn untouched.
        assert_eq!(room.current_turn, Some(Uid::new("h")));

        // Idempotent: already finished, guard no longer holds.
        assert_eq!(finish(&room), None);
    }

    #[test]
    fn test_rematch_resets_boards_but_keeps_identities() {
        let mut room = two_player_room();
        room.status = RoomStatus::Finished;
        room.current_turn = Some(Uid::new("g"));
        room.players.player1.ships = full_fleet();
        room.players.player1.ready = true;
        room.players.player1.hits_received = vec![1, 2];
        room.players.player1.misses_received = vec![3];

        let patches = reset_for_rematch(&room).unwrap();
        apply_all(&mut room, &patches);

        assert_eq!(room.status, RoomStatus::Prepare);
        assert_eq!(room.current_turn, None);
        for slot in Slot::BOTH {
            let p = room.player(slot);
            assert!(!p.ready);
            assert!(p.ships.is_empty());
            assert!(p.hits_received.is_empty());
            assert!(p.misses_received.is_empty());
        }
        // Identities survive.
        assert_eq!(room.uid_of(Slot::Player1), Some(&Uid::new("h")));
        assert_eq!(room.uid_of(Slot::Player2), Some(&Uid::new("g")));
    }

    #[test]
    fn test_rematch_only_from_finished() {
        let mut room = two_player_room();
        room.status = RoomStatus::Playing;
        assert_eq!(reset_for_rematch(&room), None);
    }
}
