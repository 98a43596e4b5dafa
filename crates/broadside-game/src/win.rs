//! Win detection: deriving game-over state from cumulative hits.
//!
//! Detection is a pure derivation from the room document and runs on
//! every snapshot; the caller is responsible for applying the resulting
//! `playing → finished` transition at most once.

use broadside_model::{Player, Room, Ship, Slot};

/// Returns `true` if every cell of the ship is present in `hits`.
pub fn ship_sunk(ship: &Ship, hits: &[usize]) -> bool {
    ship.positions.iter().all(|cell| hits.contains(cell))
}

/// Returns `true` if the player's fleet is non-empty and every cell of
/// every ship has been struck.
pub fn fleet_destroyed(player: &Player) -> bool {
    !player.ships.is_empty()
        && player
            .ships
            .iter()
            .all(|ship| ship_sunk(ship, &player.hits_received))
}

/// The winning slot, if either fleet is destroyed.
///
/// A document showing both fleets destroyed cannot arise from
/// cell-at-a-time play, but if observed (tampering, corruption) the tie
/// resolves for the defender: after an accepted shot the turn has already
/// passed to the player who was fired upon, so the holder of
/// `currentTurn` takes the win, falling back to `player1` when unset.
/// The shooter never wins a tie.
pub fn winner(room: &Room) -> Option<Slot> {
    let p1_destroyed = fleet_destroyed(room.player(Slot::Player1));
    let p2_destroyed = fleet_destroyed(room.player(Slot::Player2));

    match (p1_destroyed, p2_destroyed) {
        (false, false) => None,
        (true, false) => Some(Slot::Player2),
        (false, true) => Some(Slot::Player1),
        (true, true) => room
            .current_turn
            .as_ref()
            .and_then(|uid| room.slot_of(uid))
            .or(Some(Slot::Player1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broadside_model::{Direction, Player, Room, Ship, ShipClass, Uid};

    fn three_ship(anchor: usize) -> Ship {
        Ship {
            class: ShipClass::Medium,
            direction: Direction::Horizontal,
            positions: vec![anchor, anchor + 1, anchor + 2],
        }
    }

    fn room_with_fleets() -> Room {
        let mut room = Room::create(Uid::new("h"), "Alice", 0);
        room.players.player2 = Player::occupied(Uid::new("g"), "Bob");
        room.players.player1.ships = vec![three_ship(0)];
        room.players.player2.ships = vec![three_ship(50)];
        room
    }

    #[test]
    fn test_empty_fleet_is_not_destroyed() {
        // An unplaced fleet must not count as destroyed, or every room
        // would finish before setup.
        let player = Player::occupied(Uid::new("u"), "A");
        assert!(!fleet_destroyed(&player));
    }

    #[test]
    fn test_partial_damage_is_not_destroyed() {
        let mut room = room_with_fleets();
        room.players.player2.hits_received = vec![50, 51];
        assert!(!fleet_destroyed(&room.players.player2));
        assert_eq!(winner(&room), None);
    }

    #[test]
    fn test_destroyed_fleet_names_the_other_slot() {
        let mut room = room_with_fleets();
        room.players.player2.hits_received = vec![50, 51, 52];
        assert!(fleet_destroyed(&room.players.player2));
        assert_eq!(winner(&room), Some(Slot::Player1));
    }

    #[test]
    fn test_win_is_monotonic_under_more_hits() {
        // Once a winner is reported, any superset of hits reports the
        // same winner.
        let mut room = room_with_fleets();
        room.players.player2.hits_received = vec![50, 51, 52];
        assert_eq!(winner(&room), Some(Slot::Player1));

        room.players.player2.misses_received = vec![7, 8];
        room.players.player2.hits_received.push(50); // duplicate entry
        assert_eq!(winner(&room), Some(Slot::Player1));
    }

    #[test]
    fn test_double_destruction_resolves_for_turn_holder() {
        let mut room = room_with_fleets();
        room.players.player1.hits_received = vec![0, 1, 2];
        room.players.player2.hits_received = vec![50, 51, 52];

        // Turn already handed to player2 (the defender of the last shot).
        room.current_turn = Some(Uid::new("g"));
        assert_eq!(winner(&room), Some(Slot::Player2));

        // No turn recorded: fall back to player1.
        room.current_turn = None;
        assert_eq!(winner(&room), Some(Slot::Player1));
    }

    #[test]
    fn test_sunk_scenario_on_ten_wide_grid() {
        // Fleet of one length-3 ship at [11, 12, 13]; hits accumulate
        // cell-at-a-time until the fleet is destroyed.
        let ship = three_ship(11);
        assert!(!ship_sunk(&ship, &[11]));
        assert!(!ship_sunk(&ship, &[11, 12]));
        assert!(ship_sunk(&ship, &[11, 12, 13]));
    }
}
