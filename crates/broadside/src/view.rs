//! Per-player projection of the shared room document.
//!
//! The document stores both fleets in full; what a player is allowed to
//! see is a render-time decision. [`render`] derives the two boards a
//! client shows — own fleet with incoming fire, and the targeting board
//! that never reveals an opponent ship before it is hit.

use broadside_model::{grid, Player, Room, RoomStatus, Slot};
use broadside_game::win;

/// What one cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Empty,
    /// Own ship, not yet hit. Never appears on the targeting board.
    Ship,
    Hit,
    /// Hit cell belonging to a fully sunk ship.
    Sunk,
    Miss,
}

/// One player's view of the match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    pub status: RoomStatus,
    /// This player's board: own ships plus incoming shots.
    pub own_board: [CellView; grid::GRID_CELLS],
    /// The opponent's waters as this player may see them: outgoing
    /// shots only.
    pub target_board: [CellView; grid::GRID_CELLS],
    pub my_turn: bool,
    pub winner: Option<Slot>,
    pub opponent_name: Option<String>,
}

/// Projects the document into what the player in `my_slot` sees.
pub fn render(room: &Room, my_slot: Slot) -> GameView {
    let me = room.player(my_slot);
    let opponent = room.player(my_slot.opposite());

    GameView {
        status: room.status,
        own_board: board_of(me, true),
        target_board: board_of(opponent, false),
        my_turn: room.status.is_live()
            && room.current_turn.is_some()
            && room.current_turn.as_ref() == room.uid_of(my_slot),
        winner: win::winner(room),
        opponent_name: (!opponent.is_vacant()).then(|| opponent.name.clone()),
    }
}

/// Renders the board stored in `player`'s record. With `reveal_ships`
/// unhit ship cells show as [`CellView::Ship`]; without it they stay
/// [`CellView::Empty`].
fn board_of(player: &Player, reveal_ships: bool) -> [CellView; grid::GRID_CELLS] {
    let mut board = [CellView::Empty; grid::GRID_CELLS];

    if reveal_ships {
        for cell in player.fleet_cells() {
            if grid::in_bounds(cell) {
                board[cell] = CellView::Ship;
            }
        }
    }
    for &cell in &player.misses_received {
        if grid::in_bounds(cell) {
            board[cell] = CellView::Miss;
        }
    }
    for ship in &player.ships {
        let sunk = win::ship_sunk(ship, &player.hits_received);
        for &cell in &ship.positions {
            if grid::in_bounds(cell) && player.hits_received.contains(&cell) {
                board[cell] = if sunk { CellView::Sunk } else { CellView::Hit };
            }
        }
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use broadside_model::{Direction, Player, Room, Ship, ShipClass, Uid};

    fn playing_room() -> Room {
        let mut room = Room::create(Uid::new("h"), "Alice", 0);
        room.players.player2 = Player::occupied(Uid::new("g"), "Bob");
        room.players.player1.ships = vec![Ship {
            class: ShipClass::Small,
            direction: Direction::Horizontal,
            positions: vec![0, 1],
        }];
        room.players.player2.ships = vec![Ship {
            class: ShipClass::Medium,
            direction: Direction::Horizontal,
            positions: vec![11, 12, 13],
        }];
        room.status = RoomStatus::Playing;
        room.current_turn = Some(Uid::new("h"));
        room
    }

    #[test]
    fn test_own_board_shows_fleet_and_incoming_fire() {
        let mut room = playing_room();
        room.players.player1.hits_received = vec![0];
        room.players.player1.misses_received = vec![55];

        let view = render(&room, Slot::Player1);
        assert_eq!(view.own_board[0], CellView::Hit);
        assert_eq!(view.own_board[1], CellView::Ship);
        assert_eq!(view.own_board[55], CellView::Miss);
    }

    #[test]
    fn test_target_board_hides_unhit_ships() {
        let mut room = playing_room();
        room.players.player2.hits_received = vec![11];
        room.players.player2.misses_received = vec![0];

        let view = render(&room, Slot::Player1);
        assert_eq!(view.target_board[11], CellView::Hit);
        assert_eq!(view.target_board[0], CellView::Miss);
        // Unhit ship cells are indistinguishable from water.
        assert_eq!(view.target_board[12], CellView::Empty);
        assert_eq!(view.target_board[13], CellView::Empty);
    }

    #[test]
    fn test_sunk_ship_marks_all_its_cells() {
        let mut room = playing_room();
        room.players.player2.hits_received = vec![11, 12, 13];

        let view = render(&room, Slot::Player1);
        for cell in [11, 12, 13] {
            assert_eq!(view.target_board[cell], CellView::Sunk);
        }
        assert_eq!(view.winner, Some(Slot::Player1));
    }

    #[test]
    fn test_my_turn_tracks_current_turn_uid() {
        let room = playing_room();
        assert!(render(&room, Slot::Player1).my_turn);
        assert!(!render(&room, Slot::Player2).my_turn);
    }

    #[test]
    fn test_no_turn_outside_playing() {
        let mut room = playing_room();
        room.status = RoomStatus::Finished;
        assert!(!render(&room, Slot::Player1).my_turn);
    }

    #[test]
    fn test_vacant_opponent_has_no_name() {
        let room = Room::create(Uid::new("h"), "Alice", 0);
        let view = render(&room, Slot::Player1);
        assert_eq!(view.opponent_name, None);
        assert_eq!(view.status, RoomStatus::Waiting);
    }
}
