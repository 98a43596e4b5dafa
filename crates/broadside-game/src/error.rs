//! Typed rejections for the rules layer.
//!
//! Every variant is a recoverable input rejection: the action is refused,
//! nothing is written, and the player may act again.

use broadside_model::ShipClass;

/// Why a ship placement or fleet confirmation was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    /// A computed cell falls outside the board.
    #[error("ship extends beyond the board")]
    OutOfBounds,

    /// A horizontal run would wrap past the end of its row.
    #[error("ship wraps past the end of its row")]
    RowOverflow,

    /// A computed cell is already occupied by another ship.
    #[error("cell already occupied by another ship")]
    Overlap,

    /// The fleet is missing one or more roster classes.
    #[error("fleet is missing ships: {0:?}")]
    IncompleteFleet(Vec<ShipClass>),

    /// The fleet contains more than one ship of a class.
    #[error("duplicate ship of class {0}")]
    DuplicateClass(ShipClass),

    /// A ship's stored cells do not match its class and direction.
    #[error("malformed {0} ship")]
    MalformedShip(ShipClass),
}

/// Why a shot was refused. Checked against the transaction-fresh room
/// document, never against locally cached state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ShotError {
    /// The shooter does not hold the current turn.
    #[error("not your turn")]
    NotYourTurn,

    /// A winner is already recorded.
    #[error("the game is over")]
    GameOver,

    /// The target cell is not on the board.
    #[error("cell is off the board")]
    OffBoard,

    /// The target cell was already shot at.
    #[error("cell was already shot at")]
    AlreadyShot,

    /// The opponent slot is vacant — the document is not in a playable
    /// state.
    #[error("no opponent in the room")]
    OpponentMissing,
}
