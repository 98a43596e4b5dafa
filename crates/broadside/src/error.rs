//! Unified error surface of the session layer.
//!
//! Rules rejections and storage failures pass through transparently so
//! callers can match on the underlying variant; the remaining variants
//! are rejections the session layer itself raises.

use broadside_game::{PlacementError, ShotError};
use broadside_store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BroadsideError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Shot(#[from] ShotError),

    /// Both slots were occupied when the join transaction ran.
    #[error("room is full")]
    RoomFull,

    /// The identity provider reported nobody signed in.
    #[error("no signed-in user")]
    Anonymous,

    /// The action is reserved for the room's host.
    #[error("only the host may do that")]
    NotHost,

    /// The room's current status does not permit the action.
    #[error("action not allowed right now: {0}")]
    Conflict(&'static str),
}
