//! Pure Battleship rules over the shared room document.
//!
//! Everything in this crate is a deterministic function of a [`Room`]
//! snapshot: placement validation, shot resolution, win detection, and
//! the lifecycle transition builders. No IO, no clocks, no randomness —
//! the session layer feeds these functions transaction-scoped documents
//! and commits the patch lists they return.
//!
//! [`Room`]: broadside_model::Room

mod error;
pub mod fleet;
pub mod machine;
pub mod shot;
pub mod win;

pub use error::{PlacementError, ShotError};
pub use shot::{ShotOutcome, ShotResult};
