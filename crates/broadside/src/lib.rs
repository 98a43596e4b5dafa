//! Broadside: two-player Battleship with no server in the middle.
//!
//! Both clients share one room document in a document store. All game
//! rules are pure functions of that document, executed inside store
//! transactions, so either client can drive any transition and both
//! always agree on the outcome.
//!
//! # Key types
//!
//! - [`RoomSession`] — one player's handle on a room
//! - [`GameView`] — that player's censored projection of the document
//! - [`lobby`] — room codes, creation, and the transactional slot claim
//!
//! The document schema lives in `broadside-model`, the rules in
//! `broadside-game`, and the storage surface in `broadside-store`; this
//! crate ties them together and re-exports the pieces a client needs.

pub mod lobby;
mod error;
mod session;
mod view;

pub use error::BroadsideError;
pub use session::RoomSession;
pub use view::{render, CellView, GameView};

pub use broadside_game::{PlacementError, ShotError, ShotOutcome, ShotResult};
pub use broadside_model::{
    grid, Direction, Room, RoomCode, RoomStatus, Ship, ShipClass, Slot, Uid,
};
pub use broadside_store::{
    IdentityProvider, MemoryStore, RoomStore, RoomWatch, StaticIdentity, StoreError, UserProfile,
};
