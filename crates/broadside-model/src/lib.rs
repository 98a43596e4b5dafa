//! Shared room document schema for Broadside.
//!
//! This crate defines the data every client agrees on:
//!
//! - **Types** ([`Room`], [`Player`], [`Ship`], [`RoomStatus`], ids) —
//!   the document aggregate stored under a room code.
//! - **Grid** ([`grid`]) — linear index addressing over the board.
//! - **Patches** ([`RoomPatch`]) — named field-path updates, the unit of
//!   every store write.
//!
//! It knows nothing about storage or rules; it only pins the schema.

pub mod grid;
mod patch;
mod types;

pub use patch::{apply_all, RoomPatch};
pub use types::{
    Direction, Player, Players, Room, RoomCode, RoomStatus, Ship, ShipClass, Slot, Uid,
};
