//! Shared document storage for Broadside.
//!
//! One [`Room`](broadside_model::Room) document per room code, reached
//! through the [`RoomStore`] trait: point reads, create-if-absent, field
//! patches, serializable transactions, and change subscriptions.
//! [`MemoryStore`] is the in-process backend; [`IdentityProvider`] is
//! the sign-in seam.

#![allow(async_fn_in_trait)]

mod error;
mod identity;
mod memory;
mod store;

pub use error::StoreError;
pub use identity::{IdentityProvider, StaticIdentity, UserProfile};
pub use memory::MemoryStore;
pub use store::{RoomStore, RoomWatch, Tx, TxOutcome};
