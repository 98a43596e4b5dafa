use broadside_model::RoomCode;

/// Errors from the document store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No document exists under the given room code.
    #[error("room {0} does not exist")]
    NotFound(RoomCode),

    /// A document already exists under the given room code.
    #[error("room {0} already exists")]
    AlreadyExists(RoomCode),

    /// A backend gave up on a transaction after repeated contention.
    /// The in-memory store never returns this; networked backends may.
    #[error("transaction aborted by the store")]
    Aborted,

    /// The store (or a watched document's channel) has shut down.
    #[error("store closed")]
    Closed,
}
