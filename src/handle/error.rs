use thiserror::Error;

use crate::native::HandleId;

use super::Ownership;

/// Errors raised by the handle ownership protocol.
///
/// A failed transfer never changes who owns the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum OwnershipError {
    /// The source wrapper does not own the handle, so it cannot hand it over.
    #[error("wrapper does not own {handle} (ownership: {ownership:?})")]
    NotOwner {
        handle: HandleId,
        ownership: Ownership,
    },

    /// The wrappers reference different native handles.
    #[error("wrappers reference different native handles")]
    DifferentHandle,

    /// The owning wrapper was dropped and the handle has been released.
    #[error("{handle} has already been released")]
    Released { handle: HandleId },
}
