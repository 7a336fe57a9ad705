use thiserror::Error;

use crate::{handle::OwnershipError, native::NativeError, param::ParamError};

/// Errors returned by [`Model`](super::Model) and
/// [`ForeignModel`](crate::ForeignModel) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ModelError {
    /// A parameter could not be read or written.
    #[error(transparent)]
    Param(#[from] ParamError),

    /// The ownership protocol rejected the operation.
    #[error(transparent)]
    Ownership(#[from] OwnershipError),

    /// The native handle reported a failure.
    #[error("native call failed")]
    Native(#[from] NativeError),
}
