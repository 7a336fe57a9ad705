use thiserror::Error;

use super::ParamKind;

/// Return codes reported by the native handle API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum NativeError {
    /// No parameter with this name is registered.
    #[error("unknown parameter <{name}>")]
    ParameterUnknown { name: String },

    /// The typed accessor does not match the parameter's declared kind.
    #[error("parameter <{name}> is of kind {declared}, not {requested}")]
    ParameterWrongType {
        name: String,
        declared: ParamKind,
        requested: ParamKind,
    },

    /// The value is outside the parameter's admissible domain.
    #[error("invalid value for parameter <{name}>: {reason}")]
    ParameterWrongValue { name: String, reason: String },

    /// The call was made on something that is not a live handle.
    #[error("invalid call: {context}")]
    InvalidCall { context: String },
}
