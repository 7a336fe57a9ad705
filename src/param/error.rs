use thiserror::Error;

use crate::native::{NativeError, ParamKind};

/// Errors returned by typed parameter access.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParamError {
    /// No parameter with this name exists.
    #[error("parameter not found: {name}")]
    NotFound { name: String },

    /// The value's kind cannot be used for the parameter's declared kind.
    #[error("type mismatch for {name}: expected {expected}, found {found}")]
    TypeMismatch {
        name: String,
        expected: ParamKind,
        found: ParamKind,
    },

    /// The value has the right kind but lies outside the admissible domain.
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },

    /// Any other failure reported by the native store.
    #[error(transparent)]
    Native(NativeError),
}

impl From<NativeError> for ParamError {
    fn from(error: NativeError) -> Self {
        match error {
            NativeError::ParameterUnknown { name } => ParamError::NotFound { name },
            NativeError::ParameterWrongType {
                name,
                declared,
                requested,
            } => ParamError::TypeMismatch {
                name,
                expected: declared,
                found: requested,
            },
            NativeError::ParameterWrongValue { name, reason } => {
                ParamError::InvalidValue { name, reason }
            }
            other => ParamError::Native(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_errors_map_to_param_errors() {
        let error = ParamError::from(NativeError::ParameterUnknown {
            name: "a".to_string(),
        });
        assert!(matches!(error, ParamError::NotFound { .. }));

        let error = ParamError::from(NativeError::ParameterWrongType {
            name: "a".to_string(),
            declared: ParamKind::Real,
            requested: ParamKind::Int,
        });
        assert!(matches!(
            error,
            ParamError::TypeMismatch {
                expected: ParamKind::Real,
                found: ParamKind::Int,
                ..
            }
        ));

        let error = ParamError::from(NativeError::InvalidCall {
            context: "b".to_string(),
        });
        assert!(matches!(error, ParamError::Native(_)));
    }
}
