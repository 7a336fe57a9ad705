//! Typed access to native parameters.
//!
//! The native store only knows typed getters and setters keyed by a
//! per-parameter type tag. This module resolves that tag at call time and
//! dispatches through [`ParamValue`], so a value of the wrong kind is rejected
//! here instead of reaching native code.
//!
//! # Coercions
//!
//! Writes accept a value of the declared kind, plus these conversions:
//!
//! | declared kind | also accepts                                     |
//! |---------------|--------------------------------------------------|
//! | integer       | `LongInt` that fits in 32 bits                   |
//! | long integer  | `Int`                                            |
//! | real          | `Int`, `LongInt` exactly representable as `f64`  |
//! | character     | `String` holding exactly one character           |
//! | string        | `Char`                                           |
//!
//! Booleans are never converted to or from anything else. [`ParamValue`]
//! equality follows the same table, so a value read back after a coerced
//! write compares equal to the value written.

mod coerce;
mod error;
mod value;

use std::collections::BTreeMap;

use crate::{handle::NativeRef, native};

pub use crate::native::ParamKind;
pub use error::ParamError;
pub use value::ParamValue;

/// Reads a parameter, tagged with its declared kind.
///
/// # Errors
///
/// Returns [`ParamError::NotFound`] if `name` is not registered.
pub(crate) fn get(scip: NativeRef<'_>, name: &str) -> Result<ParamValue, ParamError> {
    let ptr = scip.as_ptr();
    // SAFETY: `NativeRef` is only handed out for a live handle.
    let value = unsafe {
        match native::param_type(ptr, name)? {
            ParamKind::Bool => ParamValue::Bool(native::get_bool_param(ptr, name)?),
            ParamKind::Int => ParamValue::Int(native::get_int_param(ptr, name)?),
            ParamKind::LongInt => ParamValue::LongInt(native::get_longint_param(ptr, name)?),
            ParamKind::Real => ParamValue::Real(native::get_real_param(ptr, name)?),
            ParamKind::Char => ParamValue::Char(native::get_char_param(ptr, name)?),
            ParamKind::String => ParamValue::String(native::get_string_param(ptr, name)?),
        }
    };
    Ok(value)
}

/// Writes a parameter after checking `value` against its declared kind.
///
/// # Errors
///
/// Returns [`ParamError::NotFound`] if `name` is not registered,
/// [`ParamError::TypeMismatch`] if `value` cannot be used for the declared
/// kind, and [`ParamError::InvalidValue`] if the native store rejects it.
pub(crate) fn set(scip: NativeRef<'_>, name: &str, value: ParamValue) -> Result<(), ParamError> {
    let ptr = scip.as_ptr();
    // SAFETY: `NativeRef` is only handed out for a live handle.
    let kind = unsafe { native::param_type(ptr, name) }?;
    let value = coerce::to_kind(name, value, kind)?;
    // SAFETY: as above.
    unsafe {
        match value {
            ParamValue::Bool(v) => native::set_bool_param(ptr, name, v),
            ParamValue::Int(v) => native::set_int_param(ptr, name, v),
            ParamValue::LongInt(v) => native::set_longint_param(ptr, name, v),
            ParamValue::Real(v) => native::set_real_param(ptr, name, v),
            ParamValue::Char(v) => native::set_char_param(ptr, name, v),
            ParamValue::String(v) => native::set_string_param(ptr, name, &v),
        }
    }?;
    Ok(())
}

/// Reads every registered parameter.
pub(crate) fn get_all(scip: NativeRef<'_>) -> Result<BTreeMap<String, ParamValue>, ParamError> {
    // SAFETY: `NativeRef` is only handed out for a live handle.
    let names = unsafe { native::param_names(scip.as_ptr()) };
    names
        .into_iter()
        .map(|name| get(scip, name).map(|value| (name.to_string(), value)))
        .collect()
}

/// Restores every parameter to its default.
pub(crate) fn reset(scip: NativeRef<'_>) {
    // SAFETY: `NativeRef` is only handed out for a live handle.
    unsafe { native::reset_params(scip.as_ptr()) }
}
