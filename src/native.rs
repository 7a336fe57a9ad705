//! Raw native model handles.
//!
//! This module is the lowest layer of the crate: an opaque [`Scip`] instance
//! addressed through raw pointers, with the same shape as a C solver API.
//! Handles are created with [`create`], deep-copied with [`copy`], and must be
//! released exactly once with [`free`].
//!
//! Parameters live in an untyped, name-keyed store. Each parameter carries a
//! type tag ([`ParamKind`]) that callers query with [`param_type`] before
//! using the matching typed getter or setter. Using the wrong typed accessor
//! is reported as [`NativeError::ParameterWrongType`], never coerced.
//!
//! # Safety
//!
//! Every function taking a raw pointer requires that the pointer was returned
//! by [`create`] or [`copy`] and has not been passed to [`free`]. Handles are
//! not reentrant: callers must serialize all access to a given handle.

mod error;
mod registry;

use std::{
    collections::BTreeMap,
    fmt,
    ptr::NonNull,
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use tracing::debug;

pub use error::NativeError;
pub use registry::ParamKind;

use registry::Slot;

/// Unique identifier of a native handle.
///
/// Identifiers are never reused, so they remain meaningful after the handle
/// they name has been released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandleId(u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scip#{}", self.0)
    }
}

/// An opaque native model instance.
pub struct Scip {
    id: HandleId,
    params: BTreeMap<&'static str, Slot>,
}

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Live handles, keyed by address.
static LIVE: Mutex<BTreeMap<usize, HandleId>> = Mutex::new(BTreeMap::new());

fn live() -> MutexGuard<'static, BTreeMap<usize, HandleId>> {
    // The map is only ever inserted into or removed from, so a poisoned lock
    // still guards consistent data.
    LIVE.lock().unwrap_or_else(PoisonError::into_inner)
}

fn register(scip: Box<Scip>) -> NonNull<Scip> {
    let id = scip.id;
    let ptr = NonNull::from(Box::leak(scip));
    live().insert(ptr.as_ptr() as usize, id);
    ptr
}

fn next_id() -> HandleId {
    HandleId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Returns `true` if the handle with the given id has not been released.
#[must_use]
pub fn is_live(id: HandleId) -> bool {
    live().values().any(|&live_id| live_id == id)
}

/// Allocates a new model instance with every parameter at its default.
///
/// Allocation failure aborts the process.
#[must_use]
pub fn create() -> NonNull<Scip> {
    let scip = Box::new(Scip {
        id: next_id(),
        params: registry::default_params(),
    });
    let ptr = register(scip);
    debug!(handle = %handle_id_unchecked(ptr), "native handle created");
    ptr
}

fn handle_id_unchecked(ptr: NonNull<Scip>) -> HandleId {
    // SAFETY: only called on a pointer freshly produced by `register`.
    unsafe { ptr.as_ref().id }
}

fn check_live(scip: *const Scip, operation: &'static str) -> Result<(), NativeError> {
    if live().contains_key(&(scip as usize)) {
        Ok(())
    } else {
        Err(NativeError::InvalidCall {
            context: format!("`{operation}` called with a pointer that is not a live handle"),
        })
    }
}

/// Creates a deep copy of `source`, including every parameter value.
///
/// # Errors
///
/// Returns [`NativeError::InvalidCall`] if `source` is not a live handle.
///
/// # Safety
///
/// `source` must satisfy the [module-level](self) pointer requirements.
pub unsafe fn copy(source: *const Scip) -> Result<NonNull<Scip>, NativeError> {
    check_live(source, "copy")?;
    // SAFETY: the caller guarantees `source` is valid, and it is registered.
    let source = unsafe { &*source };
    let scip = Box::new(Scip {
        id: next_id(),
        params: source.params.clone(),
    });
    let ptr = register(scip);
    debug!(
        source = %source.id,
        copy = %handle_id_unchecked(ptr),
        "native handle copied"
    );
    Ok(ptr)
}

/// Releases a handle.
///
/// # Errors
///
/// Returns [`NativeError::InvalidCall`] if `scip` is not a live handle, for
/// example because it was already released. Nothing is freed in that case.
///
/// # Safety
///
/// `scip` must have been returned by [`create`] or [`copy`], and no other
/// reference to it may be used after this call.
pub unsafe fn free(scip: *mut Scip) -> Result<(), NativeError> {
    let Some(id) = live().remove(&(scip as usize)) else {
        return Err(NativeError::InvalidCall {
            context: "`free` called with a pointer that is not a live handle".to_string(),
        });
    };
    // SAFETY: the pointer was registered, so it came from `Box::leak`, and
    // removing it from the live set guarantees it is dropped once.
    drop(unsafe { Box::from_raw(scip) });
    debug!(handle = %id, "native handle freed");
    Ok(())
}

/// Returns the identifier of a handle.
///
/// # Safety
///
/// `scip` must satisfy the [module-level](self) pointer requirements.
#[must_use]
pub unsafe fn handle_id(scip: *const Scip) -> HandleId {
    // SAFETY: guaranteed by the caller.
    unsafe { (*scip).id }
}

/// Returns the names of all registered parameters, in sorted order.
///
/// # Safety
///
/// `scip` must satisfy the [module-level](self) pointer requirements.
#[must_use]
pub unsafe fn param_names(scip: *const Scip) -> Vec<&'static str> {
    // SAFETY: guaranteed by the caller.
    unsafe { (*scip).params.keys().copied().collect() }
}

/// Returns the declared kind of a parameter.
///
/// # Errors
///
/// Returns [`NativeError::ParameterUnknown`] if `name` is not registered.
///
/// # Safety
///
/// `scip` must satisfy the [module-level](self) pointer requirements.
pub unsafe fn param_type(scip: *const Scip, name: &str) -> Result<ParamKind, NativeError> {
    // SAFETY: guaranteed by the caller.
    unsafe { lookup(scip, name) }.map(Slot::kind)
}

/// Restores every parameter to its default value.
///
/// # Safety
///
/// `scip` must satisfy the [module-level](self) pointer requirements.
pub unsafe fn reset_params(scip: *mut Scip) {
    // SAFETY: guaranteed by the caller.
    let scip = unsafe { &mut *scip };
    scip.params.values_mut().for_each(Slot::reset);
}

unsafe fn lookup<'a>(scip: *const Scip, name: &str) -> Result<&'a Slot, NativeError> {
    // SAFETY: guaranteed by the caller.
    let scip = unsafe { &*scip };
    scip.params
        .get(name)
        .ok_or_else(|| NativeError::ParameterUnknown {
            name: name.to_string(),
        })
}

unsafe fn lookup_mut<'a>(scip: *mut Scip, name: &str) -> Result<&'a mut Slot, NativeError> {
    // SAFETY: guaranteed by the caller.
    let scip = unsafe { &mut *scip };
    scip.params
        .get_mut(name)
        .ok_or_else(|| NativeError::ParameterUnknown {
            name: name.to_string(),
        })
}

fn wrong_type(name: &str, declared: ParamKind, requested: ParamKind) -> NativeError {
    NativeError::ParameterWrongType {
        name: name.to_string(),
        declared,
        requested,
    }
}

fn check_bounds<T: PartialOrd + fmt::Display>(
    name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<T, NativeError> {
    if min <= value && value <= max {
        Ok(value)
    } else {
        Err(NativeError::ParameterWrongValue {
            name: name.to_string(),
            reason: format!("{value} is outside [{min}, {max}]"),
        })
    }
}

macro_rules! numeric_accessors {
    ($get:ident, $set:ident, $variant:ident, $ty:ty) => {
        #[doc = concat!("Reads a `", stringify!($variant), "` parameter.")]
        ///
        /// # Errors
        ///
        /// Returns [`NativeError::ParameterUnknown`] or
        /// [`NativeError::ParameterWrongType`].
        ///
        /// # Safety
        ///
        /// `scip` must satisfy the [module-level](self) pointer requirements.
        pub unsafe fn $get(scip: *const Scip, name: &str) -> Result<$ty, NativeError> {
            // SAFETY: guaranteed by the caller.
            match unsafe { lookup(scip, name) }? {
                Slot::$variant { value, .. } => Ok(*value),
                slot => Err(wrong_type(name, slot.kind(), ParamKind::$variant)),
            }
        }

        #[doc = concat!("Writes a `", stringify!($variant), "` parameter.")]
        ///
        /// # Errors
        ///
        /// Returns [`NativeError::ParameterUnknown`],
        /// [`NativeError::ParameterWrongType`], or
        /// [`NativeError::ParameterWrongValue`] if `value` is out of bounds.
        ///
        /// # Safety
        ///
        /// `scip` must satisfy the [module-level](self) pointer requirements.
        pub unsafe fn $set(scip: *mut Scip, name: &str, value: $ty) -> Result<(), NativeError> {
            // SAFETY: guaranteed by the caller.
            match unsafe { lookup_mut(scip, name) }? {
                Slot::$variant {
                    value: current,
                    min,
                    max,
                    ..
                } => {
                    *current = check_bounds(name, value, *min, *max)?;
                    Ok(())
                }
                slot => Err(wrong_type(name, slot.kind(), ParamKind::$variant)),
            }
        }
    };
}

numeric_accessors!(get_int_param, set_int_param, Int, i32);
numeric_accessors!(get_longint_param, set_longint_param, LongInt, i64);
numeric_accessors!(get_real_param, set_real_param, Real, f64);

/// Reads a `Bool` parameter.
///
/// # Errors
///
/// Returns [`NativeError::ParameterUnknown`] or
/// [`NativeError::ParameterWrongType`].
///
/// # Safety
///
/// `scip` must satisfy the [module-level](self) pointer requirements.
pub unsafe fn get_bool_param(scip: *const Scip, name: &str) -> Result<bool, NativeError> {
    // SAFETY: guaranteed by the caller.
    match unsafe { lookup(scip, name) }? {
        Slot::Bool { value, .. } => Ok(*value),
        slot => Err(wrong_type(name, slot.kind(), ParamKind::Bool)),
    }
}

/// Writes a `Bool` parameter.
///
/// # Errors
///
/// Returns [`NativeError::ParameterUnknown`] or
/// [`NativeError::ParameterWrongType`].
///
/// # Safety
///
/// `scip` must satisfy the [module-level](self) pointer requirements.
pub unsafe fn set_bool_param(scip: *mut Scip, name: &str, value: bool) -> Result<(), NativeError> {
    // SAFETY: guaranteed by the caller.
    match unsafe { lookup_mut(scip, name) }? {
        Slot::Bool { value: current, .. } => {
            *current = value;
            Ok(())
        }
        slot => Err(wrong_type(name, slot.kind(), ParamKind::Bool)),
    }
}

/// Reads a `Char` parameter.
///
/// # Errors
///
/// Returns [`NativeError::ParameterUnknown`] or
/// [`NativeError::ParameterWrongType`].
///
/// # Safety
///
/// `scip` must satisfy the [module-level](self) pointer requirements.
pub unsafe fn get_char_param(scip: *const Scip, name: &str) -> Result<char, NativeError> {
    // SAFETY: guaranteed by the caller.
    match unsafe { lookup(scip, name) }? {
        Slot::Char { value, .. } => Ok(*value),
        slot => Err(wrong_type(name, slot.kind(), ParamKind::Char)),
    }
}

/// Writes a `Char` parameter.
///
/// # Errors
///
/// Returns [`NativeError::ParameterUnknown`],
/// [`NativeError::ParameterWrongType`], or
/// [`NativeError::ParameterWrongValue`] if `value` is not an allowed value.
///
/// # Safety
///
/// `scip` must satisfy the [module-level](self) pointer requirements.
pub unsafe fn set_char_param(scip: *mut Scip, name: &str, value: char) -> Result<(), NativeError> {
    // SAFETY: guaranteed by the caller.
    match unsafe { lookup_mut(scip, name) }? {
        Slot::Char {
            value: current,
            allowed,
            ..
        } => match allowed {
            Some(allowed) if !allowed.contains(value) => Err(NativeError::ParameterWrongValue {
                name: name.to_string(),
                reason: format!("'{value}' is not one of \"{allowed}\""),
            }),
            _ => {
                *current = value;
                Ok(())
            }
        },
        slot => Err(wrong_type(name, slot.kind(), ParamKind::Char)),
    }
}

/// Reads a `String` parameter.
///
/// # Errors
///
/// Returns [`NativeError::ParameterUnknown`] or
/// [`NativeError::ParameterWrongType`].
///
/// # Safety
///
/// `scip` must satisfy the [module-level](self) pointer requirements.
pub unsafe fn get_string_param(scip: *const Scip, name: &str) -> Result<String, NativeError> {
    // SAFETY: guaranteed by the caller.
    match unsafe { lookup(scip, name) }? {
        Slot::String { value, .. } => Ok(value.clone()),
        slot => Err(wrong_type(name, slot.kind(), ParamKind::String)),
    }
}

/// Writes a `String` parameter.
///
/// # Errors
///
/// Returns [`NativeError::ParameterUnknown`] or
/// [`NativeError::ParameterWrongType`].
///
/// # Safety
///
/// `scip` must satisfy the [module-level](self) pointer requirements.
pub unsafe fn set_string_param(
    scip: *mut Scip,
    name: &str,
    value: &str,
) -> Result<(), NativeError> {
    // SAFETY: guaranteed by the caller.
    match unsafe { lookup_mut(scip, name) }? {
        Slot::String { value: current, .. } => {
            value.clone_into(current);
            Ok(())
        }
        slot => Err(wrong_type(name, slot.kind(), ParamKind::String)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Frees a handle created by a test.
    fn release(scip: NonNull<Scip>) {
        unsafe { free(scip.as_ptr()) }.unwrap();
    }

    #[test]
    fn create_and_free_tracks_liveness() {
        let scip = create();
        let id = unsafe { handle_id(scip.as_ptr()) };
        assert!(is_live(id));

        release(scip);
        assert!(!is_live(id));
    }

    #[test]
    fn free_of_unknown_pointer_is_rejected() {
        let error = unsafe { free(NonNull::<Scip>::dangling().as_ptr()) }.unwrap_err();
        assert!(matches!(error, NativeError::InvalidCall { .. }));
    }

    #[test]
    fn copy_is_independent() {
        let scip = create();
        unsafe { set_int_param(scip.as_ptr(), "conflict/maxlploops", 7) }.unwrap();

        let copy = unsafe { copy(scip.as_ptr()) }.unwrap();
        assert_ne!(unsafe { handle_id(scip.as_ptr()) }, unsafe {
            handle_id(copy.as_ptr())
        });
        assert_eq!(
            unsafe { get_int_param(copy.as_ptr(), "conflict/maxlploops") }.unwrap(),
            7
        );

        unsafe { set_int_param(scip.as_ptr(), "conflict/maxlploops", 3) }.unwrap();
        assert_eq!(
            unsafe { get_int_param(copy.as_ptr(), "conflict/maxlploops") }.unwrap(),
            7
        );

        release(scip);
        release(copy);
    }

    #[test]
    fn copy_of_unknown_pointer_is_rejected() {
        let error = unsafe { copy(NonNull::<Scip>::dangling().as_ptr()) }.unwrap_err();
        assert!(matches!(error, NativeError::InvalidCall { .. }));
    }

    #[test]
    fn typed_accessors_check_declared_kind() {
        let scip = create();

        assert_eq!(
            unsafe { param_type(scip.as_ptr(), "branching/preferbinary") }.unwrap(),
            ParamKind::Bool
        );
        let error = unsafe { get_int_param(scip.as_ptr(), "branching/preferbinary") }.unwrap_err();
        assert!(matches!(
            error,
            NativeError::ParameterWrongType {
                declared: ParamKind::Bool,
                requested: ParamKind::Int,
                ..
            }
        ));

        release(scip);
    }

    #[test]
    fn unknown_parameter_is_reported() {
        let scip = create();
        let error = unsafe { param_type(scip.as_ptr(), "not_a_param") }.unwrap_err();
        assert!(matches!(error, NativeError::ParameterUnknown { .. }));
        release(scip);
    }

    #[test]
    fn bounds_and_allowed_values_are_enforced() {
        let scip = create();

        let error = unsafe { set_int_param(scip.as_ptr(), "display/verblevel", 9) }.unwrap_err();
        assert!(matches!(error, NativeError::ParameterWrongValue { .. }));

        let error = unsafe { set_real_param(scip.as_ptr(), "limits/time", f64::NAN) }.unwrap_err();
        assert!(matches!(error, NativeError::ParameterWrongValue { .. }));

        let error =
            unsafe { set_char_param(scip.as_ptr(), "branching/pscost/strategy", 'x') }.unwrap_err();
        assert!(matches!(error, NativeError::ParameterWrongValue { .. }));

        unsafe { set_char_param(scip.as_ptr(), "branching/pscost/strategy", 'v') }.unwrap();
        assert_eq!(
            unsafe { get_char_param(scip.as_ptr(), "branching/pscost/strategy") }.unwrap(),
            'v'
        );

        release(scip);
    }

    #[test]
    fn reset_restores_defaults() {
        let scip = create();
        unsafe { set_string_param(scip.as_ptr(), "concurrent/paramsetprefix", "x") }.unwrap();
        unsafe { set_longint_param(scip.as_ptr(), "limits/nodes", 10) }.unwrap();

        unsafe { reset_params(scip.as_ptr()) };

        assert_eq!(
            unsafe { get_string_param(scip.as_ptr(), "concurrent/paramsetprefix") }.unwrap(),
            ""
        );
        assert_eq!(
            unsafe { get_longint_param(scip.as_ptr(), "limits/nodes") }.unwrap(),
            -1
        );

        release(scip);
    }
}
