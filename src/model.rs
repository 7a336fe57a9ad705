//! The primary model wrapper.
//!
//! A [`Model`] references a native handle and knows whether it is the wrapper
//! responsible for releasing it. Handles can be shared with the foreign
//! ecosystem through [`Model::export_foreign`] and [`Model::import_foreign`];
//! see the [`interop`](crate::interop) module for the ownership rules.

mod config;
mod error;

use std::{any::Any, collections::BTreeMap, fmt};

use tracing::debug;
use uom::si::{
    f64::{Information, Time},
    information::megabyte,
    time::second,
};

use crate::{
    handle::{Ownership, SharedHandle, Side},
    interop::ForeignModel,
    native::{self, HandleId},
    param::{self, ParamError, ParamValue},
};

pub use config::ModelConfig;
pub use error::ModelError;

const TIME_LIMIT: &str = "limits/time";
const MEMORY_LIMIT: &str = "limits/memory";

/// A wrapper around a native optimization model handle.
///
/// Equality is identity: a model is only ever equal to itself, never to a
/// clone or to another wrapper of the same native handle.
pub struct Model {
    handle: SharedHandle,
}

impl Model {
    /// Creates a model owning a new native handle with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handle: SharedHandle::adopt(native::create(), Side::Model),
        }
    }

    pub(crate) fn from_handle(handle: SharedHandle) -> Self {
        Self { handle }
    }

    pub(crate) fn handle(&self) -> &SharedHandle {
        &self.handle
    }

    /// Deep-copies the native handle into a new, independently owned model.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Ownership`] if the handle has been released, or
    /// [`ModelError::Native`] if the native copy fails.
    pub fn try_clone(&self) -> Result<Self, ModelError> {
        let scip = self.handle.native()?;
        // SAFETY: `native()` only succeeds for a live handle.
        let copy = unsafe { native::copy(scip.as_ptr()) }?;
        Ok(Self {
            handle: SharedHandle::adopt(copy, Side::Model),
        })
    }

    /// Returns `true` if `other` is this very model instance.
    ///
    /// Values of any other type compare unequal.
    #[must_use]
    pub fn equals(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<Model>().is_some_and(|other| self == other)
    }

    /// Returns `true` if this model is responsible for releasing the handle.
    #[must_use]
    pub fn owns_handle(&self) -> bool {
        self.handle.owns_handle()
    }

    /// Returns who currently owns the native handle.
    #[must_use]
    pub fn ownership(&self) -> Ownership {
        self.handle.ownership()
    }

    /// Returns the identifier of the referenced native handle.
    #[must_use]
    pub fn handle_id(&self) -> HandleId {
        self.handle.handle_id()
    }

    /// Returns `true` if `other` references the same native handle.
    #[must_use]
    pub fn shares_handle(&self, other: &ForeignModel) -> bool {
        self.handle.shares_handle(other.handle())
    }

    /// Wraps the handle of a foreign model, taking ownership from it.
    ///
    /// The foreign model stays usable, but no longer releases the handle.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Ownership`] if `foreign` does not own its handle.
    /// Ownership is unchanged on both sides in that case.
    pub fn import_foreign(foreign: &ForeignModel) -> Result<Self, ModelError> {
        let handle = foreign.handle().share(Side::Model);
        handle.take_ownership_from(foreign.handle())?;
        Ok(Self { handle })
    }

    /// Shares the handle with a new foreign model.
    ///
    /// If this model owned the handle, the foreign model becomes the owner, so
    /// dropping this model afterwards leaves the handle usable.
    #[must_use]
    pub fn export_foreign(&self) -> ForeignModel {
        let foreign = self.handle.share(Side::Foreign);
        if !self.handle.pass_ownership_to(&foreign) {
            debug!(handle = %self.handle_id(), "exported handle without ownership");
        }
        ForeignModel::from_handle(foreign)
    }

    /// Reads a parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::NotFound`] (wrapped in [`ModelError::Param`]) if
    /// `name` is not a parameter.
    pub fn get_param(&self, name: &str) -> Result<ParamValue, ModelError> {
        Ok(param::get(self.handle.native()?, name)?)
    }

    /// Writes a parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Param`] if `name` is not a parameter or `value`
    /// does not fit its declared kind.
    pub fn set_param(&self, name: &str, value: impl Into<ParamValue>) -> Result<(), ModelError> {
        Ok(param::set(self.handle.native()?, name, value.into())?)
    }

    /// Reads every parameter, keyed by name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Ownership`] if the handle has been released.
    pub fn get_params(&self) -> Result<BTreeMap<String, ParamValue>, ModelError> {
        Ok(param::get_all(self.handle.native()?)?)
    }

    /// Writes several parameters in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; earlier writes are kept.
    pub fn set_params<I, K, V>(&self, params: I) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ParamValue>,
    {
        let scip = self.handle.native()?;
        params
            .into_iter()
            .try_for_each(|(name, value)| param::set(scip, name.as_ref(), value.into()))?;
        Ok(())
    }

    /// Restores every parameter to its default.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Ownership`] if the handle has been released.
    pub fn reset_params(&self) -> Result<(), ModelError> {
        param::reset(self.handle.native()?);
        Ok(())
    }

    /// Turns off presolving.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Ownership`] if the handle has been released.
    pub fn disable_presolve(&self) -> Result<(), ModelError> {
        self.set_params([("presolving/maxrounds", 0), ("presolving/maxrestarts", 0)])
    }

    /// Turns off cutting plane separation.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Ownership`] if the handle has been released.
    pub fn disable_cuts(&self) -> Result<(), ModelError> {
        self.set_params([("separating/maxrounds", 0), ("separating/maxroundsroot", 0)])
    }

    /// Returns the solving time limit.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Ownership`] if the handle has been released.
    pub fn time_limit(&self) -> Result<Time, ModelError> {
        let seconds = self.real_param(TIME_LIMIT)?;
        Ok(Time::new::<second>(seconds))
    }

    /// Sets the solving time limit.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::InvalidValue`] (wrapped in [`ModelError::Param`])
    /// if the limit is negative.
    pub fn set_time_limit(&self, limit: Time) -> Result<(), ModelError> {
        self.set_param(TIME_LIMIT, limit.get::<second>())
    }

    /// Returns the memory limit.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Ownership`] if the handle has been released.
    pub fn memory_limit(&self) -> Result<Information, ModelError> {
        let megabytes = self.real_param(MEMORY_LIMIT)?;
        Ok(Information::new::<megabyte>(megabytes))
    }

    /// Sets the memory limit.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::InvalidValue`] (wrapped in [`ModelError::Param`])
    /// if the limit is negative or too large.
    pub fn set_memory_limit(&self, limit: Information) -> Result<(), ModelError> {
        self.set_param(MEMORY_LIMIT, limit.get::<megabyte>())
    }

    fn real_param(&self, name: &str) -> Result<f64, ModelError> {
        let value = self.get_param(name)?;
        value.as_real().ok_or_else(|| {
            ModelError::Param(ParamError::TypeMismatch {
                name: name.to_string(),
                expected: param::ParamKind::Real,
                found: value.kind(),
            })
        })
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Model {
    fn eq(&self, other: &Self) -> bool {
        self.handle.wrapper_id() == other.handle.wrapper_id()
    }
}

impl Eq for Model {}

impl fmt::Debug for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("handle", &self.handle_id())
            .field("owns_handle", &self.owns_handle())
            .finish()
    }
}
