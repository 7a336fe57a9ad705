//! Sharing native handles with a second wrapper ecosystem.
//!
//! [`ForeignModel`] is the other ecosystem's wrapper over the same kind of
//! native handle. A handle can be referenced from both sides at once, and
//! parameter changes made through either side are visible to the other.
//! Release responsibility, however, belongs to exactly one wrapper:
//!
//! | operation                       | succeeds when             | owner afterwards   |
//! |---------------------------------|---------------------------|--------------------|
//! | [`Model::import_foreign`]       | the foreign model owns    | the new model      |
//! | [`Model::export_foreign`]       | always                    | the new foreign model, if the model owned |
//! | [`ForeignModel::import_model`]  | the model owns            | the new foreign model |
//! | [`ForeignModel::export_model`]  | always                    | the new model, if the foreign model owned |
//!
//! A failed import changes nothing. Dropping the owner releases the handle,
//! after which every remaining wrapper reports
//! [`OwnershipError::Released`](crate::OwnershipError::Released).
//!
//! # Example
//!
//! ```
//! use twine_scip::{ForeignModel, Model, Ownership, ParamValue, Side};
//!
//! let foreign = ForeignModel::new();
//! foreign.set_param("concurrent/paramsetprefix", "shared").unwrap();
//!
//! let model = Model::import_foreign(&foreign).unwrap();
//! assert!(!foreign.free_on_drop());
//! assert_eq!(model.ownership(), Ownership::OwnedBy(Side::Model));
//! assert_eq!(
//!     model.get_param("concurrent/paramsetprefix").unwrap(),
//!     ParamValue::from("shared"),
//! );
//!
//! // Only the owner may hand the handle over.
//! assert!(Model::import_foreign(&foreign).is_err());
//! ```

use std::{collections::BTreeMap, fmt};

use tracing::debug;

use crate::{
    handle::{Ownership, SharedHandle, Side},
    model::{Model, ModelError},
    native::{self, HandleId},
    param::{self, ParamValue},
};

/// The foreign ecosystem's wrapper around a native model handle.
pub struct ForeignModel {
    handle: SharedHandle,
}

impl ForeignModel {
    /// Creates a foreign model owning a new native handle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handle: SharedHandle::adopt(native::create(), Side::Foreign),
        }
    }

    pub(crate) fn from_handle(handle: SharedHandle) -> Self {
        Self { handle }
    }

    pub(crate) fn handle(&self) -> &SharedHandle {
        &self.handle
    }

    /// Returns `true` if dropping this wrapper releases the native handle.
    #[must_use]
    pub fn free_on_drop(&self) -> bool {
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

    /// Wraps the handle of `model`, taking ownership from it.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Ownership`] if `model` does not own its handle.
    /// Ownership is unchanged on both sides in that case.
    pub fn import_model(model: &Model) -> Result<Self, ModelError> {
        let handle = model.handle().share(Side::Foreign);
        handle.take_ownership_from(model.handle())?;
        Ok(Self { handle })
    }

    /// Shares the handle with a new model, passing ownership if this wrapper
    /// has it.
    #[must_use]
    pub fn export_model(&self) -> Model {
        let handle = self.handle.share(Side::Model);
        if !self.handle.pass_ownership_to(&handle) {
            debug!(handle = %self.handle_id(), "exported handle without ownership");
        }
        Model::from_handle(handle)
    }

    /// Reads a parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Param`] if `name` is not a parameter, or
    /// [`ModelError::Ownership`] if the handle has been released.
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
}

impl Default for ForeignModel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ForeignModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForeignModel")
            .field("handle", &self.handle_id())
            .field("free_on_drop", &self.free_on_drop())
            .finish()
    }
}
