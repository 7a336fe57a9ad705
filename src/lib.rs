//! # Twine SCIP
//!
//! Safe, shared-ownership wrappers around native optimization model handles,
//! with typed access to the native parameter store.
//!
//! ## Crate layout
//!
//! - [`native`]: The raw handle API: create, copy, free, typed parameters.
//! - [`param`]: Typed parameter values and the coercion rules used on write.
//! - [`model`]: [`Model`], the primary wrapper, and [`ModelConfig`].
//! - [`interop`]: [`ForeignModel`] and the ownership handoff between the two.
//!
//! ## Ownership
//!
//! Any number of wrappers may reference the same native handle, and all of
//! them can read and write its parameters. Exactly one of them is the owner,
//! and only the owner releases the handle when dropped. Ownership moves only
//! through the explicit import and export operations, which check the current
//! owner first, so a handle is never released twice and never leaked.
//!
//! ```
//! use twine_scip::{Model, ParamValue};
//!
//! let model = Model::new();
//! model.set_param("limits/time", 1.0).unwrap();
//! assert_eq!(model.get_param("limits/time").unwrap(), ParamValue::Real(1.0));
//!
//! let foreign = model.export_foreign();
//! assert!(!model.owns_handle());
//! assert!(foreign.free_on_drop());
//!
//! drop(model);
//! assert_eq!(foreign.get_param("limits/time").unwrap(), ParamValue::Real(1.0));
//! ```
//!
//! Wrappers are neither `Send` nor `Sync`: native handles are not reentrant.

mod handle;

pub mod interop;
pub mod model;
pub mod native;
pub mod param;

pub use handle::{Ownership, OwnershipError, Side};
pub use interop::ForeignModel;
pub use model::{Model, ModelConfig, ModelError};
pub use param::{ParamError, ParamKind, ParamValue};
