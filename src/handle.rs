//! Shared native handles with single-owner release.
//!
//! A native handle may be referenced by several wrappers at once, one per
//! ecosystem ([`Side`]). All of them read and write through the same native
//! instance, but exactly one of them (the owner) releases it when dropped.
//! The ownership record lives next to the pointer in a shared binding, so the
//! "at most one owner" rule holds by construction and every transfer checks
//! the current owner before changing it.

mod error;

use std::{
    cell::Cell,
    marker::PhantomData,
    ptr::NonNull,
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
};

use tracing::{debug, error};

use crate::native::{self, HandleId, Scip};

pub use error::OwnershipError;

/// The wrapper ecosystem a handle reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// A [`Model`](crate::Model).
    Model,
    /// A [`ForeignModel`](crate::ForeignModel).
    Foreign,
}

/// Who is responsible for releasing a native handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// The handle has been released; no wrapper owns it.
    Unbound,
    /// A wrapper of the given ecosystem owns the handle.
    OwnedBy(Side),
}

/// Identity of one wrapper instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct WrapperId(u64);

impl WrapperId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Owner {
    wrapper: WrapperId,
    side: Side,
}

/// State shared by every wrapper referencing one native handle.
///
/// `scip` is `Some` exactly while `owner` is `Some`.
#[derive(Debug)]
struct Binding {
    id: HandleId,
    scip: Cell<Option<NonNull<Scip>>>,
    owner: Cell<Option<Owner>>,
}

/// One wrapper's reference to a shared native handle.
///
/// Dropping the reference releases the native handle if, and only if, this
/// reference is the current owner.
#[derive(Debug)]
pub(crate) struct SharedHandle {
    wrapper: WrapperId,
    side: Side,
    binding: Rc<Binding>,
}

/// Borrowed access to a live native handle.
///
/// Only obtainable through [`SharedHandle::native`], which checks that the
/// handle has not been released.
#[derive(Debug, Clone, Copy)]
pub(crate) struct NativeRef<'a> {
    scip: NonNull<Scip>,
    _handle: PhantomData<&'a SharedHandle>,
}

impl NativeRef<'_> {
    pub(crate) fn as_ptr(self) -> *mut Scip {
        self.scip.as_ptr()
    }
}

impl SharedHandle {
    /// Creates a reference that owns the freshly created native handle `scip`.
    pub(crate) fn adopt(scip: NonNull<Scip>, side: Side) -> Self {
        let wrapper = WrapperId::next();
        // SAFETY: `scip` was just returned by `native::create` or `native::copy`.
        let id = unsafe { native::handle_id(scip.as_ptr()) };
        Self {
            wrapper,
            side,
            binding: Rc::new(Binding {
                id,
                scip: Cell::new(Some(scip)),
                owner: Cell::new(Some(Owner { wrapper, side })),
            }),
        }
    }

    /// Creates a new, non-owning reference to the same native handle.
    pub(crate) fn share(&self, side: Side) -> Self {
        Self {
            wrapper: WrapperId::next(),
            side,
            binding: Rc::clone(&self.binding),
        }
    }

    pub(crate) fn wrapper_id(&self) -> WrapperId {
        self.wrapper
    }

    pub(crate) fn handle_id(&self) -> HandleId {
        self.binding.id
    }

    pub(crate) fn owns_handle(&self) -> bool {
        self.binding
            .owner
            .get()
            .is_some_and(|owner| owner.wrapper == self.wrapper)
    }

    pub(crate) fn ownership(&self) -> Ownership {
        match self.binding.owner.get() {
            Some(owner) => Ownership::OwnedBy(owner.side),
            None => Ownership::Unbound,
        }
    }

    pub(crate) fn shares_handle(&self, other: &SharedHandle) -> bool {
        Rc::ptr_eq(&self.binding, &other.binding)
    }

    /// Returns access to the native handle.
    ///
    /// # Errors
    ///
    /// Returns [`OwnershipError::Released`] if the owning wrapper has already
    /// been dropped.
    pub(crate) fn native(&self) -> Result<NativeRef<'_>, OwnershipError> {
        self.binding
            .scip
            .get()
            .map(|scip| NativeRef {
                scip,
                _handle: PhantomData,
            })
            .ok_or(OwnershipError::Released {
                handle: self.binding.id,
            })
    }

    /// Makes this reference the owner, taking ownership from `source`.
    ///
    /// # Errors
    ///
    /// Fails without changing anything if `source` does not reference the
    /// same handle or is not its current owner.
    pub(crate) fn take_ownership_from(&self, source: &SharedHandle) -> Result<(), OwnershipError> {
        if !self.shares_handle(source) {
            return Err(OwnershipError::DifferentHandle);
        }
        if !source.owns_handle() {
            return Err(OwnershipError::NotOwner {
                handle: self.binding.id,
                ownership: source.ownership(),
            });
        }
        self.binding.owner.set(Some(Owner {
            wrapper: self.wrapper,
            side: self.side,
        }));
        debug!(
            handle = %self.binding.id,
            from = ?source.side,
            to = ?self.side,
            "handle ownership transferred"
        );
        Ok(())
    }

    /// Hands ownership to `target` if this reference is the owner.
    ///
    /// Returns `true` if ownership moved.
    pub(crate) fn pass_ownership_to(&self, target: &SharedHandle) -> bool {
        target.take_ownership_from(self).is_ok()
    }

    fn release(&self) {
        if !self.owns_handle() {
            return;
        }
        self.binding.owner.set(None);
        let Some(scip) = self.binding.scip.take() else {
            return;
        };
        // SAFETY: the binding held the pointer, so it is live, and clearing
        // both fields above makes every other reference observe `Released`.
        match unsafe { native::free(scip.as_ptr()) } {
            Ok(()) => debug!(handle = %self.binding.id, side = ?self.side, "handle released"),
            Err(err) => error!(handle = %self.binding.id, error = %err, "failed to release handle"),
        }
    }
}

impl Drop for SharedHandle {
    fn drop(&mut self) {
        self.release();
    }
}
