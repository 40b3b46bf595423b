//! Typed result handles and the propagation protocol
//!
//! `Res<T>` is the generic convenience layer over the untyped store: one
//! parametric module instead of per-type generated wrappers. It carries the
//! store handle plus a phantom success type, and converts values to and
//! from the store's byte payloads.
//!
//! The propagation protocol lives here too, as explicit, caller-selected
//! policies:
//!
//! - [`Res::get_or_forward`] - bubble a failure up as the caller's own
//!   declared failure type, keeping the original diagnostic.
//! - [`Res::get_or_exit`] - describe the failure and terminate the process.
//!   Unconditionally fatal; meant only for a program's outermost boundary.
//!
//! Both are composites of several locked store calls and are not atomic;
//! see the store-level concurrency contract.

use core::fmt;
use core::marker::PhantomData;
use core::mem::{align_of, size_of};
use core::ptr;

use std::borrow::Cow;

use gresult_core::constants::PAYLOAD_CAPACITY;
use gresult_core::{CallSite, ErrorRecord, Fault, ResultId, Store, StoreError, StoreResult};

use crate::plain::Plain;

/// Bytes a value of `T` occupies in the store
///
/// Zero-sized types are stored as one dummy byte so the slot is
/// indistinguishable from any other success.
const fn stored_size<T>() -> usize {
    if size_of::<T>() == 0 {
        1
    } else {
        size_of::<T>()
    }
}

/// A typed handle to one result in a [`Store`]
///
/// Plain `Copy` data: copying the handle never copies the payload, and the
/// referenced slot lives until an explicit [`delete`](Res::delete). A copy
/// kept around after the delete dangles and reads back `InvalidArgument`.
pub struct Res<T: Plain> {
    id: ResultId,
    _success: PhantomData<fn() -> T>,
}

impl<T: Plain> Clone for Res<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Plain> Copy for Res<T> {}

impl<T: Plain> Res<T> {
    const fn from_id(id: ResultId) -> Self {
        Res {
            id,
            _success: PhantomData,
        }
    }

    /// Store `value` as a success result
    ///
    /// On a store-level failure the returned handle is the sentinel and the
    /// diagnostic sits in the store's fallback error cell.
    pub fn ok(store: &Store, value: T, site: CallSite) -> Self {
        let stored = stored_size::<T>();
        let created = if stored > PAYLOAD_CAPACITY {
            // Oversized types never fit; let the store classify the request.
            store.create_success(&[], align_of::<T>(), stored, site)
        } else {
            let mut buf = [0u8; PAYLOAD_CAPACITY];
            // Safety: Plain guarantees no padding, so all size_of::<T>()
            // bytes of `value` are initialized.
            unsafe {
                ptr::copy_nonoverlapping(
                    (&value as *const T).cast::<u8>(),
                    buf.as_mut_ptr(),
                    size_of::<T>(),
                );
            }
            store.create_success(&buf[..stored], align_of::<T>(), stored, site)
        };
        Self::from_id(created.unwrap_or(ResultId::FALLBACK))
    }

    /// Store a domain error with the caller's message
    pub fn err(store: &Store, message: impl Into<Cow<'static, str>>, site: CallSite) -> Self {
        let created = store.create_error(message, site);
        Self::from_id(created.unwrap_or(ResultId::FALLBACK))
    }

    /// Copy the success value out
    ///
    /// Three outcomes: `Ok(value)`, `StateMismatch` when the result holds
    /// an error, `InvalidArgument` when the handle dangles. Reading does
    /// not consume the slot.
    pub fn get(self, store: &Store, site: CallSite) -> StoreResult<T> {
        if stored_size::<T>() > PAYLOAD_CAPACITY {
            // Can never have been stored.
            return Err(StoreError::new(Fault::OutOfCapacity, site));
        }
        let mut buf = [0u8; PAYLOAD_CAPACITY];
        store.read_success(self.id, &mut buf[..stored_size::<T>()], site)?;
        // Safety: the slot was written from a value of this type (caller
        // contract enforced by construction) and Plain accepts any bit
        // pattern of the right size, so even a stale read is defined.
        Ok(unsafe { ptr::read_unaligned(buf.as_ptr().cast::<T>()) })
    }

    /// Rethrow this failure as a new result of a different success type
    ///
    /// The new handle carries a verbatim copy of the original message and
    /// call site; the forwarding location is discarded. This handle stays
    /// live - delete it separately, or use [`get_or_forward`](Res::get_or_forward)
    /// which does both.
    pub fn forward<U: Plain>(self, store: &Store, site: CallSite) -> Res<U> {
        let forwarded = store.forward_error(self.id, site);
        Res::from_id(forwarded.unwrap_or(ResultId::FALLBACK))
    }

    /// Reclaim the result's slot
    pub fn delete(self, store: &Store, site: CallSite) -> StoreResult<()> {
        store.delete(self.id, site)
    }

    /// Emit this result's diagnostic and return the emitted record
    ///
    /// Follows the store's precedence rule: the fallback error cell wins
    /// when it holds a record or when this handle is the sentinel.
    pub fn describe(self, store: &Store, site: CallSite) -> StoreResult<ErrorRecord> {
        store.describe_error(self.id, site)
    }

    /// Return-or-forward: the propagation policy
    ///
    /// On success yields the value and the caller continues. On any failure
    /// it forwards the diagnostic into the caller's declared failure type
    /// `U`, deletes this handle, and yields the forwarded handle for the
    /// caller to return - a short-circuiting bubble-up, not a retry. The
    /// `unwrap_or_return!` macro wraps this with automatic site capture.
    pub fn get_or_forward<U: Plain>(self, store: &Store, site: CallSite) -> Result<T, Res<U>> {
        match self.get(store, site) {
            Ok(value) => Ok(value),
            Err(_) => {
                let forwarded = self.forward::<U>(store, site);
                let _ = self.delete(store, site);
                Err(forwarded)
            }
        }
    }

    /// Describe on failure, then hand back `None`
    ///
    /// The non-terminating half of [`get_or_exit`](Res::get_or_exit), split
    /// out so the describing path stays testable.
    pub fn get_or_describe(self, store: &Store, site: CallSite) -> Option<T> {
        match self.get(store, site) {
            Ok(value) => Some(value),
            Err(_) => {
                let _ = self.describe(store, site);
                None
            }
        }
    }

    /// Continue-or-terminate: the fatal policy
    ///
    /// On success yields the value; on any failure emits the diagnostic and
    /// terminates the process with a non-zero status. No recovery - choose
    /// this only at a program's outermost boundary.
    pub fn get_or_exit(self, store: &Store, site: CallSite) -> T {
        match self.get_or_describe(store, site) {
            Some(value) => value,
            None => std::process::exit(1),
        }
    }

    /// The raw store handle
    #[inline]
    pub const fn id(self) -> ResultId {
        self.id
    }

    /// Check if this result never got a slot (creation failed)
    #[inline]
    pub const fn is_fallback(self) -> bool {
        self.id.is_fallback()
    }
}

impl<T: Plain> fmt::Debug for Res<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Res<{}>({})", core::any::type_name::<T>(), self.id)
    }
}
