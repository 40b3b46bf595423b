//! The result store: slot arena, free list and fallback error cell
//!
//! One `Store` is one fixed-capacity arena. Every public operation acquires
//! the store's single mutex on entry and releases it before returning,
//! including on failure paths; `describe_error` emits its diagnostic while
//! the lock is held, so a slow stderr sink serializes concurrent operations
//! behind it (an accepted throughput hazard, not a correctness one).
//!
//! Composite behaviors built on top of these operations (the propagation
//! protocol in `gresult`) issue several locked calls in a row and are not
//! atomic: a handle shared across threads can be deleted between the calls.
//! The state-tag validation below keeps that memory-safe, but the composite
//! outcome becomes implementation-defined - handles must not cross threads
//! without synchronization beyond the store's own lock.

use std::borrow::Cow;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::constants::{FREE_LIST_CAPACITY, MAX_ALIGN, PAYLOAD_CAPACITY, SLOT_CAPACITY};
use crate::error::{ErrorRecord, Fault, StoreError, StoreResult};
use crate::id::ResultId;
use crate::log;
use crate::site::CallSite;
use crate::slot::{Payload, Slot, SlotState};

/// Fixed-capacity store of "value or diagnosed failure" results
///
/// Construct one per independent result domain and dependency-inject it;
/// there is no ambient global. `reset` restores the freshly constructed
/// state, teardown is `Drop`.
pub struct Store {
    inner: Mutex<StoreInner>,
}

struct StoreInner {
    /// All slots, pre-allocated to capacity
    slots: Vec<Slot>,

    /// LIFO stack of reclaimed slot indices (most recently freed reused first)
    free: Vec<u32>,

    /// Count of slots ever allocated fresh (beyond the free list)
    high_water: u32,

    /// Fallback error cell: the most recent failure of a handle-issuing
    /// operation, backing the sentinel handle. Last-write-wins across
    /// threads; never reset by emission.
    fallback: Option<ErrorRecord>,
}

impl StoreInner {
    /// Record a handle-issuing failure in the fallback cell and build the
    /// typed error for the caller.
    fn fault(&mut self, kind: Fault, site: CallSite) -> StoreError {
        self.fallback = Some(ErrorRecord::new(kind.message(), site));
        StoreError::new(kind, site)
    }

    /// Acquire a slot index, reusing the most recently freed one first.
    fn acquire(&mut self) -> Option<ResultId> {
        if let Some(idx) = self.free.pop() {
            return Some(ResultId::new(idx));
        }
        let fresh = self.high_water as usize;
        if fresh < SLOT_CAPACITY {
            self.high_water += 1;
            return Some(ResultId::new(fresh as u32));
        }
        None
    }

    /// Look up a live slot: allocated below the high-water mark and not
    /// reclaimed. Dangling handles fail here via the state tag.
    fn live_slot(&self, id: ResultId) -> Option<&Slot> {
        if id.is_fallback() || id.as_u32() >= self.high_water {
            return None;
        }
        let slot = &self.slots[id.as_usize()];
        if slot.state().is_live() {
            Some(slot)
        } else {
            None
        }
    }
}

impl Store {
    /// Create an empty store
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(SLOT_CAPACITY);
        slots.resize_with(SLOT_CAPACITY, || Slot::Empty);
        Store {
            inner: Mutex::new(StoreInner {
                slots,
                // Pre-allocate to capacity so reclaiming never reallocates
                free: Vec::with_capacity(FREE_LIST_CAPACITY),
                high_water: 0,
                fallback: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        // A poisoned mutex only means another thread panicked while holding
        // it; no operation leaves the arena mid-transition, so keep serving.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a success value from raw bytes
    ///
    /// `alignment` must be a power of two not exceeding
    /// [`MAX_ALIGN`](crate::constants::MAX_ALIGN) and `size` must be
    /// non-zero and equal to `bytes.len()`; violations are
    /// `InvalidArgument`. A `size` beyond the fixed payload capacity, or an
    /// exhausted arena, is `OutOfCapacity`. Failures are also recorded in
    /// the fallback error cell, since the caller may be left holding the
    /// sentinel handle.
    pub fn create_success(
        &self,
        bytes: &[u8],
        alignment: usize,
        size: usize,
        site: CallSite,
    ) -> StoreResult<ResultId> {
        let mut inner = self.lock();
        if alignment == 0 || !alignment.is_power_of_two() || alignment > MAX_ALIGN || size == 0 {
            return Err(inner.fault(Fault::InvalidArgument, site));
        }
        if size > PAYLOAD_CAPACITY {
            return Err(inner.fault(Fault::OutOfCapacity, site));
        }
        if size != bytes.len() {
            return Err(inner.fault(Fault::InvalidArgument, site));
        }
        let Some(id) = inner.acquire() else {
            return Err(inner.fault(Fault::OutOfCapacity, site));
        };
        inner.slots[id.as_usize()] = Slot::Value(Payload::from_bytes(bytes));
        Ok(id)
    }

    /// Store an error record with the caller's message and call site
    ///
    /// The message is a domain-level diagnostic; the store keeps and
    /// forwards it uninterpreted. Fails only when the arena is exhausted.
    pub fn create_error(
        &self,
        message: impl Into<Cow<'static, str>>,
        site: CallSite,
    ) -> StoreResult<ResultId> {
        let mut inner = self.lock();
        let Some(id) = inner.acquire() else {
            return Err(inner.fault(Fault::OutOfCapacity, site));
        };
        inner.slots[id.as_usize()] = Slot::Error(ErrorRecord::new(message, site));
        Ok(id)
    }

    /// Copy a success payload out of a live slot
    ///
    /// The expected size is `out.len()`. Three outcomes are distinguished:
    /// `Ok` with the bytes copied, `StateMismatch` when the slot holds an
    /// error, and `InvalidArgument` for dangling or never-allocated handles
    /// (an oversize `out` is `OutOfCapacity`, matching the create path).
    /// Reading reports solely through the return value and never touches
    /// the fallback cell or the arena.
    pub fn read_success(&self, id: ResultId, out: &mut [u8], site: CallSite) -> StoreResult<()> {
        let inner = self.lock();
        if out.is_empty() {
            return Err(StoreError::new(Fault::InvalidArgument, site));
        }
        if out.len() > PAYLOAD_CAPACITY {
            return Err(StoreError::new(Fault::OutOfCapacity, site));
        }
        match inner.live_slot(id) {
            Some(Slot::Value(payload)) => {
                payload.read_into(out);
                Ok(())
            }
            Some(Slot::Error(_)) => Err(StoreError::new(Fault::StateMismatch, site)),
            _ => Err(StoreError::new(Fault::InvalidArgument, site)),
        }
    }

    /// Allocate a new error slot carrying a deep copy of `source`'s record
    ///
    /// The copied record keeps the original message and call site; `site`
    /// (the forwarding location) is only used to diagnose failures of the
    /// forward itself and is never stored. This is what lets a failure
    /// raised deep in a call chain keep its true origin while being
    /// rethrown through layers with different success types.
    ///
    /// `source` must be a live error slot (`InvalidArgument` otherwise);
    /// the source is left untouched - deleting it stays the caller's job.
    pub fn forward_error(&self, source: ResultId, site: CallSite) -> StoreResult<ResultId> {
        let mut inner = self.lock();
        let record = match inner.live_slot(source) {
            Some(Slot::Error(record)) => Some(record.clone()),
            _ => None,
        };
        let Some(record) = record else {
            return Err(inner.fault(Fault::InvalidArgument, site));
        };
        let Some(id) = inner.acquire() else {
            return Err(inner.fault(Fault::OutOfCapacity, site));
        };
        inner.slots[id.as_usize()] = Slot::Error(record);
        Ok(id)
    }

    /// Reclaim a slot, returning its index to the free list
    ///
    /// Double deletes and dangling handles are `InvalidArgument`. An unread
    /// success value may be deleted; its payload is simply discarded.
    pub fn delete(&self, id: ResultId, site: CallSite) -> StoreResult<()> {
        let mut inner = self.lock();
        if inner.live_slot(id).is_none() {
            return Err(StoreError::new(Fault::InvalidArgument, site));
        }
        // Unreachable while every index appears at most once, but checked.
        if inner.free.len() >= FREE_LIST_CAPACITY {
            return Err(StoreError::new(Fault::OutOfCapacity, site));
        }
        inner.slots[id.as_usize()] = Slot::Empty;
        inner.free.push(id.as_u32());
        Ok(())
    }

    /// Emit the diagnostic for a handle and return the emitted record
    ///
    /// The fallback error cell takes precedence: when `id` is the sentinel
    /// or the cell holds a record, the cell's record is emitted and the
    /// lookup is satisfied regardless of what `id` points at. Otherwise a
    /// live error slot's own record is emitted. A handle that resolves to
    /// neither gets the `InvalidArgument` diagnostic emitted and returned.
    ///
    /// Emission happens under the store lock, never resets the cell and
    /// never deletes the described slot.
    pub fn describe_error(&self, id: ResultId, site: CallSite) -> StoreResult<ErrorRecord> {
        let inner = self.lock();
        if id.is_fallback() || inner.fallback.is_some() {
            return match &inner.fallback {
                Some(record) => {
                    log::emit_record(record);
                    Ok(record.clone())
                }
                None => {
                    // Sentinel described, but no store failure ever recorded.
                    let record = ErrorRecord::new(Fault::InvalidArgument.message(), site);
                    log::emit_record(&record);
                    Err(StoreError::new(Fault::InvalidArgument, site))
                }
            };
        }
        match inner.live_slot(id) {
            Some(Slot::Error(record)) => {
                log::emit_record(record);
                Ok(record.clone())
            }
            _ => {
                let record = ErrorRecord::new(Fault::InvalidArgument.message(), site);
                log::emit_record(&record);
                Err(StoreError::new(Fault::InvalidArgument, site))
            }
        }
    }

    /// Peek a live error slot's record without emitting anything
    pub fn error_record(&self, id: ResultId) -> Option<ErrorRecord> {
        let inner = self.lock();
        match inner.live_slot(id) {
            Some(Slot::Error(record)) => Some(record.clone()),
            _ => None,
        }
    }

    /// Size a live value slot was written with
    pub fn value_len(&self, id: ResultId) -> Option<usize> {
        let inner = self.lock();
        match inner.live_slot(id) {
            Some(Slot::Value(payload)) => Some(payload.len()),
            _ => None,
        }
    }

    /// The most recent fallback-cell record, if any store failure occurred
    pub fn last_fault(&self) -> Option<ErrorRecord> {
        self.lock().fallback.clone()
    }

    /// Restore the freshly constructed state (all slots empty, cell clear)
    ///
    /// Outstanding handles dangle afterwards; useful between tests and when
    /// a result domain is retired wholesale.
    pub fn reset(&self) {
        let mut inner = self.lock();
        for slot in inner.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        inner.free.clear();
        inner.high_water = 0;
        inner.fallback = None;
    }

    /// Number of currently live results
    pub fn live_count(&self) -> usize {
        let inner = self.lock();
        inner.high_water as usize - inner.free.len()
    }

    /// Number of reclaimed indices waiting for reuse
    pub fn free_len(&self) -> usize {
        self.lock().free.len()
    }

    /// Count of slots ever allocated fresh
    pub fn high_water(&self) -> u32 {
        self.lock().high_water
    }

    /// Check whether a handle currently references a live slot
    pub fn is_live(&self, id: ResultId) -> bool {
        self.lock().live_slot(id).is_some()
    }

    /// State tag of the referenced slot (`Empty` for out-of-range handles)
    pub fn state_of(&self, id: ResultId) -> SlotState {
        let inner = self.lock();
        if id.is_fallback() || id.as_usize() >= inner.slots.len() {
            return SlotState::Empty;
        }
        inner.slots[id.as_usize()].state()
    }

    /// Total slot capacity
    #[inline]
    pub const fn capacity(&self) -> usize {
        SLOT_CAPACITY
    }

    /// Per-slot payload byte capacity
    #[inline]
    pub const fn payload_capacity(&self) -> usize {
        PAYLOAD_CAPACITY
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::new()
    }
}
