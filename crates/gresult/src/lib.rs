//! # gresult - Generic Result Handles
//!
//! "A value or a diagnosed failure" as plain numeric handles into a shared,
//! fixed-capacity store - no sentinel values, no global error codes. Every
//! failure carries the (file, function, line) of the call that raised it,
//! and forwarding a failure through layers with different success types
//! keeps that original provenance intact.
//!
//! ## Quick Start
//!
//! ```
//! use gresult::{err, ok, site, Res, Store};
//!
//! fn divide(store: &Store, dividend: i32, divisor: i32) -> Res<f32> {
//!     if divisor == 0 {
//!         return err!(store, f32, "Divisor mustn't be 0.");
//!     }
//!     ok!(store, dividend as f32 / divisor as f32)
//! }
//!
//! let store = Store::new();
//!
//! let quotient = divide(&store, 10, 5);
//! assert_eq!(quotient.get(&store, site!()).unwrap(), 2.0);
//!
//! let failed = divide(&store, 10, 0);
//! assert!(failed.get(&store, site!()).is_err());
//! let record = failed.describe(&store, site!()).unwrap();
//! assert_eq!(record.message(), "Divisor mustn't be 0.");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      User Code                          │
//! │        ok!, err!, unwrap_or_return!, unwrap_or_exit!    │
//! └─────────────────────────────────────────────────────────┘
//!                             │
//!                             ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │               Typed layer (this crate)                  │
//! │    Res<T>: value <-> bytes, propagation policies        │
//! └─────────────────────────────────────────────────────────┘
//!                             │
//!                             ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │              Store (gresult-core)                       │
//! │   slot arena + LIFO free list + fallback error cell,    │
//! │   one mutex, fixed capacity, byte payloads              │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Handles are not owning references: results live until an explicit
//! `delete`. The store is bounded by design - `SLOT_CAPACITY` results of at
//! most `PAYLOAD_CAPACITY` bytes each, fixed at build time (see the
//! `large-payload` feature).

// Re-export core types
pub use gresult_core::{
    constants, CallSite, ErrorRecord, Fault, LogLevel, ResultId, SlotState, Store, StoreError,
    StoreResult,
};

// Re-export call-site capture macros
pub use gresult_core::{function_path, site};

// Re-export leveled debug printing
pub use gresult_core::log::{init as init_logging, set_flush_enabled, set_log_level};
pub use gresult_core::{grdebug, grerror, grinfo, grprint, grprintln, grtrace, grwarn};

pub mod plain;
pub mod typed;
mod macros;

pub use plain::Plain;
pub use typed::Res;
