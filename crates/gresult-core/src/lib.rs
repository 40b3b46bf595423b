//! # gresult-core
//!
//! Handle-based result store: a fixed-capacity slot arena that holds either a
//! success payload or an error record, identified by numeric handles.
//!
//! This crate is the untyped engine. It stores raw bytes with caller-declared
//! size and alignment and never learns the logical type of a payload. The
//! typed convenience layer and the propagation protocol live in `gresult`.
//!
//! ## Modules
//!
//! - `id` - Result handle type
//! - `site` - Call-site descriptor and capture macros
//! - `error` - Fault taxonomy, typed store errors, error records
//! - `slot` - Slot and payload storage
//! - `store` - The store itself: arena, free list, fallback error cell
//! - `log` - Diagnostic emission and leveled debug printing macros

pub mod id;
pub mod site;
pub mod error;
pub mod slot;
pub mod store;
pub mod log;

// Re-exports for convenience
pub use id::ResultId;
pub use site::CallSite;
pub use error::{ErrorRecord, Fault, StoreError, StoreResult};
pub use slot::SlotState;
pub use store::Store;
pub use log::LogLevel;

/// Constants for store layout
pub mod constants {
    /// Number of slots in the arena.
    ///
    /// Fixed at build time; exceeding it is a capacity failure, not a
    /// resize trigger.
    pub const SLOT_CAPACITY: usize = 32;

    /// Payload size - configurable via feature flag
    /// Default: 1KB, large enough for the largest success type stored
    #[cfg(feature = "large-payload")]
    pub const PAYLOAD_CAPACITY: usize = 16 * 1024; // 16 KB

    #[cfg(not(feature = "large-payload"))]
    pub const PAYLOAD_CAPACITY: usize = 1024; // 1 KB

    /// Free-list capacity. Sized equal to the slot count, so the defensive
    /// check in `delete` is unreachable in correct use.
    pub const FREE_LIST_CAPACITY: usize = SLOT_CAPACITY;

    cfg_if::cfg_if! {
        if #[cfg(target_pointer_width = "64")] {
            /// Maximum natural alignment a payload may request.
            pub const MAX_ALIGN: usize = 16;
        } else {
            /// Maximum natural alignment a payload may request.
            pub const MAX_ALIGN: usize = 8;
        }
    }

    /// Reserved sentinel id: "no real slot; consult the fallback error cell"
    pub const ID_FALLBACK: u32 = u32::MAX;
}
