//! Fault taxonomy and error records
//!
//! Store-level failures are reported as typed [`StoreError`] returns. The
//! three store-level kinds plus caller-supplied domain messages (stored in
//! error slots, never interpreted) make up the full taxonomy.

use core::fmt;
use std::borrow::Cow;

use crate::site::CallSite;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure kinds
///
/// Domain errors are not listed here: they are payloads supplied by calling
/// code, stored and forwarded unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Malformed call: bad alignment or size, dangling or never-allocated
    /// handle, wrong-state handle. Always a caller bug, never retried.
    InvalidArgument,

    /// Reading a value out of a slot that holds an error, or forwarding a
    /// source that is not an error. A caller logic error.
    StateMismatch,

    /// The fixed arena or free list is exhausted, or a requested payload
    /// exceeds the fixed per-slot capacity. Recoverable only by deleting
    /// other live results first.
    OutOfCapacity,
}

impl Fault {
    /// Canonical message recorded for this fault kind
    pub const fn message(self) -> &'static str {
        match self {
            Fault::InvalidArgument => "Invalid argument",
            Fault::StateMismatch => "Result is not a success",
            Fault::OutOfCapacity => "Not enough memory",
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::InvalidArgument => write!(f, "invalid argument"),
            Fault::StateMismatch => write!(f, "result state mismatch"),
            Fault::OutOfCapacity => write!(f, "out of capacity"),
        }
    }
}

/// A store-level failure, carrying the failing call's site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreError {
    kind: Fault,
    site: CallSite,
}

impl StoreError {
    /// Create a new error for the given fault kind and call site
    #[inline]
    pub const fn new(kind: Fault, site: CallSite) -> Self {
        StoreError { kind, site }
    }

    /// The fault kind
    #[inline]
    pub const fn kind(&self) -> Fault {
        self.kind
    }

    /// The call site of the failing operation
    #[inline]
    pub const fn site(&self) -> CallSite {
        self.site
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.site)
    }
}

impl std::error::Error for StoreError {}

/// Diagnostic record held by an error slot or the fallback error cell
///
/// The message and call site are copied verbatim when a failure is
/// forwarded; the forwarding location is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    message: Cow<'static, str>,
    site: CallSite,
}

impl ErrorRecord {
    /// Create a record from a message and the site that raised it
    pub fn new(message: impl Into<Cow<'static, str>>, site: CallSite) -> Self {
        ErrorRecord {
            message: message.into(),
            site,
        }
    }

    /// Human-readable message
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Site the failure was originally raised at
    #[inline]
    pub const fn site(&self) -> CallSite {
        self.site
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (raised at {})", self.message, self.site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site;

    #[test]
    fn test_fault_messages() {
        assert_eq!(Fault::InvalidArgument.message(), "Invalid argument");
        assert_eq!(Fault::StateMismatch.message(), "Result is not a success");
        assert_eq!(Fault::OutOfCapacity.message(), "Not enough memory");
    }

    #[test]
    fn test_store_error_display() {
        let e = StoreError::new(Fault::OutOfCapacity, CallSite::new("a.rs", "f", 3));
        assert_eq!(format!("{}", e), "out of capacity at a.rs:3 (f)");
        assert_eq!(e.kind(), Fault::OutOfCapacity);
    }

    #[test]
    fn test_record_keeps_site() {
        let site = site!();
        let rec = ErrorRecord::new("boom", site);
        assert_eq!(rec.message(), "boom");
        assert_eq!(rec.site(), site);
    }

    #[test]
    fn test_record_owned_message() {
        let msg = format!("divisor was {}", 0);
        let rec = ErrorRecord::new(msg, site!());
        assert_eq!(rec.message(), "divisor was 0");
    }
}
