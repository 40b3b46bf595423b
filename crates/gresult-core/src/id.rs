//! Result handle type

use core::fmt;

use crate::constants;

/// Numeric handle referencing a slot in the store's arena
///
/// This is a 32-bit value that indexes into the slot array.
/// The maximum value (u32::MAX) is reserved as the fallback sentinel:
/// "no real slot; consult the fallback error cell".
///
/// A handle is not an owning reference. The referenced slot lives until an
/// explicit `delete`, and a handle kept around after that delete dangles;
/// the store detects this through the slot's state tag, never through the
/// handle itself.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ResultId(u32);

impl ResultId {
    /// Sentinel value for results that never got a slot
    pub const FALLBACK: ResultId = ResultId(constants::ID_FALLBACK);

    /// Create a new ResultId from a raw value
    #[inline]
    pub const fn new(id: u32) -> Self {
        ResultId(id)
    }

    /// Get the raw u32 value
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Get as usize for indexing
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Check if this is the fallback sentinel
    #[inline]
    pub const fn is_fallback(self) -> bool {
        self.0 == constants::ID_FALLBACK
    }

    /// Check if this handle names an arena slot (it may still dangle)
    #[inline]
    pub const fn is_slot(self) -> bool {
        self.0 != constants::ID_FALLBACK
    }
}

impl From<u32> for ResultId {
    #[inline]
    fn from(id: u32) -> Self {
        ResultId(id)
    }
}

impl From<ResultId> for u32 {
    #[inline]
    fn from(id: ResultId) -> Self {
        id.0
    }
}

impl fmt::Debug for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fallback() {
            write!(f, "ResultId(FALLBACK)")
        } else {
            write!(f, "ResultId({})", self.0)
        }
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fallback() {
            write!(f, "fallback")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Default for ResultId {
    fn default() -> Self {
        ResultId::FALLBACK
    }
}
