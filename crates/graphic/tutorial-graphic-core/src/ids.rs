//! Marker identifiers and a simple allocator.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MarkerId(pub u32);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic allocator for MarkerId. IDs are opaque externally.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next_marker: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_marker(&mut self) -> MarkerId {
        let id = MarkerId(self.next_marker);
        self.next_marker = self.next_marker.wrapping_add(1);
        id
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = IdAllocator::new();
        assert_eq!(alloc.alloc_marker(), MarkerId(0));
        assert_eq!(alloc.alloc_marker(), MarkerId(1));
        alloc.reset();
        assert_eq!(alloc.alloc_marker(), MarkerId(0));
    }

    #[test]
    fn display_is_hash_prefixed() {
        assert_eq!(MarkerId(7).to_string(), "#7");
    }
}
