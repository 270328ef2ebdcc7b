use crate::resource::Handle;

/// Issues monotonically increasing `Handle`s.
///
/// Unlike a slot allocator, nothing is ever recycled: a deleted handle
/// stays dead forever, so a stale handle can never alias a newer resource.
///
/// # Example
///
/// ```ignore
/// let mut alloc = HandleAllocator::new();
/// let a = alloc.alloc();  // 0
/// let b = alloc.alloc();  // 1
/// alloc.release(a);       // 0 is dead, never reissued
/// let c = alloc.alloc();  // 2
/// ```
#[derive(Debug, Clone)]
pub struct HandleAllocator {
    next_id: u64,
    len: u64,
}

impl HandleAllocator {
    /// Create a new empty allocator
    pub fn new() -> Self {
        Self {
            next_id: 0,
            len: 0,
        }
    }

    /// Issue the next handle
    pub fn alloc(&mut self) -> Handle {
        debug_assert!(self.next_id < Handle::INVALID.raw(), "handle space exhausted");
        let id = self.next_id;
        self.next_id += 1;
        self.len += 1;
        Handle::from_raw(id)
    }

    /// Record that a live handle has been released
    pub fn release(&mut self, handle: Handle) {
        debug_assert!(handle.raw() < self.next_id, "releasing an unissued handle: {}", handle);
        self.len = self.len.saturating_sub(1);
    }

    /// Total number of handles ever issued
    pub fn issued(&self) -> u64 {
        self.next_id
    }

    /// Number of issued handles not yet released
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether no handle is currently live
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for HandleAllocator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "handle_allocator_tests.rs"]
mod tests;
