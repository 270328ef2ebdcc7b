//! Small engine-wide helpers

mod handle_allocator;

pub use handle_allocator::HandleAllocator;
