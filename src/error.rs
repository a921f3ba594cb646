use std::fmt;

/// Failures reported by [`FreeListAllocator`](crate::FreeListAllocator) and
/// [`BumpAllocator`](crate::BumpAllocator).
///
/// Two classes exist: usage errors, which correct code never triggers, and
/// resource errors, which leave the allocator exactly as it was so the caller
/// may retry or fall back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
  /// A zero-byte allocation or a zero-capacity arena was requested.
  ZeroSize,
  /// A null pointer was passed to `deallocate`.
  NullPointer,
  /// The chunk behind the pointer is already free.
  DoubleFree,
  /// The OS refused to map a region, or the request overflowed `usize`.
  OutOfMemory,
  /// The bump arena does not have room for the request.
  Exhausted { requested: usize, remaining: usize },
  /// The bump arena's region was released by `reset`.
  Released,
}

impl AllocError {
  /// `true` for contract violations, `false` for resource exhaustion.
  pub fn is_usage_error(&self) -> bool {
    match self {
      AllocError::ZeroSize | AllocError::NullPointer | AllocError::DoubleFree | AllocError::Released => true,
      AllocError::OutOfMemory | AllocError::Exhausted { .. } => false,
    }
  }
}

impl fmt::Display for AllocError {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    match self {
      AllocError::ZeroSize => write!(f, "invalid allocation size: 0"),
      AllocError::NullPointer => write!(f, "attempt to free a null pointer"),
      AllocError::DoubleFree => write!(f, "attempt to free a chunk that is already free"),
      AllocError::OutOfMemory => write!(f, "out of memory: the OS refused to map a region"),
      AllocError::Exhausted { requested, remaining } => {
        write!(f, "arena exhausted: requested {requested} bytes, {remaining} remaining")
      }
      AllocError::Released => write!(f, "arena region has been released"),
    }
  }
}

impl std::error::Error for AllocError {}
