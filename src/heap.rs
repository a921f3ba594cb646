//! Process-wide free-list heap with fatal usage checks.
//!
//! The functions here drive one [`FreeListAllocator`] per thread of control.
//! Misuse (zero-sized requests, null or doubly freed pointers) terminates the
//! process through [`contract!`](crate::contract); the only recoverable
//! failure is the OS refusing memory, reported as a null pointer.

use std::{cell::RefCell, ptr};

use crate::{contract, error::AllocError, free_list::FreeListAllocator};

thread_local! {
  static HEAP: RefCell<FreeListAllocator> = const { RefCell::new(FreeListAllocator::new()) };
}

/// Returns a word-aligned pointer to at least `size` bytes, or null when the
/// OS is out of memory.
///
/// Terminates the process if `size` is zero.
pub fn allocate(size: usize) -> *mut u8 {
  contract!(size != 0, "Invalid allocation size!");

  HEAP.with_borrow_mut(|heap| match heap.allocate(size) {
    Ok(address) => address.as_ptr(),
    Err(_) => ptr::null_mut(),
  })
}

/// Marks the chunk behind `address` free.
///
/// Terminates the process if `address` is null or already free.
///
/// # Safety
///
/// `address` must have been returned by [`allocate`] on the same thread.
pub unsafe fn deallocate(address: *mut u8) {
  contract!(!address.is_null(), "Trying to free invalid address!");

  let result = HEAP.with_borrow_mut(|heap| unsafe { heap.deallocate(address) });

  contract!(result != Err(AllocError::DoubleFree), "Trying to free a chunk twice!");
}

/// Prints every chunk of this thread's heap.
pub fn dump() {
  HEAP.with_borrow(|heap| heap.dump());
}

/// Number of chunks registered in this thread's heap.
pub fn chunk_count() -> usize {
  HEAP.with_borrow(|heap| heap.len())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::align::WORD;

  #[test]
  fn test_heap() {
    let ptr1 = allocate(16) as *mut i32;
    let ptr2 = allocate(100) as *mut i32;
    let ptr3 = allocate(8) as *mut i32;
    let ptr4 = allocate(4) as *mut i32;

    unsafe {
      *ptr1 = 5;
      *ptr2 = 10;
      *ptr3 = 20;
      *ptr4 = 30;

      assert_eq!((*ptr1, *ptr2, *ptr3, *ptr4), (5, 10, 20, 30));

      for ptr in [ptr1, ptr2, ptr3, ptr4] {
        assert_eq!(ptr as usize % WORD, 0);
      }

      deallocate(ptr1 as *mut u8);
      deallocate(ptr2 as *mut u8);
      deallocate(ptr3 as *mut u8);
      deallocate(ptr4 as *mut u8);
    }

    let registered = chunk_count();

    let reused = allocate(50);
    assert_eq!(reused, ptr2 as *mut u8);
    assert_eq!(chunk_count(), registered);

    dump();
  }

  #[test]
  fn test_out_of_memory_is_null() {
    let before = chunk_count();

    assert!(allocate(usize::MAX).is_null());
    assert_eq!(chunk_count(), before);
  }
}
