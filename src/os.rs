//! Thin wrappers over the anonymous-mapping syscalls.

use std::ptr::{self, NonNull};

use log::warn;

/// Maps `len` bytes of private, anonymous, zero-filled read/write memory.
///
/// Returns `None` when the kernel refuses the mapping. The region is page
/// aligned, so it is word aligned too.
pub(crate) fn map_region(len: usize) -> Option<NonNull<u8>> {
  let address = unsafe {
    libc::mmap(
      ptr::null_mut(),
      len,
      libc::PROT_READ | libc::PROT_WRITE,
      libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
      -1,
      0,
    )
  };

  if address == libc::MAP_FAILED {
    warn!("mmap of {len} bytes failed: {}", std::io::Error::last_os_error());
    return None;
  }

  NonNull::new(address as *mut u8)
}

/// Unmaps a region obtained from [`map_region`].
///
/// # Safety
///
/// `address` and `len` must describe exactly one live mapping returned by
/// [`map_region`], and nothing may access it afterwards.
pub(crate) unsafe fn unmap_region(
  address: NonNull<u8>,
  len: usize,
) {
  let result = unsafe { libc::munmap(address.as_ptr().cast(), len) };

  if result != 0 {
    warn!("munmap of {len} bytes at {address:?} failed: {}", std::io::Error::last_os_error());
  }
}
