use std::{
  io::{self, Write},
  marker::PhantomData,
  ptr::{self, NonNull},
};

use log::{debug, trace, warn};

use crate::{
  align::word_align,
  chunk::{Chunk, HEADER_SIZE},
  error::AllocError,
  os,
};

/// First-fit allocator over a registry of OS-mapped chunks.
///
/// Every chunk ever acquired stays in the registry, in acquisition order,
/// whether it is free or not. Memory is never handed back to the OS: dropping
/// the allocator leaks its regions, and payload pointers stay valid for the
/// rest of the process.
pub struct FreeListAllocator {
  head: *mut Chunk,
  tail: *mut Chunk,
  len: usize,
}

/// Read-only snapshot of one registered chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkInfo {
  pub header: *const u8,
  pub payload: *const u8,
  pub next: *const u8,
  pub size: usize,
  pub is_free: bool,
}

impl Default for FreeListAllocator {
  fn default() -> Self {
    Self::new()
  }
}

impl FreeListAllocator {
  pub const fn new() -> Self {
    Self {
      head: ptr::null_mut(),
      tail: ptr::null_mut(),
      len: 0,
    }
  }

  /// Number of chunks ever registered.
  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Returns a word-aligned pointer to at least `size` bytes.
  ///
  /// The oldest free chunk that is large enough is reused as a whole. When
  /// none exists a new region is mapped. Fragmentation never causes a
  /// failure; only a refused mapping does, and then the registry is left
  /// untouched.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    if size == 0 {
      return Err(AllocError::ZeroSize);
    }

    let size = word_align(size).ok_or(AllocError::OutOfMemory)?;

    let chunk = match self.find_free_chunk(size) {
      Some(chunk) => chunk,
      None => self.acquire(size)?,
    };

    unsafe {
      (*chunk.as_ptr()).is_free = false;
      Ok(Chunk::payload(chunk))
    }
  }

  /// Marks the chunk behind `address` free for reuse.
  ///
  /// The payload is not zeroed and the chunk stays registered. Freeing an
  /// already free chunk is reported as [`AllocError::DoubleFree`] and changes
  /// nothing.
  ///
  /// # Safety
  ///
  /// A non-null `address` must have been returned by [`allocate`] on this
  /// allocator. Anything else is undefined behaviour; it is not checked.
  ///
  /// [`allocate`]: FreeListAllocator::allocate
  pub unsafe fn deallocate(
    &mut self,
    address: *mut u8,
  ) -> Result<(), AllocError> {
    let address = NonNull::new(address).ok_or(AllocError::NullPointer)?;

    let chunk = unsafe { &mut *self.find_chunk(address).as_ptr() };

    if chunk.is_free {
      warn!("double free of {address:?} ({} bytes)", chunk.size);
      return Err(AllocError::DoubleFree);
    }

    chunk.is_free = true;

    Ok(())
  }

  /// Payload size of the chunk behind `address`, which may exceed the size
  /// originally requested.
  ///
  /// # Safety
  ///
  /// `address` must have been returned by [`FreeListAllocator::allocate`] on
  /// this allocator.
  pub unsafe fn usable_size(
    &self,
    address: NonNull<u8>,
  ) -> usize {
    unsafe { self.find_chunk(address).as_ref().size }
  }

  /// Iterates the registry from the oldest chunk to the newest.
  pub fn chunks(&self) -> Chunks<'_> {
    Chunks {
      current: self.head,
      _registry: PhantomData,
    }
  }

  /// Writes one line per registered chunk: its forward link, its size and
  /// whether it is free.
  pub fn write_dump<W: Write>(
    &self,
    out: &mut W,
  ) -> io::Result<()> {
    writeln!(out, "free list: {} chunk(s)", self.len)?;

    for (index, chunk) in self.chunks().enumerate() {
      writeln!(
        out,
        "  [{index}] chunk = {:?}, next = {:?}, size = {}, {}",
        chunk.header,
        chunk.next,
        chunk.size,
        if chunk.is_free { "free" } else { "in-use" },
      )?;
    }

    Ok(())
  }

  /// Prints the registry to stdout.
  pub fn dump(&self) {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(err) = self.write_dump(&mut out) {
      warn!("failed to dump free list: {err}");
    }
  }

  fn find_free_chunk(
    &self,
    size: usize,
  ) -> Option<NonNull<Chunk>> {
    let mut current = self.head;
    let mut scanned = 0usize;

    while let Some(chunk) = NonNull::new(current) {
      let header = unsafe { chunk.as_ref() };

      if header.is_free && header.size >= size {
        trace!("first fit for {size} bytes: {chunk:?} ({} bytes) after {scanned} chunk(s)", header.size);
        return Some(chunk);
      }

      scanned += 1;
      current = header.next;
    }

    trace!("no free chunk of {size} bytes among {scanned} chunk(s)");
    None
  }

  /// Maps a region for one header plus `size` payload bytes and appends the
  /// new chunk at the tail of the registry.
  fn acquire(
    &mut self,
    size: usize,
  ) -> Result<NonNull<Chunk>, AllocError> {
    let total_size = HEADER_SIZE.checked_add(size).ok_or(AllocError::OutOfMemory)?;
    let region = os::map_region(total_size).ok_or(AllocError::OutOfMemory)?;

    let chunk = unsafe { Chunk::init(region, size) };

    match NonNull::new(self.tail) {
      None => self.head = chunk.as_ptr(),
      Some(tail) => unsafe { (*tail.as_ptr()).next = chunk.as_ptr() },
    }
    self.tail = chunk.as_ptr();
    self.len += 1;

    debug!("acquired chunk #{} at {chunk:?}: {size} payload bytes, {total_size} mapped", self.len);

    Ok(chunk)
  }

  unsafe fn find_chunk(
    &self,
    address: NonNull<u8>,
  ) -> NonNull<Chunk> {
    unsafe { Chunk::from_payload(address) }
  }
}

/// Iterator returned by [`FreeListAllocator::chunks`].
pub struct Chunks<'a> {
  current: *mut Chunk,
  _registry: PhantomData<&'a FreeListAllocator>,
}

impl Iterator for Chunks<'_> {
  type Item = ChunkInfo;

  fn next(&mut self) -> Option<ChunkInfo> {
    let chunk = NonNull::new(self.current)?;
    let header = unsafe { chunk.as_ref() };

    self.current = header.next;

    Some(ChunkInfo {
      header: chunk.as_ptr() as *const u8,
      payload: unsafe { Chunk::payload(chunk) }.as_ptr() as *const u8,
      next: header.next as *const u8,
      size: header.size,
      is_free: header.is_free,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::align::WORD;

  #[test]
  fn test_alloc() {
    let mut allocator = FreeListAllocator::new();

    unsafe {
      let first_addr = allocator.allocate(8).unwrap().as_ptr() as *mut u64;

      *first_addr = 3u64;

      assert_eq!(*first_addr, 3);

      let size: usize = 6;

      let second_addr = allocator.allocate(size * 2).unwrap().as_ptr() as *mut u16;

      for i in 0..size {
        *(second_addr.add(i)) = (i + 1) as u16;
      }

      assert_eq!(*first_addr, 3);

      for i in 0..size {
        assert_eq!((i + 1) as u16, *(second_addr.add(i)))
      }

      allocator.deallocate(first_addr as *mut u8).unwrap();

      let third_addr = allocator.allocate(4).unwrap().as_ptr() as *mut u32;

      assert_eq!(first_addr as *mut u32, third_addr);

      allocator.deallocate(third_addr as *mut u8).unwrap();

      let fourth_addr = allocator.allocate(16).unwrap().as_ptr() as *mut u128;

      fourth_addr.write_unaligned(25);

      assert_ne!(fourth_addr as *mut u8, third_addr as *mut u8);
      assert_eq!(fourth_addr.read_unaligned(), 25);
      assert_eq!(allocator.len(), 3);
    }
  }

  #[test]
  fn test_rejects_misuse() {
    let mut allocator = FreeListAllocator::new();

    assert_eq!(allocator.allocate(0), Err(AllocError::ZeroSize));
    assert_eq!(unsafe { allocator.deallocate(ptr::null_mut()) }, Err(AllocError::NullPointer));
    assert!(allocator.is_empty());
  }

  #[test]
  fn test_out_of_memory_leaves_registry_untouched() {
    let mut allocator = FreeListAllocator::new();
    allocator.allocate(WORD).unwrap();

    assert_eq!(allocator.allocate(usize::MAX), Err(AllocError::OutOfMemory));
    assert_eq!(allocator.allocate(usize::MAX - HEADER_SIZE), Err(AllocError::OutOfMemory));

    assert_eq!(allocator.len(), 1);
    let chunks: Vec<_> = allocator.chunks().collect();
    assert!(chunks[0].next.is_null());
    assert!(!chunks[0].is_free);
  }

  #[test]
  #[cfg(target_pointer_width = "64")]
  fn test_refused_mapping_leaves_registry_untouched() {
    let mut allocator = FreeListAllocator::new();
    let first = allocator.allocate(WORD).unwrap();

    assert_eq!(allocator.allocate(1 << 60), Err(AllocError::OutOfMemory));

    assert_eq!(allocator.len(), 1);
    let chunks: Vec<_> = allocator.chunks().collect();
    assert!(chunks[0].next.is_null());
    assert_eq!(chunks[0].payload, first.as_ptr() as *const u8);

    allocator.allocate(2 * WORD).unwrap();
    assert_eq!(allocator.len(), 2);
  }

  #[test]
  fn test_double_free_is_reported() {
    let mut allocator = FreeListAllocator::new();
    let address = allocator.allocate(24).unwrap();

    unsafe {
      allocator.deallocate(address.as_ptr()).unwrap();
      assert_eq!(allocator.deallocate(address.as_ptr()), Err(AllocError::DoubleFree));
    }

    assert_eq!(allocator.len(), 1);
    assert_eq!(allocator.allocate(24).unwrap(), address);
  }

  #[test]
  fn test_usable_size_reports_whole_chunk() {
    let mut allocator = FreeListAllocator::new();
    let big = allocator.allocate(64).unwrap();

    unsafe {
      allocator.deallocate(big.as_ptr()).unwrap();

      let small = allocator.allocate(3).unwrap();

      assert_eq!(small, big);
      assert_eq!(allocator.usable_size(small), 64);
    }
  }

  #[test]
  fn test_write_dump() {
    let mut allocator = FreeListAllocator::new();
    let first = allocator.allocate(5).unwrap();
    allocator.allocate(40).unwrap();
    unsafe { allocator.deallocate(first.as_ptr()).unwrap() };

    let mut out = Vec::new();
    allocator.write_dump(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "free list: 2 chunk(s)");
    assert!(lines[1].contains(&format!("size = {}, free", WORD)));
    assert!(lines[2].contains("size = 40, in-use"));
    assert!(lines[2].contains("next = 0x0"));
  }
}
