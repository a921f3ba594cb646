use std::{
  io::{self, Write},
  ptr::NonNull,
};

use log::{debug, warn};

use crate::{align::word_align, error::AllocError, os};

/// Linear allocator over one fixed-capacity mapped region.
///
/// Allocations bump a cursor forward and cannot be freed one by one.
/// [`reset`](BumpAllocator::reset) releases the whole region at once.
pub struct BumpAllocator {
  start: Option<NonNull<u8>>,
  cursor: usize,
  capacity: usize,
}

impl BumpAllocator {
  /// Maps an arena of `capacity` bytes.
  pub fn create(capacity: usize) -> Result<Self, AllocError> {
    if capacity == 0 {
      return Err(AllocError::ZeroSize);
    }

    let start = os::map_region(capacity).ok_or(AllocError::OutOfMemory)?;

    debug!("created bump arena of {capacity} bytes at {start:?}");

    Ok(Self {
      start: Some(start),
      cursor: 0,
      capacity,
    })
  }

  /// Hands out the next `size` bytes, rounded up to a whole word.
  ///
  /// A request that does not fit fails without moving the cursor.
  pub fn allocate(
    &mut self,
    size: usize,
  ) -> Result<NonNull<u8>, AllocError> {
    if size == 0 {
      return Err(AllocError::ZeroSize);
    }

    let start = self.start.ok_or(AllocError::Released)?;
    let remaining = self.remaining();

    let size = match word_align(size) {
      Some(size) if size <= remaining => size,
      _ => return Err(AllocError::Exhausted { requested: size, remaining }),
    };

    let address = unsafe { start.add(self.cursor) };
    self.cursor += size;

    Ok(address)
  }

  /// Releases the backing region. Every pointer handed out so far dangles
  /// afterwards, and later allocations fail with [`AllocError::Released`].
  pub fn reset(&mut self) {
    if let Some(start) = self.start.take() {
      debug!("releasing bump arena at {start:?} ({} of {} bytes used)", self.cursor, self.capacity);
      unsafe { os::unmap_region(start, self.capacity) };
    }

    self.cursor = 0;
  }

  /// Releases the arena and consumes the handle.
  pub fn destroy(mut self) {
    self.reset();
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn used(&self) -> usize {
    self.cursor
  }

  pub fn remaining(&self) -> usize {
    match self.start {
      Some(_) => self.capacity - self.cursor,
      None => 0,
    }
  }

  pub fn is_released(&self) -> bool {
    self.start.is_none()
  }

  /// Writes the start, cursor and end addresses of the arena.
  pub fn write_state<W: Write>(
    &self,
    out: &mut W,
  ) -> io::Result<()> {
    match self.start {
      Some(start) => {
        let start = start.as_ptr() as usize;
        writeln!(out, "curr: {:#x}", start + self.cursor)?;
        writeln!(out, "start: {start:#x}")?;
        writeln!(out, "end: {:#x}", start + self.capacity)
      }
      None => writeln!(out, "curr: released\nstart: released\nend: released"),
    }
  }

  pub fn print_state(&self) {
    let stdout = io::stdout();

    if let Err(err) = self.write_state(&mut stdout.lock()) {
      warn!("failed to print bump arena state: {err}");
    }
  }
}

impl Drop for BumpAllocator {
  fn drop(&mut self) {
    self.reset();
  }
}
