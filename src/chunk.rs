use std::{mem, ptr::NonNull};

/// Header placed in front of every payload handed out by the free-list
/// allocator.
///
/// The payload starts right after the header, so a payload pointer and its
/// header are always [`HEADER_SIZE`] bytes apart.
#[repr(C)]
pub struct Chunk {
  pub size: usize,
  pub is_free: bool,
  pub next: *mut Chunk,
}

/// Size of [`Chunk`] in bytes. A multiple of the word size.
pub const HEADER_SIZE: usize = mem::size_of::<Chunk>();

const _: () = assert!(HEADER_SIZE % mem::size_of::<usize>() == 0);

impl Chunk {
  pub fn new(
    size: usize,
    is_free: bool,
    next: *mut Chunk,
  ) -> Self {
    Self { size, is_free, next }
  }

  /// Writes a fresh in-use header of payload `size` at `address`.
  ///
  /// # Safety
  ///
  /// `address` must be word aligned and valid for writes of
  /// `HEADER_SIZE + size` bytes.
  pub unsafe fn init(
    address: NonNull<u8>,
    size: usize,
  ) -> NonNull<Chunk> {
    let chunk = address.cast::<Chunk>();
    unsafe { chunk.as_ptr().write(Chunk::new(size, false, std::ptr::null_mut())) };
    chunk
  }

  /// First payload byte of `chunk`.
  ///
  /// # Safety
  ///
  /// `chunk` must point to a header written by [`Chunk::init`].
  pub unsafe fn payload(chunk: NonNull<Chunk>) -> NonNull<u8> {
    unsafe { chunk.cast::<u8>().add(HEADER_SIZE) }
  }

  /// Recovers the header from a payload pointer.
  ///
  /// # Safety
  ///
  /// `payload` must have been produced by [`Chunk::payload`].
  pub unsafe fn from_payload(payload: NonNull<u8>) -> NonNull<Chunk> {
    unsafe { payload.sub(HEADER_SIZE).cast::<Chunk>() }
  }
}
