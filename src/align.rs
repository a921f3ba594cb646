use std::mem;

/// Native pointer width in bytes. Every size handed out by this crate is a
/// multiple of it.
pub const WORD: usize = mem::size_of::<usize>();

/// Rounds `$value` up to the next multiple of the machine word.
///
/// Overflows (panics in debug) for values within a word of `usize::MAX`; use
/// [`word_align`] when the input is untrusted.
///
/// # Examples
///
/// ```rust
/// use chunkalloc::align;
///
/// match std::mem::size_of::<usize>() {
///     8 => assert_eq!(align!(13), 16), // 64 bit machine.
///     4 => assert_eq!(align!(11), 12), // 32 bit machine.
///     _ => {},
/// };
/// ```
#[macro_export]
macro_rules! align {
  ($value:expr) => {
    ($value + ::core::mem::size_of::<usize>() - 1) & !(::core::mem::size_of::<usize>() - 1)
  };
}

/// Checked form of [`align!`]: `None` when rounding up would overflow.
pub const fn word_align(size: usize) -> Option<usize> {
  match size.checked_add(WORD - 1) {
    Some(padded) => Some(padded & !(WORD - 1)),
    None => None,
  }
}
