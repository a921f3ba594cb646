//! # chunkalloc - A Minimal User-Space Memory Allocator
//!
//! This crate provides two allocation strategies over memory mapped straight
//! from the OS with `mmap(2)`:
//!
//! - a **free-list allocator** ([`FreeListAllocator`]) for arbitrary sizes and
//!   lifetimes, placing requests by first fit;
//! - a **bump allocator** ([`BumpAllocator`]) for fast allocations inside a
//!   fixed-capacity arena that is released all at once.
//!
//! ## Free List
//!
//! Every allocation lives in a chunk: a header followed by the payload. Each
//! chunk comes from its own mapping and is linked into a registry in the order
//! it was acquired:
//!
//! ```text
//!   Registry:
//!
//!   head                                                          tail
//!    │                                                              │
//!    ▼                                                              ▼
//!   ┌────────┬──────────┐   ┌────────┬───────┐   ┌────────┬──────────────┐
//!   │ header │ payload  │──▶│ header │  ...  │──▶│ header │   payload    │──▶ null
//!   │ in-use │ 16 bytes │   │ free   │       │   │ in-use │  104 bytes   │
//!   └────────┴──────────┘   └────────┴───────┘   └────────┴──────────────┘
//! ```
//!
//! A single chunk:
//!
//! ```text
//!   ┌───────────────────────┬────────────────────────────────┐
//!   │    Chunk Header       │         User Data              │
//!   │  ┌─────────────────┐  │                                │
//!   │  │ size: N         │  │  ┌──────────────────────────┐  │
//!   │  │ is_free: false  │  │  │                          │  │
//!   │  │ next: null/ptr  │  │  │     N bytes usable       │  │
//!   │  └─────────────────┘  │  │                          │  │
//!   │      24 bytes         │  └──────────────────────────┘  │
//!   └───────────────────────┴────────────────────────────────┘
//!                           ▲
//!                           └── Pointer returned to user
//! ```
//!
//! Allocation rounds the size up to a whole word, then walks the registry from
//! the head and takes the first free chunk that is large enough. Only when
//! there is none does it map a new region. Deallocation steps back over the
//! header and flips `is_free`; nothing is unmapped.
//!
//! ## Crate Structure
//!
//! ```text
//!   chunkalloc
//!   ├── align      - Word alignment (align!, word_align)
//!   ├── chunk      - Chunk header layout
//!   ├── contract   - Fatal usage checks (contract!)
//!   ├── error      - AllocError
//!   ├── free_list  - FreeListAllocator
//!   ├── heap       - Thread-local heap with fatal misuse checks
//!   ├── bump       - BumpAllocator
//!   └── os         - mmap/munmap wrappers (internal)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use chunkalloc::FreeListAllocator;
//!
//! let mut allocator = FreeListAllocator::new();
//!
//! let ptr = allocator.allocate(8).unwrap().as_ptr() as *mut u64;
//!
//! unsafe {
//!     *ptr = 42;
//!     assert_eq!(*ptr, 42);
//!
//!     allocator.deallocate(ptr as *mut u8).unwrap();
//! }
//!
//! // The freed chunk is the first fit for the next small request.
//! assert_eq!(allocator.allocate(4).unwrap().as_ptr(), ptr as *mut u8);
//! ```
//!
//! ## Limitations
//!
//! - **Single-threaded only**: allocators are neither `Send` nor `Sync`
//! - **No splitting or coalescing**: an oversized fit is handed out whole
//! - **Never returns memory**: free-list regions stay mapped for the life of
//!   the process
//! - **Unix-only**: requires `libc` and `mmap`
//!
//! ## Safety
//!
//! Deallocation trusts the pointer it is given: passing anything that did not
//! come from the same allocator is undefined behaviour.

pub mod align;
pub mod bump;
pub mod chunk;
pub mod contract;
pub mod error;
pub mod free_list;
pub mod heap;
mod os;

pub use bump::BumpAllocator;
pub use error::AllocError;
pub use free_list::{ChunkInfo, Chunks, FreeListAllocator};
