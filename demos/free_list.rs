use std::io::Read;

use chunkalloc::heap;

/// Waits until the user presses ENTER.
/// Useful when you want to inspect the mappings with `pmap` or `gdb` between
/// steps.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

fn main() {
  println!("PID = {}", std::process::id());

  // --------------------------------------------------------------------
  // 1) Four allocations on an empty heap. Each one maps its own region.
  // --------------------------------------------------------------------
  let ptr1 = heap::allocate(16) as *mut i32;
  let ptr2 = heap::allocate(100) as *mut i32;
  let ptr3 = heap::allocate(8) as *mut i32;
  let ptr4 = heap::allocate(4) as *mut i32;

  unsafe {
    *ptr1 = 5;
    *ptr2 = 10;
    *ptr3 = 20;
    *ptr4 = 30;

    for (name, ptr) in [("ptr1", ptr1), ("ptr2", ptr2), ("ptr3", ptr3), ("ptr4", ptr4)] {
      println!("{name} address => {ptr:?}\n{name} value => {}\n", *ptr);
    }
  }

  heap::dump();
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 2) Free the 8-byte chunk, then ask for 100 bytes. The freed chunk is
  //    too small, so a fresh region is mapped.
  // --------------------------------------------------------------------
  unsafe { heap::deallocate(ptr3 as *mut u8) };
  let big = heap::allocate(100);
  println!("\n[2] allocate(100) => {big:?} (fresh chunk: {})", big != ptr3 as *mut u8);

  heap::dump();
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 3) A small request now lands in the freed 8-byte chunk.
  // --------------------------------------------------------------------
  let small = heap::allocate(2);
  println!(
    "\n[3] allocate(2) => {small:?} (reused ptr3: {})",
    if small == ptr3 as *mut u8 { "yes" } else { "no" }
  );

  heap::dump();

  unsafe {
    heap::deallocate(ptr1 as *mut u8);
    heap::deallocate(ptr2 as *mut u8);
    heap::deallocate(ptr4 as *mut u8);
    heap::deallocate(big);
    heap::deallocate(small);
  }

  println!("\n[4] Everything freed. The regions stay mapped until the process exits.");
  heap::dump();
}
