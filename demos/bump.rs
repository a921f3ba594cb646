use std::{io::Read, ptr};

use chunkalloc::BumpAllocator;

/// Waits until the user presses ENTER.
/// Useful when you want to inspect memory state with tools like `pmap`,
/// `htop` or `gdb` between steps.
fn block_until_enter_pressed() {
  println!("\n>>> Press ENTER to continue...");
  let _ = std::io::stdin().bytes().next();
}

fn main() -> Result<(), chunkalloc::AllocError> {
  // A 100-byte arena. It holds a `start`, a cursor and a capacity, and bumps
  // the cursor forward on each allocation.
  let mut arena = BumpAllocator::create(100)?;

  println!("PID = {}", std::process::id());
  arena.print_state();
  block_until_enter_pressed();

  unsafe {
    // --------------------------------------------------------------------
    // 1) Five i32 values (20 bytes, rounded up to 24 on 64 bit).
    // --------------------------------------------------------------------
    let ints = arena.allocate(5 * size_of::<i32>())?.as_ptr() as *mut i32;
    for i in 0..5 {
      ints.add(i).write(i as i32);
      println!("ints[{i}] => {}", ints.add(i).read());
    }

    // --------------------------------------------------------------------
    // 2) Five bytes. Observe that the cursor still moves a whole word.
    // --------------------------------------------------------------------
    let chars = arena.allocate(5)?.as_ptr();
    ptr::copy_nonoverlapping(b"abced".as_ptr(), chars, 5);
    for i in 0..5 {
      println!("chars[{i}] => {}", *chars.add(i) as char);
    }

    // --------------------------------------------------------------------
    // 3) Five f64 values. 40 more bytes still fit in the arena.
    // --------------------------------------------------------------------
    let doubles = arena.allocate(5 * size_of::<f64>())?.as_ptr() as *mut f64;
    for i in 0..5 {
      doubles.add(i).write(10.0 * (i + 1) as f64);
      println!("doubles[{i}] => {:.2}", doubles.add(i).read());
    }
  }

  println!();
  arena.print_state();
  block_until_enter_pressed();

  // --------------------------------------------------------------------
  // 4) Asking for more than what is left fails without moving the cursor.
  // --------------------------------------------------------------------
  match arena.allocate(64) {
    Ok(address) => println!("\n[4] unexpected allocation at {address:?}"),
    Err(err) => println!("\n[4] allocate(64) failed: {err}"),
  }

  // --------------------------------------------------------------------
  // 5) Reset releases the whole region at once.
  // --------------------------------------------------------------------
  arena.reset();
  println!("\n[5] After reset:");
  arena.print_state();

  arena.destroy();

  Ok(())
}
