//! Misuse of the process heap must end the process. Each test re-runs this
//! test binary, filtered to itself, with `MISUSE_CASE` set; the child commits
//! the misuse and the parent checks how it died.

use std::{env, process::Command, ptr};

use chunkalloc::heap;

const MISUSE_CASE: &str = "CHUNKALLOC_MISUSE_CASE";

/// Runs `test_name` in a child process and returns its exit code and stderr.
fn run_in_child(test_name: &str) -> (Option<i32>, String) {
  let output = Command::new(env::current_exe().unwrap())
    .args([test_name, "--exact", "--nocapture", "--test-threads=1"])
    .env(MISUSE_CASE, test_name)
    .output()
    .unwrap();

  (output.status.code(), String::from_utf8_lossy(&output.stderr).into_owned())
}

fn assert_terminated(
  test_name: &str,
  condition: &str,
  operation: &str,
) {
  let (code, stderr) = run_in_child(test_name);

  assert_eq!(code, Some(1), "stderr: {stderr}");
  assert!(stderr.contains("Process terminated!"), "stderr: {stderr}");
  assert!(stderr.contains(condition), "stderr: {stderr}");
  assert!(stderr.contains(&format!("{{{operation}}}")), "stderr: {stderr}");
}

fn in_child(test_name: &str) -> bool {
  env::var(MISUSE_CASE).is_ok_and(|case| case == test_name)
}

#[test]
fn zero_size_allocation_terminates() {
  if in_child("zero_size_allocation_terminates") {
    heap::allocate(0);
    return;
  }

  assert_terminated("zero_size_allocation_terminates", "size != 0", "chunkalloc::heap::allocate");
}

#[test]
fn null_deallocation_terminates() {
  if in_child("null_deallocation_terminates") {
    unsafe { heap::deallocate(ptr::null_mut()) };
    return;
  }

  assert_terminated("null_deallocation_terminates", "address.is_null()", "chunkalloc::heap::deallocate");
}

#[test]
fn double_deallocation_terminates() {
  if in_child("double_deallocation_terminates") {
    let address = heap::allocate(16);
    unsafe {
      heap::deallocate(address);
      heap::deallocate(address);
    }
    return;
  }

  assert_terminated("double_deallocation_terminates", "DoubleFree", "chunkalloc::heap::deallocate");
}

#[test]
fn operations_are_told_apart() {
  let (_, allocate_stderr) = run_in_child("zero_size_allocation_terminates");
  let (_, deallocate_stderr) = run_in_child("null_deallocation_terminates");

  assert!(!allocate_stderr.contains("{chunkalloc::heap::deallocate}"));
  assert!(!deallocate_stderr.contains("{chunkalloc::heap::allocate}"));
}
