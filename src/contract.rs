/// Terminates the process when a usage contract does not hold.
///
/// The diagnostic names the failed condition, the operation (the enclosing
/// function's path), the file and the line, followed by `$msg`. It goes to
/// stderr and to the `log` facade before the process exits with status 1.
///
/// ```rust,no_run
/// use chunkalloc::contract;
///
/// let size = 0usize;
/// contract!(size != 0, "Invalid allocation size!");
/// unreachable!();
/// ```
#[macro_export]
macro_rules! contract {
  ($condition:expr, $msg:expr) => {
    if !($condition) {
      $crate::contract::violated(
        ::core::stringify!($condition),
        $crate::operation!(),
        ::core::file!(),
        ::core::line!(),
        $msg,
      );
    }
  };
}

/// Path of the enclosing function, e.g. `chunkalloc::heap::allocate`.
#[doc(hidden)]
#[macro_export]
macro_rules! operation {
  () => {{
    fn here() {}
    $crate::contract::strip_marker(::core::any::type_name_of_val(&here))
  }};
}

#[doc(hidden)]
pub fn strip_marker(name: &'static str) -> &'static str {
  name.strip_suffix("::here").unwrap_or(name)
}

#[doc(hidden)]
#[cold]
pub fn violated(
  condition: &str,
  operation: &str,
  file: &str,
  line: u32,
  msg: &str,
) -> ! {
  log::error!("contract violated in {operation} at {file}:{line}: {{{condition}}}: {msg}");

  eprintln!(
    "[*] Process terminated! 'contract!()' failed!\n\
     Condition\t: {{{condition}}}\n\
     Operation\t: {{{operation}}}\n\
     Failed in file\t: {{{file}}}\n\
     At line \t: {{{line}}}"
  );
  eprintln!("Debug log: {msg}");

  std::process::exit(1);
}
