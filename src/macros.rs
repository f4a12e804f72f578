/// Expands to the fully qualified path of the enclosing function,
/// e.g. `my_crate::worker::run`.
#[macro_export]
macro_rules! function_path {
    () => {{
        fn __here() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = type_name_of(__here);
        name.strip_suffix("::__here")
            .unwrap_or(name)
            .trim_end_matches("::{{closure}}")
    }};
}

/// Captures the call site as a [`CallerLocation`](crate::CallerLocation).
#[macro_export]
macro_rules! caller_location {
    () => {
        $crate::CallerLocation::from_path(
            ::std::file!(),
            ::std::line!(),
            $crate::function_path!(),
        )
    };
}

/// Builds a [`JournalEntry`](crate::JournalEntry) from a formatted message,
/// seeded with the location of the macro invocation.
///
/// ```no_run
/// let entry = journald_native::journal_entry!("cache warmed in {}ms", 42)?;
/// # Ok::<(), journald_native::EntryError>(())
/// ```
#[macro_export]
macro_rules! journal_entry {
    ($($arg:tt)+) => {
        $crate::JournalEntry::from_message(
            ::std::format!($($arg)+),
            &$crate::caller_location!(),
        )
    };
}
