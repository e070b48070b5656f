// Logging macros that compile down to nothing unless the 'logging' feature
// is enabled. Their bodies must still be valid Rust in both configurations,
// so arguments are not evaluated when logging is disabled.

macro_rules! log {
    ($($tt:tt)*) => {
        #[cfg(feature = "logging")]
        {
            $($tt)*
        }
    }
}

macro_rules! debug {
    ($($tt:tt)*) => { log!(log::debug!($($tt)*)) }
}

macro_rules! trace {
    ($($tt:tt)*) => { log!(log::trace!($($tt)*)) }
}
