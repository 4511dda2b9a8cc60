//! Debug-logging breadcrumbs, compiled out entirely unless `debug-logging`
//! is enabled so call sites don't need a `#[cfg]` at every log statement.

#[cfg(feature = "debug-logging")]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        log::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub(crate) use trace_log;
