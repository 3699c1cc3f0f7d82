//! Logging macros gated by a module-level `ENABLE_LOGS` flag.
//!
//! The scan loop logs every tick, which is far too chatty once a module is
//! stable. Each module that uses these macros declares its own switch:
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_info, log_warn, log_error};
//!
//! log_info!("scan loop started");
//! ```

#[doc(hidden)]
#[macro_export]
macro_rules! gated_log {
    ($level:expr, $($arg:tt)*) => {
        if ENABLE_LOGS {
            log::log!($level, $($arg)*);
        }
    };
}

/// Per-cycle detail: timings, skipped ticks.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => { $crate::gated_log!(log::Level::Debug, $($arg)*) };
}

/// Loop lifecycle and confirmations.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => { $crate::gated_log!(log::Level::Info, $($arg)*) };
}

/// Failed cycles the loop recovers from.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => { $crate::gated_log!(log::Level::Warn, $($arg)*) };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => { $crate::gated_log!(log::Level::Error, $($arg)*) };
}

/// Initializes `env_logger` once. Reads `RUST_LOG`, defaults to `info`.
///
/// Safe to call repeatedly (later calls are ignored), which tests rely on.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .is_test(cfg!(test))
        .try_init();
}
