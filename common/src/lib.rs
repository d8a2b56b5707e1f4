//! Shared pieces of dns2ip-templater: the run configuration, Go-style
//! duration parsing and the logging macros used by every crate.

pub mod config;
pub mod duration;

#[doc(hidden)]
pub use tracing as __tracing;

/// Target used for events that report a completed step.
/// The terminal formatter renders them with the success symbol.
pub const SUCCESS_TARGET: &str = "dns2ip::success";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "dns2ip::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!($($arg)*)
    };
}
