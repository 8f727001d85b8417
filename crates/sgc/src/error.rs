//! Error Module - SGC Error Types
//!
//! Defines the error types used by SGC, plus the `fatal!` macro.
//!
//! The split follows the failure model of the memory manager:
//!
//! - Initialization-time problems (a bad configuration) are ordinary
//!   `Result` values the embedder can inspect.
//! - Runtime problems (host allocation failure, growth attempted during a
//!   copy, an unknown object kind found by the walker) all indicate a
//!   corrupted invariant of the memory manager itself. Nothing can be
//!   recovered from inside a single-threaded runtime whose heap is suspect,
//!   so these paths log a diagnostic and abort the process.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for fallible SGC operations
///
/// Only initialization can fail recoverably; see the module docs for why
/// everything else aborts.
#[derive(Debug, Error)]
pub enum GcError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Result type alias for SGC operations
pub type Result<T> = std::result::Result<T, GcError>;

#[doc(hidden)]
pub fn fatal_impl(args: std::fmt::Arguments<'_>) -> ! {
    log::error!("{args}");
    eprintln!("sgc: fatal: {args}");
    std::process::abort()
}

/// Abort the process with a diagnostic.
///
/// Used for every unrecoverable condition: host allocation failure, heap
/// corruption detected by the object walker, and ordering violations such
/// as growing the heap while a to-space is active. The message is logged
/// at error level and echoed to stderr before aborting.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)*) => {
        $crate::error::fatal_impl(::core::format_args!($($arg)*))
    };
}
