/// Conditional logging for development builds
///
/// `debug_log!` forwards to `leptos::logging::log!` (browser console on wasm,
/// stdout natively) and compiles to nothing in release builds unless the
/// `console_logging` feature is enabled. Warnings and errors keep using
/// `leptos::logging::warn!` and `leptos::logging::error!` directly.
///
/// ```ignore
/// use crate::logging::debug_log;
///
/// debug_log!("Loaded {} reports", reports.len());
/// ```
macro_rules! debug_log {
    ($($arg:tt)+) => {
        #[cfg(any(debug_assertions, feature = "console_logging"))]
        {
            leptos::logging::log!($($arg)+);
        }
    };
}

pub(crate) use debug_log;
