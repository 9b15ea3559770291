//! This module provides observability and diagnostics capabilities for the
//! codec.
//!
//! Writer and reader decisions (mask encoding choice, skipped categories,
//! lazy column decodes) are surfaced as structured key-value lines through
//! the `log` facade via the `codec_metric!` macro. Nothing is emitted unless
//! debug logging is enabled for this crate.

/// Initializes `env_logger` from the environment (`RUST_LOG`).
///
/// Intended for binaries and tests embedding the codec; calling it more than
/// once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env().try_init();
}

/// Logs a structured key-value metric line at debug level.
///
/// # Example
/// ```
/// use volwire::codec_metric;
/// let rows = 4;
/// codec_metric!("event" = "write_category", "rows" = &rows);
/// ```
#[macro_export]
macro_rules! codec_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        if $crate::log::log_enabled!($crate::log::Level::Debug) {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            $crate::log::debug!("VOLWIRE_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}
