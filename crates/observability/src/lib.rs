//! Tracing and logging (shared setup).

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize process-wide observability from the environment.
///
/// `RUST_LOG` sets the filter (default `info`); `LOG_FORMAT=pretty` switches
/// from JSON to human-readable output. Safe to call multiple times;
/// subsequent calls become no-ops.
pub fn init() {
    let raw = std::env::var("LOG_FORMAT").ok();
    let format = raw
        .as_deref()
        .map(str::parse::<LogFormat>)
        .transpose();

    match format {
        Ok(format) => self::tracing::init(format.unwrap_or_default()),
        Err(unknown) => {
            self::tracing::init(LogFormat::default());
            ::tracing::warn!(value = %unknown, "unknown LOG_FORMAT, using json");
        }
    }
}
