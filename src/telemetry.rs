//! Telemetry helpers for applications embedding `chart-grid`.
//!
//! Layout passes, division choices and cache population are reported through
//! `tracing` at `debug`/`trace` level under the `chart_grid` target.
//! Consumers can either call one of the helpers below or wire their own
//! subscriber and filters.

/// Filter directive used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "chart_grid=info";

/// Initializes a `tracing` subscriber using [`DEFAULT_FILTER`] as fallback.
///
/// Returns `false` when the `telemetry` feature is disabled or when the host
/// application already installed a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_fallback(DEFAULT_FILTER)
}

/// Initializes a compact `fmt` subscriber.
///
/// `RUST_LOG` wins over `fallback_directive` when present. Layout debugging is
/// usually done with `chart_grid::api=debug`.
#[must_use]
pub fn init_tracing_with_fallback(fallback_directive: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_directive));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_directive;
        false
    }
}
