//! Optional log output for import runs.
//!
//! The pipeline only emits `tracing` events; nothing is printed unless a
//! subscriber is installed. Published studies log at `info` and per-file
//! summaries at `debug`. Rows that were recovered rather than rejected log at
//! `warn` or `error` with their row number. The `study_summary` tool
//! installs the fmt subscriber below; library users may bring their own.

/// Initializes a default `tracing` subscriber when the `telemetry` feature is enabled.
///
/// Returns `true` when initialization succeeds.
/// Returns `false` when no initialization is performed (feature disabled) or if a
/// global subscriber was already set by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mocap_index=info")),
            )
            .with_target(false)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
