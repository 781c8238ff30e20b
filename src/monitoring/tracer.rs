/*!
 * Structured Tracing
 * Subscriber setup and run-level spans using the tracing crate
 */

use std::time::Instant;
use tracing::{info, span, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - FITSIM_TRACE_JSON: Enable JSON output (default: false)
///
/// `log` records emitted by the allocator are forwarded to the same
/// subscriber. Calling this twice is harmless; the second call is ignored.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("FITSIM_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if use_json {
        // JSON output for parsing
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
    } else {
        // Human-readable output
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if result.is_ok() {
        info!(json = use_json, "Structured tracing initialized");
    }
}

/// Span covering one simulation run
pub struct RunSpan {
    _span: tracing::Span,
    start: Instant,
}

impl RunSpan {
    pub fn new(seed: u64, requests: usize) -> Self {
        let span = span!(
            Level::INFO,
            "simulation",
            seed = seed,
            requests = requests,
            duration_ms = tracing::field::Empty,
            desyncs = tracing::field::Empty,
        );

        Self {
            _span: span,
            start: Instant::now(),
        }
    }

    /// Enter the span context
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self._span.enter()
    }

    pub fn record_desyncs(&self, count: usize) {
        self._span.record("desyncs", count);
    }
}

impl Drop for RunSpan {
    fn drop(&mut self) {
        let duration = self.start.elapsed();
        self._span.record("duration_ms", duration.as_millis() as u64);
    }
}

/// Create a span for a simulation run
pub fn span_run(seed: u64, requests: usize) -> RunSpan {
    RunSpan::new(seed, requests)
}
