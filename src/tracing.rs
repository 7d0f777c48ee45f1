//! Tracing setup for hosts and tests
//!
//! The crate logs through the `tracing` macros and never installs a
//! subscriber itself. Hosts that have no subscriber of their own can call
//! [`init`].
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - registration, overrides, import summaries
//! - `RUST_LOG=keyroute::router=trace` - every key resolution
//! - `RUST_LOG=keyroute::keymap::interchange=debug` - import details

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize a console subscriber
///
/// Respects RUST_LOG; defaults to `warn` so conflict reports and skipped
/// import records are visible without extra configuration.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // Ignore the error if a subscriber is already installed (tests, embedding hosts)
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}
