//! Structured logging setup, replacing the source's compile-time `TRACE_*`
//! bitmask with `tracing` targets filterable at runtime via `RUST_LOG`.
//!
//! Useful targets: `ae::advance`, `ae::wheels`, `ae::gears`, `ae::queues`,
//! `ae::barrels`, `ae::meshes`, `ae::jumps`, `ae::values`.

use tracing_subscriber::EnvFilter;

/// Install a global subscriber that reads `RUST_LOG`, defaulting to `warn`
/// when unset. Safe to call once at process startup; subsequent calls are
/// no-ops if a subscriber is already installed.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
