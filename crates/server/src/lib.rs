pub mod config;
pub mod db;
pub mod error_convert;
pub mod telemetry;
pub mod health;
pub mod auth;
pub mod media;
pub mod openapi;
pub mod rest;

// Legal-aid domain modules
pub mod repo;
pub mod seed;
pub mod bootstrap;

/// Install the `tracing` fmt subscriber, filtered by `RUST_LOG`
/// (default `info`). Safe to call more than once.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
