//! # Tourbook Server
//!
//! Process-level wiring for the booking API: configuration, logging, metrics,
//! the Postgres pool and the HTTP router.

#![forbid(unsafe_code)]

pub mod app;
pub mod config;
pub mod telemetry;

pub use app::{build_app, connect_pool, cors_layer, postgres_store};
pub use config::Config;
