//! Axum HTTP layer for Tourbook.
//!
//! This crate is the imperative shell around `tourbook-core`: it parses
//! requests, calls the [`BookingService`](tourbook_core::BookingService) and
//! maps results and errors onto HTTP responses.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON
//! │  - Request parsing                      │  ← Request ids, tracing
//! │  - Response serialization               │  ← Metrics endpoint
//! ├─────────────────────────────────────────┤
//! │         Functional Core                 │
//! │  - Validation, pricing, capacity rules  │  ← Pure, tested in isolation
//! ├─────────────────────────────────────────┤
//! │         BookingStore                    │  ← Postgres or in-memory
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tourbook_core::{environment::SystemClock, BookingService};
//! use tourbook_web::{build_router, AppState};
//!
//! let service = BookingService::new(Arc::new(store), Arc::new(SystemClock));
//! let app = build_router(AppState::new(service));
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use router::{build_router, REQUEST_ID_HEADER};
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
