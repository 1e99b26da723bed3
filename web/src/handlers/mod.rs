//! HTTP request handlers.
//!
//! This module contains all HTTP handlers organized by resource.

pub mod bookings;
pub mod experiences;
pub mod health;
pub mod promo;

// Re-export common handler utilities
pub use health::{health_check, readiness_check};
