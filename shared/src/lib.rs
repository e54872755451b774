//! Shared types for the Coral Booking platform
//!
//! Data models and small utilities shared between booking-server and API
//! consumers. DB row derives are behind the `db` feature so frontend-side
//! consumers don't pull in sqlx.

pub mod models;
pub mod util;

pub use models::*;
