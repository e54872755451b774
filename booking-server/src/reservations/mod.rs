//! Reservation engine
//!
//! Seat-capacity accounting and the reservation lifecycle. The manager is
//! the only write path for reservations; HTTP handlers never touch the
//! reservation table directly for anything that consumes seats.

pub mod manager;

pub use manager::{ReservationError, ReservationManager};
