//! Persistence core for Lunchly, a small restaurant reservation app.
//!
//! Two entities live here: customers and the reservations they book. Both are
//! read and written through plain functions that take a borrowed
//! [`rusqlite::Connection`], so callers decide which database (file-backed or
//! in-memory) the models talk to.
pub mod db;
pub mod error;
pub mod models;

/// Store bootstrapping used by the binary and by tests.
pub use db::{open_database, open_database_at, open_in_memory};

/// Queries most callers reach for.
pub use db::{fetch_customer, fetch_customers, fetch_top_customers, search_customers};
pub use db::{fetch_reservation, fetch_reservations_for_customer};

pub use error::{LunchlyError, Result};
pub use models::{parse_start_at, Customer, NewCustomer, NewReservation, Reservation, ValidationError};
