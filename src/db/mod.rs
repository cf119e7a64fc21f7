//! Persistence module split across logical submodules. Every function takes
//! the connection explicitly; nothing here holds a global handle.

mod connection;
mod customers;
mod reservations;

pub use connection::{
    db_path, ensure_schema, open_database, open_database_at, open_in_memory, DATABASE_ENV,
};
pub use customers::{
    create_customer, fetch_customer, fetch_customers, fetch_top_customers, search_customers,
    update_customer,
};
pub use reservations::{
    create_reservation, fetch_reservation, fetch_reservations_for_customer, update_reservation,
};
