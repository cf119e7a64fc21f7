use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::reservations::fetch_reservations_for_customer;
use crate::error::{LunchlyError, Result};
use crate::models::{normalize_text, Customer, NewCustomer, Reservation};

/// How many customers the leaderboard returns.
const TOP_CUSTOMER_LIMIT: i64 = 10;

fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        phone: normalize_text(row.get(3)?),
        notes: normalize_text(row.get(4)?),
    })
}

/// Turn a free-text query into a `LIKE` pattern that matches it anywhere in
/// the column. Wildcard characters typed by the user are matched literally.
fn contains_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Every customer, ordered by last name then first name.
pub fn fetch_customers(conn: &Connection) -> Result<Vec<Customer>> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, phone, notes
         FROM customers
         ORDER BY last_name, first_name",
    )?;

    let customers = stmt
        .query_map([], customer_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(customers)
}

/// Customers whose last name contains `query`, ignoring case (Unicode-aware
/// through `casefold`). An empty query matches everyone, so the result equals
/// [`fetch_customers`].
pub fn search_customers(conn: &Connection, query: &str) -> Result<Vec<Customer>> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, phone, notes
         FROM customers
         WHERE casefold(last_name) LIKE casefold(?1) ESCAPE '\\'
         ORDER BY last_name, first_name",
    )?;

    let customers = stmt
        .query_map([contains_pattern(query)], customer_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(customers)
}

/// Look up a single customer, failing with a 404-flavoured
/// [`LunchlyError::NotFound`] when the id is unknown.
pub fn fetch_customer(conn: &Connection, id: i64) -> Result<Customer> {
    conn.query_row(
        "SELECT id, first_name, last_name, phone, notes
         FROM customers
         WHERE id = ?1",
        [id],
        customer_from_row,
    )
    .optional()?
    .ok_or_else(|| LunchlyError::customer_not_found(id))
}

/// The ten customers with the most reservations, busiest first. The inner
/// join leaves out anyone who has never booked.
pub fn fetch_top_customers(conn: &Connection) -> Result<Vec<Customer>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.first_name, c.last_name, c.phone, c.notes
         FROM customers c
         INNER JOIN reservations r ON r.customer_id = c.id
         GROUP BY c.id
         ORDER BY COUNT(r.id) DESC, c.last_name, c.first_name
         LIMIT ?1",
    )?;

    let customers = stmt
        .query_map([TOP_CUSTOMER_LIMIT], customer_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(customers)
}

/// Insert a new customer and return it with the id SQLite assigned.
pub fn create_customer(conn: &Connection, customer: NewCustomer) -> Result<Customer> {
    conn.execute(
        "INSERT INTO customers (first_name, last_name, phone, notes) VALUES (?1, ?2, ?3, ?4)",
        params![
            customer.first_name,
            customer.last_name,
            customer.phone,
            customer.notes
        ],
    )?;

    let id = conn.last_insert_rowid();
    tracing::debug!(id, "inserted customer");

    Ok(Customer {
        id,
        first_name: customer.first_name,
        last_name: customer.last_name,
        phone: customer.phone,
        notes: customer.notes,
    })
}

/// Overwrite every mutable column of an existing customer.
pub fn update_customer(conn: &Connection, customer: &Customer) -> Result<()> {
    let updated = conn.execute(
        "UPDATE customers SET first_name = ?1, last_name = ?2, phone = ?3, notes = ?4
         WHERE id = ?5",
        params![
            customer.first_name,
            customer.last_name,
            customer.phone,
            customer.notes,
            customer.id
        ],
    )?;

    if updated == 0 {
        return Err(LunchlyError::customer_not_found(customer.id));
    }

    tracing::debug!(id = customer.id, "updated customer");
    Ok(())
}

impl NewCustomer {
    /// Persist this customer, consuming the transient value.
    pub fn save(self, conn: &Connection) -> Result<Customer> {
        create_customer(conn, self)
    }
}

impl Customer {
    /// Write the current field values back to the existing row.
    pub fn save(&self, conn: &Connection) -> Result<()> {
        update_customer(conn, self)
    }

    /// Every reservation this customer has booked.
    pub fn reservations(&self, conn: &Connection) -> Result<Vec<Reservation>> {
        fetch_reservations_for_customer(conn, self.id)
    }
}
