use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{LunchlyError, Result};
use crate::models::{normalize_text, NewReservation, Reservation};

fn reservation_from_row(row: &Row<'_>) -> rusqlite::Result<Reservation> {
    Ok(Reservation {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        num_guests: row.get(2)?,
        start_at: row.get(3)?,
        notes: normalize_text(row.get(4)?),
    })
}

/// All reservations booked by `customer_id`, in insertion order. Unknown
/// customers simply have none.
pub fn fetch_reservations_for_customer(
    conn: &Connection,
    customer_id: i64,
) -> Result<Vec<Reservation>> {
    let mut stmt = conn.prepare(
        "SELECT id, customer_id, num_guests, start_at, notes
         FROM reservations
         WHERE customer_id = ?1
         ORDER BY id",
    )?;

    let reservations = stmt
        .query_map([customer_id], reservation_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(reservations)
}

/// Look up a single reservation, failing with [`LunchlyError::NotFound`]
/// when the id is unknown.
pub fn fetch_reservation(conn: &Connection, id: i64) -> Result<Reservation> {
    conn.query_row(
        "SELECT id, customer_id, num_guests, start_at, notes
         FROM reservations
         WHERE id = ?1",
        [id],
        reservation_from_row,
    )
    .optional()?
    .ok_or_else(|| LunchlyError::reservation_not_found(id))
}

/// Insert a validated reservation and return it with its new id.
pub fn create_reservation(conn: &Connection, reservation: NewReservation) -> Result<Reservation> {
    conn.execute(
        "INSERT INTO reservations (customer_id, start_at, num_guests, notes)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            reservation.customer_id,
            reservation.start_at,
            reservation.num_guests,
            reservation.notes
        ],
    )?;

    let id = conn.last_insert_rowid();
    tracing::debug!(id, customer_id = reservation.customer_id, "inserted reservation");

    Ok(Reservation {
        id,
        customer_id: reservation.customer_id,
        num_guests: reservation.num_guests,
        start_at: reservation.start_at,
        notes: reservation.notes,
    })
}

/// Overwrite every mutable column of an existing reservation.
pub fn update_reservation(conn: &Connection, reservation: &Reservation) -> Result<()> {
    let updated = conn.execute(
        "UPDATE reservations SET customer_id = ?1, start_at = ?2, num_guests = ?3, notes = ?4
         WHERE id = ?5",
        params![
            reservation.customer_id,
            reservation.start_at,
            reservation.num_guests,
            reservation.notes,
            reservation.id
        ],
    )?;

    if updated == 0 {
        return Err(LunchlyError::reservation_not_found(reservation.id));
    }

    tracing::debug!(id = reservation.id, "updated reservation");
    Ok(())
}

impl NewReservation {
    /// Persist this reservation, consuming the transient value.
    pub fn save(self, conn: &Connection) -> Result<Reservation> {
        create_reservation(conn, self)
    }
}

impl Reservation {
    /// Write the current field values back to the existing row. The id never
    /// changes, so this is always an update.
    pub fn save(&self, conn: &Connection) -> Result<()> {
        update_reservation(conn, self)
    }
}
