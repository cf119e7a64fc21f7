//! Domain models that mirror the SQLite schema. Each entity comes in two
//! shapes: a `New*` value that has never been written and carries no id, and
//! the persisted type that always has one. Saving a `New*` consumes it and
//! hands back the persisted form, so "is the id set yet" never has to be
//! checked at runtime.
//!
//! Fields are only reachable through accessors and checked setters, which
//! keeps an invalid reservation (zero guests, bogus start time) from ever
//! being constructed.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDateTime};
use thiserror::Error;

/// Input accepted for a reservation start time when it arrives as text.
const START_AT_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Rejections raised while building or mutating a model, before the store is
/// ever touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Carries the rejected guest count.
    #[error("Number of guests must be at least 1")]
    TooFewGuests(i64),

    /// Carries the raw text that failed to parse.
    #[error("A valid date must be provided")]
    InvalidStartAt(String),
}

/// Collapse absent text to the empty string. Phone numbers and notes are
/// never stored as NULL.
pub(crate) fn normalize_text(value: Option<String>) -> String {
    value.unwrap_or_default()
}

fn check_num_guests(num_guests: i64) -> Result<i64, ValidationError> {
    if num_guests < 1 {
        Err(ValidationError::TooFewGuests(num_guests))
    } else {
        Ok(num_guests)
    }
}

/// Parse a textual start time. Accepts RFC 3339 timestamps (the offset is
/// dropped, keeping the wall-clock time) and `YYYY-MM-DD HH:MM[:SS]` with
/// either a space or `T` separator.
pub fn parse_start_at(input: &str) -> Result<NaiveDateTime, ValidationError> {
    let trimmed = input.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.naive_local());
    }

    START_AT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| ValidationError::InvalidStartAt(input.to_string()))
}

/// A patron that has not been written to the database yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) phone: String,
    pub(crate) notes: String,
}

impl NewCustomer {
    /// Build a customer from form input; missing phone or notes become `""`.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone: normalize_text(phone),
            notes: normalize_text(notes),
        }
    }

    /// Given name as entered.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Family name; customer search and ordering key off this.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Contact number, `""` when none was given.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Free-form notes, `""` when none were given.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// First and last name joined by a single space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Replace the phone number; `None` stores `""`.
    pub fn set_phone(&mut self, phone: Option<String>) {
        self.phone = normalize_text(phone);
    }

    /// Replace the notes; `None` stores `""`.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = normalize_text(notes);
    }
}

/// A patron row. The `id` is assigned by SQLite on first insert and never
/// changes afterwards, so there is no setter for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub(crate) id: i64,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) phone: String,
    pub(crate) notes: String,
}

impl Customer {
    /// Store-assigned primary key.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Given name as entered.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Family name; customer search and ordering key off this.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Contact number, `""` when none was given.
    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Free-form notes, `""` when none were given.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// First and last name joined by a single space, as shown in listings.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Replace the given name. No validation applies.
    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
    }

    /// Replace the family name. No validation applies.
    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
    }

    /// Replace the phone number; `None` stores `""`.
    pub fn set_phone(&mut self, phone: Option<String>) {
        self.phone = normalize_text(phone);
    }

    /// Replace the notes; `None` stores `""`.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = normalize_text(notes);
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}

/// A booking that has passed validation but has not been inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReservation {
    pub(crate) customer_id: i64,
    pub(crate) num_guests: i64,
    pub(crate) start_at: NaiveDateTime,
    pub(crate) notes: String,
}

impl NewReservation {
    /// Build a reservation for `customer_id`. Fails when `num_guests` is
    /// below one.
    pub fn new(
        customer_id: i64,
        num_guests: i64,
        start_at: NaiveDateTime,
        notes: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            customer_id,
            num_guests: check_num_guests(num_guests)?,
            start_at,
            notes: normalize_text(notes),
        })
    }

    /// The customer who booked, referencing `customers.id`.
    pub fn customer_id(&self) -> i64 {
        self.customer_id
    }

    /// Party size, always at least one.
    pub fn num_guests(&self) -> i64 {
        self.num_guests
    }

    /// When the party is expected.
    pub fn start_at(&self) -> NaiveDateTime {
        self.start_at
    }

    /// Free-form notes, `""` when none were given.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Change the party size, rejecting anything below one.
    pub fn set_num_guests(&mut self, num_guests: i64) -> Result<(), ValidationError> {
        self.num_guests = check_num_guests(num_guests)?;
        Ok(())
    }

    /// Move the booking to a new time.
    pub fn set_start_at(&mut self, start_at: NaiveDateTime) {
        self.start_at = start_at;
    }

    /// Replace the notes; `None` stores `""`.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = normalize_text(notes);
    }
}

/// A stored booking for a party. `customer_id` points at `customers.id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub(crate) id: i64,
    pub(crate) customer_id: i64,
    pub(crate) num_guests: i64,
    pub(crate) start_at: NaiveDateTime,
    pub(crate) notes: String,
}

impl Reservation {
    /// Store-assigned primary key.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The customer who booked, referencing `customers.id`.
    pub fn customer_id(&self) -> i64 {
        self.customer_id
    }

    /// Party size, always at least one.
    pub fn num_guests(&self) -> i64 {
        self.num_guests
    }

    /// When the party is expected.
    pub fn start_at(&self) -> NaiveDateTime {
        self.start_at
    }

    /// Free-form notes, `""` when none were given.
    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Move the booking to another customer.
    pub fn set_customer_id(&mut self, customer_id: i64) {
        self.customer_id = customer_id;
    }

    /// Change the party size. The previous value is kept when `num_guests`
    /// is rejected.
    pub fn set_num_guests(&mut self, num_guests: i64) -> Result<(), ValidationError> {
        self.num_guests = check_num_guests(num_guests)?;
        Ok(())
    }

    /// Move the booking to a new time.
    pub fn set_start_at(&mut self, start_at: NaiveDateTime) {
        self.start_at = start_at;
    }

    /// Replace the notes; `None` stores `""`.
    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = normalize_text(notes);
    }

    /// Render the start time for humans, e.g. `April 1st 2021, 6:30 pm`.
    pub fn formatted_start_at(&self) -> String {
        let day = self.start_at.day();
        format!(
            "{} {}{} {}",
            self.start_at.format("%B"),
            day,
            ordinal_suffix(day),
            self.start_at.format("%Y, %-I:%M %P"),
        )
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn sample_reservation() -> Reservation {
        Reservation {
            id: 7,
            customer_id: 1,
            num_guests: 2,
            start_at: at(2021, 4, 1, 18, 30),
            notes: String::new(),
        }
    }

    #[test]
    fn missing_phone_and_notes_become_empty() {
        let mut customer = NewCustomer::new("Jane", "Doe", None, None);
        assert_eq!(customer.phone(), "");
        assert_eq!(customer.notes(), "");

        customer.set_phone(Some("555-1234".to_string()));
        assert_eq!(customer.phone(), "555-1234");
        customer.set_phone(None);
        assert_eq!(customer.phone(), "");
        customer.set_notes(Some(String::new()));
        assert_eq!(customer.notes(), "");
    }

    #[test]
    fn full_name_joins_with_single_space() {
        let customer = NewCustomer::new("Jane", "Doe", None, None);
        assert_eq!(customer.full_name(), "Jane Doe");
    }

    #[test]
    fn guest_count_below_one_is_rejected() {
        let start = at(2021, 4, 1, 18, 30);
        assert_eq!(
            NewReservation::new(1, 0, start, None),
            Err(ValidationError::TooFewGuests(0))
        );
        assert_eq!(
            NewReservation::new(1, -3, start, None),
            Err(ValidationError::TooFewGuests(-3))
        );
        assert!(NewReservation::new(1, 1, start, None).is_ok());
    }

    #[test]
    fn rejected_guest_count_keeps_previous_value() {
        let mut reservation = sample_reservation();
        assert!(reservation.set_num_guests(0).is_err());
        assert_eq!(reservation.num_guests(), 2);
        reservation.set_num_guests(4).unwrap();
        assert_eq!(reservation.num_guests(), 4);
    }

    #[test]
    fn parse_start_at_accepts_common_layouts() {
        let expected = at(2021, 4, 1, 18, 30);
        assert_eq!(parse_start_at("2021-04-01 18:30").unwrap(), expected);
        assert_eq!(parse_start_at("2021-04-01T18:30:00").unwrap(), expected);
        assert_eq!(parse_start_at(" 2021-04-01 18:30:00 ").unwrap(), expected);
        assert_eq!(parse_start_at("2021-04-01T18:30:00-07:00").unwrap(), expected);
    }

    #[test]
    fn parse_start_at_rejects_garbage() {
        assert_eq!(
            parse_start_at("next tuesday"),
            Err(ValidationError::InvalidStartAt("next tuesday".to_string()))
        );
        assert!(parse_start_at("").is_err());
        assert!(parse_start_at("2021-02-30 18:00").is_err());
    }

    #[test]
    fn formatted_start_at_uses_ordinal_day_and_twelve_hour_clock() {
        let mut reservation = sample_reservation();
        assert_eq!(reservation.formatted_start_at(), "April 1st 2021, 6:30 pm");

        reservation.set_start_at(at(2021, 12, 12, 9, 5));
        assert_eq!(reservation.formatted_start_at(), "December 12th 2021, 9:05 am");

        reservation.set_start_at(at(2022, 1, 23, 0, 15));
        assert_eq!(reservation.formatted_start_at(), "January 23rd 2022, 12:15 am");
    }

    #[test]
    fn ordinal_suffixes() {
        let suffixes: Vec<_> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 31]
            .into_iter()
            .map(ordinal_suffix)
            .collect();
        assert_eq!(
            suffixes,
            ["st", "nd", "rd", "th", "th", "th", "th", "st", "nd", "st"]
        );
    }
}
