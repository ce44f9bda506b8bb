// ── Guest identity types ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Declared gender, as the backend's profile store models it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    NonBinary,
    Undisclosed,
}

/// Guest identity fields collected on the first wizard step.
///
/// All fields are plain optionals; validity is derived by
/// [`personal_info_valid`](crate::validators::personal_info_valid),
/// never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<Gender>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub country: Option<String>,
}

/// Domain form of a reservation, resolved once at wizard start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub booking_code: String,
    pub property_name: String,
    pub checkin_date: NaiveDate,
    pub checkout_date: NaiveDate,
    /// Email on file for the booking, if any.
    pub guest_email: Option<String>,
}
