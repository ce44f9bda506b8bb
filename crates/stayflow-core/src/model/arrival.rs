// ── Arrival schedule & check-in payload ──

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Arrival details collected on the last editable step.
///
/// `date` and `arrival_time` always carry a default; validity only
/// requires `coming_from` and `next_destination` to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalSchedule {
    pub date: NaiveDate,
    pub arrival_time: NaiveTime,
    pub coming_from: String,
    pub next_destination: String,
}

impl ArrivalSchedule {
    /// Seed the schedule from the reservation's check-in date with a
    /// mid-afternoon default arrival.
    pub fn with_defaults(checkin_date: NaiveDate) -> Self {
        Self {
            date: checkin_date,
            arrival_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap_or_default(),
            coming_from: String::new(),
            next_destination: String::new(),
        }
    }
}

/// The immutable check-in payload, built exactly once at submission by
/// the submitter. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinRequest {
    pub booking_code: String,
    pub arrival_time: NaiveTime,
    pub coming_from: String,
    pub next_destination: String,
    pub checkin_date: NaiveDate,
    pub checkout_date: NaiveDate,
    pub email: String,
}

/// The record the backend creates for a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckinRecord {
    pub id: Uuid,
    pub booking_code: String,
    pub created_at: DateTime<Utc>,
}
