// ── Step-gating validators ──
//
// Pure, synchronous, side-effect-free predicates. Recomputed on every
// relevant field change; neither performs I/O. The email check carries a
// third state: a freshly edited address is *not yet validated* (distinct
// from invalid) until its debounce window has closed.

use std::time::Duration;

use tokio::time::Instant;

use crate::model::{ArrivalSchedule, PersonalInfo};

/// Validity of a freshly entered email address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailValidity {
    /// The debounce window has not closed since the last edit.
    Unknown,
    Valid,
    Invalid,
}

/// Minimal structural check -- the backend does the real verification.
pub fn email_format_ok(address: &str) -> bool {
    let Some((local, domain)) = address.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !address.contains(char::is_whitespace)
}

/// A debounced email input.
///
/// Tracks the current value and the instant of the last edit; the
/// format check only applies once the input has been stable for the
/// configured quiet period.
#[derive(Debug, Clone, Default)]
pub struct EmailField {
    value: String,
    last_edit: Option<Instant>,
}

impl EmailField {
    /// Record a keystroke-level edit, restarting the quiet period.
    pub fn edit(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.last_edit = Some(Instant::now());
    }

    /// The current (possibly unsettled) value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// `true` if the guest entered anything at all.
    pub fn is_entered(&self) -> bool {
        !self.value.is_empty()
    }

    /// Validity as of now, given the debounce window.
    pub fn validity(&self, quiet_period: Duration) -> EmailValidity {
        let Some(last_edit) = self.last_edit else {
            // Never edited: nothing to validate.
            return EmailValidity::Unknown;
        };
        if last_edit.elapsed() < quiet_period {
            return EmailValidity::Unknown;
        }
        if email_format_ok(&self.value) {
            EmailValidity::Valid
        } else {
            EmailValidity::Invalid
        }
    }
}

fn filled(field: Option<&String>) -> bool {
    field.is_some_and(|s| !s.is_empty())
}

/// Gate for `PersonalInfo → DocumentCapture`.
///
/// All of first name, last name, gender, birth date, and address must be
/// present, and the email must be either known from the external profile
/// source or freshly entered *and* settled as valid. The debounce rule
/// only applies to addresses edited this session: an email that matches
/// the known one is pre-known, not fresh. An actually fresh email still
/// in its debounce window keeps the gate closed.
pub fn personal_info_valid(
    info: &PersonalInfo,
    known_email: Option<&str>,
    email_validity: EmailValidity,
) -> bool {
    let fields_ok = filled(info.first_name.as_ref())
        && filled(info.last_name.as_ref())
        && info.gender.is_some()
        && info.birth_date.is_some()
        && filled(info.address.as_ref());

    let email_ok = match info.email.as_deref() {
        Some(entered) if !entered.is_empty() => {
            known_email == Some(entered) || email_validity == EmailValidity::Valid
        }
        _ => known_email.is_some_and(|e| !e.is_empty()),
    };

    fields_ok && email_ok
}

/// Gate for `ArrivalSchedule → Done` (checked at submission).
pub fn arrival_info_valid(schedule: &ArrivalSchedule) -> bool {
    !schedule.coming_from.is_empty() && !schedule.next_destination.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Gender;

    fn complete_info() -> PersonalInfo {
        PersonalInfo {
            first_name: Some("Ana".into()),
            last_name: Some("Duarte".into()),
            gender: Some(Gender::Female),
            email: None,
            birth_date: Some("1991-03-14".parse().unwrap()),
            address: Some("12 Quay St".into()),
            country: Some("PT".into()),
        }
    }

    #[test]
    fn gate_refuses_each_missing_field() {
        let known = Some("ana@example.com");

        assert!(personal_info_valid(&complete_info(), known, EmailValidity::Unknown));

        let mut info = complete_info();
        info.first_name = None;
        assert!(!personal_info_valid(&info, known, EmailValidity::Unknown));

        let mut info = complete_info();
        info.last_name = Some(String::new());
        assert!(!personal_info_valid(&info, known, EmailValidity::Unknown));

        let mut info = complete_info();
        info.gender = None;
        assert!(!personal_info_valid(&info, known, EmailValidity::Unknown));

        let mut info = complete_info();
        info.birth_date = None;
        assert!(!personal_info_valid(&info, known, EmailValidity::Unknown));

        let mut info = complete_info();
        info.address = None;
        assert!(!personal_info_valid(&info, known, EmailValidity::Unknown));
    }

    #[test]
    fn fresh_email_must_settle_before_counting() {
        let mut info = complete_info();
        info.email = Some("new@example.com".into());

        // Known email does not rescue a fresh entry still in debounce.
        let known = Some("old@example.com");
        assert!(!personal_info_valid(&info, known, EmailValidity::Unknown));
        assert!(!personal_info_valid(&info, known, EmailValidity::Invalid));
        assert!(personal_info_valid(&info, known, EmailValidity::Valid));
    }

    #[test]
    fn stored_email_counts_as_known_without_debounce() {
        // A profile-sourced email was never edited, so its validity
        // stays Unknown; it must still open the gate.
        let mut info = complete_info();
        info.email = Some("ana@example.com".into());

        assert!(personal_info_valid(
            &info,
            Some("ana@example.com"),
            EmailValidity::Unknown
        ));
        // A differing address is a fresh entry and must settle first.
        assert!(!personal_info_valid(
            &info,
            Some("other@example.com"),
            EmailValidity::Unknown
        ));
    }

    #[test]
    fn missing_email_falls_back_to_known() {
        let info = complete_info();
        assert!(!personal_info_valid(&info, None, EmailValidity::Unknown));
        assert!(!personal_info_valid(&info, Some(""), EmailValidity::Unknown));
        assert!(personal_info_valid(&info, Some("ana@example.com"), EmailValidity::Unknown));
    }

    #[test]
    fn email_format_check() {
        assert!(email_format_ok("ana@example.com"));
        assert!(!email_format_ok("ana@example"));
        assert!(!email_format_ok("@example.com"));
        assert!(!email_format_ok("ana example@mail.com"));
        assert!(!email_format_ok("ana@.com"));
        assert!(!email_format_ok(""));
    }

    #[tokio::test(start_paused = true)]
    async fn email_debounce_settles_after_quiet_period() {
        let quiet = Duration::from_millis(800);
        let mut field = EmailField::default();

        field.edit("ana@example.com");
        assert_eq!(field.validity(quiet), EmailValidity::Unknown);

        tokio::time::advance(Duration::from_millis(500)).await;
        // Another keystroke restarts the window.
        field.edit("ana@example.co");
        tokio::time::advance(Duration::from_millis(500)).await;
        assert_eq!(field.validity(quiet), EmailValidity::Unknown);

        tokio::time::advance(Duration::from_millis(400)).await;
        assert_eq!(field.validity(quiet), EmailValidity::Valid);
    }

    #[tokio::test(start_paused = true)]
    async fn bad_email_settles_invalid_not_unknown() {
        let quiet = Duration::from_millis(800);
        let mut field = EmailField::default();

        field.edit("not-an-email");
        tokio::time::advance(Duration::from_millis(900)).await;
        assert_eq!(field.validity(quiet), EmailValidity::Invalid);
    }

    #[test]
    fn arrival_gate() {
        let mut schedule = ArrivalSchedule::with_defaults("2025-06-01".parse().unwrap());
        assert!(!arrival_info_valid(&schedule));

        schedule.coming_from = "Lisbon".into();
        assert!(!arrival_info_valid(&schedule));

        schedule.next_destination = "Porto".into();
        assert!(arrival_info_valid(&schedule));
    }
}
