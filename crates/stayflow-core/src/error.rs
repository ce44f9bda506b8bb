// ── Core error types ──
//
// User-facing errors from stayflow-core. These are NOT API-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<stayflow_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants, and every capture failure resolves
// to one of a small set of named recovery affordances the UI renders.

use thiserror::Error;

/// Unified error type for wizard lifecycle operations.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Setup errors ─────────────────────────────────────────────────
    #[error("Reservation not found: {code}")]
    ReservationNotFound { code: String },

    #[error("Check-in setup incomplete: {message}")]
    SetupIncomplete { message: String },

    #[error("Wizard not started -- call start() first")]
    NotStarted,

    // ── Lifecycle errors ─────────────────────────────────────────────
    /// The wizard reached `Done`; all mutating operations are refused.
    #[error("Check-in already complete")]
    WizardComplete,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Transport / API (wrapped, not exposed raw) ───────────────────
    #[error("Cannot reach the check-in service: {reason}")]
    ConnectionFailed { reason: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    // ── Recoverable flow errors ──────────────────────────────────────
    /// A step transition was refused; the wizard stays where it is.
    #[error(transparent)]
    Step(#[from] crate::steps::StepRefusal),

    /// A capture attempt failed; the paired recovery affordance was
    /// broadcast as a wizard event.
    #[error(transparent)]
    Capture(#[from] CaptureError),

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Recovery affordances ─────────────────────────────────────────────

/// The UI affordance a failure resolves to.
///
/// Every failure in the capture pipeline is translated into one of
/// these; none of them crash the wizard or leave it in an inconsistent
/// step, and the guest can always abandon back to the prior screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// First upload failure for a side: offer retake-or-reupload.
    RetryUpload,
    /// Second or later upload failure for the same side: offer only to
    /// abandon the flow.
    TechnicalError,
    /// The server rejected the document; message surfaced verbatim. The
    /// guest must recapture.
    ValidationMessage(String),
    /// Polling exhausted its attempts without a terminal status. Kept
    /// distinct from rejection: the document's actual status is unknown.
    ValidationTimeout,
    /// The final submission failed; the same payload may be resubmitted.
    Resubmit,
}

/// Failure of one capture attempt (upload + validation for the front).
#[derive(Debug, Error)]
pub enum CaptureError {
    /// File transfer failed (network or server rejection). The action
    /// reflects the per-side escalation policy.
    #[error("upload failed: {source}")]
    Upload {
        action: RecoveryAction,
        #[source]
        source: stayflow_api::Error,
    },

    /// The validation job settled on an explicit rejection.
    #[error("document rejected: {message}")]
    Rejected { message: String },

    /// The validation job never reached a terminal status within the
    /// configured number of polls.
    #[error("document validation timed out")]
    ValidationTimeout,
}

impl CaptureError {
    /// The recovery affordance the UI should present for this failure.
    pub fn recovery(&self) -> RecoveryAction {
        match self {
            Self::Upload { action, .. } => action.clone(),
            Self::Rejected { message } => RecoveryAction::ValidationMessage(message.clone()),
            Self::ValidationTimeout => RecoveryAction::ValidationTimeout,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<stayflow_api::Error> for CoreError {
    fn from(err: stayflow_api::Error) -> Self {
        match err {
            stayflow_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            stayflow_api::Error::Transport(ref e) => {
                if e.is_timeout() || e.is_connect() {
                    CoreError::ConnectionFailed {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            stayflow_api::Error::InvalidUrl(e) => CoreError::SetupIncomplete {
                message: format!("invalid backend URL: {e}"),
            },
            stayflow_api::Error::CaptureFile(e) => {
                CoreError::Internal(format!("capture file unreadable: {e}"))
            }
            stayflow_api::Error::Api {
                message,
                code,
                status,
            } => CoreError::Api {
                message,
                code,
                status: Some(status),
            },
            stayflow_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("deserialization error: {message}"))
            }
        }
    }
}
