// ── Wizard step ──

use serde::{Deserialize, Serialize};

use super::DocumentSide;

/// Rendering hint inside the capture step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureMode {
    /// A fresh capture is being requested or processed.
    Capture,
    /// The side is already validated and the guest is revisiting it for
    /// a look before continuing. Not a separate top-level step.
    Preview,
}

/// The active wizard step. Exactly one is active at a time.
///
/// Modeled as a sum type so illegal combinations (e.g. "done but still
/// capturing") are unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    PersonalInfo,
    DocumentCapture { side: DocumentSide, mode: CaptureMode },
    ArrivalSchedule,
    /// Terminal: once reached, no component may mutate wizard state.
    Done,
}

impl Step {
    /// `true` once the wizard has reached its terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// 1-indexed position for progress indicators.
    pub fn index(self) -> usize {
        match self {
            Self::PersonalInfo => 1,
            Self::DocumentCapture { .. } => 2,
            Self::ArrivalSchedule => 3,
            Self::Done => 4,
        }
    }
}
