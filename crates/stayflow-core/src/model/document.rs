// ── Identity document types ──

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::Display;

/// Which face of the identity document a capture belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DocumentSide {
    Front,
    Back,
}

impl DocumentSide {
    /// Stable index for per-side state arrays.
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Front => 0,
            Self::Back => 1,
        }
    }
}

/// Where the capture came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CaptureSource {
    Camera,
    Gallery,
}

/// The most recent photo chosen for one side. Overwritten on
/// re-capture; never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureSlot {
    pub file_path: PathBuf,
    pub source: CaptureSource,
}

/// Server-declared descriptor for one side of the accepted document type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentType {
    pub side: DocumentSide,
    pub type_id: String,
    pub requires_back: bool,
}

/// The resolved capture plan for this wizard instance, built from the
/// document-type catalog. The front entry decides whether the flow is
/// single- or double-sided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequirements {
    pub front: DocumentType,
    pub back: Option<DocumentType>,
}

impl DocumentRequirements {
    /// `true` when the document type needs a back capture.
    pub fn requires_back(&self) -> bool {
        self.front.requires_back
    }

    /// The upload type identifier for a side, if that side is part of
    /// the flow.
    pub fn type_id_for(&self, side: DocumentSide) -> Option<&str> {
        match side {
            DocumentSide::Front => Some(&self.front.type_id),
            DocumentSide::Back => self.back.as_ref().map(|b| b.type_id.as_str()),
        }
    }
}

/// Status of the server-side validation job for a front capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum ValidationStatus {
    Pending,
    Processing,
    Validated,
    Rejected,
}

impl ValidationStatus {
    /// `true` for statuses with no further automatic transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Validated | Self::Rejected)
    }
}

/// Snapshot of the validation job spawned when the front side finished
/// uploading. At most one is in flight per wizard instance; the back
/// side never has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationJob {
    pub job_key: String,
    pub attempts_made: u32,
    pub max_attempts: u32,
    pub status: ValidationStatus,
}

impl ValidationJob {
    pub fn new(job_key: String, max_attempts: u32) -> Self {
        Self {
            job_key,
            attempts_made: 0,
            max_attempts,
            status: ValidationStatus::Pending,
        }
    }
}
