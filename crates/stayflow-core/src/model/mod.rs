// ── Domain model ──
//
// Clean domain types for the check-in flow. Wire types from
// `stayflow-api` are translated into these in `convert.rs`; nothing in
// the orchestrator reasons about raw JSON shapes.

mod arrival;
mod document;
mod guest;
mod step;

pub use arrival::{ArrivalSchedule, CheckinRecord, CheckinRequest};
pub use document::{
    CaptureSlot, CaptureSource, DocumentRequirements, DocumentSide, DocumentType, ValidationJob,
    ValidationStatus,
};
pub use guest::{Gender, PersonalInfo, Reservation};
pub use step::{CaptureMode, Step};
