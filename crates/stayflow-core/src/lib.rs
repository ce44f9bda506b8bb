//! Property check-in orchestration for the stayflow guest apps.
//!
//! The host app drives one [`CheckinWizard`] per reservation: it collects
//! guest identity data, captures and uploads a government ID document,
//! polls the backend's validation job until it settles, escalates
//! repeated upload failures into harsher recovery affordances, and gates
//! the final time-boxed check-in submission.
//!
//! Everything here is UI-agnostic. The wizard publishes its active step
//! through a `watch` channel and surfaces recovery affordances through a
//! `broadcast` event channel; rendering belongs to the host.

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod poller;
pub mod steps;
pub mod store;
pub mod submit;
pub mod upload;
pub mod validators;
pub mod wizard;

pub use config::{PollConfig, WizardConfig};
pub use error::{CaptureError, CoreError, RecoveryAction};
pub use model::*;
pub use poller::DocumentValidationPoller;
pub use steps::{StepRefusal, StepStateMachine};
pub use store::IdentityDocumentStore;
pub use submit::{CheckinSubmitter, SubmitError};
pub use upload::UploadCoordinator;
pub use validators::{EmailField, EmailValidity, arrival_info_valid, personal_info_valid};
pub use wizard::{CheckinWizard, StoredIdentity, WizardEvent};
