// ── Step state machine ──
//
// Owns the wizard's current step and the rules for advancing,
// retreating, and branching between single- and double-sided document
// flows. Gate inputs (validator results, store state) are passed in as
// snapshots; the machine itself never performs I/O. The active step is
// published through a `watch` channel.

use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

use crate::model::{CaptureMode, DocumentSide, Step};

/// Why a transition was refused. None of these are fatal: the wizard
/// stays on its current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepRefusal {
    /// A required personal field is empty, or the email is neither
    /// pre-known nor debounce-validated.
    #[error("personal information incomplete")]
    PersonalInfoIncomplete,

    /// The front side's validation job has not resolved to Validated.
    #[error("front document not validated")]
    FrontNotValidated,

    /// The document type requires a back capture and none is present.
    #[error("back capture missing")]
    BackCaptureMissing,

    /// The requested transition does not apply to the current step.
    #[error("transition not applicable to the current step")]
    WrongStep,

    /// `Done` is terminal.
    #[error("check-in already complete")]
    WizardComplete,
}

pub struct StepStateMachine {
    step: watch::Sender<Step>,
    /// Initialization runs exactly once per wizard instance, so it
    /// cannot fight user navigation after data arrives asynchronously.
    initialized: AtomicBool,
}

impl Default for StepStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StepStateMachine {
    pub fn new() -> Self {
        let (step, _) = watch::channel(Step::PersonalInfo);
        Self {
            step,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn current(&self) -> Step {
        *self.step.borrow()
    }

    /// Subscribe to step changes.
    pub fn subscribe(&self) -> watch::Receiver<Step> {
        self.step.subscribe()
    }

    fn set(&self, next: Step) -> Step {
        debug!(?next, "step transition");
        // send_replace: the step must update even with no subscribers.
        self.step.send_replace(next);
        next
    }

    fn guard_terminal(&self) -> Result<Step, StepRefusal> {
        let current = self.current();
        if current.is_terminal() {
            return Err(StepRefusal::WizardComplete);
        }
        Ok(current)
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// One-shot initialization from previously stored identity.
    ///
    /// If the front document is already validated and the stored
    /// personal fields are already valid, the wizard starts at
    /// `ArrivalSchedule`. Subsequent calls are ignored.
    pub fn initialize(&self, front_validated: bool, personal_valid: bool) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return;
        }
        if front_validated && personal_valid {
            self.set(Step::ArrivalSchedule);
        }
    }

    /// `PersonalInfo → DocumentCapture` (or straight to
    /// `ArrivalSchedule` when the front is already validated).
    pub fn advance_from_personal(
        &self,
        personal_valid: bool,
        front_validated: bool,
    ) -> Result<Step, StepRefusal> {
        match self.guard_terminal()? {
            Step::PersonalInfo => {}
            _ => return Err(StepRefusal::WrongStep),
        }
        if !personal_valid {
            return Err(StepRefusal::PersonalInfoIncomplete);
        }
        let next = if front_validated {
            Step::ArrivalSchedule
        } else {
            Step::DocumentCapture {
                side: DocumentSide::Front,
                mode: CaptureMode::Capture,
            }
        };
        Ok(self.set(next))
    }

    /// Branch taken when the front side's validation job resolves.
    ///
    /// Flips the active side to `back` when the document type requires
    /// one and no back capture exists yet; otherwise moves on to
    /// `ArrivalSchedule`.
    pub fn front_validated(
        &self,
        requires_back: bool,
        back_present: bool,
    ) -> Result<Step, StepRefusal> {
        self.guard_terminal()?;
        let next = if requires_back && !back_present {
            Step::DocumentCapture {
                side: DocumentSide::Back,
                mode: CaptureMode::Capture,
            }
        } else {
            Step::ArrivalSchedule
        };
        Ok(self.set(next))
    }

    /// `DocumentCapture → ArrivalSchedule`, gated on the ordering
    /// invariant: front terminal-validated, and a back capture present
    /// whenever one is required.
    pub fn advance_from_capture(
        &self,
        front_validated: bool,
        requires_back: bool,
        back_present: bool,
    ) -> Result<Step, StepRefusal> {
        match self.guard_terminal()? {
            Step::DocumentCapture { .. } => {}
            _ => return Err(StepRefusal::WrongStep),
        }
        if !front_validated {
            return Err(StepRefusal::FrontNotValidated);
        }
        if requires_back && !back_present {
            return Err(StepRefusal::BackCaptureMissing);
        }
        Ok(self.set(Step::ArrivalSchedule))
    }

    /// Revisit an already-validated side for a look (rendering hint,
    /// not a separate top-level step). Only reachable from
    /// `ArrivalSchedule`.
    pub fn enter_preview(&self, side: DocumentSide) -> Result<Step, StepRefusal> {
        match self.guard_terminal()? {
            Step::ArrivalSchedule => {}
            _ => return Err(StepRefusal::WrongStep),
        }
        Ok(self.set(Step::DocumentCapture {
            side,
            mode: CaptureMode::Preview,
        }))
    }

    /// Re-enter capture for a side via "retake"/"reupload".
    pub fn request_capture(&self, side: DocumentSide) -> Result<Step, StepRefusal> {
        self.guard_terminal()?;
        Ok(self.set(Step::DocumentCapture {
            side,
            mode: CaptureMode::Capture,
        }))
    }

    /// Backward navigation. Returns the step retreated to, or `None`
    /// when back exits the wizard entirely (there is no earlier step to
    /// return to from `PersonalInfo`).
    pub fn back(&self) -> Option<Step> {
        match self.current() {
            Step::DocumentCapture {
                mode: CaptureMode::Preview,
                ..
            } => Some(self.set(Step::ArrivalSchedule)),
            _ => None,
        }
    }

    /// `ArrivalSchedule → Done`. Triggered only by a successful
    /// submission.
    pub fn complete(&self) -> Result<Step, StepRefusal> {
        match self.guard_terminal()? {
            Step::ArrivalSchedule => {}
            _ => return Err(StepRefusal::WrongStep),
        }
        Ok(self.set(Step::Done))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_step_is_personal_info() {
        let machine = StepStateMachine::new();
        assert_eq!(machine.current(), Step::PersonalInfo);
    }

    #[test]
    fn transitions_apply_with_no_subscribers() {
        // The machine is authoritative: a host that never subscribes to
        // the watch channel still sees transitions via current().
        let machine = StepStateMachine::new();
        machine.advance_from_personal(true, true).unwrap();
        assert_eq!(machine.current(), Step::ArrivalSchedule);
        machine.complete().unwrap();
        assert_eq!(machine.current(), Step::Done);
    }

    #[test]
    fn initialization_skips_to_arrival_when_identity_known() {
        let machine = StepStateMachine::new();
        machine.initialize(true, true);
        assert_eq!(machine.current(), Step::ArrivalSchedule);
    }

    #[test]
    fn initialization_is_one_shot() {
        let machine = StepStateMachine::new();
        machine.initialize(false, false);
        // Later data arrival must not fight user navigation.
        machine.initialize(true, true);
        assert_eq!(machine.current(), Step::PersonalInfo);
    }

    #[test]
    fn personal_gate_refused_when_invalid() {
        let machine = StepStateMachine::new();
        let err = machine.advance_from_personal(false, false).unwrap_err();
        assert_eq!(err, StepRefusal::PersonalInfoIncomplete);
        assert_eq!(machine.current(), Step::PersonalInfo);
    }

    #[test]
    fn personal_advances_to_capture_or_skips() {
        let machine = StepStateMachine::new();
        let next = machine.advance_from_personal(true, false).unwrap();
        assert_eq!(
            next,
            Step::DocumentCapture {
                side: DocumentSide::Front,
                mode: CaptureMode::Capture
            }
        );

        let machine = StepStateMachine::new();
        let next = machine.advance_from_personal(true, true).unwrap();
        assert_eq!(next, Step::ArrivalSchedule);
    }

    #[test]
    fn front_validation_flips_to_back_when_required() {
        let machine = StepStateMachine::new();
        machine.advance_from_personal(true, false).unwrap();

        let next = machine.front_validated(true, false).unwrap();
        assert_eq!(
            next,
            Step::DocumentCapture {
                side: DocumentSide::Back,
                mode: CaptureMode::Capture
            }
        );

        let machine = StepStateMachine::new();
        machine.advance_from_personal(true, false).unwrap();
        let next = machine.front_validated(false, false).unwrap();
        assert_eq!(next, Step::ArrivalSchedule);
    }

    #[test]
    fn capture_advance_enforces_ordering_invariant() {
        let machine = StepStateMachine::new();
        machine.advance_from_personal(true, false).unwrap();

        assert_eq!(
            machine.advance_from_capture(false, true, true).unwrap_err(),
            StepRefusal::FrontNotValidated
        );
        assert_eq!(
            machine.advance_from_capture(true, true, false).unwrap_err(),
            StepRefusal::BackCaptureMissing
        );
        assert_eq!(
            machine.advance_from_capture(true, true, true).unwrap(),
            Step::ArrivalSchedule
        );
    }

    #[test]
    fn preview_back_returns_to_arrival() {
        let machine = StepStateMachine::new();
        machine.initialize(true, true);
        machine.enter_preview(DocumentSide::Front).unwrap();

        assert_eq!(machine.back(), Some(Step::ArrivalSchedule));
    }

    #[test]
    fn back_exits_from_personal_info() {
        let machine = StepStateMachine::new();
        assert_eq!(machine.back(), None);
    }

    #[test]
    fn done_is_terminal() {
        let machine = StepStateMachine::new();
        machine.initialize(true, true);
        machine.complete().unwrap();

        assert_eq!(
            machine.request_capture(DocumentSide::Front).unwrap_err(),
            StepRefusal::WizardComplete
        );
        assert_eq!(
            machine.advance_from_personal(true, true).unwrap_err(),
            StepRefusal::WizardComplete
        );
        assert_eq!(machine.back(), None);
        assert_eq!(machine.current(), Step::Done);
    }
}
