// ── Check-in wizard ──
//
// Top-level controller for one run of the check-in flow, from
// initialization to `Done` or abandonment. Owns the step machine,
// the document store, the upload coordinator, and the submitter, and
// exposes a UI-agnostic surface: a `watch` channel for the active step
// and a `broadcast` channel for recovery affordances and side-effect
// requests.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use stayflow_api::CheckinClient;
use stayflow_api::types::ProfilePatch;

use crate::config::WizardConfig;
use crate::convert::document_requirements;
use crate::error::{CoreError, RecoveryAction};
use crate::model::{
    ArrivalSchedule, CaptureMode, CaptureSlot, CaptureSource, CheckinRecord, CheckinRequest,
    DocumentRequirements, DocumentSide, PersonalInfo, Reservation, Step,
};
use crate::steps::{StepRefusal, StepStateMachine};
use crate::store::IdentityDocumentStore;
use crate::submit::{CheckinSubmitter, SubmitError};
use crate::upload::UploadCoordinator;
use crate::validators::{EmailField, EmailValidity, arrival_info_valid, personal_info_valid};

const EVENT_CHANNEL_SIZE: usize = 64;

// ── Events ───────────────────────────────────────────────────────────

/// Events the host app reacts to.
#[derive(Debug, Clone)]
pub enum WizardEvent {
    /// The active step changed.
    StepChanged(Step),
    /// The wizard wants a photo for this side from the external
    /// capture collaborator.
    CaptureRequested { side: DocumentSide },
    /// A failure resolved to this recovery affordance.
    RecoveryRequested(RecoveryAction),
    /// Asset state changed; the external identity-profile collaborator
    /// should refetch.
    ProfileRefreshRequested,
    /// The check-in was created; the wizard is `Done`.
    CheckinCompleted { record: CheckinRecord },
}

/// Identity data the external profile collaborator already holds when
/// the wizard starts.
#[derive(Debug, Clone, Default)]
pub struct StoredIdentity {
    pub profile: PersonalInfo,
    /// The front document passed validation in an earlier session.
    pub front_document_validated: bool,
}

// ── Wizard ───────────────────────────────────────────────────────────

/// One run of the check-in flow for a single reservation.
///
/// Cheaply cloneable via `Arc<WizardInner>`; a fresh instance gets
/// fresh per-session state (failure counters included).
#[derive(Clone)]
pub struct CheckinWizard {
    inner: Arc<WizardInner>,
}

struct WizardInner {
    config: WizardConfig,
    client: Arc<CheckinClient>,
    store: Arc<IdentityDocumentStore>,
    steps: StepStateMachine,
    coordinator: UploadCoordinator,
    submitter: CheckinSubmitter,
    event_tx: broadcast::Sender<WizardEvent>,
    state: Mutex<WizardState>,
}

#[derive(Default)]
struct WizardState {
    reservation: Option<Reservation>,
    requirements: Option<DocumentRequirements>,
    personal: PersonalInfo,
    /// Snapshot of the external profile at start; PATCHes send only
    /// fields that differ from this.
    profile_snapshot: PersonalInfo,
    known_email: Option<String>,
    email: EmailField,
    /// Bumped on every email edit; the debounce task only acts if its
    /// epoch is still current.
    email_epoch: u64,
    /// Last address pushed to the backend, to avoid duplicate POSTs.
    email_synced: Option<String>,
    arrival: Option<ArrivalSchedule>,
    record: Option<CheckinRecord>,
}

impl CheckinWizard {
    pub fn new(client: Arc<CheckinClient>, config: WizardConfig) -> Self {
        let store = Arc::new(IdentityDocumentStore::new());
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        let coordinator = UploadCoordinator::new(
            Arc::clone(&client),
            Arc::clone(&store),
            config.poll.clone(),
            event_tx.clone(),
        );
        let submitter = CheckinSubmitter::new(Arc::clone(&client));

        Self {
            inner: Arc::new(WizardInner {
                config,
                client,
                store,
                steps: StepStateMachine::new(),
                coordinator,
                submitter,
                event_tx,
                state: Mutex::new(WizardState::default()),
            }),
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn step(&self) -> Step {
        self.inner.steps.current()
    }

    /// Subscribe to step changes.
    pub fn subscribe_step(&self) -> watch::Receiver<Step> {
        self.inner.steps.subscribe()
    }

    /// Subscribe to wizard events.
    pub fn events(&self) -> broadcast::Receiver<WizardEvent> {
        self.inner.event_tx.subscribe()
    }

    /// The per-session document store (read-only from the host's side).
    pub fn store(&self) -> &Arc<IdentityDocumentStore> {
        &self.inner.store
    }

    pub fn reservation(&self) -> Option<Reservation> {
        self.lock_state(|state| state.reservation.clone())
    }

    pub fn personal_info(&self) -> PersonalInfo {
        self.lock_state(|state| state.personal.clone())
    }

    pub fn arrival_schedule(&self) -> Option<ArrivalSchedule> {
        self.lock_state(|state| state.arrival.clone())
    }

    pub fn record(&self) -> Option<CheckinRecord> {
        self.lock_state(|state| state.record.clone())
    }

    /// Validity of the freshly entered email, as of now.
    pub fn email_validity(&self) -> EmailValidity {
        let quiet = self.inner.config.email_debounce;
        self.lock_state(|state| state.email.validity(quiet))
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Resolve the reservation and document-type catalog, seed the
    /// session state, and run the one-shot step initialization.
    pub async fn start(
        &self,
        booking_code: &str,
        identity: StoredIdentity,
    ) -> Result<Reservation, CoreError> {
        let reservation: Reservation = self
            .inner
            .client
            .get_reservation(booking_code)
            .await?
            .ok_or_else(|| CoreError::ReservationNotFound {
                code: booking_code.to_owned(),
            })?
            .into();

        let catalog = self.inner.client.document_type_catalog().await?;
        let requirements = document_requirements(catalog)?;

        info!(
            booking_code,
            requires_back = requirements.requires_back(),
            "check-in wizard started"
        );

        if identity.front_document_validated {
            self.inner.store.mark_front_validated();
        }

        let personal_valid = {
            let mut state = self.state();
            state.known_email = identity
                .profile
                .email
                .clone()
                .filter(|e| !e.is_empty())
                .or_else(|| reservation.guest_email.clone());
            state.personal = identity.profile.clone();
            state.profile_snapshot = identity.profile;
            state.arrival = Some(ArrivalSchedule::with_defaults(reservation.checkin_date));
            state.requirements = Some(requirements);
            state.reservation = Some(reservation.clone());

            personal_info_valid(
                &state.personal,
                state.known_email.as_deref(),
                EmailValidity::Unknown,
            )
        };

        self.inner
            .steps
            .initialize(identity.front_document_validated, personal_valid);
        self.emit_step();

        Ok(reservation)
    }

    // ── Personal info ────────────────────────────────────────────────

    /// Replace the personal-info fields.
    ///
    /// An email change restarts the debounce window and schedules the
    /// format check + backend sync for when the input settles.
    pub fn update_personal_info(&self, info: PersonalInfo) -> Result<(), CoreError> {
        self.guard_mutable()?;

        let email_epoch = {
            let mut state = self.state();
            let edited = info.email != state.personal.email;
            if edited {
                state.email.edit(info.email.clone().unwrap_or_default());
                state.email_epoch += 1;
            }
            state.personal = info;
            edited.then_some(state.email_epoch)
        };

        if let Some(epoch) = email_epoch {
            self.spawn_email_sync(epoch);
        }
        Ok(())
    }

    /// After the quiet period, settle the email: if it is valid and
    /// differs from the known address, push it to the backend.
    fn spawn_email_sync(&self, epoch: u64) {
        let wizard = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(wizard.inner.config.email_debounce).await;

            let address = wizard.lock_state(|state| {
                if state.email_epoch != epoch {
                    // Superseded by a later edit.
                    return None;
                }
                if state.email.validity(wizard.inner.config.email_debounce)
                    != EmailValidity::Valid
                {
                    return None;
                }
                let address = state.email.value().to_owned();
                if state.known_email.as_deref() == Some(address.as_str())
                    || state.email_synced.as_deref() == Some(address.as_str())
                {
                    return None;
                }
                state.email_synced = Some(address.clone());
                Some(address)
            });

            if let Some(address) = address {
                debug!("syncing validated email to profile");
                if let Err(e) = wizard.inner.client.update_email(&address).await {
                    warn!(error = %e, "email sync failed");
                }
            }
        });
    }

    // ── Document capture ─────────────────────────────────────────────

    /// Hand a freshly captured file to the pipeline.
    ///
    /// Stores the slot (overwriting any prior capture for the side),
    /// uploads it, and for the front side awaits the validation job.
    /// On success the step machine branches: flip to the back side when
    /// the document type requires one, otherwise on to
    /// `ArrivalSchedule`. Failures broadcast their recovery affordance
    /// before returning.
    pub async fn capture_document(
        &self,
        side: DocumentSide,
        file_path: PathBuf,
        source: CaptureSource,
    ) -> Result<Step, CoreError> {
        self.guard_mutable()?;

        let requirements = self.requirements()?;
        let type_id = requirements
            .type_id_for(side)
            .ok_or_else(|| CoreError::SetupIncomplete {
                message: format!("document type has no {side} side"),
            })?
            .to_owned();

        let slot = CaptureSlot { file_path, source };
        self.inner.store.set_slot(side, slot.clone());

        if let Err(e) = self
            .inner
            .coordinator
            .submit_capture(side, &slot, &type_id)
            .await
        {
            self.emit(WizardEvent::RecoveryRequested(e.recovery()));
            return Err(e.into());
        }

        // Stale-result tolerance: the pipeline settled, but only act on
        // it if the guest is still on this side's capture step.
        let on_capture_step = matches!(
            self.inner.steps.current(),
            Step::DocumentCapture { side: active, .. } if active == side
        );
        if !on_capture_step {
            debug!(%side, "capture settled after step change, not advancing");
            return Ok(self.inner.steps.current());
        }

        let next = match side {
            DocumentSide::Front => {
                let back_present = self.inner.store.has_slot(DocumentSide::Back);
                let next = self
                    .inner
                    .steps
                    .front_validated(requirements.requires_back(), back_present)?;
                if let Step::DocumentCapture {
                    side: DocumentSide::Back,
                    mode: CaptureMode::Capture,
                } = next
                {
                    self.emit(WizardEvent::CaptureRequested {
                        side: DocumentSide::Back,
                    });
                }
                next
            }
            DocumentSide::Back => self.inner.steps.advance_from_capture(
                self.inner.store.front_validated(),
                requirements.requires_back(),
                true,
            )?,
        };

        self.emit_step();
        Ok(next)
    }

    /// Re-enter capture for a side ("retake"/"reupload"): the existing
    /// slot is discarded immediately, not kept as a fallback, and a new
    /// capture is requested from the external collaborator.
    pub fn recapture(&self, side: DocumentSide) -> Result<Step, CoreError> {
        self.inner.store.clear_slot(side);
        let step = self.inner.steps.request_capture(side)?;
        self.emit(WizardEvent::CaptureRequested { side });
        self.emit_step();
        Ok(step)
    }

    /// Revisit an already-validated capture before continuing.
    pub fn review_document(&self, side: DocumentSide) -> Result<Step, CoreError> {
        let step = self.inner.steps.enter_preview(side)?;
        self.emit_step();
        Ok(step)
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Advance past the current step, consulting the gates.
    pub fn advance(&self) -> Result<Step, CoreError> {
        match self.inner.steps.current() {
            Step::PersonalInfo => self.advance_from_personal(),
            Step::DocumentCapture { .. } => {
                let requirements = self.requirements()?;
                let next = self.inner.steps.advance_from_capture(
                    self.inner.store.front_validated(),
                    requirements.requires_back(),
                    self.inner.store.has_slot(DocumentSide::Back),
                )?;
                self.emit_step();
                Ok(next)
            }
            Step::ArrivalSchedule => Err(StepRefusal::WrongStep.into()),
            Step::Done => Err(CoreError::WizardComplete),
        }
    }

    fn advance_from_personal(&self) -> Result<Step, CoreError> {
        let quiet = self.inner.config.email_debounce;
        let (valid, patch) = self.lock_state(|state| {
            let valid = personal_info_valid(
                &state.personal,
                state.known_email.as_deref(),
                state.email.validity(quiet),
            );
            let patch = valid.then(|| {
                let patch = profile_patch(&state.personal, &state.profile_snapshot);
                state.profile_snapshot = state.personal.clone();
                patch
            });
            (valid, patch)
        });

        let next = self
            .inner
            .steps
            .advance_from_personal(valid, self.inner.store.front_validated())?;

        // Fire-and-forget: push materially changed fields back to the
        // external profile store.
        if let Some(patch) = patch.filter(|p| !p.is_empty()) {
            let client = Arc::clone(&self.inner.client);
            tokio::spawn(async move {
                if let Err(e) = client.patch_profile(&patch).await {
                    warn!(error = %e, "profile patch failed");
                }
            });
        }

        if let Step::DocumentCapture { side, .. } = next {
            self.emit(WizardEvent::CaptureRequested { side });
        }
        self.emit_step();
        Ok(next)
    }

    /// Backward navigation. `None` means the wizard is exited entirely.
    pub fn back(&self) -> Option<Step> {
        let retreated = self.inner.steps.back();
        if retreated.is_some() {
            self.emit_step();
        }
        retreated
    }

    // ── Arrival & submission ─────────────────────────────────────────

    pub fn set_arrival_schedule(&self, schedule: ArrivalSchedule) -> Result<(), CoreError> {
        self.guard_mutable()?;
        self.lock_state(|state| {
            if state.reservation.is_none() {
                return Err(CoreError::NotStarted);
            }
            state.arrival = Some(schedule);
            Ok(())
        })
    }

    /// Assemble the immutable payload and perform the one-shot
    /// submission. On success the wizard reaches `Done` and releases
    /// its mutable surface; on failure the step stays `ArrivalSchedule`
    /// and the same payload may be resubmitted.
    pub async fn submit(&self) -> Result<CheckinRecord, SubmitError> {
        if self.inner.steps.current() != Step::ArrivalSchedule {
            return Err(SubmitError::NotReady);
        }

        let quiet = self.inner.config.email_debounce;
        let request = self.lock_state(|state| {
            let (Some(reservation), Some(arrival)) = (&state.reservation, &state.arrival) else {
                return Err(SubmitError::NotReady);
            };
            if !arrival_info_valid(arrival) {
                return Err(SubmitError::Incomplete);
            }
            let email = if state.email.is_entered()
                && state.email.validity(quiet) == EmailValidity::Valid
            {
                state.email.value().to_owned()
            } else {
                state.known_email.clone().ok_or(SubmitError::Incomplete)?
            };
            Ok(CheckinRequest {
                booking_code: reservation.booking_code.clone(),
                arrival_time: arrival.arrival_time,
                coming_from: arrival.coming_from.clone(),
                next_destination: arrival.next_destination.clone(),
                checkin_date: reservation.checkin_date,
                checkout_date: reservation.checkout_date,
                email,
            })
        })?;

        match self.inner.submitter.submit(&request).await {
            Ok(record) => {
                let _ = self.inner.steps.complete();
                self.lock_state(|state| state.record = Some(record.clone()));
                self.emit(WizardEvent::CheckinCompleted {
                    record: record.clone(),
                });
                self.emit_step();
                info!(booking_code = %record.booking_code, "check-in complete");
                Ok(record)
            }
            Err(SubmitError::InFlight) => Err(SubmitError::InFlight),
            Err(e) => {
                self.emit(WizardEvent::RecoveryRequested(RecoveryAction::Resubmit));
                Err(e)
            }
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    fn state(&self) -> std::sync::MutexGuard<'_, WizardState> {
        self.inner.state.lock().expect("wizard state lock poisoned")
    }

    fn lock_state<R>(&self, f: impl FnOnce(&mut WizardState) -> R) -> R {
        f(&mut self.state())
    }

    fn requirements(&self) -> Result<DocumentRequirements, CoreError> {
        self.lock_state(|state| state.requirements.clone().ok_or(CoreError::NotStarted))
    }

    /// `Done` is terminal: refuse mutation of any wizard state.
    fn guard_mutable(&self) -> Result<(), CoreError> {
        if self.inner.steps.current().is_terminal() {
            return Err(CoreError::WizardComplete);
        }
        Ok(())
    }

    fn emit(&self, event: WizardEvent) {
        let _ = self.inner.event_tx.send(event);
    }

    fn emit_step(&self) {
        let _ = self
            .inner
            .event_tx
            .send(WizardEvent::StepChanged(self.inner.steps.current()));
    }
}

/// Diff the edited personal info against the profile snapshot,
/// producing a patch with only the changed fields.
fn profile_patch(current: &PersonalInfo, snapshot: &PersonalInfo) -> ProfilePatch {
    let changed = |a: &Option<String>, b: &Option<String>| (a != b).then(|| a.clone()).flatten();
    ProfilePatch {
        first_name: changed(&current.first_name, &snapshot.first_name),
        last_name: changed(&current.last_name, &snapshot.last_name),
        gender: (current.gender != snapshot.gender)
            .then(|| current.gender.map(|g| g.to_string()))
            .flatten(),
        birth_date: (current.birth_date != snapshot.birth_date)
            .then_some(current.birth_date)
            .flatten(),
        address: changed(&current.address, &snapshot.address),
        country: changed(&current.country, &snapshot.country),
    }
}
