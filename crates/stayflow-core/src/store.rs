// ── Identity document store ──
//
// Single owner of the two capture slots, the per-side upload flags and
// failure counters, and the front side's validation job snapshot.
// Only the UploadCoordinator mutates it; everything else reads.
// Mutations are broadcast to subscribers via a `watch` channel.

use std::sync::Mutex;

use tokio::sync::watch;

use crate::model::{CaptureSlot, DocumentSide, ValidationJob, ValidationStatus};

#[derive(Debug, Default)]
struct Inner {
    slots: [Option<CaptureSlot>; 2],
    uploading: [bool; 2],
    /// Monotonic for the lifetime of the wizard instance; a new
    /// instance gets a fresh store.
    failure_count: [u32; 2],
    /// At most one validation job per wizard instance; the back side
    /// never has one.
    front_job: Option<ValidationJob>,
    front_validated: bool,
}

/// Per-session capture/upload/validation state.
pub struct IdentityDocumentStore {
    inner: Mutex<Inner>,
    changed: watch::Sender<()>,
}

impl Default for IdentityDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityDocumentStore {
    pub fn new() -> Self {
        let (changed, _) = watch::channel(());
        Self {
            inner: Mutex::new(Inner::default()),
            changed,
        }
    }

    /// Subscribe to change notifications (for UI re-render).
    pub fn subscribe(&self) -> watch::Receiver<()> {
        self.changed.subscribe()
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let result = f(&mut self.inner.lock().expect("store lock poisoned"));
        self.changed.send_replace(());
        result
    }

    fn read<R>(&self, f: impl FnOnce(&Inner) -> R) -> R {
        f(&self.inner.lock().expect("store lock poisoned"))
    }

    // ── Capture slots ────────────────────────────────────────────────

    /// Record a fresh capture for a side, overwriting any prior slot.
    pub fn set_slot(&self, side: DocumentSide, slot: CaptureSlot) {
        self.mutate(|inner| inner.slots[side.index()] = Some(slot));
    }

    /// Discard a side's capture (retake/reupload re-entry -- the old
    /// file is not kept as a fallback).
    pub fn clear_slot(&self, side: DocumentSide) {
        self.mutate(|inner| {
            inner.slots[side.index()] = None;
            if side == DocumentSide::Front {
                inner.front_job = None;
                inner.front_validated = false;
            }
        });
    }

    pub fn slot(&self, side: DocumentSide) -> Option<CaptureSlot> {
        self.read(|inner| inner.slots[side.index()].clone())
    }

    pub fn has_slot(&self, side: DocumentSide) -> bool {
        self.read(|inner| inner.slots[side.index()].is_some())
    }

    // ── Upload state ─────────────────────────────────────────────────

    pub fn set_uploading(&self, side: DocumentSide, uploading: bool) {
        self.mutate(|inner| inner.uploading[side.index()] = uploading);
    }

    pub fn is_uploading(&self, side: DocumentSide) -> bool {
        self.read(|inner| inner.uploading[side.index()])
    }

    /// Increment a side's failure counter, returning the new count.
    /// Counters never decrease within a session.
    pub fn record_failure(&self, side: DocumentSide) -> u32 {
        self.mutate(|inner| {
            inner.failure_count[side.index()] += 1;
            inner.failure_count[side.index()]
        })
    }

    pub fn failure_count(&self, side: DocumentSide) -> u32 {
        self.read(|inner| inner.failure_count[side.index()])
    }

    // ── Front validation job ─────────────────────────────────────────

    /// Start tracking a fresh validation job for the front capture.
    /// Replaces any previous job (a recapture restarts from attempt 0).
    pub fn begin_front_job(&self, job_key: String, max_attempts: u32) {
        self.mutate(|inner| {
            inner.front_validated = false;
            inner.front_job = Some(ValidationJob::new(job_key, max_attempts));
        });
    }

    /// Record a poll round for the current job. Ignored if `job_key`
    /// is no longer the current job (stale-result tolerance).
    pub fn update_front_job(&self, job_key: &str, attempts_made: u32, status: ValidationStatus) {
        self.mutate(|inner| {
            if let Some(job) = inner.front_job.as_mut() {
                if job.job_key == job_key {
                    job.attempts_made = attempts_made;
                    job.status = status;
                    if status == ValidationStatus::Validated {
                        inner.front_validated = true;
                    }
                }
            }
        });
    }

    pub fn front_job(&self) -> Option<ValidationJob> {
        self.read(|inner| inner.front_job.clone())
    }

    /// Seed the store from externally stored identity: the profile
    /// collaborator says the front document was validated in a prior
    /// session.
    pub fn mark_front_validated(&self) {
        self.mutate(|inner| inner.front_validated = true);
    }

    pub fn front_validated(&self) -> bool {
        self.read(|inner| inner.front_validated)
    }
}
