// ── Runtime wizard configuration ──
//
// These types describe *how* the orchestrator runs: poll tuning and the
// email debounce window. The host app constructs a `WizardConfig` and
// hands it in -- core never reads config files.

use std::time::Duration;

/// Tuning for the document validation poll loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Status checks before the job resolves as timed out.
    pub max_attempts: u32,
    /// Delay before the first re-check.
    pub base_delay: Duration,
    /// Added per attempt: attempt N waits `base_delay + increment * N`.
    pub increment: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay: Duration::from_secs(1),
            increment: Duration::from_millis(500),
        }
    }
}

impl PollConfig {
    /// Backoff for the given (1-indexed) attempt number.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay + self.increment * attempt
    }
}

/// Configuration for one check-in wizard instance.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Validation poll tuning.
    pub poll: PollConfig,
    /// Quiet period before a freshly entered email is format-checked.
    pub email_debounce: Duration,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            poll: PollConfig::default(),
            email_debounce: Duration::from_millis(800),
        }
    }
}
