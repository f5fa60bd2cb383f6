//! PIN service - setup, confirmation and verification flows
//!
//! ```text
//! Setup --submit--> Confirm --match--> (stored, Enter)
//!                      |--mismatch--> Confirm (n left) | Setup (exhausted)
//! Enter --correct--> Setup (validated)
//!   |--wrong--> Enter (n left) | Locked (exhausted, logged out)
//! ```
//!
//! Every in-memory PIN is wiped as soon as it has been compared, whatever
//! the outcome. Both lockout paths share one [`AttemptCounter`]; only the
//! [`LockoutPolicy`] differs.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::config::Config;
use crate::domain::pin::{
    validate_pin_format, AttemptCounter, AttemptOutcome, Exhaustion, LockoutPolicy, PinFields,
    PinPhase,
};
use crate::domain::result::{Error, Result};
use crate::ports::{Navigator, PinStore, Screen, SessionService};
use crate::services::logging::{LogEvent, LoggingService, PinEvent};

/// Screen PIN events are attributed to
const SCREEN: &str = Screen::Security.as_str();

/// Successful result of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PinOutcome {
    /// New PIN accepted, waiting for it to be typed again
    AwaitingConfirmation,
    /// New PIN stored
    Updated,
    /// Existing PIN verified; a new one may now be chosen
    Validated,
}

/// Serializable view of the controller for the UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PinStatus {
    pub phase: PinPhase,
    pub retry_count: u32,
    pub remaining_attempts: u32,
    pub pin_validated: bool,
    pub pin_length: usize,
}

/// External collaborators the PIN flows call into
#[derive(Clone)]
pub struct PinPorts {
    pub store: Arc<dyn PinStore>,
    pub session: Arc<dyn SessionService>,
    pub navigator: Arc<dyn Navigator>,
}

/// State machine for one PIN change/verify flow
///
/// Owned by a single caller; each `submit` must complete before the next.
/// Use [`PinService`] when the controller is shared between tasks.
pub struct PinController {
    ports: PinPorts,
    logger: Option<Arc<LoggingService>>,
    phase: PinPhase,
    initial_phase: PinPhase,
    fields: PinFields,
    attempts: AttemptCounter,
    pin_validated: bool,
    pin_length: usize,
    confirmation_policy: LockoutPolicy,
    verification_policy: LockoutPolicy,
}

impl PinController {
    /// Start a flow: `Enter` when a PIN is already stored, otherwise `Setup`
    pub async fn start(ports: PinPorts, config: &Config) -> Result<Self> {
        let initial_phase = if ports.store.has().await? {
            PinPhase::Enter
        } else {
            PinPhase::Setup
        };
        debug!(phase = %initial_phase, "PIN flow started");

        Ok(Self {
            ports,
            logger: None,
            phase: initial_phase,
            initial_phase,
            fields: PinFields::default(),
            attempts: AttemptCounter::new(),
            pin_validated: false,
            pin_length: config.pin_length,
            confirmation_policy: LockoutPolicy::confirmation(config.max_pin_attempts),
            verification_policy: LockoutPolicy::verification(config.max_pin_attempts),
        })
    }

    /// Record flow events to the event log
    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn phase(&self) -> PinPhase {
        self.phase
    }

    pub fn retry_count(&self) -> u32 {
        self.attempts.count()
    }

    pub fn pin_validated(&self) -> bool {
        self.pin_validated
    }

    /// True while any PIN is held in memory
    pub fn has_pending_input(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Attempts left in the current phase
    ///
    /// `Setup` reports the full allowance of the confirmation that follows.
    pub fn remaining_attempts(&self) -> u32 {
        match self.phase {
            PinPhase::Setup => self.confirmation_policy.max_attempts,
            PinPhase::Confirm => self
                .confirmation_policy
                .max_attempts
                .saturating_sub(self.attempts.count()),
            PinPhase::Enter => self
                .verification_policy
                .max_attempts
                .saturating_sub(self.attempts.count()),
            PinPhase::Locked => 0,
        }
    }

    pub fn status(&self) -> PinStatus {
        PinStatus {
            phase: self.phase,
            retry_count: self.retry_count(),
            remaining_attempts: self.remaining_attempts(),
            pin_validated: self.pin_validated,
            pin_length: self.pin_length,
        }
    }

    /// Submit the PIN typed for the current phase
    ///
    /// A malformed PIN is rejected without consuming an attempt.
    pub async fn submit(&mut self, pin: &str) -> Result<PinOutcome> {
        if self.phase == PinPhase::Locked {
            return Err(Error::SessionEnded);
        }
        validate_pin_format(pin, self.pin_length)?;

        match self.phase {
            PinPhase::Setup => Ok(self.submit_new(pin)),
            PinPhase::Confirm => self.submit_confirmation(pin).await,
            PinPhase::Enter => self.submit_current(pin).await,
            PinPhase::Locked => Err(Error::SessionEnded),
        }
    }

    /// Abandon the flow and start over from the initial phase
    ///
    /// Does nothing once the session has been locked.
    pub fn reset(&mut self) {
        if self.phase == PinPhase::Locked {
            return;
        }
        self.fields.wipe();
        self.attempts.reset();
        self.phase = self.initial_phase;
        debug!(phase = %self.phase, "PIN flow reset");
    }

    fn submit_new(&mut self, pin: &str) -> PinOutcome {
        self.fields.wipe();
        self.fields.new_pin.push_str(pin);
        self.attempts.reset();
        self.phase = PinPhase::Confirm;
        debug!("new PIN chosen, awaiting confirmation");
        PinOutcome::AwaitingConfirmation
    }

    async fn submit_confirmation(&mut self, pin: &str) -> Result<PinOutcome> {
        self.fields.confirmation_pin.push_str(pin);
        let matches = self.fields.confirmation_pin == self.fields.new_pin;
        self.fields.confirmation_pin.zeroize();

        if !matches {
            self.log(LogEvent::pin(PinEvent::ConfirmationMismatch, SCREEN));
            return match self.attempts.record_failure(&self.confirmation_policy) {
                AttemptOutcome::Remaining(remaining) => {
                    Err(Error::ConfirmationMismatch { remaining })
                }
                AttemptOutcome::Exhausted(action) => self.exhaust(action).await,
            };
        }

        let stored = self.ports.store.set(&self.fields.new_pin).await;
        self.fields.wipe();
        self.attempts.reset();

        match stored {
            Ok(()) => {
                self.phase = PinPhase::Enter;
                self.initial_phase = PinPhase::Enter;
                self.log(LogEvent::pin(PinEvent::Updated, SCREEN));
                self.ports.navigator.back();
                debug!("PIN updated");
                Ok(PinOutcome::Updated)
            }
            Err(e) => {
                self.phase = PinPhase::Setup;
                warn!(error = %e, "failed to store PIN");
                Err(e)
            }
        }
    }

    async fn submit_current(&mut self, pin: &str) -> Result<PinOutcome> {
        self.fields.current_pin.push_str(pin);
        let verified = self.ports.store.verify(&self.fields.current_pin).await;
        self.fields.current_pin.zeroize();

        if verified? {
            self.fields.wipe();
            self.attempts.reset();
            self.phase = PinPhase::Setup;
            self.pin_validated = true;
            self.log(LogEvent::pin(PinEvent::Validated, SCREEN));
            self.ports.navigator.go_to(Screen::PinSetup);
            debug!("current PIN verified");
            return Ok(PinOutcome::Validated);
        }

        self.log(LogEvent::pin(PinEvent::Incorrect, SCREEN));
        match self.attempts.record_failure(&self.verification_policy) {
            AttemptOutcome::Remaining(remaining) => Err(Error::IncorrectPin { remaining }),
            AttemptOutcome::Exhausted(action) => self.exhaust(action).await,
        }
    }

    /// Apply the lockout action; always returns the exhaustion error
    async fn exhaust(&mut self, action: Exhaustion) -> Result<PinOutcome> {
        self.fields.wipe();

        match action {
            Exhaustion::ResetToSetup => {
                self.phase = PinPhase::Setup;
                warn!(attempts = self.attempts.count(), "PIN confirmation attempts exhausted");
                self.log(
                    LogEvent::pin(PinEvent::ResetRequired, SCREEN).with_error(action.to_string()),
                );
                self.ports.navigator.go_to(Screen::PinSetup);
            }
            Exhaustion::Logout => {
                self.phase = PinPhase::Locked;
                self.pin_validated = false;
                warn!(attempts = self.attempts.count(), "PIN verification attempts exhausted, logging out");
                self.log(
                    LogEvent::pin(PinEvent::LockoutLogout, SCREEN).with_error(action.to_string()),
                );

                let logged_out = self.ports.session.logout().await;
                self.ports.navigator.home();
                logged_out?;
            }
        }

        Err(Error::AttemptsExhausted(action))
    }

    fn log(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            let _ = logger.record(event);
        }
    }
}

/// Shared handle that serializes every submission through one owner
///
/// Submissions queue on an async mutex and run strictly in arrival order,
/// so retry counts and wiped fields are never observed mid-update.
#[derive(Clone)]
pub struct PinService {
    controller: Arc<Mutex<PinController>>,
}

impl PinService {
    /// Start a flow and wrap it for shared use
    pub async fn start(ports: PinPorts, config: &Config) -> Result<Self> {
        let controller = PinController::start(ports, config).await?;
        Ok(Self::from_controller(controller))
    }

    pub fn from_controller(controller: PinController) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
        }
    }

    pub async fn submit(&self, pin: &str) -> Result<PinOutcome> {
        self.controller.lock().await.submit(pin).await
    }

    pub async fn reset(&self) {
        self.controller.lock().await.reset();
    }

    pub async fn status(&self) -> PinStatus {
        self.controller.lock().await.status()
    }

    /// Whether a submission is currently running
    pub fn is_busy(&self) -> bool {
        self.controller.try_lock().is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryPinStore, RecordingNavigator, RecordingSession};

    struct Harness {
        store: Arc<InMemoryPinStore>,
        session: Arc<RecordingSession>,
        navigator: Arc<RecordingNavigator>,
    }

    impl Harness {
        fn new(existing_pin: Option<&str>) -> Self {
            let store = match existing_pin {
                Some(pin) => InMemoryPinStore::with_pin(pin),
                None => InMemoryPinStore::new(),
            };
            Self {
                store: Arc::new(store),
                session: Arc::new(RecordingSession::new()),
                navigator: Arc::new(RecordingNavigator::new()),
            }
        }

        fn ports(&self) -> PinPorts {
            PinPorts {
                store: self.store.clone(),
                session: self.session.clone(),
                navigator: self.navigator.clone(),
            }
        }

        async fn controller(&self) -> PinController {
            PinController::start(self.ports(), &Config::default())
                .await
                .unwrap()
        }
    }

    #[tokio::test]
    async fn test_initial_phase_depends_on_store() {
        let fresh = Harness::new(None);
        assert_eq!(fresh.controller().await.phase(), PinPhase::Setup);

        let existing = Harness::new(Some("1234"));
        assert_eq!(existing.controller().await.phase(), PinPhase::Enter);
    }

    #[tokio::test]
    async fn test_setup_then_confirm_stores_pin() {
        let h = Harness::new(None);
        let mut controller = h.controller().await;

        assert_eq!(
            controller.submit("1234").await.unwrap(),
            PinOutcome::AwaitingConfirmation
        );
        assert_eq!(controller.phase(), PinPhase::Confirm);

        assert_eq!(controller.submit("1234").await.unwrap(), PinOutcome::Updated);
        assert!(h.store.verify("1234").await.unwrap());
        assert!(!controller.has_pending_input());
        assert_eq!(controller.phase(), PinPhase::Enter);
        assert_eq!(h.navigator.back_count(), 1);
    }

    #[tokio::test]
    async fn test_confirmation_mismatch_counts_down() {
        let h = Harness::new(None);
        let mut controller = h.controller().await;
        controller.submit("1234").await.unwrap();

        let err = controller.submit("0000").await.unwrap_err();
        assert!(matches!(err, Error::ConfirmationMismatch { remaining: 3 }));
        assert_eq!(controller.phase(), PinPhase::Confirm);
        assert_eq!(controller.retry_count(), 1);
        assert!(controller.has_pending_input());
    }

    #[tokio::test]
    async fn test_fourth_mismatch_returns_to_setup() {
        let h = Harness::new(None);
        let mut controller = h.controller().await;
        controller.submit("1234").await.unwrap();

        for remaining in [3, 2, 1] {
            let err = controller.submit("0000").await.unwrap_err();
            assert_eq!(err.remaining_attempts(), Some(remaining));
        }
        let err = controller.submit("0000").await.unwrap_err();
        assert!(matches!(
            err,
            Error::AttemptsExhausted(Exhaustion::ResetToSetup)
        ));
        assert_eq!(controller.retry_count(), 4);
        assert_eq!(controller.phase(), PinPhase::Setup);
        assert!(!controller.has_pending_input());
        assert!(!h.store.has().await.unwrap());
        assert_eq!(h.session.logout_count(), 0);
        assert_eq!(controller.remaining_attempts(), 4);
        assert_eq!(controller.status().remaining_attempts, 4);

        // Choosing a new PIN starts a fresh count
        controller.submit("5678").await.unwrap();
        assert_eq!(controller.retry_count(), 0);
    }

    #[tokio::test]
    async fn test_correct_pin_allows_change() {
        let h = Harness::new(Some("2468"));
        let mut controller = h.controller().await;

        controller.submit("1111").await.unwrap_err();
        assert_eq!(
            controller.submit("2468").await.unwrap(),
            PinOutcome::Validated
        );
        assert!(controller.pin_validated());
        assert_eq!(controller.phase(), PinPhase::Setup);
        assert_eq!(controller.retry_count(), 0);
        assert!(!controller.has_pending_input());
    }

    #[tokio::test]
    async fn test_wrong_pin_reports_remaining() {
        let h = Harness::new(Some("2468"));
        let mut controller = h.controller().await;

        let err = controller.submit("1111").await.unwrap_err();
        assert!(matches!(err, Error::IncorrectPin { remaining: 3 }));
        assert_eq!(controller.phase(), PinPhase::Enter);
        assert!(!controller.has_pending_input());
    }

    #[tokio::test]
    async fn test_lockout_logs_out_once() {
        let h = Harness::new(Some("2468"));
        let mut controller = h.controller().await;

        for _ in 0..3 {
            controller.submit("1111").await.unwrap_err();
        }
        let err = controller.submit("1111").await.unwrap_err();
        assert!(matches!(err, Error::AttemptsExhausted(Exhaustion::Logout)));
        assert_eq!(h.session.logout_count(), 1);
        assert_eq!(h.navigator.home_count(), 1);
        assert_eq!(controller.phase(), PinPhase::Locked);

        // Nothing further reaches the store
        let err = controller.submit("2468").await.unwrap_err();
        assert!(matches!(err, Error::SessionEnded));
        assert_eq!(h.store.verify_count(), 4);
        assert_eq!(h.session.logout_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_pin_does_not_consume_attempt() {
        let h = Harness::new(Some("2468"));
        let mut controller = h.controller().await;

        let err = controller.submit("12").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(controller.retry_count(), 0);
        assert_eq!(h.store.verify_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_resets_flow() {
        let h = Harness::new(None);
        let mut controller = h.controller().await;
        controller.submit("1234").await.unwrap();

        h.store.fail_next_write();
        let err = controller.submit("1234").await.unwrap_err();
        assert!(matches!(err, Error::Store(_)));
        assert_eq!(controller.phase(), PinPhase::Setup);
        assert!(!controller.has_pending_input());
    }

    #[tokio::test]
    async fn test_reset_returns_to_initial_phase() {
        let h = Harness::new(None);
        let mut controller = h.controller().await;
        controller.submit("1234").await.unwrap();
        controller.submit("0000").await.unwrap_err();

        controller.reset();
        assert_eq!(controller.phase(), PinPhase::Setup);
        assert_eq!(controller.retry_count(), 0);
        assert!(!controller.has_pending_input());
    }

    #[tokio::test]
    async fn test_custom_attempt_limit() {
        let h = Harness::new(Some("2468"));
        let config = Config {
            max_pin_attempts: 2,
            ..Config::default()
        };
        let mut controller = PinController::start(h.ports(), &config).await.unwrap();

        assert_eq!(controller.remaining_attempts(), 2);
        controller.submit("1111").await.unwrap_err();
        let err = controller.submit("1111").await.unwrap_err();
        assert!(err.is_session_fatal());
        assert_eq!(h.session.logout_count(), 1);
    }

    #[tokio::test]
    async fn test_service_serializes_submissions() {
        let h = Harness::new(Some("2468"));
        let service = PinService::start(h.ports(), &Config::default())
            .await
            .unwrap();

        let mut handles = Vec::new();
        for _ in 0..6 {
            let service = service.clone();
            handles.push(tokio::spawn(async move { service.submit("1111").await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap_err();
        }

        assert_eq!(h.store.verify_count(), 4);
        assert_eq!(h.session.logout_count(), 1);
        assert_eq!(service.status().await.phase, PinPhase::Locked);
        assert!(!service.is_busy());
    }
}
