//! PIN lifecycle domain model
//!
//! Pure state for the PIN flows: phases, the shared attempt counter and
//! lockout policy, and the in-memory PIN buffers. No I/O happens here; the
//! controller in `services::pin` drives these through the ports.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::result::{Error, Result};

/// Default number of consecutive failures before lockout
pub const DEFAULT_MAX_ATTEMPTS: u32 = 4;

/// Default PIN length in digits
pub const DEFAULT_PIN_LENGTH: usize = 4;

/// Where the PIN flow currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinPhase {
    /// Choosing a new PIN
    Setup,
    /// Re-typing the new PIN
    Confirm,
    /// Verifying the existing PIN
    Enter,
    /// Session was terminated by a lockout
    Locked,
}

impl fmt::Display for PinPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PinPhase::Setup => "setup",
            PinPhase::Confirm => "confirm",
            PinPhase::Enter => "enter",
            PinPhase::Locked => "locked",
        };
        f.write_str(name)
    }
}

/// What happens when a flow runs out of attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exhaustion {
    /// Forget the new PIN and start setup again
    ResetToSetup,
    /// Terminate the session and return home
    Logout,
}

impl fmt::Display for Exhaustion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exhaustion::ResetToSetup => {
                f.write_str("Too many attempts, please set up your PIN again")
            }
            Exhaustion::Logout => {
                f.write_str("Too many incorrect attempts, you have been logged out")
            }
        }
    }
}

/// Max attempts plus the action taken once they run out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    pub max_attempts: u32,
    pub on_exhaustion: Exhaustion,
}

impl LockoutPolicy {
    pub fn new(max_attempts: u32, on_exhaustion: Exhaustion) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            on_exhaustion,
        }
    }

    /// Policy for confirming a newly chosen PIN
    pub fn confirmation(max_attempts: u32) -> Self {
        Self::new(max_attempts, Exhaustion::ResetToSetup)
    }

    /// Policy for verifying the existing PIN
    pub fn verification(max_attempts: u32) -> Self {
        Self::new(max_attempts, Exhaustion::Logout)
    }
}

/// Result of recording a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Remaining(u32),
    Exhausted(Exhaustion),
}

/// Consecutive failure counter shared by every PIN flow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptCounter {
    count: u32,
}

impl AttemptCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Count one failure against `policy`
    pub fn record_failure(&mut self, policy: &LockoutPolicy) -> AttemptOutcome {
        self.count = self.count.saturating_add(1);
        if self.count >= policy.max_attempts {
            AttemptOutcome::Exhausted(policy.on_exhaustion)
        } else {
            AttemptOutcome::Remaining(policy.max_attempts - self.count)
        }
    }
}

/// In-memory PIN buffers, wiped on drop
#[derive(Default)]
pub struct PinFields {
    pub new_pin: String,
    pub current_pin: String,
    pub confirmation_pin: String,
}

impl PinFields {
    /// Overwrite and clear every buffer
    pub fn wipe(&mut self) {
        self.new_pin.zeroize();
        self.current_pin.zeroize();
        self.confirmation_pin.zeroize();
    }

    pub fn is_empty(&self) -> bool {
        self.new_pin.is_empty() && self.current_pin.is_empty() && self.confirmation_pin.is_empty()
    }
}

impl Drop for PinFields {
    fn drop(&mut self) {
        self.wipe();
    }
}

impl fmt::Debug for PinFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PinFields")
            .field("new_pin", &"<redacted>")
            .field("current_pin", &"<redacted>")
            .field("confirmation_pin", &"<redacted>")
            .finish()
    }
}

/// Check that a PIN is exactly `length` ASCII digits
pub fn validate_pin_format(pin: &str, length: usize) -> Result<()> {
    if pin.len() != length || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::validation(format!(
            "PIN must be exactly {} digits",
            length
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_reports_remaining_then_exhausts() {
        let policy = LockoutPolicy::verification(4);
        let mut counter = AttemptCounter::new();

        assert_eq!(counter.record_failure(&policy), AttemptOutcome::Remaining(3));
        assert_eq!(counter.record_failure(&policy), AttemptOutcome::Remaining(2));
        assert_eq!(counter.record_failure(&policy), AttemptOutcome::Remaining(1));
        assert_eq!(
            counter.record_failure(&policy),
            AttemptOutcome::Exhausted(Exhaustion::Logout)
        );
        assert_eq!(counter.count(), 4);

        counter.reset();
        assert_eq!(counter.count(), 0);
    }

    #[test]
    fn test_policy_never_allows_zero_attempts() {
        let policy = LockoutPolicy::confirmation(0);
        assert_eq!(policy.max_attempts, 1);
        let mut counter = AttemptCounter::new();
        assert_eq!(
            counter.record_failure(&policy),
            AttemptOutcome::Exhausted(Exhaustion::ResetToSetup)
        );
    }

    #[test]
    fn test_wipe_clears_all_fields() {
        let mut fields = PinFields {
            new_pin: "1234".to_string(),
            current_pin: "5678".to_string(),
            confirmation_pin: "0000".to_string(),
        };
        fields.wipe();
        assert!(fields.is_empty());
    }

    #[test]
    fn test_debug_redacts_pins() {
        let mut fields = PinFields::default();
        fields.new_pin.push_str("1234");
        assert!(!format!("{:?}", fields).contains("1234"));
    }

    #[test]
    fn test_pin_format() {
        assert!(validate_pin_format("1234", 4).is_ok());
        assert!(validate_pin_format("123", 4).is_err());
        assert!(validate_pin_format("12a4", 4).is_err());
        assert!(validate_pin_format("123456", 6).is_ok());
    }
}
