//! Navigation port

use serde::{Deserialize, Serialize};

/// Screens the core can send the user to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Home,
    PinSetup,
    Security,
}

impl Screen {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::PinSetup => "pin_setup",
            Screen::Security => "security",
        }
    }
}

/// Router side effects triggered by state transitions
pub trait Navigator: Send + Sync {
    fn back(&self);

    fn home(&self);

    fn go_to(&self, screen: Screen);
}
