//! In-memory adapters
//!
//! Used by tests and by callers that embed the core without persistence.
//! Each adapter records the calls it receives so flows can be asserted on.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use zeroize::Zeroize;

use crate::domain::result::{Error, Result};
use crate::ports::{Navigator, PinStore, Screen, SessionService};

/// PIN store held in process memory
#[derive(Default)]
pub struct InMemoryPinStore {
    pin: Mutex<Option<String>>,
    verify_calls: AtomicUsize,
    fail_next_write: AtomicBool,
}

impl InMemoryPinStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pin(pin: &str) -> Self {
        let store = Self::default();
        if let Ok(mut slot) = store.pin.lock() {
            *slot = Some(pin.to_string());
        }
        store
    }

    /// Number of `verify` calls received
    pub fn verify_count(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    /// Make the next `set` fail with a store error
    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.pin
            .lock()
            .map_err(|e| Error::store(format!("Lock poisoned: {}", e)))
    }
}

#[async_trait]
impl PinStore for InMemoryPinStore {
    async fn has(&self) -> Result<bool> {
        Ok(self.slot()?.is_some())
    }

    async fn verify(&self, pin: &str) -> Result<bool> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.slot()?.as_deref() == Some(pin))
    }

    async fn set(&self, pin: &str) -> Result<()> {
        if self.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(Error::store("write rejected"));
        }
        let mut slot = self.slot()?;
        if let Some(old) = slot.as_mut() {
            old.zeroize();
        }
        *slot = Some(pin.to_string());
        Ok(())
    }
}

/// Session that only counts logouts
#[derive(Default)]
pub struct RecordingSession {
    logouts: AtomicUsize,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logout_count(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionService for RecordingSession {
    async fn logout(&self) -> Result<()> {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A navigation call received by [`RecordingNavigator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationEvent {
    Back,
    Home,
    GoTo(Screen),
}

/// Navigator that keeps the history of calls
#[derive(Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<NavigationEvent>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<NavigationEvent> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    pub fn back_count(&self) -> usize {
        self.count(NavigationEvent::Back)
    }

    pub fn home_count(&self) -> usize {
        self.count(NavigationEvent::Home)
    }

    fn count(&self, event: NavigationEvent) -> usize {
        self.history().into_iter().filter(|e| *e == event).count()
    }

    fn push(&self, event: NavigationEvent) {
        if let Ok(mut history) = self.history.lock() {
            history.push(event);
        }
    }
}

impl Navigator for RecordingNavigator {
    fn back(&self) {
        self.push(NavigationEvent::Back);
    }

    fn home(&self) {
        self.push(NavigationEvent::Home);
    }

    fn go_to(&self, screen: Screen) {
        self.push(NavigationEvent::GoTo(screen));
    }
}
