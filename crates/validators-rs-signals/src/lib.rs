//! # validators-rs-signals
//!
//! Lifecycle signals for the validators-rs engine. A validation run sends
//! [`ValidationBegin`] once, [`ControlValidated`] after every rule it
//! evaluates, and [`ValidationEnd`] once it completes. Consumers hook their
//! UI (error classes, message boxes) onto these without the engine knowing
//! about it.
//!
//! ## Usage
//!
//! ```
//! use validators_rs_signals::{ValidationEnd, ValidationSignals};
//! use std::sync::Arc;
//!
//! let signals = ValidationSignals::new();
//!
//! signals.end.connect("alert", Arc::new(|end: &ValidationEnd| {
//!     if !end.status {
//!         println!("The form contains some errors: {}", end.messages.join(", "));
//!     }
//! }));
//!
//! let notified = signals.end.send(&ValidationEnd {
//!     status: true,
//!     messages: Vec::new(),
//! });
//! assert_eq!(notified, 1);
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

/// The type signature for a signal receiver callback.
///
/// Receivers must be `Send + Sync` so that signals can be dispatched from
/// any thread.
pub type SignalReceiver<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// A signal that can be connected to and dispatched.
///
/// Each signal carries a payload type `T`. Receivers are called in the order
/// they were connected.
pub struct Signal<T: 'static> {
    receivers: RwLock<Vec<(String, SignalReceiver<T>)>>,
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("receivers", &self.receiver_ids())
            .finish()
    }
}

impl<T: 'static> Signal<T> {
    /// Creates a new signal with no connected receivers.
    pub fn new() -> Self {
        Self {
            receivers: RwLock::new(Vec::new()),
        }
    }

    /// Connects a receiver to this signal.
    ///
    /// If a receiver with the same ID is already connected, it is replaced
    /// and keeps its position.
    pub fn connect(&self, receiver_id: impl Into<String>, callback: SignalReceiver<T>) {
        let id = receiver_id.into();
        let mut receivers = self.receivers.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = receivers.iter_mut().find(|(rid, _)| *rid == id) {
            entry.1 = callback;
        } else {
            tracing::trace!(receiver = %id, "signal receiver connected");
            receivers.push((id, callback));
        }
    }

    /// Disconnects the receiver with the given ID.
    ///
    /// Returns `true` if a receiver was found and removed.
    pub fn disconnect(&self, receiver_id: &str) -> bool {
        let mut receivers = self.receivers.write().unwrap_or_else(PoisonError::into_inner);
        let len_before = receivers.len();
        receivers.retain(|(id, _)| id != receiver_id);
        receivers.len() < len_before
    }

    /// Sends the signal to all connected receivers, in connection order.
    ///
    /// The receiver list is snapshotted first, so a receiver may connect or
    /// disconnect receivers on the same signal. Returns how many receivers
    /// were called.
    pub fn send(&self, payload: &T) -> usize {
        let snapshot: Vec<SignalReceiver<T>> = self
            .receivers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in &snapshot {
            callback(payload);
        }
        snapshot.len()
    }

    /// Returns the number of connected receivers.
    pub fn receiver_count(&self) -> usize {
        self.receivers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns the IDs of the connected receivers, in connection order.
    pub fn receiver_ids(&self) -> Vec<String> {
        self.receivers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }
}

// ── Lifecycle payloads ───────────────────────────────────────────────

/// Sent once, before any rule of a run is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationBegin {
    /// The requested validation group(s), if any.
    pub group: Option<String>,
}

/// Sent after each evaluated rule, once its result is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlValidated {
    /// The validated control's id; `None` for custom rules without a target.
    pub control: Option<String>,
    /// Whether this rule passed.
    pub passed: bool,
}

/// Sent once when a run completes.
///
/// Not sent when a run aborts on a configuration error or when an
/// asynchronous custom validator rejects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationEnd {
    /// `true` if every evaluated rule passed.
    pub status: bool,
    /// Failure messages in rule declaration order.
    pub messages: Vec<String>,
}

/// The three lifecycle signals of one engine.
#[derive(Debug, Default)]
pub struct ValidationSignals {
    /// Fired when a run begins.
    pub begin: Signal<ValidationBegin>,
    /// Fired after each evaluated rule.
    pub control_validated: Signal<ControlValidated>,
    /// Fired when a run completes.
    pub end: Signal<ValidationEnd>,
}

impl ValidationSignals {
    /// Creates a set of signals with no receivers.
    pub fn new() -> Self {
        Self::default()
    }
}
