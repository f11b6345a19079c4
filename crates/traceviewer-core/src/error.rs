//! Error handling for the trace viewer core
//!
//! Provides error types for the signal bus:
//! - Signal errors (catalog lookups, subscriber failures, invalid bus settings)
//! - Failure reports handed to the error sink during a dispatch
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::signals::{RegistrantIdentity, SignalKind, SubscriptionId};

/// Signal error type
///
/// Represents errors raised while looking up, delivering or configuring signals.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// No signal kind carries this name
    #[error("Unknown signal name: '{name}'")]
    UnknownSignalName {
        /// The name that failed to resolve.
        name: String,
    },

    /// A subscriber returned an error
    #[error("Subscriber for '{signal}' failed: {message}")]
    Handler {
        /// The signal being delivered.
        signal: SignalKind,
        /// The error message returned by the subscriber.
        message: String,
    },

    /// A subscriber panicked
    #[error("Subscriber for '{signal}' panicked: {message}")]
    Panicked {
        /// The signal being delivered.
        signal: SignalKind,
        /// The panic payload, when it was a string.
        message: String,
    },

    /// Invalid bus configuration
    #[error("Invalid signal bus configuration: {reason}")]
    InvalidConfig {
        /// The reason the configuration was rejected.
        reason: String,
    },
}

/// Why a single subscriber invocation failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The handler returned `Err`.
    Error(String),
    /// The handler panicked.
    Panic(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Error(msg) => write!(f, "error: {}", msg),
            FailureReason::Panic(msg) => write!(f, "panic: {}", msg),
        }
    }
}

/// Report handed to the error sink when a subscriber fails during a dispatch.
#[derive(Debug, Clone)]
pub struct SubscriberFailure {
    /// Signal being delivered.
    pub kind: SignalKind,
    /// Subscription whose handler failed.
    pub subscription: SubscriptionId,
    /// Who registered the failing handler.
    pub registrant: RegistrantIdentity,
    /// Position of the handler in the dispatch snapshot.
    pub index: usize,
    /// What went wrong.
    pub reason: FailureReason,
}

impl SubscriberFailure {
    /// Convert into a [`SignalError`], dropping the diagnostic context
    pub fn to_error(&self) -> SignalError {
        match &self.reason {
            FailureReason::Error(message) => SignalError::Handler {
                signal: self.kind,
                message: message.clone(),
            },
            FailureReason::Panic(message) => SignalError::Panicked {
                signal: self.kind,
                message: message.clone(),
            },
        }
    }
}

impl std::fmt::Display for SubscriberFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "listener idx={} [{}] on '{}' ({}): {}",
            self.index, self.registrant, self.kind, self.subscription, self.reason
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_error_display() {
        let err = SignalError::UnknownSignalName {
            name: "trace exploded".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown signal name: 'trace exploded'");

        let err = SignalError::Handler {
            signal: SignalKind::ThemeChanged,
            message: "no palette".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Subscriber for 'theme changed' failed: no palette"
        );
    }

    #[test]
    fn test_failure_to_error() {
        let failure = SubscriberFailure {
            kind: SignalKind::Undo,
            subscription: SubscriptionId::new(),
            registrant: RegistrantIdentity::unknown(),
            index: 2,
            reason: FailureReason::Panic("boom".to_string()),
        };
        assert_eq!(
            failure.to_error(),
            SignalError::Panicked {
                signal: SignalKind::Undo,
                message: "boom".to_string(),
            }
        );
        assert!(failure.to_string().contains("idx=2"));
    }
}
