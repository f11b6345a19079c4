//! # Trace Viewer Core
//!
//! Signal bus, signal catalog and payload types shared by the trace viewer
//! widgets.

pub mod config;
pub mod error;
pub mod payloads;
pub mod signals;

pub use config::SignalBusConfig;
pub use error::{FailureReason, SignalError, SubscriberFailure};

pub use signals::{
    current_manager, kinds, set_manager_instance, InstanceId, Owner, RegistrantIdentity, Signal,
    SignalDef, SignalKind, SignalManager, Subscription, SubscriptionGuard, SubscriptionId,
};
