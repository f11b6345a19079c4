//! # Signal Bus
//!
//! In-process publish/subscribe bus connecting the viewer's widgets. Trace
//! trees, charts and tables announce state changes (a trace opened, the
//! selection range moved, the theme switched) without holding references to
//! each other.
//!
//! ## Delivery
//!
//! - Synchronous: `fire_*` returns after every listener has run
//! - Ordered: listeners run in registration order
//! - Depth-first: a listener may emit again; the nested dispatch completes
//!   before the outer one moves on
//! - Snapshot: the listener list is copied when a dispatch starts
//! - Isolated: a listener returning `Err` or panicking is reported to the
//!   error sink and the remaining listeners still run
//!
//! ## Usage
//!
//! ```rust,ignore
//! use traceviewer_core::signals::{kinds, SignalManager};
//! use traceviewer_core::payloads::Trace;
//!
//! let bus = SignalManager::new();
//! let sub = bus.on::<kinds::TraceOpened>("TraceTree::on_mount", |trace| {
//!     println!("opened {}", trace.name);
//!     Ok(())
//! });
//!
//! bus.fire_trace_opened(Trace::new("1a2b", "kernel"));
//! bus.unsubscribe(&sub);
//! ```

mod caller;
mod catalog;
mod facade;
mod global;
mod manager;
mod registry;

pub use caller::{Owner, RegistrantIdentity, UNKNOWN_REGISTRANT};
pub use catalog::{kinds, Signal, SignalDef, SignalKind};
pub use global::{current_manager, set_manager_instance};
pub use manager::{
    ErrorSink, InstanceId, SignalManager, Subscription, SubscriptionGuard, WeakSignalManager,
};
pub use registry::{Listener, ListenerRegistry, SignalHandler, SubscriptionId};
