//! Signal manager.
//!
//! Owns the listener registry of one bus instance and runs emissions:
//! snapshot the listeners of a kind, track nesting depth, call every
//! listener in registration order and report failures without aborting the
//! dispatch.

use parking_lot::RwLock;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use uuid::Uuid;

use super::caller::{Owner, RegistrantIdentity};
use super::catalog::{Signal, SignalDef, SignalKind};
use super::registry::{Listener, ListenerRegistry, SignalHandler, SubscriptionId};
use crate::config::SignalBusConfig;
use crate::error::{FailureReason, SubscriberFailure};

/// Callback receiving subscriber failures
pub type ErrorSink = Arc<dyn Fn(&SubscriberFailure) + Send + Sync>;

/// Identifier of a manager instance, for log correlation only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(Uuid);

impl InstanceId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.simple().to_string()[..8])
    }
}

/// Token returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subscription {
    id: SubscriptionId,
    kind: SignalKind,
    registrant: RegistrantIdentity,
}

impl Subscription {
    /// Unique id of this subscription
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Signal kind this subscription listens to
    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    /// Who registered it
    pub fn registrant(&self) -> &RegistrantIdentity {
        &self.registrant
    }
}

/// Unsubscribes when dropped
#[must_use = "dropping the guard unsubscribes immediately"]
pub struct SubscriptionGuard {
    manager: SignalManager,
    subscription: Option<Subscription>,
}

impl SubscriptionGuard {
    /// The guarded subscription
    pub fn subscription(&self) -> Option<&Subscription> {
        self.subscription.as_ref()
    }

    /// Keep the subscription alive past the guard and hand back the token
    pub fn disarm(mut self) -> Option<Subscription> {
        self.subscription.take()
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(sub) = self.subscription.take() {
            self.manager
                .remove(sub.kind, sub.id, &RegistrantIdentity::unknown());
        }
    }
}

impl std::fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("manager", &self.manager.instance_id())
            .field("subscription", &self.subscription)
            .finish()
    }
}

/// Increments the dispatch depth for its lifetime
struct DepthGuard<'a> {
    depth: &'a AtomicUsize,
    level: usize,
}

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a AtomicUsize) -> Self {
        let level = depth.fetch_add(1, Ordering::SeqCst) + 1;
        Self { depth, level }
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.depth.fetch_sub(1, Ordering::SeqCst);
    }
}

struct Inner {
    id: InstanceId,
    registry: RwLock<ListenerRegistry>,
    depth: AtomicUsize,
    config: SignalBusConfig,
    error_sink: RwLock<Option<ErrorSink>>,
}

/// One signal bus instance.
///
/// Cheap to clone; clones share the same registry. Hand a clone to every
/// widget that needs the bus, or reach the process-wide instance through
/// [`current_manager`](super::current_manager).
#[derive(Clone)]
pub struct SignalManager {
    inner: Arc<Inner>,
}

/// Non-owning reference to a [`SignalManager`]
#[derive(Clone)]
pub struct WeakSignalManager {
    inner: Weak<Inner>,
}

impl WeakSignalManager {
    /// Get the manager back if it is still alive
    pub fn upgrade(&self) -> Option<SignalManager> {
        self.inner.upgrade().map(|inner| SignalManager { inner })
    }
}

impl SignalManager {
    /// Create a new manager with default configuration
    pub fn new() -> Self {
        Self::with_config(SignalBusConfig::default())
    }

    /// Create a new manager with custom configuration
    pub fn with_config(config: SignalBusConfig) -> Self {
        let id = InstanceId::new();
        tracing::info!(manager = %id, "*** Creation of SignalManager, id: {}", id);
        Self {
            inner: Arc::new(Inner {
                id,
                registry: RwLock::new(ListenerRegistry::new()),
                depth: AtomicUsize::new(0),
                config,
                error_sink: RwLock::new(None),
            }),
        }
    }

    /// Identifier of this instance
    pub fn instance_id(&self) -> InstanceId {
        self.inner.id
    }

    /// Current dispatch nesting depth; 0 when idle
    pub fn depth(&self) -> usize {
        self.inner.depth.load(Ordering::SeqCst)
    }

    /// Get the current configuration
    pub fn config(&self) -> &SignalBusConfig {
        &self.inner.config
    }

    /// Whether `other` is a handle to the same instance
    pub fn ptr_eq(&self, other: &SignalManager) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Non-owning handle, for subscribers that need to emit back into the bus
    pub fn downgrade(&self) -> WeakSignalManager {
        WeakSignalManager {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Register a handler for `kind`.
    ///
    /// The handler is appended after any existing handlers for that kind. The
    /// returned token identifies exactly this registration.
    #[track_caller]
    pub fn subscribe(
        &self,
        kind: SignalKind,
        owner: impl Into<Owner>,
        handler: impl Fn(&Signal) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Subscription {
        let owner = owner.into();
        let registrant = RegistrantIdentity::here(Some(&owner), &self.inner.config);
        self.insert(kind, registrant, Arc::new(handler))
    }

    /// Register a handler receiving only the payload of signal kind `K`
    #[track_caller]
    pub fn on<K: SignalDef>(
        &self,
        owner: impl Into<Owner>,
        handler: impl Fn(&K::Payload) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Subscription {
        let owner = owner.into();
        let registrant = RegistrantIdentity::here(Some(&owner), &self.inner.config);
        let handler: SignalHandler = Arc::new(move |signal: &Signal| match K::payload(signal) {
            Some(payload) => handler(payload),
            None => Ok(()),
        });
        self.insert(K::KIND, registrant, handler)
    }

    /// Register a handler that is removed when the returned guard drops
    #[track_caller]
    pub fn subscribe_scoped(
        &self,
        kind: SignalKind,
        owner: impl Into<Owner>,
        handler: impl Fn(&Signal) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> SubscriptionGuard {
        let subscription = self.subscribe(kind, owner, handler);
        SubscriptionGuard {
            manager: self.clone(),
            subscription: Some(subscription),
        }
    }

    /// Remove a subscription.
    ///
    /// Returns `false` (and changes nothing) if it was not registered.
    #[track_caller]
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        self.unsubscribe_id(subscription.kind, subscription.id)
    }

    /// Remove the subscription `id` from `kind`
    #[track_caller]
    pub fn unsubscribe_id(&self, kind: SignalKind, id: SubscriptionId) -> bool {
        let caller = RegistrantIdentity::here(None, &self.inner.config);
        self.remove(kind, id, &caller)
    }

    /// Emit `signal` on behalf of `sender`.
    ///
    /// See [`SignalManager::emit_as`].
    #[track_caller]
    pub fn emit(&self, sender: impl Into<Owner>, signal: Signal) -> bool {
        let sender = sender.into();
        let sender = RegistrantIdentity::here(Some(&sender), &self.inner.config);
        self.emit_as(&sender, &signal)
    }

    /// Deliver `signal` to every listener of its kind.
    ///
    /// Listeners are snapshotted before the first call: listeners added during
    /// the dispatch are not called by it, listeners removed during it still
    /// are. Calls are synchronous, in registration order, and each one is
    /// isolated so a failing listener is reported to the error sink and the
    /// remaining ones still run.
    ///
    /// Returns `true` iff at least one listener existed at lookup time.
    pub fn emit_as(&self, sender: &RegistrantIdentity, signal: &Signal) -> bool {
        let kind = signal.kind();
        let id = self.inner.id;
        let listeners = self.inner.registry.read().snapshot(kind);

        if listeners.is_empty() {
            tracing::debug!(
                sender = %sender,
                manager = %id,
                signal = %kind,
                "sender[{}]=> SignalManager[{}]: Firing Event: '{}'. No listener, signal dropped",
                sender,
                id,
                kind
            );
            return false;
        }

        let guard = DepthGuard::enter(&self.inner.depth);
        let depth = guard.level;
        if depth > self.inner.config.depth_warning_threshold {
            tracing::warn!(
                manager = %id,
                signal = %kind,
                depth,
                "Signal dispatch nested {} levels deep",
                depth
            );
        }

        let subject = signal.subject_name().unwrap_or("n/a");
        let count = listeners.len();
        tracing::debug!(
            sender = %sender,
            manager = %id,
            depth,
            signal = %kind,
            listeners = count,
            "sender[{}]=> [calling listeners] SignalManager[{}, depth: {}]: Firing Event: '{}', trace/exp: {}. Will call {} listener(s)",
            sender,
            id,
            depth,
            kind,
            subject,
            count
        );

        for (index, listener) in listeners.iter().enumerate() {
            tracing::debug!(
                manager = %id,
                signal = %kind,
                registrant = %listener.registrant,
                "   -> [calling listener] - [listener idx={}/{}] SignalManager[{}]: Calling listener [name: {}], event: '{}' (trace/exp: {})",
                index,
                count - 1,
                id,
                listener.registrant,
                kind,
                subject
            );

            if let Err(reason) = self.invoke(listener, signal) {
                self.report(SubscriberFailure {
                    kind,
                    subscription: listener.id,
                    registrant: listener.registrant.clone(),
                    index,
                    reason,
                });
            }
        }

        drop(guard);
        true
    }

    /// Install the callback receiving subscriber failures
    pub fn set_error_sink(&self, sink: impl Fn(&SubscriberFailure) + Send + Sync + 'static) {
        *self.inner.error_sink.write() = Some(Arc::new(sink));
    }

    /// Remove the error sink; failures are then only logged
    pub fn clear_error_sink(&self) {
        *self.inner.error_sink.write() = None;
    }

    /// Number of listeners registered for `kind`
    pub fn listener_count(&self, kind: SignalKind) -> usize {
        self.inner.registry.read().listener_count(kind)
    }

    /// Total listeners across all kinds
    pub fn total_listeners(&self) -> usize {
        self.inner.registry.read().total_listeners()
    }

    /// Registrant identities for `kind`, in registration order
    pub fn registrants(&self, kind: SignalKind) -> Vec<RegistrantIdentity> {
        self.inner.registry.read().registrants(kind)
    }

    /// Subscription ids for `kind`, in registration order
    pub fn subscription_ids(&self, kind: SignalKind) -> Vec<SubscriptionId> {
        self.inner.registry.read().subscription_ids(kind)
    }

    /// Whether `subscription` is still registered
    pub fn is_subscribed(&self, subscription: &Subscription) -> bool {
        self.inner
            .registry
            .read()
            .contains(subscription.kind, subscription.id)
    }

    /// Kinds with at least one listener
    pub fn active_kinds(&self) -> Vec<SignalKind> {
        self.inner.registry.read().active_kinds()
    }

    fn insert(
        &self,
        kind: SignalKind,
        registrant: RegistrantIdentity,
        handler: SignalHandler,
    ) -> Subscription {
        let id = SubscriptionId::new();
        let index = self.inner.registry.write().insert(
            kind,
            Listener {
                id,
                handler,
                registrant: registrant.clone(),
            },
        );
        tracing::debug!(
            manager = %self.inner.id,
            signal = %kind,
            registrant = %registrant,
            "-> [new listener] SignalManager[{}]#subscribe(): Registering Listener[event='{}', idx={}] - caller: {}",
            self.inner.id,
            kind,
            index,
            registrant
        );
        Subscription {
            id,
            kind,
            registrant,
        }
    }

    fn remove(&self, kind: SignalKind, id: SubscriptionId, caller: &RegistrantIdentity) -> bool {
        let (removed, remaining) = {
            let mut registry = self.inner.registry.write();
            let removed = registry.remove(kind, id);
            (removed, registry.listener_count(kind))
        };

        match removed {
            Some((index, listener)) => {
                tracing::debug!(
                    manager = %self.inner.id,
                    signal = %kind,
                    registrant = %listener.registrant,
                    listeners = remaining,
                    "-> [remove listener] SignalManager[{}]#unsubscribe(): Removed Listener[event='{}', idx={}, registered by: {}, remaining={}] - caller: {}",
                    self.inner.id,
                    kind,
                    index,
                    listener.registrant,
                    remaining,
                    caller
                );
                true
            }
            None => {
                tracing::debug!(
                    manager = %self.inner.id,
                    signal = %kind,
                    listeners = remaining,
                    "-> [remove listener (none)] SignalManager[{}]#unsubscribe(): No Listener[event='{}', id={}] - caller: {}",
                    self.inner.id,
                    kind,
                    id,
                    caller
                );
                false
            }
        }
    }

    fn invoke(&self, listener: &Listener, signal: &Signal) -> Result<(), FailureReason> {
        let handler = &listener.handler;
        if self.inner.config.isolate_panics {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(signal))) {
                Ok(result) => result.map_err(|err| FailureReason::Error(format!("{:#}", err))),
                Err(payload) => Err(FailureReason::Panic(panic_message(payload.as_ref()))),
            }
        } else {
            handler(signal).map_err(|err| FailureReason::Error(format!("{:#}", err)))
        }
    }

    fn report(&self, failure: SubscriberFailure) {
        tracing::error!(
            manager = %self.inner.id,
            signal = %failure.kind,
            registrant = %failure.registrant,
            error = %failure.to_error(),
            "Listener failed: {}",
            failure
        );
        let Some(sink) = self.inner.error_sink.read().clone() else {
            return;
        };

        if !self.inner.config.isolate_panics {
            sink(&failure);
            return;
        }
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| sink(&failure))) {
            tracing::error!(
                manager = %self.inner.id,
                signal = %failure.kind,
                "Error sink panicked: {}",
                panic_message(payload.as_ref())
            );
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Default for SignalManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SignalManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalManager")
            .field("id", &self.inner.id)
            .field("listeners", &self.total_listeners())
            .field("depth", &self.depth())
            .field("config", &self.inner.config)
            .finish()
    }
}
