//! Listener registry.
//!
//! Ordered, per-kind storage of subscribers. Each entry carries the handler
//! and the identity of whoever registered it, so the subscriber sequence and
//! the registrant sequence of a kind can never drift apart.

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::caller::RegistrantIdentity;
use super::catalog::{Signal, SignalKind};

/// Subscriber callback.
///
/// Called synchronously on the emitting thread; an `Err` is reported to the
/// manager's error sink and does not stop the dispatch.
pub type SignalHandler = Arc<dyn Fn(&Signal) -> anyhow::Result<()> + Send + Sync>;

/// Subscription handle for unsubscribing from signals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.simple().to_string()[..8])
    }
}

/// One registered subscriber
#[derive(Clone)]
pub struct Listener {
    /// Token identifying the subscription.
    pub id: SubscriptionId,
    /// The callback.
    pub handler: SignalHandler,
    /// Who registered it.
    pub registrant: RegistrantIdentity,
}

impl std::fmt::Debug for Listener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("registrant", &self.registrant)
            .finish_non_exhaustive()
    }
}

/// Per-kind ordered subscriber lists
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    listeners: HashMap<SignalKind, Vec<Listener>>,
}

impl ListenerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener to the tail of `kind`'s list, returning its index
    pub fn insert(&mut self, kind: SignalKind, listener: Listener) -> usize {
        let entries = self.listeners.entry(kind).or_default();
        entries.push(listener);
        entries.len() - 1
    }

    /// Remove the listener with `id` from `kind`'s list.
    ///
    /// Returns the position it occupied and the removed entry, or `None` if
    /// no such subscription exists for `kind`.
    pub fn remove(&mut self, kind: SignalKind, id: SubscriptionId) -> Option<(usize, Listener)> {
        let entries = self.listeners.get_mut(&kind)?;
        let index = entries.iter().position(|l| l.id == id)?;
        let removed = entries.remove(index);
        if entries.is_empty() {
            self.listeners.remove(&kind);
        }
        Some((index, removed))
    }

    /// Copy of `kind`'s listeners, in registration order
    pub fn snapshot(&self, kind: SignalKind) -> Vec<Listener> {
        self.listeners.get(&kind).cloned().unwrap_or_default()
    }

    /// Number of listeners for `kind`
    pub fn listener_count(&self, kind: SignalKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Registrant identities for `kind`, aligned with [`Self::subscription_ids`]
    pub fn registrants(&self, kind: SignalKind) -> Vec<RegistrantIdentity> {
        self.listeners
            .get(&kind)
            .map(|entries| entries.iter().map(|l| l.registrant.clone()).collect())
            .unwrap_or_default()
    }

    /// Subscription ids for `kind`, in registration order
    pub fn subscription_ids(&self, kind: SignalKind) -> Vec<SubscriptionId> {
        self.listeners
            .get(&kind)
            .map(|entries| entries.iter().map(|l| l.id).collect())
            .unwrap_or_default()
    }

    /// Whether `id` is registered for `kind`
    pub fn contains(&self, kind: SignalKind, id: SubscriptionId) -> bool {
        self.listeners
            .get(&kind)
            .is_some_and(|entries| entries.iter().any(|l| l.id == id))
    }

    /// Kinds with at least one listener
    pub fn active_kinds(&self) -> Vec<SignalKind> {
        let mut kinds: Vec<SignalKind> = self.listeners.keys().copied().collect();
        kinds.sort();
        kinds
    }

    /// Total listeners across all kinds
    pub fn total_listeners(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }
}
