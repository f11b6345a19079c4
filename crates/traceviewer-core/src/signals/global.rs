//! Process-wide manager instance.
//!
//! Widgets that cannot be handed a [`SignalManager`] at construction reach
//! the bus through [`current_manager`]. Tests swap the instance with
//! [`set_manager_instance`] to isolate their registrations.

use parking_lot::RwLock;
use std::sync::OnceLock;

use super::manager::SignalManager;

/// Global manager slot
static CURRENT: OnceLock<RwLock<SignalManager>> = OnceLock::new();

fn slot() -> &'static RwLock<SignalManager> {
    CURRENT.get_or_init(|| RwLock::new(SignalManager::new()))
}

/// Get the active manager, creating the default one on first use
pub fn current_manager() -> SignalManager {
    slot().read().clone()
}

/// Replace the active manager.
///
/// All later calls to [`current_manager`] return `manager`. The previous
/// instance is returned untouched; its listeners stay registered on it but
/// are no longer reachable through the global accessor.
pub fn set_manager_instance(manager: SignalManager) -> SignalManager {
    let mut current = slot().write();
    tracing::info!(
        previous = %current.instance_id(),
        manager = %manager.instance_id(),
        "Replacing active SignalManager"
    );
    std::mem::replace(&mut *current, manager)
}

/// Convenience macro to emit a signal on the active manager
#[macro_export]
macro_rules! emit_signal {
    ($signal:expr) => {
        $crate::signals::current_manager().fire($signal)
    };
}

/// Convenience macro to subscribe on the active manager
#[macro_export]
macro_rules! on_signal {
    ($kind:expr, $owner:expr, $handler:expr) => {
        $crate::signals::current_manager().subscribe($kind, $owner, $handler)
    };
}
