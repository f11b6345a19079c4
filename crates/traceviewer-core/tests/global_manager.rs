//! The global slot is process-wide, so everything touching it lives in one
//! test to keep parallel test threads from racing on it.

use parking_lot::Mutex;
use std::sync::Arc;

use traceviewer_core::payloads::Trace;
use traceviewer_core::signals::{current_manager, set_manager_instance, SignalKind, SignalManager};
use traceviewer_core::{emit_signal, on_signal, Signal, SignalBusConfig};

#[test]
fn test_manager_override_routes_all_calls() {
    let original = current_manager();
    assert!(current_manager().ptr_eq(&original));
    assert_eq!(current_manager().instance_id(), original.instance_id());

    let old_calls = Arc::new(Mutex::new(0usize));
    let c = old_calls.clone();
    original.subscribe(SignalKind::TraceOpened, "OldWidget", move |_| {
        *c.lock() += 1;
        Ok(())
    });

    let replacement = SignalManager::with_config(SignalBusConfig::diagnostic());
    let previous = set_manager_instance(replacement.clone());
    assert!(previous.ptr_eq(&original));
    assert!(current_manager().ptr_eq(&replacement));
    assert_ne!(current_manager().instance_id(), original.instance_id());

    let received = Arc::new(Mutex::new(Vec::new()));
    let r = received.clone();
    on_signal!(SignalKind::TraceOpened, "NewWidget", move |signal: &Signal| {
        r.lock().push(signal.clone());
        Ok(())
    });

    let trace = Trace::new("42", "ust");
    assert!(current_manager().fire_trace_opened(trace.clone()));
    assert!(emit_signal!(Signal::TraceOpened(trace.clone())));

    assert_eq!(received.lock().len(), 2);
    assert_eq!(*old_calls.lock(), 0);
    assert_eq!(replacement.listener_count(SignalKind::TraceOpened), 1);
    assert_eq!(original.listener_count(SignalKind::TraceOpened), 1);

    // The old instance keeps working for whoever still holds it
    assert!(previous.fire_trace_opened(trace));
    assert_eq!(*old_calls.lock(), 1);

    set_manager_instance(original);
}
