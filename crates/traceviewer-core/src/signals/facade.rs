//! Typed `fire_*` operations, one per signal kind.
//!
//! Every method records its caller as the sender and routes through
//! [`SignalManager::emit_as`]. The returned flag tells whether anyone was
//! listening; producers usually ignore it.

use std::collections::BTreeMap;

use super::caller::RegistrantIdentity;
use super::catalog::{Signal, SignalDef};
use super::manager::SignalManager;
use crate::payloads::{
    ContextMenuContributed, ContextMenuItemClicked, Experiment, ItemProperties,
    MarkerCategoryClosed, OpenedTracesUpdated, OutputAdded, OutputDescriptor,
    OverviewOutputSelected, PinView, RowSelectionsChanged, SaveAsCsv, TimeRangeUpdate, Trace,
};

impl SignalManager {
    /// Emit `signal`, with the caller's location as sender
    #[track_caller]
    pub fn fire(&self, signal: Signal) -> bool {
        let sender = RegistrantIdentity::here(None, self.config());
        self.emit_as(&sender, &signal)
    }

    /// Emit the signal of kind `K` carrying `payload`
    #[track_caller]
    pub fn fire_typed<K: SignalDef>(&self, payload: K::Payload) -> bool {
        self.fire(K::wrap(payload))
    }

    /// Emit `trace opened`
    #[track_caller]
    pub fn fire_trace_opened(&self, trace: Trace) -> bool {
        self.fire(Signal::TraceOpened(trace))
    }

    /// Emit `trace closed`
    #[track_caller]
    pub fn fire_trace_closed(&self, trace: Trace) -> bool {
        self.fire(Signal::TraceClosed(trace))
    }

    /// Emit `trace deleted`
    #[track_caller]
    pub fn fire_trace_deleted(&self, trace: Trace) -> bool {
        self.fire(Signal::TraceDeleted(trace))
    }

    /// Emit `trace selected`; `None` clears the selection
    #[track_caller]
    pub fn fire_trace_selected(&self, trace: Option<Trace>) -> bool {
        self.fire(Signal::TraceSelected(trace))
    }

    /// Emit `trace updated`
    #[track_caller]
    pub fn fire_trace_updated(&self, trace: Trace) -> bool {
        self.fire(Signal::TraceUpdated(trace))
    }

    /// Emit `experiment opened`
    #[track_caller]
    pub fn fire_experiment_opened(&self, experiment: Experiment) -> bool {
        self.fire(Signal::ExperimentOpened(experiment))
    }

    /// Emit `experiment closed`
    #[track_caller]
    pub fn fire_experiment_closed(&self, experiment: Experiment) -> bool {
        self.fire(Signal::ExperimentClosed(experiment))
    }

    /// Emit `experiment deleted`
    #[track_caller]
    pub fn fire_experiment_deleted(&self, experiment: Experiment) -> bool {
        self.fire(Signal::ExperimentDeleted(experiment))
    }

    /// Emit `experiment selected`; `None` clears the selection
    #[track_caller]
    pub fn fire_experiment_selected(&self, experiment: Option<Experiment>) -> bool {
        self.fire(Signal::ExperimentSelected(experiment))
    }

    /// Emit `experiment updated`
    #[track_caller]
    pub fn fire_experiment_updated(&self, experiment: Experiment) -> bool {
        self.fire(Signal::ExperimentUpdated(experiment))
    }

    /// Emit `opened traces updated`
    #[track_caller]
    pub fn fire_opened_traces_changed(&self, payload: OpenedTracesUpdated) -> bool {
        self.fire(Signal::OpenedTracesUpdated(payload))
    }

    /// Emit `available outputs changed`
    #[track_caller]
    pub fn fire_available_outputs_changed(&self) -> bool {
        self.fire(Signal::AvailableOutputsChanged(()))
    }

    /// Emit `output added`
    #[track_caller]
    pub fn fire_output_added(&self, payload: OutputAdded) -> bool {
        self.fire(Signal::OutputAdded(payload))
    }

    /// Emit `item properties updated`
    #[track_caller]
    pub fn fire_item_properties_updated(&self, payload: ItemProperties) -> bool {
        self.fire(Signal::ItemPropertiesUpdated(payload))
    }

    /// Emit `theme changed` with the new theme name
    #[track_caller]
    pub fn fire_theme_changed(&self, theme: impl Into<String>) -> bool {
        self.fire(Signal::ThemeChanged(theme.into()))
    }

    // TODO: fold into fire_request_selection_range_change once the table
    // widgets stop sending free-form selections.
    /// Emit `selection changed`
    #[track_caller]
    pub fn fire_selection_changed(&self, payload: BTreeMap<String, String>) -> bool {
        self.fire(Signal::SelectionChanged(payload))
    }

    /// Emit `rows selected changed`
    #[track_caller]
    pub fn fire_row_selections_changed(&self, payload: RowSelectionsChanged) -> bool {
        self.fire(Signal::RowSelectionsChanged(payload))
    }

    /// Emit `tab closed` for the viewer of `trace_uuid`
    #[track_caller]
    pub fn fire_close_trace_viewer_tab(&self, trace_uuid: impl Into<String>) -> bool {
        self.fire(Signal::CloseTraceViewerTab(trace_uuid.into()))
    }

    /// Emit `widget activated`
    #[track_caller]
    pub fn fire_trace_viewer_tab_activated(&self, experiment: Experiment) -> bool {
        self.fire(Signal::TraceViewerTabActivated(experiment))
    }

    /// Emit `update zoom`
    #[track_caller]
    pub fn fire_update_zoom(&self, has_zoomed_in: bool) -> bool {
        self.fire(Signal::UpdateZoom(has_zoomed_in))
    }

    /// Emit `reset zoom`
    #[track_caller]
    pub fn fire_reset_zoom(&self) -> bool {
        self.fire(Signal::ResetZoom(()))
    }

    /// Emit `undo`
    #[track_caller]
    pub fn fire_undo(&self) -> bool {
        self.fire(Signal::Undo(()))
    }

    /// Emit `redo`
    #[track_caller]
    pub fn fire_redo(&self) -> bool {
        self.fire(Signal::Redo(()))
    }

    /// Emit `marker categories fetched`
    #[track_caller]
    pub fn fire_marker_categories_fetched(&self) -> bool {
        self.fire(Signal::MarkerCategoriesFetched(()))
    }

    /// Emit `markersets fetched`
    #[track_caller]
    pub fn fire_markersets_fetched(&self) -> bool {
        self.fire(Signal::MarkerSetsFetched(()))
    }

    /// Emit `marker category closed`
    #[track_caller]
    pub fn fire_marker_category_closed(&self, payload: MarkerCategoryClosed) -> bool {
        self.fire(Signal::MarkerCategoryClosed(payload))
    }

    /// Emit `trace server started`
    #[track_caller]
    pub fn fire_trace_server_started(&self) -> bool {
        self.fire(Signal::TraceServerStarted(()))
    }

    /// Emit `view pinned`
    #[track_caller]
    pub fn fire_pin_view(
        &self,
        output: OutputDescriptor,
        context: Option<serde_json::Value>,
    ) -> bool {
        self.fire(Signal::PinView(PinView { output, context }))
    }

    /// Emit `view unpinned`
    #[track_caller]
    pub fn fire_unpin_view(
        &self,
        output: OutputDescriptor,
        context: Option<serde_json::Value>,
    ) -> bool {
        self.fire(Signal::UnpinView(PinView { output, context }))
    }

    /// Emit `open overview output`
    #[track_caller]
    pub fn fire_open_overview_output(&self, trace_id: impl Into<String>) -> bool {
        self.fire(Signal::OpenOverviewOutput(trace_id.into()))
    }

    /// Emit `overview output selected`
    #[track_caller]
    pub fn fire_overview_output_selected(&self, payload: OverviewOutputSelected) -> bool {
        self.fire(Signal::OverviewOutputSelected(payload))
    }

    /// Emit `save as csv`
    #[track_caller]
    pub fn fire_save_as_csv(&self, payload: SaveAsCsv) -> bool {
        self.fire(Signal::SaveAsCsv(payload))
    }

    /// Emit `view range updated`
    #[track_caller]
    pub fn fire_view_range_updated(&self, payload: TimeRangeUpdate) -> bool {
        self.fire(Signal::ViewRangeUpdated(payload))
    }

    /// Emit `selection range updated`
    #[track_caller]
    pub fn fire_selection_range_updated(&self, payload: TimeRangeUpdate) -> bool {
        self.fire(Signal::SelectionRangeUpdated(payload))
    }

    /// Emit `change selection range`
    #[track_caller]
    pub fn fire_request_selection_range_change(&self, payload: TimeRangeUpdate) -> bool {
        self.fire(Signal::RequestSelectionRangeChange(payload))
    }

    /// Emit `output data changed`
    #[track_caller]
    pub fn fire_output_data_changed(&self, outputs: Vec<OutputDescriptor>) -> bool {
        self.fire(Signal::OutputDataChanged(outputs))
    }

    /// Emit `contribute context menu`
    #[track_caller]
    pub fn fire_contribute_context_menu(&self, payload: ContextMenuContributed) -> bool {
        self.fire(Signal::ContributeContextMenu(payload))
    }

    /// Emit `context menu item clicked`
    #[track_caller]
    pub fn fire_context_menu_item_clicked(&self, payload: ContextMenuItemClicked) -> bool {
        self.fire(Signal::ContextMenuItemClicked(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SignalBusConfig;
    use crate::signals::SignalKind;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn recorder(bus: &SignalManager, kind: SignalKind) -> Arc<Mutex<Vec<Signal>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        bus.subscribe(kind, "recorder", move |signal| {
            s.lock().push(signal.clone());
            Ok(())
        });
        seen
    }

    #[test]
    fn test_fire_routes_to_matching_kind() {
        let bus = SignalManager::with_config(SignalBusConfig::diagnostic());
        let opened = recorder(&bus, SignalKind::TraceOpened);
        let closed = recorder(&bus, SignalKind::TraceClosed);

        assert!(bus.fire_trace_opened(Trace::new("t-1", "kernel")));
        assert_eq!(opened.lock().len(), 1);
        assert!(closed.lock().is_empty());
    }

    #[test]
    fn test_payload_shapes() {
        let bus = SignalManager::with_config(SignalBusConfig::diagnostic());
        let pinned = recorder(&bus, SignalKind::PinView);
        let zoom = recorder(&bus, SignalKind::UpdateZoom);
        let theme = recorder(&bus, SignalKind::ThemeChanged);

        let output = OutputDescriptor::new("cpu", "CPU Usage", "TREE_TIME_XY");
        bus.fire_pin_view(output.clone(), Some(serde_json::json!({ "row": 1 })));
        bus.fire_update_zoom(true);
        bus.fire_theme_changed("dark");

        assert_eq!(
            pinned.lock()[0],
            Signal::PinView(PinView {
                output,
                context: Some(serde_json::json!({ "row": 1 })),
            })
        );
        assert_eq!(zoom.lock()[0], Signal::UpdateZoom(true));
        assert_eq!(theme.lock()[0], Signal::ThemeChanged("dark".to_string()));
    }

    #[test]
    fn test_fire_without_listener() {
        let bus = SignalManager::new();
        assert!(!bus.fire_undo());
        assert!(!bus.fire_markersets_fetched());
        assert!(!bus.fire_save_as_csv(SaveAsCsv::default()));
    }

    #[test]
    fn test_fire_typed() {
        let bus = SignalManager::new();
        let redo = recorder(&bus, SignalKind::Redo);
        assert!(bus.fire_typed::<crate::signals::kinds::Redo>(()));
        assert_eq!(*redo.lock(), vec![Signal::Redo(())]);
    }
}
