//! Signal catalog.
//!
//! The closed set of signal kinds the bus can carry. Each kind has a stable,
//! human-readable name and exactly one payload type. Names are part of the
//! public contract: widgets and extensions may hold them as plain strings, so
//! renaming one is a breaking change.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::SignalError;
use crate::payloads;

/// Compile-time description of one signal kind.
///
/// Implemented by the zero-sized markers in [`kinds`]; lets
/// [`SignalManager::on`](super::SignalManager::on) hand subscribers the
/// concrete payload instead of the whole [`Signal`].
pub trait SignalDef: 'static {
    /// The kind this marker stands for.
    const KIND: SignalKind;
    /// Payload carried by signals of this kind.
    type Payload: Clone + std::fmt::Debug + Send + Sync + 'static;

    /// Borrow the payload if `signal` is of this kind
    fn payload(signal: &Signal) -> Option<&Self::Payload>;

    /// Wrap a payload into a [`Signal`] of this kind
    fn wrap(payload: Self::Payload) -> Signal;
}

macro_rules! signal_catalog {
    ($(
        $(#[doc = $doc:literal])*
        $variant:ident => $name:literal, $payload:ty;
    )*) => {
        /// Every kind of signal the bus carries
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum SignalKind {
            $(
                $(#[doc = $doc])*
                $variant,
            )*
        }

        impl SignalKind {
            /// All signal kinds, in catalog order.
            pub const ALL: &'static [SignalKind] = &[$(SignalKind::$variant),*];

            /// Stable name of this kind
            pub fn name(self) -> &'static str {
                match self {
                    $(SignalKind::$variant => $name,)*
                }
            }

            /// Look up a kind by its stable name
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(SignalKind::$variant),)*
                    _ => None,
                }
            }
        }

        /// A signal together with its payload
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        pub enum Signal {
            $(
                $(#[doc = $doc])*
                $variant($payload),
            )*
        }

        impl Signal {
            /// Kind of this signal
            pub fn kind(&self) -> SignalKind {
                match self {
                    $(Signal::$variant(_) => SignalKind::$variant,)*
                }
            }
        }

        /// Marker types for typed subscription, one per [`SignalKind`].
        pub mod kinds {
            use super::{Signal, SignalDef, SignalKind};

            $(
                $(#[doc = $doc])*
                #[derive(Debug, Clone, Copy, Default)]
                pub struct $variant;

                impl SignalDef for $variant {
                    const KIND: SignalKind = SignalKind::$variant;
                    type Payload = $payload;

                    fn payload(signal: &Signal) -> Option<&Self::Payload> {
                        match signal {
                            Signal::$variant(payload) => Some(payload),
                            _ => None,
                        }
                    }

                    fn wrap(payload: Self::Payload) -> Signal {
                        Signal::$variant(payload)
                    }
                }
            )*
        }
    };
}

signal_catalog! {
    /// A trace was opened.
    TraceOpened => "trace opened", crate::payloads::Trace;
    /// A trace was closed.
    TraceClosed => "trace closed", crate::payloads::Trace;
    /// A trace was deleted from the server.
    TraceDeleted => "trace deleted", crate::payloads::Trace;
    /// The selected trace changed (`None` clears the selection).
    TraceSelected => "trace selected", Option<crate::payloads::Trace>;
    /// Trace metadata (e.g. indexing progress) changed.
    TraceUpdated => "trace updated", crate::payloads::Trace;
    /// An experiment was opened.
    ExperimentOpened => "experiment opened", crate::payloads::Experiment;
    /// An experiment was closed.
    ExperimentClosed => "experiment closed", crate::payloads::Experiment;
    /// An experiment was deleted from the server.
    ExperimentDeleted => "experiment deleted", crate::payloads::Experiment;
    /// The selected experiment changed (`None` clears the selection).
    ExperimentSelected => "experiment selected", Option<crate::payloads::Experiment>;
    /// Experiment metadata changed.
    ExperimentUpdated => "experiment updated", crate::payloads::Experiment;
    /// The set of opened traces changed.
    OpenedTracesUpdated => "opened traces updated", crate::payloads::OpenedTracesUpdated;
    /// The outputs available for the current experiment changed.
    AvailableOutputsChanged => "available outputs changed", ();
    /// An output was added to a view.
    OutputAdded => "output added", crate::payloads::OutputAdded;
    /// Properties of the selected item changed.
    ItemPropertiesUpdated => "item properties updated", crate::payloads::ItemProperties;
    /// The UI theme changed.
    ThemeChanged => "theme changed", String;
    /// Free-form selection changed.
    SelectionChanged => "selection changed", std::collections::BTreeMap<String, String>;
    /// Selected table rows changed.
    RowSelectionsChanged => "rows selected changed", crate::payloads::RowSelectionsChanged;
    /// A trace viewer tab was closed.
    CloseTraceViewerTab => "tab closed", String;
    /// A trace viewer tab was activated.
    TraceViewerTabActivated => "widget activated", crate::payloads::Experiment;
    /// Zoom state changed (`true` when zoomed in).
    UpdateZoom => "update zoom", bool;
    /// Zoom was reset.
    ResetZoom => "reset zoom", ();
    /// Undo the last view change.
    Undo => "undo", ();
    /// Redo the last undone view change.
    Redo => "redo", ();
    /// Marker categories were fetched.
    MarkerCategoriesFetched => "marker categories fetched", ();
    /// Marker sets were fetched.
    MarkerSetsFetched => "markersets fetched", ();
    /// A marker category was closed.
    MarkerCategoryClosed => "marker category closed", crate::payloads::MarkerCategoryClosed;
    /// The trace server started.
    TraceServerStarted => "trace server started", ();
    /// A view was pinned.
    PinView => "view pinned", crate::payloads::PinView;
    /// A view was unpinned.
    UnpinView => "view unpinned", crate::payloads::PinView;
    /// Request to open the overview output of a trace.
    OpenOverviewOutput => "open overview output", String;
    /// An output was selected in the overview.
    OverviewOutputSelected => "overview output selected", crate::payloads::OverviewOutputSelected;
    /// Table data should be saved as CSV.
    SaveAsCsv => "save as csv", crate::payloads::SaveAsCsv;
    /// The visible time range changed.
    ViewRangeUpdated => "view range updated", crate::payloads::TimeRangeUpdate;
    /// The selected time range changed.
    SelectionRangeUpdated => "selection range updated", crate::payloads::TimeRangeUpdate;
    /// A widget asks for the selection range to change.
    RequestSelectionRangeChange => "change selection range", crate::payloads::TimeRangeUpdate;
    /// Data of one or more outputs changed.
    OutputDataChanged => "output data changed", Vec<crate::payloads::OutputDescriptor>;
    /// An output contributes context menu entries.
    ContributeContextMenu => "contribute context menu", crate::payloads::ContextMenuContributed;
    /// A contributed context menu entry was clicked.
    ContextMenuItemClicked => "context menu item clicked", crate::payloads::ContextMenuItemClicked;
}

impl Signal {
    /// Name of the trace or experiment this signal is about, for log lines
    pub fn subject_name(&self) -> Option<&str> {
        match self {
            Signal::TraceOpened(trace)
            | Signal::TraceClosed(trace)
            | Signal::TraceDeleted(trace)
            | Signal::TraceUpdated(trace)
            | Signal::TraceSelected(Some(trace)) => Some(&trace.name),
            Signal::ExperimentOpened(exp)
            | Signal::ExperimentClosed(exp)
            | Signal::ExperimentDeleted(exp)
            | Signal::ExperimentUpdated(exp)
            | Signal::TraceViewerTabActivated(exp)
            | Signal::ExperimentSelected(Some(exp)) => Some(&exp.name),
            Signal::OutputAdded(payloads::OutputAdded { experiment, .. }) => Some(&experiment.name),
            Signal::PinView(pin) | Signal::UnpinView(pin) => Some(&pin.output.name),
            _ => None,
        }
    }

    /// Build a [`Signal::SelectionChanged`] from key/value pairs
    pub fn selection_changed<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Signal::SelectionChanged(map)
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SignalKind {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignalKind::from_name(s).ok_or_else(|| SignalError::UnknownSignalName {
            name: s.to_string(),
        })
    }
}

impl Serialize for SignalKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for SignalKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payloads::{Experiment, Trace};
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique_and_resolve() {
        let mut seen = HashSet::new();
        for kind in SignalKind::ALL {
            assert!(seen.insert(kind.name()), "duplicate name {}", kind.name());
            assert_eq!(SignalKind::from_name(kind.name()), Some(*kind));
        }
        assert_eq!(seen.len(), SignalKind::ALL.len());
    }

    #[test]
    fn test_stable_names() {
        assert_eq!(SignalKind::TraceOpened.name(), "trace opened");
        assert_eq!(SignalKind::RowSelectionsChanged.name(), "rows selected changed");
        assert_eq!(SignalKind::CloseTraceViewerTab.name(), "tab closed");
        assert_eq!(SignalKind::TraceViewerTabActivated.name(), "widget activated");
        assert_eq!(SignalKind::MarkerSetsFetched.name(), "markersets fetched");
        assert_eq!(
            SignalKind::RequestSelectionRangeChange.name(),
            "change selection range"
        );
    }

    #[test]
    fn test_unknown_name() {
        let err = "trace exploded".parse::<SignalKind>().unwrap_err();
        assert!(matches!(err, SignalError::UnknownSignalName { .. }));
    }

    #[test]
    fn test_kind_serializes_by_name() {
        let json = serde_json::to_string(&SignalKind::ThemeChanged).expect("Should serialize");
        assert_eq!(json, "\"theme changed\"");
        let parsed: SignalKind = serde_json::from_str("\"view pinned\"").expect("Should parse");
        assert_eq!(parsed, SignalKind::PinView);
        assert!(serde_json::from_str::<SignalKind>("\"nope\"").is_err());
    }

    #[test]
    fn test_signal_kind_and_subject() {
        let signal = Signal::TraceOpened(Trace::new("t-1", "kernel"));
        assert_eq!(signal.kind(), SignalKind::TraceOpened);
        assert_eq!(signal.subject_name(), Some("kernel"));

        let signal = Signal::ExperimentSelected(None);
        assert_eq!(signal.subject_name(), None);

        let signal = Signal::TraceViewerTabActivated(Experiment::new("e-1", "boot"));
        assert_eq!(signal.subject_name(), Some("boot"));

        assert_eq!(Signal::Undo(()).subject_name(), None);
    }

    #[test]
    fn test_markers() {
        let signal = kinds::ThemeChanged::wrap("dark".to_string());
        assert_eq!(signal.kind(), kinds::ThemeChanged::KIND);
        assert_eq!(
            kinds::ThemeChanged::payload(&signal).map(String::as_str),
            Some("dark")
        );
        assert!(kinds::UpdateZoom::payload(&signal).is_none());
    }

    #[test]
    fn test_selection_changed_builder() {
        let signal = Signal::selection_changed([("row", "4"), ("column", "name")]);
        match signal {
            Signal::SelectionChanged(map) => {
                assert_eq!(map.get("row").map(String::as_str), Some("4"));
                assert_eq!(map.len(), 2);
            }
            other => panic!("Wrong signal: {:?}", other),
        }
    }
}
