//! Payload types carried by signals.
//!
//! Each signal kind carries exactly one of these shapes. They mirror what the
//! trace server hands back to the viewer (traces, experiments, output
//! descriptors) plus the small UI payloads widgets exchange between each other.
//! All payloads are cloneable and serializable so they can be logged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single trace known to the trace server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    /// Server-assigned unique identifier.
    pub uuid: String,
    /// Display name.
    pub name: String,
    /// Path of the trace on the server host.
    pub path: String,
    /// Number of events indexed so far.
    pub nb_events: u64,
    /// First event timestamp (ns).
    pub start: i64,
    /// Last event timestamp (ns).
    pub end: i64,
}

impl Trace {
    /// Create a trace with the given identifier and name
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A set of traces opened together and analysed as one
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experiment {
    /// Server-assigned unique identifier.
    pub uuid: String,
    /// Display name.
    pub name: String,
    /// Traces making up the experiment.
    pub traces: Vec<Trace>,
    /// Number of events indexed so far.
    pub nb_events: u64,
    /// First event timestamp (ns).
    pub start: i64,
    /// Last event timestamp (ns).
    pub end: i64,
}

impl Experiment {
    /// Create an empty experiment with the given identifier and name
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Describes one analysis output (chart, table, tree) an experiment provides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDescriptor {
    /// Output identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Human readable description.
    pub description: String,
    /// Provider type (e.g. `TIME_GRAPH`, `TABLE`, `TREE_TIME_XY`).
    pub provider_type: String,
    /// Parent output, for grouped outputs.
    pub parent_id: Option<String>,
}

impl OutputDescriptor {
    /// Create a descriptor with an id, name and provider type
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        provider_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            provider_type: provider_type.into(),
            ..Default::default()
        }
    }
}

/// Number of traces currently opened in the viewer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenedTracesUpdated {
    /// Count of opened traces after the change.
    pub number_of_opened_traces: usize,
}

/// An output was added to an experiment's view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputAdded {
    /// The added output.
    pub output: OutputDescriptor,
    /// The experiment the output belongs to.
    pub experiment: Experiment,
}

/// Properties of the item currently selected in a view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemProperties {
    /// Key/value properties to display.
    pub properties: BTreeMap<String, String>,
    /// Experiment the item comes from.
    pub experiment_uuid: Option<String>,
    /// Output the item comes from.
    pub output_id: Option<String>,
}

/// Rows selected in a data table changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSelectionsChanged {
    /// Trace (or experiment) the table belongs to.
    pub trace_id: String,
    /// Output backing the table.
    pub output_id: String,
    /// Column values of each selected row.
    pub rows: Vec<BTreeMap<String, String>>,
}

/// A marker category was closed in a trace viewer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerCategoryClosed {
    /// Trace viewer widget id.
    pub trace_viewer_id: String,
    /// Name of the closed category.
    pub marker_category: String,
}

/// A view was pinned or unpinned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinView {
    /// The pinned output.
    pub output: OutputDescriptor,
    /// Widget-specific context attached by the producer.
    pub context: Option<serde_json::Value>,
}

/// An output was selected in the overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewOutputSelected {
    /// Trace the overview belongs to.
    pub trace_id: String,
    /// The selected output.
    pub output_descriptor: OutputDescriptor,
}

/// Serialized table data to save as CSV
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveAsCsv {
    /// Trace the data belongs to.
    pub trace_id: String,
    /// CSV content.
    pub data: String,
}

/// A time range, in nanoseconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Range start.
    pub start: i64,
    /// Range end.
    pub end: i64,
    /// Offset applied when displaying the range.
    pub offset: Option<i64>,
}

impl TimeRange {
    /// Create a range without display offset
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            offset: None,
        }
    }

    /// Length of the range
    pub fn duration(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }
}

/// View or selection range of an experiment changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRangeUpdate {
    /// Experiment whose range changed.
    pub experiment_uuid: String,
    /// New range, `None` when cleared.
    pub time_range: Option<TimeRange>,
}

/// One entry in a contributed context menu
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMenuItem {
    /// Item identifier, echoed back when clicked.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Submenu this item lives in, if any.
    pub parent_menu_id: Option<String>,
}

/// An output contributes entries to its context menu
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMenuContributed {
    /// Output descriptor owning the menu.
    pub output_descriptor_id: String,
    /// Contributed entries.
    pub menu_items: Vec<ContextMenuItem>,
}

/// A contributed context menu entry was clicked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMenuItemClicked {
    /// Clicked item id.
    pub item_id: String,
    /// Output the menu was opened on.
    pub output_id: String,
    /// Properties of the element under the cursor.
    pub props: BTreeMap<String, String>,
}
