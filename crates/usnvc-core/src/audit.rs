//! Audit hook for document construction
//!
//! The builder reports three stage transitions per successful build through
//! an injected [`ChangeObserver`]. Observers receive borrowed snapshots and
//! cannot mutate the document under construction.

use std::fmt;

use parking_lot::Mutex;
use tracing::info;

use crate::document::UnitDocument;
use crate::identity::UnitId;

/// Stage transitions reported while a unit document is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStage {
    /// Skeleton with identifiers and empty sections
    Create,
    /// Overview text fields and display title populated
    Overview,
    /// Every section assembled
    Complete,
}

impl BuildStage {
    /// Stages in the order they are reported
    pub const ALL: [BuildStage; 3] = [BuildStage::Create, BuildStage::Overview, BuildStage::Complete];

    pub fn name(self) -> &'static str {
        match self {
            BuildStage::Create => "Create",
            BuildStage::Overview => "Overview",
            BuildStage::Complete => "Complete",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            BuildStage::Create => "Initialize unit document skeleton",
            BuildStage::Overview => "Populate overview and display title",
            BuildStage::Complete => "Assemble full unit document",
        }
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single stage transition
#[derive(Debug, Clone, Copy)]
pub struct ChangeEvent<'a> {
    pub unit_id: UnitId,
    pub stage: BuildStage,
    /// Name of the operation that produced the change
    pub function_name: &'static str,
    pub previous: &'a UnitDocument,
    pub current: &'a UnitDocument,
}

impl ChangeEvent<'_> {
    pub fn stage_name(&self) -> &'static str {
        self.stage.name()
    }

    pub fn stage_description(&self) -> &'static str {
        self.stage.description()
    }
}

/// Observer of document stage transitions
///
/// Implementations must not panic; the builder does not guard against
/// observer failures.
pub trait ChangeObserver: Send + Sync {
    fn observe(&self, event: &ChangeEvent<'_>);
}

/// Observer that ignores every event (the default)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ChangeObserver for NoopObserver {
    fn observe(&self, _event: &ChangeEvent<'_>) {}
}

/// Observer that logs each transition as a structured tracing event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ChangeObserver for TracingObserver {
    fn observe(&self, event: &ChangeEvent<'_>) {
        let populated = event
            .current
            .populated_paths()
            .map(|paths| paths.len())
            .unwrap_or_default();
        info!(
            unit_id = %event.unit_id,
            stage = event.stage_name(),
            function = event.function_name,
            populated,
            "{}",
            event.stage_description()
        );
    }
}

/// Owned copy of a change event
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedChange {
    pub unit_id: UnitId,
    pub stage: BuildStage,
    pub function_name: String,
    pub previous: UnitDocument,
    pub current: UnitDocument,
}

/// In-memory change ledger recording every event it observes
#[derive(Debug, Default)]
pub struct ChangeLedger {
    entries: Mutex<Vec<RecordedChange>>,
}

impl ChangeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded events
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Copy of all recorded events, oldest first
    pub fn entries(&self) -> Vec<RecordedChange> {
        self.entries.lock().clone()
    }

    /// Recorded events for one unit, oldest first
    pub fn entries_for(&self, unit_id: UnitId) -> Vec<RecordedChange> {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.unit_id == unit_id)
            .cloned()
            .collect()
    }

    /// Drain all recorded events
    pub fn take(&self) -> Vec<RecordedChange> {
        std::mem::take(&mut *self.entries.lock())
    }
}

impl ChangeObserver for ChangeLedger {
    fn observe(&self, event: &ChangeEvent<'_>) {
        self.entries.lock().push(RecordedChange {
            unit_id: event.unit_id,
            stage: event.stage,
            function_name: event.function_name.to_string(),
            previous: event.previous.clone(),
            current: event.current.clone(),
        });
    }
}
