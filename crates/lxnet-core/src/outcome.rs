//! Reconciliation results

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Change-set slot for the description change
pub const DESCRIPTION_SLOT: &str = "description";

/// Change-set slot recording a (planned) creation
pub const CREATED_SLOT: &str = "created";

/// Change-set slot recording a (planned) deletion
pub const REMOVED_SLOT: &str = "removed";

/// Final status of a reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Changes were applied
    Success,
    /// Nothing to do
    NoOp,
    /// Dry-run: changes would be applied
    Pending,
    /// The remote side reported an error
    Failure,
}

impl std::fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutcomeStatus::Success => write!(f, "success"),
            OutcomeStatus::NoOp => write!(f, "no-op"),
            OutcomeStatus::Pending => write!(f, "pending"),
            OutcomeStatus::Failure => write!(f, "failure"),
        }
    }
}

/// A single recorded change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    Created { message: String },
    Removed { message: String },
    Description { old: String, new: String },
    ConfigAdded { key: String, value: String },
    ConfigUpdated { key: String, old: String, new: String },
}

impl std::fmt::Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Created { message } | Change::Removed { message } => write!(f, "{message}"),
            Change::Description { old, new } => {
                write!(f, "Description changed, from \"{old}\" to \"{new}\".")
            }
            Change::ConfigAdded { key, value } => {
                write!(f, "Added config key \"{key}\" = \"{value}\"")
            }
            Change::ConfigUpdated { key, old, new } => {
                write!(f, "Changed config key \"{key}\" to \"{new}\", its value was \"{old}\"")
            }
        }
    }
}

/// Changes keyed by slot, in the order they were discovered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet {
    entries: IndexMap<String, Change>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change-set holding a single entry
    pub fn single(slot: impl Into<String>, change: Change) -> Self {
        let mut changes = Self::new();
        changes.insert(slot, change);
        changes
    }

    pub fn insert(&mut self, slot: impl Into<String>, change: Change) {
        self.entries.insert(slot.into(), change);
    }

    pub fn get(&self, slot: &str) -> Option<&Change> {
        self.entries.get(slot)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Change)> {
        self.entries.iter().map(|(slot, change)| (slot.as_str(), change))
    }
}

/// Result of one `present` / `absent` invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    name: String,
    status: OutcomeStatus,
    comment: String,
    changes: ChangeSet,
}

impl Outcome {
    fn new(name: impl Into<String>, status: OutcomeStatus, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            comment: comment.into(),
            changes: ChangeSet::new(),
        }
    }

    pub fn success(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self::new(name, OutcomeStatus::Success, comment)
    }

    pub fn no_op(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self::new(name, OutcomeStatus::NoOp, comment)
    }

    pub fn pending(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self::new(name, OutcomeStatus::Pending, comment)
    }

    pub fn failure(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self::new(name, OutcomeStatus::Failure, comment)
    }

    pub fn with_changes(mut self, changes: ChangeSet) -> Self {
        self.changes = changes;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> OutcomeStatus {
        self.status
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn changes(&self) -> &ChangeSet {
        &self.changes
    }

    /// `Success` and `NoOp`
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Success | OutcomeStatus::NoOp)
    }

    pub fn is_failure(&self) -> bool {
        self.status == OutcomeStatus::Failure
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.status, self.name, self.comment)?;
        for (slot, change) in self.changes.iter() {
            write!(f, "\n  {slot}: {change}")?;
        }
        Ok(())
    }
}

/// Counts of outcomes by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub changed: usize,
    pub unchanged: usize,
    pub pending: usize,
    pub failed: usize,
}

impl Summary {
    pub fn of(outcomes: &[Outcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            match outcome.status() {
                OutcomeStatus::Success => summary.changed += 1,
                OutcomeStatus::NoOp => summary.unchanged += 1,
                OutcomeStatus::Pending => summary.pending += 1,
                OutcomeStatus::Failure => summary.failed += 1,
            }
        }
        summary
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} changed, {} unchanged, {} pending, {} failed",
            self.changed, self.unchanged, self.pending, self.failed
        )
    }
}
