use crate::resource::{EquipmentId, PersonId};
use crate::serde_support::lenient_hours;
use serde::{Deserialize, Serialize};

/// Shortest schedulable step, in hours.
pub const MIN_STEP_HOURS: f64 = 0.25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

/// Precedence constraint between a step and each of its predecessors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DependencyType {
    /// Finish-to-start.
    #[default]
    FS,
    /// Start-to-start.
    SS,
    /// Finish-to-finish.
    FF,
    /// Start-to-finish.
    SF,
}

impl DependencyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyType::FS => "FS",
            DependencyType::SS => "SS",
            DependencyType::FF => "FF",
            DependencyType::SF => "SF",
        }
    }
}

fn default_duration() -> f64 {
    MIN_STEP_HOURS
}

/// A unit of work inside a job, as authored in the editor.
///
/// `dependencies` holds positions in the job's active step list (steps with
/// non-empty text); the link type and lead/lag apply to every predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_duration", with = "lenient_hours")]
    pub duration: f64,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub is_parallel: bool,
    #[serde(default)]
    pub dependencies: Vec<usize>,
    #[serde(default)]
    pub dependency_type: DependencyType,
    #[serde(default, with = "lenient_hours")]
    pub lead_lag: f64,
    #[serde(default)]
    pub assigned_personnel: Vec<PersonId>,
    #[serde(default)]
    pub assigned_equipment: Vec<EquipmentId>,
}

impl Step {
    pub fn new(text: impl Into<String>, duration: f64) -> Self {
        Self {
            id: None,
            text: text.into(),
            duration,
            completed: false,
            priority: Priority::Normal,
            is_parallel: false,
            dependencies: Vec::new(),
            dependency_type: DependencyType::FS,
            lead_lag: 0.0,
            assigned_personnel: Vec::new(),
            assigned_equipment: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn after(mut self, predecessors: impl IntoIterator<Item = usize>) -> Self {
        for predecessor in predecessors {
            self.add_dependency(predecessor);
        }
        self
    }

    pub fn with_link(mut self, dependency_type: DependencyType, lead_lag: f64) -> Self {
        self.dependency_type = dependency_type;
        self.lead_lag = lead_lag;
        self
    }

    /// Steps with blank text are ignored by scheduling.
    pub fn is_active(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Duration in hours, with malformed values replaced by the floor.
    pub fn effective_duration(&self, min_hours: f64) -> f64 {
        if self.duration.is_finite() && self.duration > 0.0 {
            self.duration.max(min_hours)
        } else {
            min_hours
        }
    }

    /// Lead (negative) or lag (positive) in hours; malformed values count as zero.
    pub fn effective_lead_lag(&self) -> f64 {
        if self.lead_lag.is_finite() {
            self.lead_lag
        } else {
            0.0
        }
    }

    /// Adds a predecessor, keeping the set ordered by insertion and
    /// free of duplicates. Returns `false` when nothing changed.
    ///
    /// A step does not know its own position, so self-links are refused
    /// by [`Job::add_dependency`](crate::job::Job::add_dependency); one
    /// written here directly is dropped by the graph as a back edge.
    pub fn add_dependency(&mut self, predecessor: usize) -> bool {
        if self.dependencies.contains(&predecessor) {
            return false;
        }
        self.dependencies.push(predecessor);
        true
    }

    pub fn remove_dependency(&mut self, predecessor: usize) -> bool {
        let before = self.dependencies.len();
        self.dependencies.retain(|&dep| dep != predecessor);
        before != self.dependencies.len()
    }
}
