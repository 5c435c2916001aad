use crate::availability::ResourceRef;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-fatal findings from a recompute. Step positions are indices into
/// the job's active step list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleDiagnostic {
    /// `step` depends on `predecessor` along a cycle; that link was ignored.
    CyclicDependency { step: usize, predecessor: usize },
    /// `step` names a predecessor that is not an active step.
    DanglingDependency { step: usize, predecessor: usize },
    /// Duration was missing, malformed or below the floor.
    DurationClamped { step: usize, given: f64, applied: f64 },
    /// Anchoring `step` on `predecessor` left the representable calendar;
    /// the link was ignored.
    LinkOutOfRange { step: usize, predecessor: usize },
    /// `step` would end past the representable calendar; its end was capped.
    EndOutOfRange { step: usize, duration_hours: f64 },
    /// The job has no start date, so nothing could be timed.
    MissingStartDate,
    /// Critical path analysis failed and fell back to the last task.
    CriticalPathFallback { reason: String },
    /// An assigned resource is missing from the directory.
    UnresolvedResource { resource: ResourceRef },
}

impl fmt::Display for ScheduleDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleDiagnostic::CyclicDependency { step, predecessor } => write!(
                f,
                "circular dependency at step {}: link to step {} ignored",
                step + 1,
                predecessor + 1
            ),
            ScheduleDiagnostic::DanglingDependency { step, predecessor } => write!(
                f,
                "step {} depends on unknown step index {predecessor}",
                step + 1
            ),
            ScheduleDiagnostic::DurationClamped {
                step,
                given,
                applied,
            } => write!(
                f,
                "step {} duration {given} replaced by {applied}h",
                step + 1
            ),
            ScheduleDiagnostic::LinkOutOfRange { step, predecessor } => write!(
                f,
                "step {} link to step {} overflows the calendar and was ignored",
                step + 1,
                predecessor + 1
            ),
            ScheduleDiagnostic::EndOutOfRange {
                step,
                duration_hours,
            } => write!(
                f,
                "step {} end after {duration_hours}h overflows the calendar and was capped",
                step + 1
            ),
            ScheduleDiagnostic::MissingStartDate => write!(f, "job has no start date"),
            ScheduleDiagnostic::CriticalPathFallback { reason } => {
                write!(f, "critical path fell back to last task: {reason}")
            }
            ScheduleDiagnostic::UnresolvedResource { resource } => write!(
                f,
                "{} {} is not in the directory",
                resource.kind.as_str(),
                resource.id
            ),
        }
    }
}
