pub mod assignment;
pub mod availability;
pub mod baseline;
pub mod calculations;
pub mod calendar;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod job;
pub mod job_validation;
pub mod persistence;
pub mod resource;
pub mod schedule;
mod serde_support;
pub mod step;
pub mod table;
pub mod task;
pub mod team;
pub mod workspace;

pub use assignment::{TeamAssignmentResolver, resolve_assignments};
pub use availability::{
    AvailabilityIndex, Conflict, ConflictCause, ConflictPriority, DateInterval, ResourceRef,
};
pub use baseline::{Baseline, TaskVariance};
pub use calculations::{CriticalPathAnalyzer, compute_task_timing, critical_path};
pub use calendar::{JobDay, JobSpan, ScheduleWindow, WorkCalendar, WorkCalendarConfig, end_date};
pub use config::EngineConfig;
pub use diagnostics::ScheduleDiagnostic;
pub use error::EngineError;
pub use graph::{DependencyGraph, GraphBuilder, topological_order};
pub use job::{AssignmentMode, GanttMode, Job, ScheduleType};
pub use job_validation::{JobValidationError, validate_job, validate_workspace};
pub use resource::{
    Assignment, Directory, Equipment, EquipmentStatus, Leave, LeaveStatus, Person, ResourceKind,
};
pub use schedule::{ScheduleOrchestrator, ScheduleResult, ScheduleSummary, recompute};
pub use step::{DependencyType, Priority, Step};
pub use task::Task;
pub use team::{Team, TeamId, TeamRef, TeamShift, TeamUpdate};
pub use workspace::Workspace;
