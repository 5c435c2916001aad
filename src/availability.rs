use crate::job::Job;
use crate::resource::{Equipment, EquipmentStatus, JobId, Leave, LeaveStatus, ResourceKind};
use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    /// Bounds given in the wrong order are swapped.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn single(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Inclusive overlap: touching on one date counts.
    pub fn overlaps(&self, other: &DateInterval) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A concrete resource: its pool and its id within that pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: u64,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, id: u64) -> Self {
        Self { kind, id }
    }

    pub fn person(id: u64) -> Self {
        Self::new(ResourceKind::Personnel, id)
    }

    pub fn equipment(id: u64) -> Self {
        Self::new(ResourceKind::Equipment, id)
    }

    pub fn subcontractor(id: u64) -> Self {
        Self::new(ResourceKind::Subcontractor, id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPriority {
    Normal,
    Medium,
    High,
    Critical,
}

/// Why a resource is busy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConflictCause {
    /// Listed on another job over an overlapping range.
    Event { job_id: JobId, job_name: String },
    LeaveApproved { leave_id: Option<String> },
    LeavePending { leave_id: Option<String> },
    /// Leave with an unrecognised status.
    LeaveRequested { leave_id: Option<String> },
    Maintenance { maintenance_id: Option<String> },
    OutOfService,
}

impl ConflictCause {
    pub fn priority(&self) -> ConflictPriority {
        match self {
            ConflictCause::Event { .. } | ConflictCause::LeaveRequested { .. } => {
                ConflictPriority::Normal
            }
            ConflictCause::LeavePending { .. } => ConflictPriority::Medium,
            ConflictCause::LeaveApproved { .. } | ConflictCause::Maintenance { .. } => {
                ConflictPriority::High
            }
            ConflictCause::OutOfService => ConflictPriority::Critical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub resource: ResourceRef,
    pub cause: ConflictCause,
    pub priority: ConflictPriority,
    /// Dates of the blocking commitment.
    pub interval: DateInterval,
}

impl Conflict {
    fn new(resource: ResourceRef, cause: ConflictCause, interval: DateInterval) -> Self {
        let priority = cause.priority();
        Self {
            resource,
            cause,
            priority,
            interval,
        }
    }
}

/// Answers "is this resource free over these dates?" across all jobs,
/// leave records and equipment registries. Holds only borrows; build one
/// per query batch.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityIndex<'a> {
    jobs: &'a [Job],
    leaves: &'a [Leave],
    equipment: &'a [Equipment],
}

impl<'a> AvailabilityIndex<'a> {
    pub fn new(jobs: &'a [Job]) -> Self {
        Self {
            jobs,
            leaves: &[],
            equipment: &[],
        }
    }

    pub fn with_leaves(mut self, leaves: &'a [Leave]) -> Self {
        self.leaves = leaves;
        self
    }

    pub fn with_equipment(mut self, equipment: &'a [Equipment]) -> Self {
        self.equipment = equipment;
        self
    }

    /// Every commitment that blocks `resource` over `interval`, most
    /// severe first. Jobs with `excluding` as id and jobs without both
    /// dates are skipped.
    pub fn conflicts(
        &self,
        resource: ResourceRef,
        interval: DateInterval,
        excluding: Option<JobId>,
    ) -> Vec<Conflict> {
        let mut conflicts = Vec::new();

        for job in self.jobs {
            if Some(job.id) == excluding || !job.lists(resource.kind, resource.id) {
                continue;
            }
            let Some(busy) = job.interval_for(resource.kind, resource.id) else {
                continue;
            };
            if busy.overlaps(&interval) {
                conflicts.push(Conflict::new(
                    resource,
                    ConflictCause::Event {
                        job_id: job.id,
                        job_name: job.name.clone(),
                    },
                    busy,
                ));
            }
        }

        match resource.kind {
            ResourceKind::Personnel => self.leave_conflicts(resource, interval, &mut conflicts),
            ResourceKind::Equipment => {
                self.equipment_conflicts(resource, interval, &mut conflicts)
            }
            ResourceKind::Subcontractor => {}
        }

        // Stable: equal priorities keep discovery order.
        conflicts.sort_by(|a, b| b.priority.cmp(&a.priority));
        conflicts
    }

    fn leave_conflicts(
        &self,
        resource: ResourceRef,
        interval: DateInterval,
        conflicts: &mut Vec<Conflict>,
    ) {
        for leave in self.leaves.iter().filter(|l| l.person_id == resource.id) {
            let busy = DateInterval::new(leave.start, leave.end);
            if !busy.overlaps(&interval) {
                continue;
            }
            let cause = match leave.status {
                LeaveStatus::Approved => ConflictCause::LeaveApproved {
                    leave_id: leave.id.clone(),
                },
                LeaveStatus::Pending => ConflictCause::LeavePending {
                    leave_id: leave.id.clone(),
                },
                LeaveStatus::Other => ConflictCause::LeaveRequested {
                    leave_id: leave.id.clone(),
                },
                LeaveStatus::Refused => continue,
            };
            conflicts.push(Conflict::new(resource, cause, busy));
        }
    }

    fn equipment_conflicts(
        &self,
        resource: ResourceRef,
        interval: DateInterval,
        conflicts: &mut Vec<Conflict>,
    ) {
        let Some(equipment) = self.equipment.iter().find(|e| e.id == resource.id) else {
            return;
        };
        for maintenance in &equipment.maintenances {
            let busy = DateInterval::new(maintenance.start, maintenance.end_or_start());
            if busy.overlaps(&interval) {
                conflicts.push(Conflict::new(
                    resource,
                    ConflictCause::Maintenance {
                        maintenance_id: maintenance.id.clone(),
                    },
                    busy,
                ));
            }
        }
        if equipment.status == EquipmentStatus::OutOfService {
            conflicts.push(Conflict::new(resource, ConflictCause::OutOfService, interval));
        }
    }

    /// `true` when nothing blocks the resource over `interval`.
    pub fn is_available(
        &self,
        resource_id: u64,
        kind: ResourceKind,
        interval: DateInterval,
        excluding: Option<JobId>,
    ) -> bool {
        self.conflicts(ResourceRef::new(kind, resource_id), interval, excluding)
            .is_empty()
    }

    /// Candidates free over `interval`, in input order.
    pub fn available_among(
        &self,
        kind: ResourceKind,
        candidates: &[u64],
        interval: DateInterval,
        excluding: Option<JobId>,
    ) -> Vec<u64> {
        candidates
            .iter()
            .copied()
            .filter(|&id| self.is_available(id, kind, interval, excluding))
            .collect()
    }

    /// Conflicts for every resource `job` lists, checked against every
    /// other job. A job without both dates has none.
    pub fn job_conflicts(&self, job: &Job) -> Vec<Conflict> {
        let Some(interval) = job.date_interval() else {
            return Vec::new();
        };
        let resources: Vec<ResourceRef> = job
            .personnel
            .iter()
            .map(|&id| ResourceRef::person(id))
            .chain(job.equipements.iter().map(|&id| ResourceRef::equipment(id)))
            .chain(job.sous_traitants.iter().map(|&id| ResourceRef::subcontractor(id)))
            .collect();

        resources
            .par_iter()
            .map(|&resource| self.conflicts(resource, interval, Some(job.id)))
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }
}
