use crate::availability::AvailabilityIndex;
use crate::error::EngineError;
use crate::job::Job;
use crate::resource::{Directory, Equipment, JobId, Leave, Person, Subcontractor};
use crate::schedule::{ScheduleOrchestrator, ScheduleResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// All jobs plus the shared registries they draw resources from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub personnel: Vec<Person>,
    #[serde(rename = "equipements", default)]
    pub equipment: Vec<Equipment>,
    #[serde(rename = "sousTraitants", default)]
    pub subcontractors: Vec<Subcontractor>,
    #[serde(rename = "conges", alias = "leaves", default)]
    pub leaves: Vec<Leave>,
}

impl Workspace {
    pub fn directory(&self) -> Directory<'_> {
        Directory::new(&self.personnel, &self.equipment)
    }

    pub fn availability(&self) -> AvailabilityIndex<'_> {
        AvailabilityIndex::new(&self.jobs)
            .with_leaves(&self.leaves)
            .with_equipment(&self.equipment)
    }

    pub fn job(&self, id: JobId) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn job_mut(&mut self, id: JobId) -> Option<&mut Job> {
        self.jobs.iter_mut().find(|job| job.id == id)
    }

    /// Replaces the job with the same id, or appends it.
    pub fn upsert_job(&mut self, job: Job) {
        match self.job_mut(job.id) {
            Some(existing) => *existing = job,
            None => self.jobs.push(job),
        }
    }

    pub fn remove_job(&mut self, id: JobId) -> Option<Job> {
        let position = self.jobs.iter().position(|job| job.id == id)?;
        Some(self.jobs.remove(position))
    }

    pub fn recompute(
        &self,
        id: JobId,
        orchestrator: &ScheduleOrchestrator,
    ) -> Result<ScheduleResult, EngineError> {
        let job = self.job(id).ok_or(EngineError::UnknownJob(id))?;
        Ok(orchestrator.recompute(job, self.directory()))
    }

    /// Every job's schedule, in job order. Jobs are independent, so they
    /// are computed in parallel.
    pub fn recompute_all(&self, orchestrator: &ScheduleOrchestrator) -> Vec<(JobId, ScheduleResult)> {
        let directory = self.directory();
        self.jobs
            .par_iter()
            .map(|job| (job.id, orchestrator.recompute(job, directory)))
            .collect()
    }
}
