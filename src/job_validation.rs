use crate::job::Job;
use crate::resource::{JobId, PersonId};
use crate::team::{TeamId, TeamRef};
use crate::workspace::Workspace;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Structural problems in a job record. Scheduling tolerates all of these;
/// validation exists for snapshots and editors that want to refuse them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobValidationError {
    #[error("job {job} has two steps with id '{id}'")]
    DuplicateStepId { job: JobId, id: String },
    #[error("job {job}: person {person} is in teams {first} and {second}")]
    MemberInSeveralTeams {
        job: JobId,
        person: PersonId,
        first: TeamId,
        second: TeamId,
    },
    #[error("job {job}: step {step} is assigned to unknown team '{team}'")]
    UnknownTeam { job: JobId, step: usize, team: String },
    #[error("job {job}: team assignment for step {step} but only {count} active steps")]
    StepIndexOutOfRange { job: JobId, step: usize, count: usize },
    #[error("job {job}: next team number {next} does not exceed existing team {highest}")]
    TeamCounterBehind { job: JobId, next: TeamId, highest: TeamId },
    #[error("job id {0} appears more than once")]
    DuplicateJobId(JobId),
}

pub fn validate_job(job: &Job) -> Result<(), JobValidationError> {
    let active = job.active_steps();

    let mut seen_ids = HashSet::new();
    for id in active.iter().filter_map(|step| step.id.as_deref()) {
        if !seen_ids.insert(id) {
            return Err(JobValidationError::DuplicateStepId {
                job: job.id,
                id: id.to_string(),
            });
        }
    }

    let mut membership: HashMap<PersonId, TeamId> = HashMap::new();
    for (&number, team) in &job.teams {
        for &person in &team.members {
            if let Some(&first) = membership.get(&person) {
                if first != number {
                    return Err(JobValidationError::MemberInSeveralTeams {
                        job: job.id,
                        person,
                        first,
                        second: number,
                    });
                }
            }
            membership.insert(person, number);
        }
    }

    if let Some(&highest) = job.teams.keys().next_back() {
        if job.next_team_number <= highest {
            return Err(JobValidationError::TeamCounterBehind {
                job: job.id,
                next: job.next_team_number,
                highest,
            });
        }
    }

    for (&step, team) in &job.team_assignments {
        if step >= active.len() {
            return Err(JobValidationError::StepIndexOutOfRange {
                job: job.id,
                step,
                count: active.len(),
            });
        }
        let known = match team {
            TeamRef::Numbered(number) => job.teams.contains_key(number),
            TeamRef::Named(id) => job.named_team(id).is_some(),
        };
        if !known {
            return Err(JobValidationError::UnknownTeam {
                job: job.id,
                step,
                team: team.to_string(),
            });
        }
    }

    Ok(())
}

pub fn validate_workspace(workspace: &Workspace) -> Result<(), JobValidationError> {
    let mut ids = HashSet::new();
    for job in &workspace.jobs {
        if !ids.insert(job.id) {
            return Err(JobValidationError::DuplicateJobId(job.id));
        }
        validate_job(job)?;
    }
    Ok(())
}
