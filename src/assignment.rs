use crate::availability::ResourceRef;
use crate::diagnostics::ScheduleDiagnostic;
use crate::job::{AssignmentMode, GanttMode, Job};
use crate::resource::{Assignment, Directory, EquipmentId, PersonId, ResourceKind, TeamTag};
use crate::task::Task;
use crate::team::TeamRef;
use std::collections::BTreeSet;

/// Expands a job's teams and resource selections into per-task
/// assignments. Resources missing from the directory are left out.
pub struct TeamAssignmentResolver<'a> {
    directory: Directory<'a>,
}

struct Collector<'d> {
    directory: Directory<'d>,
    assignments: Vec<Assignment>,
    unresolved: BTreeSet<ResourceRef>,
}

impl<'d> Collector<'d> {
    fn person(&mut self, task: &Task, job: &Job, id: PersonId, team: Option<&TeamTag>) {
        let Some(person) = self.directory.person(id) else {
            self.unresolved.insert(ResourceRef::person(id));
            return;
        };
        self.assignments.push(Assignment {
            task_id: task.id.clone(),
            resource_id: id,
            resource_type: ResourceKind::Personnel,
            resource_name: person.name.clone(),
            work_type: job.type_horaire,
            team: team.cloned(),
        });
    }

    fn equipment(&mut self, task: &Task, job: &Job, id: EquipmentId) {
        let Some(equipment) = self.directory.equipment(id) else {
            self.unresolved.insert(ResourceRef::equipment(id));
            return;
        };
        self.assignments.push(Assignment {
            task_id: task.id.clone(),
            resource_id: id,
            resource_type: ResourceKind::Equipment,
            resource_name: equipment.name.clone(),
            work_type: job.type_horaire,
            team: None,
        });
    }
}

impl<'a> TeamAssignmentResolver<'a> {
    pub fn new(directory: Directory<'a>) -> Self {
        Self { directory }
    }

    pub fn resolve(&self, job: &Job, tasks: &[Task]) -> Vec<Assignment> {
        self.resolve_with_diagnostics(job, tasks).0
    }

    /// Assignments in task order, personnel before equipment, plus one
    /// diagnostic per resource id the directory could not name.
    pub fn resolve_with_diagnostics(
        &self,
        job: &Job,
        tasks: &[Task],
    ) -> (Vec<Assignment>, Vec<ScheduleDiagnostic>) {
        let mut collector = Collector {
            directory: self.directory,
            assignments: Vec::new(),
            unresolved: BTreeSet::new(),
        };
        let active_steps = job.active_steps();

        for task in tasks {
            let (people, tag) = match job.assignment_mode {
                AssignmentMode::Global => (job.personnel.clone(), None),
                AssignmentMode::Teams => {
                    let step_people = active_steps
                        .get(task.step_index)
                        .map(|step| step.assigned_personnel.as_slice())
                        .unwrap_or_default();
                    team_personnel(job, task.step_index, step_people)
                }
            };

            let mut seen = BTreeSet::new();
            for id in people {
                if seen.insert(id) {
                    collector.person(task, job, id, tag.as_ref());
                }
            }
            for &id in &job.equipements {
                collector.equipment(task, job, id);
            }
        }

        let diagnostics = collector
            .unresolved
            .into_iter()
            .map(|resource| {
                tracing::debug!(
                    kind = resource.kind.as_str(),
                    id = resource.id,
                    "assigned resource not found in directory"
                );
                ScheduleDiagnostic::UnresolvedResource { resource }
            })
            .collect();
        (collector.assignments, diagnostics)
    }
}

/// Personnel working one step in team mode and the team they came from.
fn team_personnel(
    job: &Job,
    step_index: usize,
    step_people: &[PersonId],
) -> (Vec<PersonId>, Option<TeamTag>) {
    match job.team_assignments.get(&step_index) {
        Some(team_ref @ TeamRef::Numbered(number)) => match job.teams.get(number) {
            Some(team) if team.active => (
                team.members.clone(),
                Some(TeamTag {
                    team: team_ref.clone(),
                    name: team.name.clone(),
                    color: Some(team.color.clone()),
                }),
            ),
            _ => (Vec::new(), None),
        },
        Some(team_ref @ TeamRef::Named(id)) => match job.named_team(id) {
            Some(team) if team.active => (
                team.members.clone(),
                Some(TeamTag {
                    team: team_ref.clone(),
                    name: team.name.clone(),
                    color: None,
                }),
            ),
            _ => (Vec::new(), None),
        },
        None if !step_people.is_empty() => (step_people.to_vec(), None),
        None => match job.gantt_mode {
            GanttMode::Individual => (job.personnel.clone(), None),
            GanttMode::Team => (Vec::new(), None),
        },
    }
}

/// Assignments for `tasks` of `job`, resolving names through `directory`.
pub fn resolve_assignments(job: &Job, tasks: &[Task], directory: Directory<'_>) -> Vec<Assignment> {
    TeamAssignmentResolver::new(directory).resolve(job, tasks)
}
