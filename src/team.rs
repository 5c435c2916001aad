use crate::config::EngineConfig;
use crate::job::{Job, ScheduleType};
use crate::resource::PersonId;
use crate::step::MIN_STEP_HOURS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Team number; allocated from the job's counter and never reused.
pub type TeamId = u32;

const NUMBERED_PREFIX: &str = "equipe-";

/// Which team a step is assigned to: a numbered team (`equipe-N`) or a
/// legacy named team by id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TeamRef {
    Numbered(TeamId),
    Named(String),
}

impl From<String> for TeamRef {
    fn from(raw: String) -> Self {
        match raw
            .strip_prefix(NUMBERED_PREFIX)
            .and_then(|n| n.parse::<TeamId>().ok())
        {
            Some(number) => TeamRef::Numbered(number),
            None => TeamRef::Named(raw),
        }
    }
}

impl From<TeamRef> for String {
    fn from(value: TeamRef) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TeamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamRef::Numbered(number) => write!(f, "{NUMBERED_PREFIX}{number}"),
            TeamRef::Named(id) => write!(f, "{id}"),
        }
    }
}

/// Shift a team works. Teams have no round-the-clock shift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamShift {
    #[default]
    #[serde(rename = "jour")]
    Day,
    #[serde(rename = "nuit")]
    Night,
}

impl TeamShift {
    /// Default shift for a new team on a job with the given schedule type.
    pub fn for_job(schedule: ScheduleType) -> Self {
        match schedule {
            ScheduleType::Night => TeamShift::Night,
            ScheduleType::Day | ScheduleType::RoundTheClock => TeamShift::Day,
        }
    }
}

fn default_active() -> bool {
    true
}

/// A numbered team. Its number is its key in [`Job::teams`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "membres", default)]
    pub members: Vec<PersonId>,
    #[serde(rename = "horaire", default)]
    pub schedule: TeamShift,
    #[serde(rename = "couleur", default)]
    pub color: String,
    #[serde(rename = "actif", default = "default_active")]
    pub active: bool,
    /// Whether the shift was picked automatically from the job.
    #[serde(default)]
    pub auto: bool,
}

/// Free-form team from older job records ("equipes").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedTeam {
    pub id: String,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "membres", default)]
    pub members: Vec<PersonId>,
    #[serde(rename = "actif", default = "default_active")]
    pub active: bool,
}

/// Partial update for [`Job::update_team`]; `None` leaves a field alone.
#[derive(Debug, Clone, Default)]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub color: Option<String>,
    pub schedule: Option<TeamShift>,
    pub active: Option<bool>,
}

/// Steps and hours carried by one team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamWorkload {
    pub steps: Vec<usize>,
    pub total_hours: f64,
}

impl Job {
    /// Adds an empty numbered team and returns its number.
    ///
    /// The shift follows the job unless overridden; round-the-clock jobs
    /// default their teams to day shift.
    pub fn create_team(&mut self, config: &EngineConfig, shift: Option<TeamShift>) -> TeamId {
        let mut number = self.next_team_number.max(1);
        // Counter may lag behind imported records.
        if let Some(&highest) = self.teams.keys().next_back() {
            number = number.max(highest + 1);
        }
        let team = Team {
            name: format!("Équipe {number}"),
            members: Vec::new(),
            schedule: shift.unwrap_or_else(|| TeamShift::for_job(self.type_horaire)),
            color: config.team_color(number).to_string(),
            active: true,
            auto: shift.is_none(),
        };
        self.teams.insert(number, team);
        self.next_team_number = number + 1;
        number
    }

    /// Removes a team and every step assignment pointing at it.
    pub fn delete_team(&mut self, number: TeamId) -> Option<Team> {
        let removed = self.teams.remove(&number)?;
        let reference = TeamRef::Numbered(number);
        self.team_assignments.retain(|_, team| *team != reference);
        Some(removed)
    }

    pub fn update_team(&mut self, number: TeamId, update: TeamUpdate) -> bool {
        let Some(team) = self.teams.get_mut(&number) else {
            return false;
        };
        if let Some(name) = update.name {
            team.name = name;
        }
        if let Some(color) = update.color {
            team.color = color;
        }
        if let Some(schedule) = update.schedule {
            team.schedule = schedule;
            team.auto = false;
        }
        if let Some(active) = update.active {
            team.active = active;
        }
        true
    }

    /// Moves `person` into team `number`, first removing them from every
    /// numbered team. `None` just removes them. Returns `false` when the
    /// target team does not exist (the person is still removed elsewhere).
    pub fn assign_member(&mut self, person: PersonId, number: Option<TeamId>) -> bool {
        for team in self.teams.values_mut() {
            team.members.retain(|&member| member != person);
        }
        match number {
            None => true,
            Some(number) => match self.teams.get_mut(&number) {
                Some(team) => {
                    team.members.push(person);
                    true
                }
                None => false,
            },
        }
    }

    pub fn team_of(&self, person: PersonId) -> Option<TeamId> {
        self.teams
            .iter()
            .find(|(_, team)| team.members.contains(&person))
            .map(|(&number, _)| number)
    }

    pub fn assign_step(&mut self, step_index: usize, team: TeamRef) -> Option<TeamRef> {
        self.team_assignments.insert(step_index, team)
    }

    pub fn unassign_step(&mut self, step_index: usize) -> Option<TeamRef> {
        self.team_assignments.remove(&step_index)
    }

    pub fn named_team(&self, id: &str) -> Option<&NamedTeam> {
        self.named_teams.iter().find(|team| team.id == id)
    }

    /// Display name for a team reference, if the team exists.
    pub fn team_name(&self, team: &TeamRef) -> Option<&str> {
        match team {
            TeamRef::Numbered(number) => self.teams.get(number).map(|t| t.name.as_str()),
            TeamRef::Named(id) => self.named_team(id).map(|t| t.name.as_str()),
        }
    }

    /// Hours of active steps carried by each assigned team.
    pub fn team_workload(&self) -> BTreeMap<TeamRef, TeamWorkload> {
        let steps = self.active_steps();
        let mut workload: BTreeMap<TeamRef, TeamWorkload> = BTreeMap::new();
        for (&index, team) in &self.team_assignments {
            let Some(step) = steps.get(index) else {
                continue;
            };
            let entry = workload.entry(team.clone()).or_default();
            entry.steps.push(index);
            entry.total_hours += step.effective_duration(MIN_STEP_HOURS);
        }
        workload
    }
}
