use crate::availability::DateInterval;
use crate::baseline::Baseline;
use crate::config::EngineConfig;
use crate::resource::{EquipmentId, JobId, PersonId, ResourceKind, SubcontractorId};
use crate::serde_support::{date_opt, hhmm, hhmm_opt, lenient_hours_opt};
use crate::step::Step;
use crate::team::{NamedTeam, Team, TeamId, TeamRef};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shift pattern of a job ("typeHoraire").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScheduleType {
    #[default]
    #[serde(rename = "jour")]
    Day,
    #[serde(rename = "nuit")]
    Night,
    #[serde(rename = "24h")]
    RoundTheClock,
}

impl ScheduleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleType::Day => "jour",
            ScheduleType::Night => "nuit",
            ScheduleType::RoundTheClock => "24h",
        }
    }
}

/// How tasks receive their workforce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentMode {
    /// Every selected person and piece of equipment works every task.
    #[serde(rename = "global")]
    Global,
    /// Personnel come from the team assigned to each step.
    #[default]
    #[serde(rename = "equipe")]
    Teams,
}

/// Fallback when a step has no team: whole crew (`Individual`) or nobody.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GanttMode {
    #[default]
    #[serde(rename = "individuel")]
    Individual,
    #[serde(rename = "equipe")]
    Team,
}

/// Per-date working window override ("horairesParJour" entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySchedule {
    #[serde(with = "hhmm")]
    pub heure_debut: NaiveTime,
    #[serde(with = "hhmm")]
    pub heure_fin: NaiveTime,
    #[serde(default)]
    pub mode: ScheduleType,
}

/// A resource's own dates on a job, overriding the job's dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualPlan {
    #[serde(default, with = "date_opt", skip_serializing_if = "Option::is_none")]
    pub date_debut: Option<NaiveDate>,
    #[serde(default, with = "date_opt", skip_serializing_if = "Option::is_none")]
    pub date_fin: Option<NaiveDate>,
    #[serde(default, with = "hhmm_opt", skip_serializing_if = "Option::is_none")]
    pub heure_debut: Option<NaiveTime>,
    #[serde(default, with = "hhmm_opt", skip_serializing_if = "Option::is_none")]
    pub heure_fin: Option<NaiveTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndividualPlans {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub personnel: BTreeMap<PersonId, IndividualPlan>,
    #[serde(rename = "equipements", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub equipment: BTreeMap<EquipmentId, IndividualPlan>,
}

fn default_next_team() -> TeamId {
    1
}

/// A work order ("événement") with its steps and crew.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    #[serde(rename = "nom", default)]
    pub name: String,
    #[serde(default, with = "date_opt")]
    pub date_debut: Option<NaiveDate>,
    #[serde(default, with = "hhmm_opt")]
    pub heure_debut: Option<NaiveTime>,
    #[serde(default, with = "date_opt")]
    pub date_fin: Option<NaiveDate>,
    #[serde(default, with = "hhmm_opt")]
    pub heure_fin: Option<NaiveTime>,
    #[serde(default)]
    pub type_horaire: ScheduleType,
    #[serde(default, alias = "includeWeekendsInDuration")]
    pub include_weekends: bool,
    /// Planned duration of the whole job in hours ("dureePreviewHours").
    #[serde(
        rename = "dureePreviewHours",
        default,
        with = "lenient_hours_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub planned_hours: Option<f64>,
    #[serde(default)]
    pub personnel: Vec<PersonId>,
    #[serde(default)]
    pub equipements: Vec<EquipmentId>,
    #[serde(default)]
    pub sous_traitants: Vec<SubcontractorId>,
    #[serde(default, alias = "etapes")]
    pub steps: Vec<Step>,
    #[serde(rename = "equipesNumerotees", default)]
    pub teams: BTreeMap<TeamId, Team>,
    #[serde(rename = "prochainNumeroEquipe", default = "default_next_team")]
    pub next_team_number: TeamId,
    #[serde(rename = "equipes", default, skip_serializing_if = "Vec::is_empty")]
    pub named_teams: Vec<NamedTeam>,
    /// Active step index to team.
    #[serde(rename = "assignationsEquipes", default)]
    pub team_assignments: BTreeMap<usize, TeamRef>,
    #[serde(default)]
    pub assignment_mode: AssignmentMode,
    #[serde(default)]
    pub gantt_mode: GanttMode,
    #[serde(default)]
    pub show_critical_path: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gantt_baseline: Option<Baseline>,
    #[serde(rename = "planningsIndividuels", default)]
    pub individual_plans: IndividualPlans,
    /// Per-date overrides; `None` marks a date explicitly excluded.
    #[serde(rename = "horairesParJour", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub daily_schedules: BTreeMap<NaiveDate, Option<DailySchedule>>,
}

impl Job {
    pub fn new(id: JobId) -> Self {
        Self {
            id,
            name: String::new(),
            date_debut: None,
            heure_debut: None,
            date_fin: None,
            heure_fin: None,
            type_horaire: ScheduleType::Day,
            include_weekends: false,
            planned_hours: None,
            personnel: Vec::new(),
            equipements: Vec::new(),
            sous_traitants: Vec::new(),
            steps: Vec::new(),
            teams: BTreeMap::new(),
            next_team_number: 1,
            named_teams: Vec::new(),
            team_assignments: BTreeMap::new(),
            assignment_mode: AssignmentMode::Teams,
            gantt_mode: GanttMode::Individual,
            show_critical_path: false,
            gantt_baseline: None,
            individual_plans: IndividualPlans::default(),
            daily_schedules: BTreeMap::new(),
        }
    }

    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_debut = Some(start);
        self.date_fin = Some(end);
        self
    }

    pub fn with_hours(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.heure_debut = Some(start);
        self.heure_fin = Some(end);
        self
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    /// Steps taking part in scheduling, in authoring order.
    pub fn active_steps(&self) -> Vec<&Step> {
        self.steps.iter().filter(|s| s.is_active()).collect()
    }

    pub fn active_step_mut(&mut self, index: usize) -> Option<&mut Step> {
        self.steps.iter_mut().filter(|s| s.is_active()).nth(index)
    }

    /// Links active step `index` after active step `predecessor`.
    /// Self-links and unknown indices are refused.
    pub fn add_dependency(&mut self, index: usize, predecessor: usize) -> bool {
        if index == predecessor || predecessor >= self.active_steps().len() {
            return false;
        }
        self.active_step_mut(index)
            .map(|step| step.add_dependency(predecessor))
            .unwrap_or(false)
    }

    pub fn remove_dependency(&mut self, index: usize, predecessor: usize) -> bool {
        self.active_step_mut(index)
            .map(|step| step.remove_dependency(predecessor))
            .unwrap_or(false)
    }

    /// Start time of day, forced to midnight for round-the-clock jobs.
    pub fn start_time(&self, config: &EngineConfig) -> NaiveTime {
        match self.type_horaire {
            ScheduleType::RoundTheClock => NaiveTime::MIN,
            _ => self.heure_debut.unwrap_or(config.default_window_start),
        }
    }

    pub fn end_time(&self, config: &EngineConfig) -> NaiveTime {
        match self.type_horaire {
            ScheduleType::RoundTheClock => {
                NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(config.default_window_end)
            }
            _ => self.heure_fin.unwrap_or(config.default_window_end),
        }
    }

    /// Instant the first step may start; `None` until a start date is set.
    pub fn project_start(&self, config: &EngineConfig) -> Option<NaiveDateTime> {
        self.date_debut
            .map(|date| date.and_time(self.start_time(config)))
    }

    /// `[dateDebut, dateFin]`, or `None` when either bound is missing.
    pub fn date_interval(&self) -> Option<DateInterval> {
        match (self.date_debut, self.date_fin) {
            (Some(start), Some(end)) => Some(DateInterval::new(start, end)),
            _ => None,
        }
    }

    pub fn lists(&self, kind: ResourceKind, id: u64) -> bool {
        match kind {
            ResourceKind::Personnel => self.personnel.contains(&id),
            ResourceKind::Equipment => self.equipements.contains(&id),
            ResourceKind::Subcontractor => self.sous_traitants.contains(&id),
        }
    }

    /// Dates this job occupies `id`, honouring the resource's individual plan.
    pub fn interval_for(&self, kind: ResourceKind, id: u64) -> Option<DateInterval> {
        let plan = match kind {
            ResourceKind::Personnel => self.individual_plans.personnel.get(&id),
            ResourceKind::Equipment => self.individual_plans.equipment.get(&id),
            ResourceKind::Subcontractor => None,
        };
        let start = plan.and_then(|p| p.date_debut).or(self.date_debut)?;
        let end = plan.and_then(|p| p.date_fin).or(self.date_fin)?;
        Some(DateInterval::new(start, end))
    }
}
