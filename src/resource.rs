use crate::job::ScheduleType;
use crate::team::TeamRef;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type JobId = u64;
pub type PersonId = u64;
pub type EquipmentId = u64;
pub type SubcontractorId = u64;

/// The three resource pools a job draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    #[serde(rename = "personnel")]
    Personnel,
    #[serde(rename = "equipement")]
    Equipment,
    #[serde(rename = "sousTraitant")]
    Subcontractor,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Personnel => "personnel",
            ResourceKind::Equipment => "equipement",
            ResourceKind::Subcontractor => "sousTraitant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    #[serde(alias = "nom")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poste: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentStatus {
    #[default]
    #[serde(rename = "disponible")]
    Available,
    #[serde(rename = "hors_service")]
    OutOfService,
    #[serde(other)]
    Other,
}

/// A planned maintenance window; a missing end means a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Maintenance {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "dateDebut")]
    pub start: NaiveDate,
    #[serde(rename = "dateFin", default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Maintenance {
    pub fn end_or_start(&self) -> NaiveDate {
        self.end.unwrap_or(self.start)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    #[serde(alias = "nom")]
    pub name: String,
    #[serde(rename = "statut", default)]
    pub status: EquipmentStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maintenances: Vec<Maintenance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcontractor {
    pub id: SubcontractorId,
    #[serde(alias = "nom")]
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaveStatus {
    #[serde(rename = "approuve")]
    Approved,
    #[default]
    #[serde(rename = "en_attente")]
    Pending,
    #[serde(rename = "refuse")]
    Refused,
    /// Any status the editor does not know; blocks at normal priority.
    #[serde(other)]
    Other,
}

/// Time off requested by a person ("congé").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leave {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "personnelId")]
    pub person_id: PersonId,
    #[serde(rename = "dateDebut")]
    pub start: NaiveDate,
    #[serde(rename = "dateFin")]
    pub end: NaiveDate,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "statut", default)]
    pub status: LeaveStatus,
    #[serde(rename = "motif", default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Read-only name lookup over the personnel and equipment registries.
#[derive(Debug, Clone, Copy, Default)]
pub struct Directory<'a> {
    pub personnel: &'a [Person],
    pub equipment: &'a [Equipment],
}

impl<'a> Directory<'a> {
    pub fn new(personnel: &'a [Person], equipment: &'a [Equipment]) -> Self {
        Self {
            personnel,
            equipment,
        }
    }

    pub fn person(&self, id: PersonId) -> Option<&'a Person> {
        self.personnel.iter().find(|p| p.id == id)
    }

    pub fn equipment(&self, id: EquipmentId) -> Option<&'a Equipment> {
        self.equipment.iter().find(|e| e.id == id)
    }
}

/// Team details stamped onto an assignment produced from a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamTag {
    pub team: TeamRef,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One resource working on one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub task_id: String,
    pub resource_id: u64,
    pub resource_type: ResourceKind,
    pub resource_name: String,
    pub work_type: ScheduleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamTag>,
}
