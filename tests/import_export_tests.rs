use chrono::NaiveDate;
use field_schedule::job::{AssignmentMode, Job, ScheduleType};
use field_schedule::persistence::{
    PersistenceError, load_workspace_from_json, load_workspace_from_reader,
    save_workspace_to_json, save_workspace_to_writer,
};
use field_schedule::resource::{LeaveStatus, Person};
use field_schedule::schedule::recompute;
use field_schedule::step::{DependencyType, Step};
use field_schedule::table::{assignments_to_dataframe, tasks_to_dataframe};
use field_schedule::team::TeamRef;
use field_schedule::workspace::Workspace;
use field_schedule::EngineConfig;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const EDITOR_SNAPSHOT: &str = r##"{
  "jobs": [
    {
      "id": 12,
      "nom": "Pump station",
      "dateDebut": "2025-01-06",
      "heureDebut": "08:00",
      "dateFin": "2025-01-10",
      "heureFin": "17:00",
      "typeHoraire": "jour",
      "dureePreviewHours": "18",
      "personnel": [1, 2],
      "equipements": [10],
      "sousTraitants": [],
      "etapes": [
        { "id": "s1", "text": "Isolate", "duration": 2 },
        { "text": "", "duration": 4 },
        { "id": "s2", "text": "Replace pump", "duration": "6,5", "dependencies": [0], "dependencyType": "SS", "leadLag": 1 }
      ],
      "equipesNumerotees": {
        "1": { "nom": "Équipe 1", "membres": [2], "horaire": "jour", "couleur": "#3B82F6", "actif": true }
      },
      "prochainNumeroEquipe": 2,
      "assignationsEquipes": { "1": "equipe-1" },
      "assignmentMode": "equipe",
      "showCriticalPath": true,
      "ganttBaseline": {},
      "horairesParJour": { "2025-01-07": null }
    }
  ],
  "personnel": [
    { "id": 1, "nom": "Alice" },
    { "id": 2, "nom": "Bruno", "poste": "Mechanic" }
  ],
  "equipements": [
    { "id": 10, "nom": "Crane", "statut": "disponible" }
  ],
  "conges": [
    { "personnelId": 1, "dateDebut": "2025-01-08", "dateFin": "2025-01-09", "statut": "approuve" }
  ]
}"##;

fn sample_workspace() -> Workspace {
    let mut job = Job::new(3)
        .with_dates(d(2025, 3, 3), d(2025, 3, 5))
        .with_steps(vec![
            Step::new("Lockout", 1.0).with_id("lock"),
            Step::new("Repair", 5.0)
                .with_id("fix")
                .after([0])
                .with_link(DependencyType::FF, 0.0),
        ]);
    job.name = "Valve repair".into();
    job.type_horaire = ScheduleType::Night;
    job.personnel = vec![1];
    let team = job.create_team(&EngineConfig::default(), None);
    job.assign_member(1, Some(team));
    job.assign_step(1, TeamRef::Numbered(team));

    Workspace {
        jobs: vec![job],
        personnel: vec![Person {
            id: 1,
            name: "Alice".into(),
            poste: None,
        }],
        ..Workspace::default()
    }
}

#[test]
fn editor_snapshot_loads_with_ui_field_names() {
    let workspace = load_workspace_from_reader(EDITOR_SNAPSHOT.as_bytes()).unwrap();
    let job = workspace.job(12).unwrap();
    assert_eq!(job.name, "Pump station");
    assert_eq!(job.planned_hours, Some(18.0));
    assert_eq!(job.steps.len(), 3);
    assert_eq!(job.steps[2].duration, 6.5);
    assert_eq!(job.steps[2].dependency_type, DependencyType::SS);
    assert_eq!(job.team_assignments[&1], TeamRef::Numbered(1));
    assert_eq!(job.assignment_mode, AssignmentMode::Teams);
    assert_eq!(job.gantt_baseline.as_ref().map(|b| b.is_empty()), Some(true));
    assert_eq!(job.daily_schedules.get(&d(2025, 1, 7)), Some(&None));
    assert_eq!(workspace.leaves[0].status, LeaveStatus::Approved);
    assert_eq!(workspace.personnel[1].poste.as_deref(), Some("Mechanic"));
}

#[test]
fn editor_snapshot_schedules_end_to_end() {
    let workspace = load_workspace_from_reader(EDITOR_SNAPSHOT.as_bytes()).unwrap();
    let job = workspace.job(12).unwrap();
    let result = recompute(job, workspace.directory());

    assert_eq!(result.tasks.len(), 2);
    let replace = result.task("s2").unwrap();
    assert_eq!(
        replace.start,
        d(2025, 1, 6).and_hms_opt(9, 0, 0).unwrap()
    );
    // Team 1 works the second active step; equipment rides along.
    let people: Vec<u64> = result
        .assignments_for("s2")
        .filter(|a| a.team.is_some())
        .map(|a| a.resource_id)
        .collect();
    assert_eq!(people, vec![2]);
    assert_eq!(result.assignments_for("s2").count(), 2);

    // Tuesday is excluded: 9h Monday and 9h Wednesday use up the plan,
    // so the span closes on Thursday.
    assert_eq!(result.span.unwrap().date_fin, d(2025, 1, 9));
}

#[test]
fn json_round_trip_through_file() {
    let workspace = sample_workspace();
    let file = NamedTempFile::new().unwrap();
    save_workspace_to_json(&workspace, file.path()).unwrap();
    let loaded = load_workspace_from_json(file.path()).unwrap();
    assert_eq!(loaded, workspace);

    let before = recompute(&workspace.jobs[0], workspace.directory());
    let after = recompute(&loaded.jobs[0], loaded.directory());
    assert_eq!(before, after);
}

#[test]
fn writer_uses_editor_keys() {
    let mut buffer = Vec::new();
    save_workspace_to_writer(&sample_workspace(), &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    assert!(text.contains("\"dateDebut\": \"2025-03-03\""));
    assert!(text.contains("\"typeHoraire\": \"nuit\""));
    assert!(text.contains("\"equipesNumerotees\""));
    assert!(text.contains("\"equipe-1\""));
}

#[test]
fn invalid_snapshot_is_rejected() {
    let mut workspace = sample_workspace();
    let duplicate = workspace.jobs[0].clone();
    workspace.jobs.push(duplicate);

    let mut buffer = Vec::new();
    let err = save_workspace_to_writer(&workspace, &mut buffer).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)));
}

#[test]
fn malformed_json_reports_serialization_error() {
    let err = load_workspace_from_reader("{ \"jobs\": [ { \"nom\": 1 } ] }".as_bytes()).unwrap_err();
    assert!(matches!(err, PersistenceError::Serialization(_)));
}

#[test]
fn missing_file_reports_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_workspace_from_json(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, PersistenceError::Io(_)));
}

#[test]
fn schedule_tables_have_one_row_per_record() {
    let workspace = sample_workspace();
    let result = recompute(&workspace.jobs[0], workspace.directory());

    let tasks = tasks_to_dataframe(&result.tasks).unwrap();
    assert_eq!(tasks.height(), 2);
    let names: Vec<&str> = tasks.get_column_names().iter().map(|n| n.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "id",
            "name",
            "step_index",
            "start",
            "end",
            "duration_hours",
            "dependency_type",
            "lead_lag",
            "predecessors",
            "is_critical",
            "slack",
            "completed",
        ]
    );
    let links = tasks.column("dependency_type").unwrap();
    assert_eq!(links.str().unwrap().get(1), Some("FF"));

    let assignments = assignments_to_dataframe(&result.assignments).unwrap();
    assert_eq!(assignments.height(), result.assignments.len());
    let teams = assignments.column("team").unwrap();
    assert_eq!(teams.str().unwrap().get(1), Some("equipe-1"));
}

#[test]
fn snapshot_with_unknown_leave_status_still_loads() {
    let text = EDITOR_SNAPSHOT.replace("\"statut\": \"approuve\"", "\"statut\": \"annule\"");
    let workspace = load_workspace_from_reader(text.as_bytes()).unwrap();
    assert_eq!(workspace.leaves[0].status, LeaveStatus::Other);
}
