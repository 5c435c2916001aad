use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use field_schedule::baseline::Baseline;
use field_schedule::job::Job;
use field_schedule::resource::{Directory, Person};
use field_schedule::schedule::{ScheduleOrchestrator, recompute};
use field_schedule::step::{DependencyType, Step};
use field_schedule::workspace::Workspace;
use field_schedule::{EngineConfig, EngineError, ScheduleDiagnostic};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    d(2025, 1, 6).and_time(t(h, m))
}

fn crew() -> Vec<Person> {
    vec![
        Person { id: 1, name: "Alice".into(), poste: None },
        Person { id: 2, name: "Bruno".into(), poste: None },
    ]
}

fn build_job() -> Job {
    let mut job = Job::new(5)
        .with_dates(d(2025, 1, 6), d(2025, 1, 8))
        .with_hours(t(7, 30), t(16, 30))
        .with_steps(vec![
            Step::new("Mobilize", 1.0).with_id("mob"),
            Step::new("Excavate", 10.0).with_id("dig").after([0]),
            Step::new("Survey", 2.0).with_id("survey").after([0]),
            Step::new("Pour", 3.0)
                .with_id("pour")
                .after([1, 2])
                .with_link(DependencyType::FS, 0.5),
        ]);
    job.name = "Culvert".into();
    job.personnel = vec![1, 2];
    job.planned_hours = Some(12.0);
    job.show_critical_path = true;
    job
}

#[test]
fn recompute_times_assigns_and_flags_critical_tasks() {
    let staff = crew();
    let job = build_job();
    let result = recompute(&job, Directory::new(&staff, &[]));

    assert_eq!(result.tasks.len(), 4);
    let pour = result.task("pour").unwrap();
    // 07:30 + 1h + 10h + 0.5h lag
    assert_eq!(pour.start, at(19, 0));
    assert_eq!(pour.end, at(22, 0));

    assert!(result.critical_path.contains("dig"));
    assert!(!result.critical_path.contains("survey"));
    assert_eq!(result.critical_chain, vec!["mob", "dig", "pour"]);
    assert!(pour.is_critical);

    assert_eq!(result.assignments.len(), 8);
    assert_eq!(result.assignments_for("pour").count(), 2);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn recompute_is_idempotent() {
    let staff = crew();
    let job = build_job();
    let orchestrator = ScheduleOrchestrator::default();
    let first = orchestrator.recompute(&job, Directory::new(&staff, &[]));
    let second = orchestrator.recompute(&job, Directory::new(&staff, &[]));
    assert_eq!(first, second);
}

#[test]
fn critical_path_is_skipped_when_not_requested() {
    let mut job = build_job();
    job.show_critical_path = false;
    let result = recompute(&job, Directory::default());
    assert!(result.critical_path.is_empty());
    assert!(result.tasks.iter().all(|t| !t.is_critical));
}

#[test]
fn missing_start_date_yields_empty_schedule() {
    let mut job = build_job();
    job.date_debut = None;
    let result = recompute(&job, Directory::default());
    assert!(result.tasks.is_empty());
    assert!(result.span.is_none());
    assert_eq!(result.diagnostics, vec![ScheduleDiagnostic::MissingStartDate]);
}

#[test]
fn cycles_are_reported_and_schedule_survives() {
    let mut job = build_job();
    job.steps[0].add_dependency(3);
    let result = recompute(&job, Directory::default());
    assert_eq!(result.tasks.len(), 4);
    assert!(result
        .diagnostics
        .iter()
        .any(|diag| matches!(diag, ScheduleDiagnostic::CyclicDependency { .. })));
}

#[test]
fn span_follows_planned_hours() {
    let job = build_job();
    let result = recompute(&job, Directory::default());
    let span = result.span.unwrap();
    // 9h windows: Monday and Tuesday cover 12h, landing on Tuesday.
    assert_eq!(span.date_debut, d(2025, 1, 6));
    assert_eq!(span.date_fin, d(2025, 1, 7));
    assert_eq!(span.heure_debut, t(7, 30));
}

#[test]
fn baseline_variance_reports_drift_in_hours() {
    let mut job = build_job();
    let original = recompute(&job, Directory::default());
    job.gantt_baseline = Some(Baseline::capture(&original.tasks, at(6, 0)));

    job.steps[1].duration = 12.0;
    let result = recompute(&job, Directory::default());
    let pour = result
        .baseline_variance
        .iter()
        .find(|v| v.task_id == "pour")
        .unwrap();
    assert_eq!(pour.start_delta_hours, 2.0);
    assert_eq!(pour.finish_delta_hours, 2.0);
    assert_eq!(pour.duration_delta_hours, 0.0);

    let dig = result
        .baseline_variance
        .iter()
        .find(|v| v.task_id == "dig")
        .unwrap();
    assert_eq!(dig.duration_delta_hours, 2.0);
}

#[test]
fn summary_line_lists_critical_chain() {
    let staff = crew();
    let job = build_job();
    let summary = recompute(&job, Directory::new(&staff, &[])).summary();
    assert_eq!(summary.task_count, 4);
    assert_eq!(summary.total_hours, 16.0);
    assert_eq!(
        summary.to_cli_summary(),
        "tasks=4, critical=3, assignments=8, finish=2025-01-06 22:00, hours=16, crit_path=mob->dig->pour"
    );
}

#[test]
fn workspace_recomputes_by_id() {
    let mut workspace = Workspace {
        personnel: crew(),
        ..Workspace::default()
    };
    workspace.upsert_job(build_job());
    let mut second = build_job();
    second.id = 6;
    second.date_debut = Some(d(2025, 1, 13));
    workspace.upsert_job(second);

    let orchestrator = ScheduleOrchestrator::new(EngineConfig::default()).unwrap();
    let result = workspace.recompute(5, &orchestrator).unwrap();
    assert_eq!(result.tasks.len(), 4);
    assert!(matches!(
        workspace.recompute(99, &orchestrator),
        Err(EngineError::UnknownJob(99))
    ));

    let all = workspace.recompute_all(&orchestrator);
    let ids: Vec<u64> = all.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![5, 6]);
    assert_eq!(all[0].1, result);
    assert_eq!(
        all[1].1.task("mob").unwrap().start,
        d(2025, 1, 13).and_time(t(7, 30))
    );
}

#[test]
fn configuration_changes_the_critical_threshold() {
    let config = EngineConfig::from_json_str(r#"{"hours_per_cpm_day": 1.0}"#).unwrap();
    let job = build_job();
    let result = ScheduleOrchestrator::new(config).unwrap().recompute(&job, Directory::default());
    // With one-hour CPM days the survey branch carries eight days of slack.
    let survey = result.task("survey").unwrap();
    assert_eq!(survey.slack, 8.0);
    assert!(!survey.is_critical);
}

#[test]
fn oversized_duration_is_reported_not_fatal() {
    let mut job = build_job();
    job.steps[1].duration = 1e12;
    let result = recompute(&job, Directory::default());
    assert_eq!(result.tasks.len(), 4);
    assert_eq!(result.task("dig").unwrap().end, NaiveDateTime::MAX);
    assert!(result.diagnostics.contains(&ScheduleDiagnostic::EndOutOfRange {
        step: 1,
        duration_hours: 1e12
    }));
    assert!(result.critical_path.contains("dig"));
}

#[test]
fn orchestrator_rejects_a_zero_cpm_day() {
    let config = EngineConfig {
        hours_per_cpm_day: 0.0,
        ..EngineConfig::default()
    };
    assert!(matches!(
        ScheduleOrchestrator::new(config),
        Err(EngineError::InvalidConfig(_))
    ));
}
