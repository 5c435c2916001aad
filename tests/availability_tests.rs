use chrono::NaiveDate;
use field_schedule::availability::{
    AvailabilityIndex, ConflictCause, ConflictPriority, DateInterval, ResourceRef,
};
use field_schedule::job::{IndividualPlan, Job};
use field_schedule::resource::{
    Equipment, EquipmentStatus, Leave, LeaveStatus, Maintenance, ResourceKind,
};

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn job_a() -> Job {
    let mut job = Job::new(1).with_dates(d(2025, 2, 3), d(2025, 2, 10));
    job.name = "Job A".into();
    job.personnel = vec![7];
    job
}

fn leave(person: u64, start: NaiveDate, end: NaiveDate, status: LeaveStatus) -> Leave {
    Leave {
        id: Some(format!("leave-{person}")),
        person_id: person,
        start,
        end,
        kind: None,
        status,
        reason: None,
    }
}

#[test]
fn person_on_overlapping_job_is_unavailable() {
    let jobs = vec![job_a()];
    let index = AvailabilityIndex::new(&jobs);
    let query = DateInterval::new(d(2025, 2, 1), d(2025, 2, 5));
    assert!(!index.is_available(7, ResourceKind::Personnel, query, Some(99)));
}

#[test]
fn excluding_the_job_itself_frees_the_person() {
    let jobs = vec![job_a()];
    let index = AvailabilityIndex::new(&jobs);
    let query = DateInterval::new(d(2025, 2, 1), d(2025, 2, 5));
    assert!(index.is_available(7, ResourceKind::Personnel, query, Some(1)));
}

#[test]
fn removing_the_job_frees_the_person() {
    let jobs: Vec<Job> = Vec::new();
    let index = AvailabilityIndex::new(&jobs);
    let query = DateInterval::new(d(2025, 2, 1), d(2025, 2, 5));
    assert!(index.is_available(7, ResourceKind::Personnel, query, Some(99)));
}

#[test]
fn touching_ranges_overlap() {
    let jobs = vec![job_a()];
    let index = AvailabilityIndex::new(&jobs);
    assert!(!index.is_available(7, ResourceKind::Personnel, DateInterval::single(d(2025, 2, 10)), None));
    assert!(index.is_available(7, ResourceKind::Personnel, DateInterval::single(d(2025, 2, 11)), None));
}

#[test]
fn jobs_without_both_dates_never_conflict() {
    let mut job = job_a();
    job.date_fin = None;
    let jobs = vec![job];
    let index = AvailabilityIndex::new(&jobs);
    let query = DateInterval::new(d(2025, 2, 1), d(2025, 2, 28));
    assert!(index.is_available(7, ResourceKind::Personnel, query, None));
}

#[test]
fn reversed_query_bounds_are_normalised() {
    let interval = DateInterval::new(d(2025, 2, 5), d(2025, 2, 1));
    assert_eq!(interval.start, d(2025, 2, 1));
    assert_eq!(interval.end, d(2025, 2, 5));
}

#[test]
fn individual_plan_replaces_job_dates() {
    let mut job = job_a();
    job.individual_plans.personnel.insert(
        7,
        IndividualPlan {
            date_debut: Some(d(2025, 2, 8)),
            date_fin: Some(d(2025, 2, 10)),
            ..IndividualPlan::default()
        },
    );
    let jobs = vec![job];
    let index = AvailabilityIndex::new(&jobs);
    assert!(index.is_available(7, ResourceKind::Personnel, DateInterval::new(d(2025, 2, 3), d(2025, 2, 7)), None));
    assert!(!index.is_available(7, ResourceKind::Personnel, DateInterval::single(d(2025, 2, 9)), None));
}

#[test]
fn leave_conflicts_follow_status() {
    let jobs: Vec<Job> = Vec::new();
    let leaves = vec![
        leave(7, d(2025, 2, 3), d(2025, 2, 4), LeaveStatus::Approved),
        leave(8, d(2025, 2, 3), d(2025, 2, 4), LeaveStatus::Pending),
        leave(9, d(2025, 2, 3), d(2025, 2, 4), LeaveStatus::Refused),
    ];
    let index = AvailabilityIndex::new(&jobs).with_leaves(&leaves);
    let query = DateInterval::new(d(2025, 2, 1), d(2025, 2, 5));

    let approved = index.conflicts(ResourceRef::person(7), query, None);
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].priority, ConflictPriority::High);

    let pending = index.conflicts(ResourceRef::person(8), query, None);
    assert_eq!(pending[0].priority, ConflictPriority::Medium);
    assert!(matches!(pending[0].cause, ConflictCause::LeavePending { .. }));

    assert!(index.is_available(9, ResourceKind::Personnel, query, None));
}

#[test]
fn equipment_maintenance_and_out_of_service() {
    let jobs: Vec<Job> = Vec::new();
    let equipment = vec![
        Equipment {
            id: 10,
            name: "Crane".into(),
            status: EquipmentStatus::Available,
            maintenances: vec![Maintenance {
                id: Some("m-1".into()),
                kind: None,
                start: d(2025, 2, 4),
                end: None,
                description: None,
            }],
        },
        Equipment {
            id: 11,
            name: "Loader".into(),
            status: EquipmentStatus::OutOfService,
            maintenances: Vec::new(),
        },
    ];
    let index = AvailabilityIndex::new(&jobs).with_equipment(&equipment);

    let query = DateInterval::new(d(2025, 2, 1), d(2025, 2, 5));
    let crane = index.conflicts(ResourceRef::equipment(10), query, None);
    assert_eq!(crane.len(), 1);
    assert_eq!(crane[0].interval, DateInterval::single(d(2025, 2, 4)));
    assert!(index.is_available(10, ResourceKind::Equipment, DateInterval::single(d(2025, 2, 5)), None));

    let loader = index.conflicts(ResourceRef::equipment(11), query, None);
    assert_eq!(loader[0].cause, ConflictCause::OutOfService);
    assert_eq!(loader[0].priority, ConflictPriority::Critical);
}

#[test]
fn conflicts_are_sorted_by_priority() {
    let jobs = vec![job_a()];
    let leaves = vec![
        leave(7, d(2025, 2, 4), d(2025, 2, 4), LeaveStatus::Pending),
        leave(7, d(2025, 2, 5), d(2025, 2, 5), LeaveStatus::Approved),
    ];
    let index = AvailabilityIndex::new(&jobs).with_leaves(&leaves);
    let conflicts = index.conflicts(
        ResourceRef::person(7),
        DateInterval::new(d(2025, 2, 1), d(2025, 2, 5)),
        None,
    );
    let priorities: Vec<ConflictPriority> = conflicts.iter().map(|c| c.priority).collect();
    assert_eq!(
        priorities,
        vec![ConflictPriority::High, ConflictPriority::Medium, ConflictPriority::Normal]
    );
}

#[test]
fn available_among_keeps_free_candidates_in_order() {
    let mut other = job_a();
    other.personnel = vec![7, 8];
    let jobs = vec![other];
    let index = AvailabilityIndex::new(&jobs);
    let free = index.available_among(
        ResourceKind::Personnel,
        &[9, 7, 5, 8],
        DateInterval::new(d(2025, 2, 1), d(2025, 2, 5)),
        None,
    );
    assert_eq!(free, vec![9, 5]);
}

#[test]
fn job_conflicts_cover_every_listed_resource() {
    let mut current = Job::new(2).with_dates(d(2025, 2, 5), d(2025, 2, 6));
    current.personnel = vec![7, 8];
    current.equipements = vec![10];
    let mut other = job_a();
    other.equipements = vec![10];
    let jobs = vec![other, current.clone()];

    let index = AvailabilityIndex::new(&jobs);
    let conflicts = index.job_conflicts(&current);
    let resources: Vec<ResourceRef> = conflicts.iter().map(|c| c.resource).collect();
    assert_eq!(resources, vec![ResourceRef::person(7), ResourceRef::equipment(10)]);
    assert!(conflicts.iter().all(|c| matches!(
        c.cause,
        ConflictCause::Event { job_id: 1, .. }
    )));
}

#[test]
fn unknown_leave_status_blocks_at_normal_priority() {
    let jobs: Vec<Job> = Vec::new();
    let leaves: Vec<Leave> = serde_json::from_str(
        r#"[{ "id": "c-1", "personnelId": 7, "dateDebut": "2025-02-03", "dateFin": "2025-02-04", "statut": "annule" }]"#,
    )
    .unwrap();
    assert_eq!(leaves[0].status, LeaveStatus::Other);

    let index = AvailabilityIndex::new(&jobs).with_leaves(&leaves);
    let conflicts = index.conflicts(
        ResourceRef::person(7),
        DateInterval::new(d(2025, 2, 1), d(2025, 2, 5)),
        None,
    );
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].priority, ConflictPriority::Normal);
    assert_eq!(
        conflicts[0].cause,
        ConflictCause::LeaveRequested {
            leave_id: Some("c-1".into())
        }
    );
}
