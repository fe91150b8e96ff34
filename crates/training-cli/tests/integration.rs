#![allow(deprecated)]
use assert_cmd::Command;
use chrono::{Duration, TimeZone, Utc};
use predicates::prelude::*;
use tempfile::TempDir;
use training_core::{
    database::Database,
    store::TrainingStore,
    types::{
        ContactId, CourseId, CourseState, GroupId, JobId, SeanceKind, SessionId, SessionState,
        SubscriptionLineId, SubscriptionLineState,
    },
};

fn training(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("training").unwrap();
    cmd.current_dir(dir.path())
        .env("TRAINING_ROOT", dir.path())
        .env_remove("TRAINING_USER");
    cmd
}

fn init_project(dir: &TempDir) {
    training(dir).arg("init").assert().success();
}

struct Fixture {
    session: SessionId,
    morning: GroupId,
    evening: GroupId,
    confirmed: SubscriptionLineId,
    draft: SubscriptionLineId,
    course: CourseId,
    contact: ContactId,
    job: JobId,
}

/// One opened session with two groups; the morning group holds two seances
/// a confirmed subscriber attends, the evening group is empty.
fn seed(dir: &TempDir) -> Fixture {
    init_project(dir);
    let mut db = Database::load(dir.path()).unwrap();

    let course = db.add_course("Bookkeeping");
    let contact = db.add_contact("Grace");
    let job = db
        .add_job(contact, Some("Buyer".into()), Some("grace@example.com".into()))
        .unwrap();
    db.attach_job(course, job).unwrap();

    let session = db.add_session("Spring", SessionState::Opened);
    let morning = db.add_group(session, "Morning").unwrap();
    let evening = db.add_group(session, "Evening").unwrap();
    let confirmed = db
        .add_subscription_line(session, SubscriptionLineState::Confirmed)
        .unwrap();
    let draft = db
        .add_subscription_line(session, SubscriptionLineState::Draft)
        .unwrap();

    let start = Utc::now() + Duration::days(30);
    for day in 0..2 {
        let seance = db
            .add_seance(
                morning,
                start + Duration::days(day),
                180,
                course,
                SeanceKind::Standard,
            )
            .unwrap();
        db.add_participation(confirmed, seance).unwrap();
    }
    db.save(dir.path()).unwrap();

    Fixture {
        session,
        morning,
        evening,
        confirmed,
        draft,
        course,
        contact,
        job,
    }
}

// ---------------------------------------------------------------------------
// training init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_data_files() {
    let dir = TempDir::new().unwrap();
    training(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created: .training/config.yaml"));

    assert!(dir.path().join(".training").is_dir());
    assert!(dir.path().join(".training/config.yaml").exists());
    assert!(dir.path().join(".training/db.yaml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    training(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  .training/db.yaml"));
}

#[test]
fn commands_require_init() {
    let dir = TempDir::new().unwrap();
    training(&dir)
        .args(["session", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("training init"));
}

// ---------------------------------------------------------------------------
// training session
// ---------------------------------------------------------------------------

#[test]
fn session_show_lists_groups() {
    let dir = TempDir::new().unwrap();
    let f = seed(&dir);

    training(&dir)
        .args(["session", "show", &f.session.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Morning"))
        .stdout(predicate::str::contains("Evening"))
        .stdout(predicate::str::contains("(no seances)"));
}

#[test]
fn session_duplicate_copies_schedule_and_moves_subscriber() {
    let dir = TempDir::new().unwrap();
    let f = seed(&dir);

    training(&dir)
        .args([
            "session",
            "duplicate",
            &f.session.to_string(),
            "--group",
            &f.evening.to_string(),
            "--line",
            &f.confirmed.to_string(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("created 2 seance(s)"))
        .stdout(predicate::str::contains("moved 2 participation(s)"));

    let db = Database::load(dir.path()).unwrap();
    let evening = db.group(f.evening).unwrap();
    assert_eq!(evening.seance_ids.len(), 2);
    for p in &db.subscription_line(f.confirmed).unwrap().participation_ids {
        let seance = db.participation(*p).unwrap().seance;
        assert!(evening.seance_ids.contains(&seance));
    }
    assert!(db.group(f.morning).unwrap().seance_ids.iter().all(|s| {
        db.seance(*s).unwrap().participant_ids.is_empty()
    }));
}

#[test]
fn session_duplicate_json_reports_mapping() {
    let dir = TempDir::new().unwrap();
    let f = seed(&dir);

    let output = training(&dir)
        .args([
            "--json",
            "session",
            "duplicate",
            &f.session.to_string(),
            "--group",
            &f.evening.to_string(),
            "--line",
            &f.confirmed.to_string(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["reference_group"], f.morning.0);
    assert_eq!(value["mapping"].as_object().unwrap().len(), 2);
}

#[test]
fn session_duplicate_without_lines_fails_and_keeps_data() {
    let dir = TempDir::new().unwrap();
    let f = seed(&dir);

    training(&dir)
        .args([
            "session",
            "duplicate",
            &f.session.to_string(),
            "--group",
            &f.evening.to_string(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not selected a participant"));

    let db = Database::load(dir.path()).unwrap();
    assert!(db.group(f.evening).unwrap().seance_ids.is_empty());
}

#[test]
fn session_duplicate_rejects_unconfirmed_line() {
    let dir = TempDir::new().unwrap();
    let f = seed(&dir);

    training(&dir)
        .args([
            "session",
            "duplicate",
            &f.session.to_string(),
            "--group",
            &f.evening.to_string(),
            "--line",
            &f.confirmed.to_string(),
            "--line",
            &f.draft.to_string(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not confirmed"));

    let db = Database::load(dir.path()).unwrap();
    assert!(db.group(f.evening).unwrap().seance_ids.is_empty());
}

// ---------------------------------------------------------------------------
// training reason
// ---------------------------------------------------------------------------

#[test]
fn reason_add_translate_and_list() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    training(&dir)
        .args(["reason", "add", "waiting-po", "Waiting", "for", "order"])
        .assert()
        .success();
    training(&dir)
        .args(["reason", "translate", "waiting-po", "fr", "Attente", "commande"])
        .assert()
        .success();

    training(&dir)
        .args(["reason", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Waiting for order"));
    training(&dir)
        .args(["reason", "list", "--lang", "fr"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Attente commande"));
}

#[test]
fn reason_code_must_be_unique() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    training(&dir)
        .args(["reason", "add", "budget", "Budget"])
        .assert()
        .success();
    training(&dir)
        .args(["reason", "add", "budget", "Other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be unique"));
}

#[test]
fn reason_remove_unknown_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    training(&dir)
        .args(["reason", "remove", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown pending reason"));
}

// ---------------------------------------------------------------------------
// training pending
// ---------------------------------------------------------------------------

#[test]
fn pending_add_defaults_to_config_user_and_job_email() {
    let dir = TempDir::new().unwrap();
    let f = seed(&dir);

    let output = training(&dir)
        .args([
            "--json",
            "pending",
            "add",
            "--course",
            &f.course.to_string(),
            "--job",
            &f.job.to_string(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["followup_by"], "admin");
    assert_eq!(value["job_email"], "grace@example.com");
    assert_eq!(value["todo"], false);
}

#[test]
fn pending_add_uses_acting_user_flag() {
    let dir = TempDir::new().unwrap();
    let f = seed(&dir);

    training(&dir)
        .args([
            "--user",
            "marie",
            "pending",
            "add",
            "--course",
            &f.course.to_string(),
            "--job",
            &f.job.to_string(),
            "--date",
            "2027-01-15",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("follow-up: marie"));

    training(&dir)
        .args(["pending", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2027-01-15"));
}

#[test]
fn pending_add_rejects_unknown_reason() {
    let dir = TempDir::new().unwrap();
    let f = seed(&dir);

    training(&dir)
        .args([
            "pending",
            "add",
            "--course",
            &f.course.to_string(),
            "--job",
            &f.job.to_string(),
            "--reason",
            "missing",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown pending reason"));
}

#[test]
fn reason_used_by_pending_cannot_be_removed() {
    let dir = TempDir::new().unwrap();
    let f = seed(&dir);

    training(&dir)
        .args(["reason", "add", "supplier", "Supplier"])
        .assert()
        .success();
    training(&dir)
        .args([
            "pending",
            "add",
            "--course",
            &f.course.to_string(),
            "--job",
            &f.job.to_string(),
            "--reason",
            "supplier",
        ])
        .assert()
        .success();

    training(&dir)
        .args(["reason", "remove", "supplier"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is used by 1 course pending"));

    let id = Database::load(dir.path()).unwrap().course_pendings[0]
        .id
        .to_string();
    training(&dir)
        .args(["pending", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("reason:       Supplier"));
}

#[test]
fn pending_add_rejects_unknown_job_with_explicit_email() {
    let dir = TempDir::new().unwrap();
    let f = seed(&dir);

    training(&dir)
        .args([
            "pending",
            "add",
            "--course",
            &f.course.to_string(),
            "--job",
            "999",
            "--email",
            "someone@example.com",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("job not found: 999"));
    assert!(Database::load(dir.path()).unwrap().course_pendings.is_empty());
}

#[test]
fn pending_show_reports_next_seance_date() {
    let dir = TempDir::new().unwrap();
    let f = seed(&dir);
    let mut db = Database::load(dir.path()).unwrap();
    let id = training_core::course_pending::create(
        &mut db,
        training_core::course_pending::NewCoursePending {
            course: f.course,
            job: f.job,
            ..Default::default()
        },
        "admin",
    )
    .unwrap();
    let expected = db.seances[0].date;
    db.save(dir.path()).unwrap();

    let output = training(&dir)
        .args(["--json", "pending", "show", &id.to_string()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["course"]["name"], "Bookkeeping");
    let next: chrono::DateTime<Utc> =
        serde_json::from_value(value["seance_next_date"].clone()).unwrap();
    assert_eq!(next, expected);
}

#[test]
fn pending_todo_filters_list() {
    let dir = TempDir::new().unwrap();
    let f = seed(&dir);
    let course = f.course.to_string();
    let job = f.job.to_string();

    for _ in 0..2 {
        training(&dir)
            .args(["pending", "add", "--course", &course, "--job", &job])
            .assert()
            .success();
    }
    let db = Database::load(dir.path()).unwrap();
    let first = db.course_pendings[0].id.to_string();

    training(&dir)
        .args(["pending", "todo", &first])
        .assert()
        .success();

    let output = training(&dir)
        .args(["--json", "pending", "list", "--todo"])
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
}

#[test]
fn pending_validate_course_moves_course_to_validated() {
    let dir = TempDir::new().unwrap();
    let f = seed(&dir);
    training(&dir)
        .args([
            "pending",
            "add",
            "--course",
            &f.course.to_string(),
            "--job",
            &f.job.to_string(),
        ])
        .assert()
        .success();
    let id = Database::load(dir.path()).unwrap().course_pendings[0]
        .id
        .to_string();

    training(&dir)
        .args(["pending", "open-course", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains(f.course.to_string()));
    training(&dir)
        .args(["pending", "validate-course", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("validated"));

    let db = Database::load(dir.path()).unwrap();
    assert_eq!(db.course(f.course).unwrap().state, CourseState::Validated);
}

// ---------------------------------------------------------------------------
// training contact
// ---------------------------------------------------------------------------

#[test]
fn contact_courses_lists_attached_courses() {
    let dir = TempDir::new().unwrap();
    let f = seed(&dir);

    training(&dir)
        .args(["contact", "courses", &f.contact.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bookkeeping"))
        .stdout(predicate::str::contains("Buyer"));
}

// ---------------------------------------------------------------------------
// training config
// ---------------------------------------------------------------------------

#[test]
fn config_tables_round_trip_through_show() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    training(&dir)
        .args(["config", "product", "add", "voucher", "VOUCHER-100"])
        .assert()
        .success();
    training(&dir)
        .args(["config", "penalty", "add", "discount_refund", "12.5"])
        .assert()
        .success();
    training(&dir)
        .args(["config", "threshold", "add", "minimum", "50"])
        .assert()
        .success();

    training(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("VOUCHER-100"))
        .stdout(predicate::str::contains("12.5%"))
        .stdout(predicate::str::contains("minimum"));
    training(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config is valid"));
}

#[test]
fn config_rejects_constraint_violations() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    training(&dir)
        .args(["config", "product", "add", "voucher", "V1"])
        .assert()
        .success();
    training(&dir)
        .args(["config", "product", "add", "voucher", "V1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("twice the same product"));
    training(&dir)
        .args(["config", "penalty", "add", "discount_invoice", "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 100"));
    training(&dir)
        .args(["config", "threshold", "add", "maximum", "-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lesser than 0"));
    training(&dir)
        .args(["config", "product", "add", "gift", "V2"])
        .assert()
        .failure();
}

#[test]
fn config_validate_flags_hand_edited_errors() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let path = dir.path().join(".training/config.yaml");
    let mut content = std::fs::read_to_string(&path).unwrap();
    content.push_str("penalties:\n  - trigger: discount_refund\n    rate: 250.0\n");
    std::fs::write(&path, content).unwrap();

    training(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error]"));
}
