use crate::output::{or_dash, print_json, print_table};
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use training_core::{
    config::Config,
    course_pending::{self, NewCoursePending},
    database::Database,
    pending_reason,
    types::{CourseId, CoursePendingId, JobId},
};
use std::path::Path;

#[derive(Subcommand)]
pub enum PendingSubcommand {
    /// Record that a course waits on an external action
    Add {
        /// Course id
        #[arg(long)]
        course: u64,
        /// Contact job to follow up with
        #[arg(long)]
        job: u64,
        /// Pending reason code
        #[arg(long)]
        reason: Option<String>,
        /// Planned date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        purchase_order: Option<String>,
        /// Login of the follow-up user (default: acting user)
        #[arg(long)]
        followup_by: Option<String>,
        /// Override the email prefilled from the job
        #[arg(long)]
        email: Option<String>,
    },
    /// List course pendings
    List {
        /// Only pendings flagged to do
        #[arg(long)]
        todo: bool,
    },
    /// Show a pending with its course and next seance date
    Show { id: u64 },
    /// Flag or unflag a pending as to do
    Todo {
        id: u64,
        /// Clear the flag instead of setting it
        #[arg(long)]
        clear: bool,
    },
    /// Print the course id the pending points at
    OpenCourse { id: u64 },
    /// Validate the pending's course
    ValidateCourse { id: u64 },
}

pub fn run(
    root: &Path,
    subcmd: PendingSubcommand,
    user: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        PendingSubcommand::Add {
            course,
            job,
            reason,
            date,
            note,
            purchase_order,
            followup_by,
            email,
        } => {
            let new = NewCoursePending {
                course: CourseId(course),
                job: JobId(job),
                reason,
                planned_date: date,
                note,
                purchase_order,
                followup_by,
                job_email: email,
            };
            add(root, new, user, json)
        }
        PendingSubcommand::List { todo } => list(root, todo, json),
        PendingSubcommand::Show { id } => show(root, CoursePendingId(id), json),
        PendingSubcommand::Todo { id, clear } => set_todo(root, CoursePendingId(id), !clear, json),
        PendingSubcommand::OpenCourse { id } => open_course(root, CoursePendingId(id), json),
        PendingSubcommand::ValidateCourse { id } => {
            validate_course(root, CoursePendingId(id), json)
        }
    }
}

fn acting_user(root: &Path, user: Option<&str>) -> anyhow::Result<String> {
    match user {
        Some(user) => Ok(user.to_string()),
        None => Ok(Config::load(root)
            .context("failed to load config")?
            .project
            .user),
    }
}

fn add(root: &Path, new: NewCoursePending, user: Option<&str>, json: bool) -> anyhow::Result<()> {
    let user = acting_user(root, user)?;
    let mut db = Database::load(root).context("failed to load database")?;
    let id = course_pending::create(&mut db, new, &user)?;
    db.save(root).context("failed to save database")?;

    let pending = course_pending::find(&db, id)?;
    if json {
        print_json(pending)?;
    } else {
        println!(
            "Recorded pending {id} on course {} (follow-up: {})",
            pending.course, pending.followup_by
        );
    }
    Ok(())
}

fn list(root: &Path, todo_only: bool, json: bool) -> anyhow::Result<()> {
    let db = Database::load(root).context("failed to load database")?;
    let pendings: Vec<_> = db
        .course_pendings
        .iter()
        .filter(|p| !todo_only || p.todo)
        .collect();

    if json {
        return print_json(&pendings);
    }
    if pendings.is_empty() {
        println!("No course pendings.");
        return Ok(());
    }
    let rows = pendings
        .iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.course.to_string(),
                or_dash(p.reason.as_deref()),
                p.planned_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                p.followup_by.clone(),
                if p.todo { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "COURSE", "REASON", "PLANNED", "FOLLOW-UP", "TODO"], rows);
    Ok(())
}

fn show(root: &Path, id: CoursePendingId, json: bool) -> anyhow::Result<()> {
    let db = Database::load(root).context("failed to load database")?;
    let pending = course_pending::find(&db, id)?;
    let summary = course_pending::course_summary(&db, pending)?;
    let next = course_pending::seance_next_date(&db, pending, Utc::now())?;

    if json {
        return print_json(&serde_json::json!({
            "pending": pending,
            "course": summary,
            "seance_next_date": next,
        }));
    }

    let lang = Config::load(root).ok().and_then(|c| c.project.lang);
    // A code missing from the table (hand-edited db.yaml) is shown as is.
    let reason = match &pending.reason {
        Some(code) => pending_reason::find_reason(&db.pending_reasons, code)
            .map(|r| r.name_for(lang.as_deref()).to_string())
            .unwrap_or_else(|_| code.clone()),
        None => "-".to_string(),
    };

    println!("Pending {}", pending.id);
    println!("  course:       {} {} [{}]", summary.course, summary.name, summary.state);
    println!("  type:         {}", or_dash(summary.course_type.as_deref()));
    println!("  category:     {}", or_dash(summary.category.as_deref()));
    println!("  lang:         {}", or_dash(summary.lang.as_deref()));
    println!("  reason:       {reason}");
    println!(
        "  planned:      {}",
        pending
            .planned_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!("  job:          {} {}", pending.job, or_dash(pending.job_email.as_deref()));
    println!("  follow-up:    {}", pending.followup_by);
    println!("  order:        {}", or_dash(pending.purchase_order.as_deref()));
    println!(
        "  next seance:  {}",
        next.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    if let Some(note) = &pending.note {
        println!("\n{note}");
    }
    Ok(())
}

fn set_todo(root: &Path, id: CoursePendingId, todo: bool, json: bool) -> anyhow::Result<()> {
    let mut db = Database::load(root).context("failed to load database")?;
    course_pending::set_todo(&mut db, id, todo)?;
    db.save(root).context("failed to save database")?;

    if json {
        print_json(&serde_json::json!({ "id": id, "todo": todo }))?;
    } else if todo {
        println!("Pending {id} flagged to do");
    } else {
        println!("Pending {id} cleared");
    }
    Ok(())
}

fn open_course(root: &Path, id: CoursePendingId, json: bool) -> anyhow::Result<()> {
    let db = Database::load(root).context("failed to load database")?;
    let course = course_pending::action_open_course(&db, id)?;

    if json {
        print_json(db.course(course)?)?;
    } else {
        println!("{course}");
    }
    Ok(())
}

fn validate_course(root: &Path, id: CoursePendingId, json: bool) -> anyhow::Result<()> {
    let mut db = Database::load(root).context("failed to load database")?;
    let pending = course_pending::find(&db, id)?.clone();
    let state = course_pending::action_validate_course(&mut db, &pending)?;
    db.save(root).context("failed to save database")?;

    if json {
        print_json(&serde_json::json!({ "course": pending.course, "state": state }))?;
    } else {
        println!("Course {} is now {state}", pending.course);
    }
    Ok(())
}
