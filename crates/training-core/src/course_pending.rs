//! Follow-up records for courses waiting on an external action.

use crate::database::Database;
use crate::error::{Result, TrainingError};
use crate::pending_reason;
use crate::store::TrainingStore;
use crate::types::{CourseId, CoursePendingId, CourseState, JobId};
use crate::workflow::{CourseSignal, CourseWorkflow};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoursePending {
    pub id: CoursePendingId,
    /// Login of the user following the pending up.
    pub followup_by: String,
    pub course: CourseId,
    /// Code of a [`pending_reason::PendingReason`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_order: Option<String>,
    pub created_at: DateTime<Utc>,
    pub job: JobId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_email: Option<String>,
    #[serde(default)]
    pub todo: bool,
}

/// Fields supplied when recording a new pending.
#[derive(Debug, Clone, Default)]
pub struct NewCoursePending {
    pub course: CourseId,
    pub job: JobId,
    pub reason: Option<String>,
    pub planned_date: Option<NaiveDate>,
    pub note: Option<String>,
    pub purchase_order: Option<String>,
    /// Defaults to the acting user when `None`.
    pub followup_by: Option<String>,
    /// Defaults to the job's email when `None`.
    pub job_email: Option<String>,
}

/// Values read through the pending's course.
#[derive(Debug, Clone, Serialize)]
pub struct CourseSummary {
    pub course: CourseId,
    pub name: String,
    pub course_type: Option<String>,
    pub category: Option<String>,
    pub lang: Option<String>,
    pub state: CourseState,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

pub fn create(db: &mut Database, new: NewCoursePending, acting_user: &str) -> Result<CoursePendingId> {
    db.course(new.course)?;
    db.job(new.job)?;
    if let Some(code) = &new.reason {
        pending_reason::find_reason(&db.pending_reasons, code)?;
    }
    let job_email = match new.job_email {
        Some(email) => Some(email),
        None => on_change_job(db, new.job)?,
    };
    let id = CoursePendingId(db.allocate_id());
    db.course_pendings.push(CoursePending {
        id,
        followup_by: new.followup_by.unwrap_or_else(|| acting_user.to_string()),
        course: new.course,
        reason: new.reason,
        planned_date: new.planned_date,
        note: new.note,
        purchase_order: new.purchase_order,
        created_at: Utc::now(),
        job: new.job,
        job_email,
        todo: false,
    });
    tracing::info!(pending = %id, course = %new.course, "course pending recorded");
    Ok(id)
}

pub fn find(db: &Database, id: CoursePendingId) -> Result<&CoursePending> {
    db.course_pendings
        .iter()
        .find(|p| p.id == id)
        .ok_or(TrainingError::CoursePendingNotFound(id))
}

pub fn set_todo(db: &mut Database, id: CoursePendingId, todo: bool) -> Result<()> {
    let pending = db
        .course_pendings
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or(TrainingError::CoursePendingNotFound(id))?;
    pending.todo = todo;
    Ok(())
}

/// Email to prefill when the contact job changes.
pub fn on_change_job(db: &Database, job: JobId) -> Result<Option<String>> {
    Ok(db.job(job)?.email.clone())
}

pub fn course_summary(db: &Database, pending: &CoursePending) -> Result<CourseSummary> {
    let course = db.course(pending.course)?;
    Ok(CourseSummary {
        course: course.id,
        name: course.name.clone(),
        course_type: course.course_type.clone(),
        category: course.category.clone(),
        lang: course.lang.clone(),
        state: course.state,
    })
}

/// Earliest upcoming seance of the pending's course in a scheduled session.
pub fn seance_next_date(
    db: &Database,
    pending: &CoursePending,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>> {
    let mut next: Option<DateTime<Utc>> = None;
    for seance in db
        .seances
        .iter()
        .filter(|s| s.course == pending.course && s.date >= now)
    {
        let mut scheduled = false;
        for session in &seance.session_ids {
            if db.session(*session)?.state.is_scheduled() {
                scheduled = true;
                break;
            }
        }
        if scheduled && next.map_or(true, |d| seance.date < d) {
            next = Some(seance.date);
        }
    }
    Ok(next)
}

/// The course a pending's "open course" action leads to.
pub fn action_open_course(db: &Database, id: CoursePendingId) -> Result<CourseId> {
    Ok(find(db, id)?.course)
}

/// Send the validate signal to the pending's course.
pub fn action_validate_course<W: CourseWorkflow>(
    workflow: &mut W,
    pending: &CoursePending,
) -> Result<CourseState> {
    workflow.signal(pending.course, CourseSignal::Validate)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
