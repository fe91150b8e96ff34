use crate::course_pending::CoursePending;
use crate::error::{Result, TrainingError};
use crate::paths;
use crate::pending_reason::PendingReason;
use crate::records::{
    Contact, Course, Group, Job, Participation, Seance, SeanceCopy, Session, SubscriptionLine,
};
use crate::store::TrainingStore;
use crate::types::{
    ContactId, CourseId, CourseState, GroupId, JobId, ParticipationId, PresenceForm, SeanceId,
    SeanceKind, SessionId, SessionState, SubscriptionLineId, SubscriptionLineState,
};
use crate::workflow::{self, CourseSignal, CourseWorkflow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Database
// ---------------------------------------------------------------------------

/// Snapshot of every training record, persisted as `.training/db.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Last allocated record id. Ids are unique across all tables.
    #[serde(default)]
    pub last_id: u64,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub seances: Vec<Seance>,
    #[serde(default)]
    pub subscription_lines: Vec<SubscriptionLine>,
    #[serde(default)]
    pub participations: Vec<Participation>,
    #[serde(default)]
    pub pending_reasons: Vec<PendingReason>,
    #[serde(default)]
    pub course_pendings: Vec<CoursePending>,
}

fn default_version() -> u32 {
    1
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    pub fn new() -> Self {
        Self {
            version: 1,
            last_id: 0,
            courses: Vec::new(),
            contacts: Vec::new(),
            jobs: Vec::new(),
            sessions: Vec::new(),
            groups: Vec::new(),
            seances: Vec::new(),
            subscription_lines: Vec::new(),
            participations: Vec::new(),
            pending_reasons: Vec::new(),
            course_pendings: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::database_path(root);
        if !path.exists() {
            return Err(TrainingError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let db: Database = serde_yaml::from_str(&data)?;
        Ok(db)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::database_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Run `f` against a working copy and keep its changes only if it succeeds.
    pub fn transaction<T>(&mut self, f: impl FnOnce(&mut Database) -> Result<T>) -> Result<T> {
        let mut working = self.clone();
        match f(&mut working) {
            Ok(value) => {
                *self = working;
                Ok(value)
            }
            Err(e) => {
                tracing::debug!(error = %e, "transaction rolled back");
                Err(e)
            }
        }
    }

    pub(crate) fn allocate_id(&mut self) -> u64 {
        let floor = self.max_record_id();
        self.last_id = self.last_id.max(floor) + 1;
        self.last_id
    }

    fn max_record_id(&self) -> u64 {
        let ids = self
            .courses
            .iter()
            .map(|r| r.id.0)
            .chain(self.contacts.iter().map(|r| r.id.0))
            .chain(self.jobs.iter().map(|r| r.id.0))
            .chain(self.sessions.iter().map(|r| r.id.0))
            .chain(self.groups.iter().map(|r| r.id.0))
            .chain(self.seances.iter().map(|r| r.id.0))
            .chain(self.subscription_lines.iter().map(|r| r.id.0))
            .chain(self.participations.iter().map(|r| r.id.0))
            .chain(self.course_pendings.iter().map(|r| r.id.0));
        ids.max().unwrap_or(0)
    }

    // ---------------------------------------------------------------------------
    // Record creation
    // ---------------------------------------------------------------------------

    pub fn add_course(&mut self, name: impl Into<String>) -> CourseId {
        let id = CourseId(self.allocate_id());
        self.courses.push(Course {
            id,
            name: name.into(),
            course_type: None,
            category: None,
            lang: None,
            state: CourseState::Draft,
            job_ids: Vec::new(),
        });
        id
    }

    pub fn add_contact(&mut self, name: impl Into<String>) -> ContactId {
        let id = ContactId(self.allocate_id());
        self.contacts.push(Contact {
            id,
            name: name.into(),
        });
        id
    }

    pub fn add_job(
        &mut self,
        contact: ContactId,
        function: Option<String>,
        email: Option<String>,
    ) -> Result<JobId> {
        self.contact(contact)?;
        let id = JobId(self.allocate_id());
        self.jobs.push(Job {
            id,
            contact,
            function,
            email,
        });
        Ok(id)
    }

    /// Attach a job to a course. Returns `false` if already attached.
    pub fn attach_job(&mut self, course: CourseId, job: JobId) -> Result<bool> {
        self.job(job)?;
        let course = self.course_mut(course)?;
        if course.job_ids.contains(&job) {
            return Ok(false);
        }
        course.job_ids.push(job);
        Ok(true)
    }

    pub fn add_session(&mut self, name: impl Into<String>, state: SessionState) -> SessionId {
        let id = SessionId(self.allocate_id());
        self.sessions.push(Session {
            id,
            name: name.into(),
            state,
            group_ids: Vec::new(),
        });
        id
    }

    pub fn add_group(&mut self, session: SessionId, name: impl Into<String>) -> Result<GroupId> {
        self.session(session)?;
        let id = GroupId(self.allocate_id());
        self.groups.push(Group {
            id,
            session,
            name: name.into(),
            seance_ids: Vec::new(),
        });
        self.session_mut(session)?.group_ids.push(id);
        Ok(id)
    }

    pub fn add_seance(
        &mut self,
        group: GroupId,
        date: DateTime<Utc>,
        duration_minutes: u32,
        course: CourseId,
        kind: SeanceKind,
    ) -> Result<SeanceId> {
        self.course(course)?;
        let session = self.group(group)?.session;
        let id = SeanceId(self.allocate_id());
        self.seances.push(Seance {
            id,
            group: Some(group),
            session_ids: vec![session],
            date,
            duration_minutes,
            course,
            kind,
            is_first_seance: false,
            presence_form: PresenceForm::No,
            manual: false,
            participant_count_manual: 0,
            contact_ids: Vec::new(),
            participant_ids: Vec::new(),
            duplicata: false,
            duplicated: false,
        });
        self.group_mut(group)?.seance_ids.push(id);
        Ok(id)
    }

    pub fn add_subscription_line(
        &mut self,
        session: SessionId,
        state: SubscriptionLineState,
    ) -> Result<SubscriptionLineId> {
        self.session(session)?;
        let id = SubscriptionLineId(self.allocate_id());
        self.subscription_lines.push(SubscriptionLine {
            id,
            session,
            state,
            participation_ids: Vec::new(),
        });
        Ok(id)
    }

    pub fn add_participation(
        &mut self,
        line: SubscriptionLineId,
        seance: SeanceId,
    ) -> Result<ParticipationId> {
        self.subscription_line(line)?;
        self.seance(seance)?;
        let id = ParticipationId(self.allocate_id());
        self.participations.push(Participation {
            id,
            subscription_line: line,
            seance,
        });
        self.subscription_line_mut(line)?.participation_ids.push(id);
        self.seance_mut(seance)?.participant_ids.push(id);
        Ok(id)
    }

    // ---------------------------------------------------------------------------
    // Lookups
    // ---------------------------------------------------------------------------

    pub fn course(&self, id: CourseId) -> Result<&Course> {
        self.courses
            .iter()
            .find(|c| c.id == id)
            .ok_or(TrainingError::CourseNotFound(id))
    }

    pub fn contact(&self, id: ContactId) -> Result<&Contact> {
        self.contacts
            .iter()
            .find(|c| c.id == id)
            .ok_or(TrainingError::ContactNotFound(id))
    }

    pub fn job(&self, id: JobId) -> Result<&Job> {
        self.jobs
            .iter()
            .find(|j| j.id == id)
            .ok_or(TrainingError::JobNotFound(id))
    }

    fn course_mut(&mut self, id: CourseId) -> Result<&mut Course> {
        self.courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(TrainingError::CourseNotFound(id))
    }

    fn session_mut(&mut self, id: SessionId) -> Result<&mut Session> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(TrainingError::SessionNotFound(id))
    }

    fn group_mut(&mut self, id: GroupId) -> Result<&mut Group> {
        self.groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(TrainingError::GroupNotFound(id))
    }

    fn seance_mut(&mut self, id: SeanceId) -> Result<&mut Seance> {
        self.seances
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(TrainingError::SeanceNotFound(id))
    }

    fn subscription_line_mut(&mut self, id: SubscriptionLineId) -> Result<&mut SubscriptionLine> {
        self.subscription_lines
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(TrainingError::SubscriptionLineNotFound(id))
    }
}

// ---------------------------------------------------------------------------
// TrainingStore
// ---------------------------------------------------------------------------

impl TrainingStore for Database {
    fn session(&self, id: SessionId) -> Result<Session> {
        self.sessions
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(TrainingError::SessionNotFound(id))
    }

    fn group(&self, id: GroupId) -> Result<Group> {
        self.groups
            .iter()
            .find(|g| g.id == id)
            .cloned()
            .ok_or(TrainingError::GroupNotFound(id))
    }

    fn seance(&self, id: SeanceId) -> Result<Seance> {
        self.seances
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(TrainingError::SeanceNotFound(id))
    }

    fn subscription_line(&self, id: SubscriptionLineId) -> Result<SubscriptionLine> {
        self.subscription_lines
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or(TrainingError::SubscriptionLineNotFound(id))
    }

    fn participation(&self, id: ParticipationId) -> Result<Participation> {
        self.participations
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(TrainingError::ParticipationNotFound(id))
    }

    fn create_seance(&mut self, copy: SeanceCopy) -> Result<SeanceId> {
        let group = copy.group;
        let session = self.group(group)?.session;
        let id = SeanceId(self.allocate_id());
        self.seances.push(copy.into_seance(id, session));
        self.group_mut(group)?.seance_ids.push(id);
        Ok(id)
    }

    fn set_participation_seance(&mut self, id: ParticipationId, seance: SeanceId) -> Result<()> {
        self.seance(seance)?;
        let participation = self
            .participations
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(TrainingError::ParticipationNotFound(id))?;
        let previous = std::mem::replace(&mut participation.seance, seance);
        if previous == seance {
            return Ok(());
        }
        if let Ok(old) = self.seance_mut(previous) {
            old.participant_ids.retain(|p| *p != id);
        }
        self.seance_mut(seance)?.participant_ids.push(id);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CourseWorkflow
// ---------------------------------------------------------------------------

impl CourseWorkflow for Database {
    fn signal(&mut self, course: CourseId, signal: CourseSignal) -> Result<CourseState> {
        let record = self.course_mut(course)?;
        let next = workflow::next_state(record.state, signal)?;
        tracing::info!(%course, %signal, from = %record.state, to = %next, "course workflow");
        record.state = next;
        Ok(next)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
