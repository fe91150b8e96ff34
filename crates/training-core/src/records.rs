use crate::types::{
    ContactId, CourseId, CourseState, GroupId, JobId, ParticipationId, PresenceForm, SeanceId,
    SeanceKind, SessionId, SessionState, SubscriptionLineId, SubscriptionLineState,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub name: String,
    pub state: SessionState,
    #[serde(default)]
    pub group_ids: Vec<GroupId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub session: SessionId,
    pub name: String,
    #[serde(default)]
    pub seance_ids: Vec<SeanceId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seance {
    pub id: SeanceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupId>,
    /// Sessions sharing this seance. More than one entry marks a shared seance.
    #[serde(default)]
    pub session_ids: Vec<SessionId>,
    pub date: DateTime<Utc>,
    pub duration_minutes: u32,
    pub course: CourseId,
    pub kind: SeanceKind,
    #[serde(default)]
    pub is_first_seance: bool,
    #[serde(default = "default_presence_form")]
    pub presence_form: PresenceForm,
    #[serde(default)]
    pub manual: bool,
    #[serde(default)]
    pub participant_count_manual: u32,
    #[serde(default)]
    pub contact_ids: Vec<ContactId>,
    #[serde(default)]
    pub participant_ids: Vec<ParticipationId>,
    #[serde(default)]
    pub duplicata: bool,
    #[serde(default)]
    pub duplicated: bool,
}

fn default_presence_form() -> PresenceForm {
    PresenceForm::No
}

impl Seance {
    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            date: self.date,
            duration_minutes: self.duration_minutes,
            course: self.course,
            kind: self.kind,
        }
    }
}

/// Identifies structurally equivalent seances across the groups of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub date: DateTime<Utc>,
    pub duration_minutes: u32,
    pub course: CourseId,
    pub kind: SeanceKind,
}

/// Values for a seance created as a copy of another one into a new group.
///
/// Schedule fields are carried over; presence tracking and participant
/// lists start empty, and the copy is flagged as a duplicate.
#[derive(Debug, Clone, PartialEq)]
pub struct SeanceCopy {
    pub group: GroupId,
    pub date: DateTime<Utc>,
    pub duration_minutes: u32,
    pub course: CourseId,
    pub kind: SeanceKind,
    pub is_first_seance: bool,
}

impl SeanceCopy {
    pub fn of(source: &Seance, group: GroupId) -> Self {
        Self {
            group,
            date: source.date,
            duration_minutes: source.duration_minutes,
            course: source.course,
            kind: source.kind,
            is_first_seance: source.is_first_seance,
        }
    }

    pub fn into_seance(self, id: SeanceId, session: SessionId) -> Seance {
        Seance {
            id,
            group: Some(self.group),
            session_ids: vec![session],
            date: self.date,
            duration_minutes: self.duration_minutes,
            course: self.course,
            kind: self.kind,
            is_first_seance: self.is_first_seance,
            presence_form: PresenceForm::No,
            manual: false,
            participant_count_manual: 0,
            contact_ids: Vec::new(),
            participant_ids: Vec::new(),
            duplicata: true,
            duplicated: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionLine {
    pub id: SubscriptionLineId,
    pub session: SessionId,
    pub state: SubscriptionLineState,
    #[serde(default)]
    pub participation_ids: Vec<ParticipationId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participation {
    pub id: ParticipationId,
    pub subscription_line: SubscriptionLineId,
    pub seance: SeanceId,
}

// ---------------------------------------------------------------------------
// Courses and contacts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    pub state: CourseState,
    /// Contacts attached to the course, through their job.
    #[serde(default)]
    pub job_ids: Vec<JobId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub contact: ContactId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn seance() -> Seance {
        Seance {
            id: SeanceId(10),
            group: Some(GroupId(1)),
            session_ids: vec![SessionId(1)],
            date: Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap(),
            duration_minutes: 180,
            course: CourseId(5),
            kind: SeanceKind::Exam,
            is_first_seance: true,
            presence_form: PresenceForm::Yes,
            manual: true,
            participant_count_manual: 12,
            contact_ids: vec![ContactId(4)],
            participant_ids: vec![ParticipationId(40)],
            duplicata: false,
            duplicated: false,
        }
    }

    #[test]
    fn copy_keeps_schedule_and_resets_tracking() {
        let source = seance();
        let copy = SeanceCopy::of(&source, GroupId(2)).into_seance(SeanceId(11), SessionId(1));

        assert_eq!(copy.slot_key(), source.slot_key());
        assert_eq!(copy.group, Some(GroupId(2)));
        assert!(copy.is_first_seance);
        assert_eq!(copy.presence_form, PresenceForm::No);
        assert!(!copy.manual);
        assert_eq!(copy.participant_count_manual, 0);
        assert!(copy.contact_ids.is_empty());
        assert!(copy.participant_ids.is_empty());
        assert!(copy.duplicata && copy.duplicated);
    }

    #[test]
    fn slot_key_distinguishes_kind() {
        let a = seance();
        let mut b = seance();
        b.kind = SeanceKind::Standard;
        assert_ne!(a.slot_key(), b.slot_key());
    }

    #[test]
    fn seance_yaml_defaults() {
        let yaml = "id: 3\ndate: 2026-03-02T09:00:00Z\nduration_minutes: 60\ncourse: 1\nkind: standard\n";
        let s: Seance = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(s.presence_form, PresenceForm::No);
        assert!(s.group.is_none());
        assert!(s.session_ids.is_empty());
    }
}
