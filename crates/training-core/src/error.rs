use crate::types::{
    ContactId, CourseId, CoursePendingId, GroupId, JobId, ParticipationId, SeanceId, SessionId,
    SubscriptionLineId,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("not initialized: run 'training init'")]
    NotInitialized,

    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    #[error("seance not found: {0}")]
    SeanceNotFound(SeanceId),

    #[error("subscription line not found: {0}")]
    SubscriptionLineNotFound(SubscriptionLineId),

    #[error("participation not found: {0}")]
    ParticipationNotFound(ParticipationId),

    #[error("course not found: {0}")]
    CourseNotFound(CourseId),

    #[error("contact not found: {0}")]
    ContactNotFound(ContactId),

    #[error("job not found: {0}")]
    JobNotFound(JobId),

    #[error("course pending not found: {0}")]
    CoursePendingNotFound(CoursePendingId),

    // -- session duplication ------------------------------------------------
    #[error("you have not selected a participant of this session")]
    EmptySelection,

    #[error("you have selected a session with a shared seance ({0})")]
    SharedSeanceConflict(SeanceId),

    #[error("there is no other group in session {0}")]
    NoReferenceGroup(SessionId),

    #[error(
        "the groups of this session do not have the same number of seances \
         (between {min} and {max})"
    )]
    GroupSizeMismatch { min: usize, max: usize },

    #[error("participation {participation} points at seance {seance}, which has no match in the target group")]
    UnmappedSeance {
        participation: ParticipationId,
        seance: SeanceId,
    },

    #[error("session {session} is {state}: only opened sessions can be duplicated")]
    SessionNotOpen { session: SessionId, state: String },

    #[error("select the group the session is duplicated for")]
    MissingGroup,

    #[error("group {group} does not belong to session {session}")]
    GroupNotInSession { group: GroupId, session: SessionId },

    #[error("subscription line {line} cannot be selected: {reason}")]
    InvalidSubscriptionLine {
        line: SubscriptionLineId,
        reason: String,
    },

    // -- pending reasons ----------------------------------------------------
    #[error("pending reason code must be unique: '{0}' already exists")]
    DuplicatePendingReason(String),

    #[error("invalid code '{0}': must be 1-32 characters of lowercase letters, digits, '_' or '-'")]
    InvalidCode(String),

    #[error("invalid name '{0}': must be 1-32 characters")]
    InvalidName(String),

    #[error("unknown pending reason: {0}")]
    UnknownPendingReason(String),

    #[error("pending reason '{code}' is used by {count} course pending(s)")]
    PendingReasonInUse { code: String, count: usize },

    // -- configuration ------------------------------------------------------
    #[error("you can not assign twice the same product '{product}' to the type {kind}")]
    DuplicateProduct { kind: String, product: String },

    #[error("you can not define twice the same trigger: {0}")]
    DuplicatePenalty(String),

    #[error("you can not define twice the same threshold: {0}")]
    DuplicateThreshold(String),

    #[error("penalty rate must be between 0 and 100, got {0}")]
    RateOutOfRange(f64),

    #[error("you can not have a price lesser than 0, got {0}")]
    NegativePrice(i64),

    #[error("invalid value '{value}' for {field}")]
    InvalidValue { field: &'static str, value: String },

    // -- workflow -----------------------------------------------------------
    #[error("invalid transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: String,
        to: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, TrainingError>;
