use crate::error::{Result, TrainingError};
use crate::types::{CourseId, CourseState};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseSignal {
    Validate,
}

impl fmt::Display for CourseSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseSignal::Validate => f.write_str("signal_validate"),
        }
    }
}

/// Dispatches workflow signals to courses.
pub trait CourseWorkflow {
    /// Send `signal` to the course and return its resulting state.
    fn signal(&mut self, course: CourseId, signal: CourseSignal) -> Result<CourseState>;
}

/// State reached by a course in `from` when it receives `signal`.
pub fn next_state(from: CourseState, signal: CourseSignal) -> Result<CourseState> {
    match (from, signal) {
        (
            CourseState::Draft
            | CourseState::Pending
            | CourseState::InProgress
            | CourseState::Validated,
            CourseSignal::Validate,
        ) => Ok(CourseState::Validated),
        (CourseState::Deprecated, CourseSignal::Validate) => Err(TrainingError::InvalidTransition {
            from: from.to_string(),
            to: CourseState::Validated.to_string(),
            reason: "a deprecated course can not be validated".to_string(),
        }),
    }
}
