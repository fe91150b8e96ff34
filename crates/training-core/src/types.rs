use crate::error::TrainingError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Record identifiers
// ---------------------------------------------------------------------------

macro_rules! record_id {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {$(
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    )+};
}

record_id!(
    SessionId,
    GroupId,
    SeanceId,
    SubscriptionLineId,
    ParticipationId,
    CourseId,
    ContactId,
    JobId,
    CoursePendingId,
);

/// Implements `as_str`, `Display` and `FromStr` for a snake_case selection enum.
macro_rules! selection {
    ($name:ident, $field:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn all() -> &'static [$name] {
                &[$($name::$variant),+]
            }

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = TrainingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(TrainingError::InvalidValue {
                        field: $field,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Draft,
    Opened,
    OpenedConfirmed,
    #[serde(rename = "inprogress")]
    InProgress,
    ClosedConfirmed,
    Done,
    Cancelled,
}

selection!(SessionState, "session state", {
    Draft => "draft",
    Opened => "opened",
    OpenedConfirmed => "opened_confirmed",
    InProgress => "inprogress",
    ClosedConfirmed => "closed_confirmed",
    Done => "done",
    Cancelled => "cancelled",
});

impl SessionState {
    /// States a session may be in when its schedule is duplicated for a new group.
    pub fn accepts_duplication(self) -> bool {
        matches!(self, SessionState::Opened | SessionState::OpenedConfirmed)
    }

    /// States whose seances count as upcoming for pending follow-ups.
    pub fn is_scheduled(self) -> bool {
        matches!(
            self,
            SessionState::Opened
                | SessionState::OpenedConfirmed
                | SessionState::InProgress
                | SessionState::ClosedConfirmed
        )
    }
}

// ---------------------------------------------------------------------------
// SeanceKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeanceKind {
    Standard,
    Exam,
}

selection!(SeanceKind, "seance kind", {
    Standard => "standard",
    Exam => "exam",
});

// ---------------------------------------------------------------------------
// PresenceForm
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceForm {
    Yes,
    No,
}

selection!(PresenceForm, "presence form", {
    Yes => "yes",
    No => "no",
});

// ---------------------------------------------------------------------------
// SubscriptionLineState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionLineState {
    Draft,
    Confirmed,
    Cancelled,
    Done,
}

selection!(SubscriptionLineState, "subscription line state", {
    Draft => "draft",
    Confirmed => "confirmed",
    Cancelled => "cancelled",
    Done => "done",
});

// ---------------------------------------------------------------------------
// CourseState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseState {
    Draft,
    Pending,
    #[serde(rename = "inprogress")]
    InProgress,
    Deprecated,
    Validated,
}

selection!(CourseState, "course state", {
    Draft => "draft",
    Pending => "pending",
    InProgress => "inprogress",
    Deprecated => "deprecated",
    Validated => "validated",
});

// ---------------------------------------------------------------------------
// Configuration selections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    SupportOfCourse,
    Voucher,
}

selection!(ProductType, "product type", {
    SupportOfCourse => "support_of_course",
    Voucher => "voucher",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyTrigger {
    DiscountRefund,
    DiscountInvoice,
}

selection!(PenaltyTrigger, "penalty trigger", {
    DiscountRefund => "discount_refund",
    DiscountInvoice => "discount_invoice",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    Minimum,
    Maximum,
}

selection!(Threshold, "threshold", {
    Minimum => "minimum",
    Maximum => "maximum",
});

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
