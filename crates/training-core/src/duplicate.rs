use crate::error::{Result, TrainingError};
use crate::matcher::{MatchOutcome, SeanceMatcher};
use crate::store::TrainingStore;
use crate::types::{GroupId, ParticipationId, SessionId, SubscriptionLineState, SubscriptionLineId};
use serde::{Deserialize, Serialize};

/// Duplicates a session's schedule for one of its groups and moves the
/// selected subscribers' participations onto that group's seances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateWizard {
    pub session: SessionId,
    #[serde(default)]
    pub group: Option<GroupId>,
    #[serde(default)]
    pub subscription_lines: Vec<SubscriptionLineId>,
}

impl DuplicateWizard {
    /// Wizard opened from a session record.
    pub fn for_session(session: SessionId) -> Self {
        Self {
            session,
            group: None,
            subscription_lines: Vec::new(),
        }
    }

    pub fn with_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_lines(mut self, lines: impl IntoIterator<Item = SubscriptionLineId>) -> Self {
        self.subscription_lines.extend(lines);
        self
    }

    pub fn apply<S: TrainingStore>(&self, store: &mut S) -> Result<MatchOutcome> {
        if self.subscription_lines.is_empty() {
            return Err(TrainingError::EmptySelection);
        }

        let session = store.session(self.session)?;
        if !session.state.accepts_duplication() {
            return Err(TrainingError::SessionNotOpen {
                session: session.id,
                state: session.state.to_string(),
            });
        }

        let group = self.group.ok_or(TrainingError::MissingGroup)?;
        if store.group(group)?.session != session.id || !session.group_ids.contains(&group) {
            return Err(TrainingError::GroupNotInSession {
                group,
                session: session.id,
            });
        }

        let participations = self.participations(store)?;
        tracing::debug!(
            session = %session.id,
            group = %group,
            lines = self.subscription_lines.len(),
            participations = participations.len(),
            "duplicating session schedule"
        );
        SeanceMatcher::new(session.id, group).run(store, &participations)
    }

    /// Participations of the selected lines, after checking each line may be selected.
    fn participations<S: TrainingStore>(&self, store: &S) -> Result<Vec<ParticipationId>> {
        let mut participations = Vec::new();
        for id in &self.subscription_lines {
            let line = store.subscription_line(*id)?;
            if line.session != self.session {
                return Err(TrainingError::InvalidSubscriptionLine {
                    line: line.id,
                    reason: format!("it belongs to session {}", line.session),
                });
            }
            if line.state != SubscriptionLineState::Confirmed {
                return Err(TrainingError::InvalidSubscriptionLine {
                    line: line.id,
                    reason: format!("it is {}, not confirmed", line.state),
                });
            }
            participations.extend(line.participation_ids);
        }
        Ok(participations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::types::{SeanceKind, SessionState};
    use chrono::{TimeZone, Utc};

    struct Setup {
        db: Database,
        session: SessionId,
        g1: GroupId,
        g2: GroupId,
        line: SubscriptionLineId,
    }

    fn setup(state: SessionState) -> Setup {
        let mut db = Database::new();
        let course = db.add_course("Accounting");
        let session = db.add_session("Winter", state);
        let g1 = db.add_group(session, "Morning").unwrap();
        let g2 = db.add_group(session, "Evening").unwrap();
        let line = db
            .add_subscription_line(session, SubscriptionLineState::Confirmed)
            .unwrap();
        for day in 1..=2 {
            let date = Utc.with_ymd_and_hms(2026, 11, day, 8, 30, 0).unwrap();
            let seance = db
                .add_seance(g1, date, 240, course, SeanceKind::Standard)
                .unwrap();
            db.add_participation(line, seance).unwrap();
        }
        Setup {
            db,
            session,
            g1,
            g2,
            line,
        }
    }

    #[test]
    fn apply_moves_line_participations_to_target_group() {
        let mut s = setup(SessionState::Opened);
        let outcome = DuplicateWizard::for_session(s.session)
            .with_group(s.g2)
            .with_lines([s.line])
            .apply(&mut s.db)
            .unwrap();

        assert_eq!(outcome.reference_group, s.g1);
        assert_eq!(outcome.repointed.len(), 2);
        let g2 = s.db.group(s.g2).unwrap();
        for p in &s.db.subscription_line(s.line).unwrap().participation_ids {
            assert!(g2.seance_ids.contains(&s.db.participation(*p).unwrap().seance));
        }
    }

    #[test]
    fn no_line_selected_is_empty_selection() {
        let mut s = setup(SessionState::Opened);
        let err = DuplicateWizard::for_session(s.session)
            .with_group(s.g2)
            .apply(&mut s.db)
            .unwrap_err();
        assert!(matches!(err, TrainingError::EmptySelection));
    }

    #[test]
    fn session_must_be_opened() {
        let mut s = setup(SessionState::Draft);
        let err = DuplicateWizard::for_session(s.session)
            .with_group(s.g2)
            .with_lines([s.line])
            .apply(&mut s.db)
            .unwrap_err();
        assert!(matches!(err, TrainingError::SessionNotOpen { .. }));
    }

    #[test]
    fn group_is_required() {
        let mut s = setup(SessionState::OpenedConfirmed);
        let err = DuplicateWizard::for_session(s.session)
            .with_lines([s.line])
            .apply(&mut s.db)
            .unwrap_err();
        assert!(matches!(err, TrainingError::MissingGroup));
    }

    #[test]
    fn unconfirmed_line_is_rejected() {
        let mut s = setup(SessionState::Opened);
        let draft = s
            .db
            .add_subscription_line(s.session, SubscriptionLineState::Draft)
            .unwrap();
        let err = DuplicateWizard::for_session(s.session)
            .with_group(s.g2)
            .with_lines([s.line, draft])
            .apply(&mut s.db)
            .unwrap_err();
        assert!(matches!(err, TrainingError::InvalidSubscriptionLine { line, .. } if line == draft));
        assert!(s.db.group(s.g2).unwrap().seance_ids.is_empty());
    }
}
