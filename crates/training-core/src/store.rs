//! Host-service interface used by the scheduling operations.
//!
//! Operations read records by id and write through the narrow create/update
//! calls below. Access control and persistence belong to the implementor;
//! [`crate::database::Database`] is the file-backed implementation shipped
//! with this crate.

use crate::error::Result;
use crate::records::{Group, Participation, Seance, SeanceCopy, Session, SubscriptionLine};
use crate::types::{GroupId, ParticipationId, SeanceId, SessionId, SubscriptionLineId};

pub trait TrainingStore {
    fn session(&self, id: SessionId) -> Result<Session>;

    fn group(&self, id: GroupId) -> Result<Group>;

    fn seance(&self, id: SeanceId) -> Result<Seance>;

    fn subscription_line(&self, id: SubscriptionLineId) -> Result<SubscriptionLine>;

    fn participation(&self, id: ParticipationId) -> Result<Participation>;

    /// Create a seance from `copy`, appended to the seances of `copy.group`.
    fn create_seance(&mut self, copy: SeanceCopy) -> Result<SeanceId>;

    /// Point a participation at another seance.
    fn set_participation_seance(&mut self, id: ParticipationId, seance: SeanceId) -> Result<()>;

    /// All seances of a group, in the group's order.
    fn group_seances(&self, id: GroupId) -> Result<Vec<Seance>> {
        self.group(id)?
            .seance_ids
            .into_iter()
            .map(|seance| self.seance(seance))
            .collect()
    }
}
