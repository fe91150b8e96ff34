//! Seance matching for a session whose schedule is duplicated into a new group.
//!
//! Groups of a session run parallel schedules: each group holds its own
//! seance instances for the same slots. Matching pairs seances by their
//! [`SlotKey`] rather than by position, so groups whose seances were entered
//! in a different order still line up.
//!
//! # Steps
//!
//! 1. Validate the selection and the session layout. Nothing is written
//!    before every check has passed.
//! 2. Pick the reference group: the first group other than the target.
//! 3. If the target group is empty, copy the reference seances into it.
//! 4. Group every seance of the session by slot key ("sister sets") and map
//!    each sister to the target seance of its slot.
//! 5. Resolve every selected participation through the mapping, then
//!    repoint them all.
//!
//! Seance copies are created before participations are resolved. Run the
//! matcher inside the store's transaction (see
//! [`crate::database::Database::transaction`]) so that an
//! [`TrainingError::UnmappedSeance`] failure leaves nothing behind.

use crate::error::{Result, TrainingError};
use crate::records::{Group, Participation, SeanceCopy, Session, SlotKey};
use crate::store::TrainingStore;
use crate::types::{GroupId, ParticipationId, SeanceId, SessionId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Seance ids sharing a slot, across every group of a session.
pub type SisterSets = HashMap<SlotKey, BTreeSet<SeanceId>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Repoint {
    pub participation: ParticipationId,
    pub from: SeanceId,
    pub to: SeanceId,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub session: SessionId,
    pub reference_group: GroupId,
    pub target_group: GroupId,
    /// Seances copied into the target group; empty when it was already populated.
    pub created_seances: Vec<SeanceId>,
    pub mapping: BTreeMap<SeanceId, SeanceId>,
    pub repointed: Vec<Repoint>,
}

#[derive(Debug, Clone, Copy)]
pub struct SeanceMatcher {
    session: SessionId,
    target_group: GroupId,
}

impl SeanceMatcher {
    pub fn new(session: SessionId, target_group: GroupId) -> Self {
        Self {
            session,
            target_group,
        }
    }

    pub fn run<S: TrainingStore>(
        &self,
        store: &mut S,
        participations: &[ParticipationId],
    ) -> Result<MatchOutcome> {
        if participations.is_empty() {
            return Err(TrainingError::EmptySelection);
        }

        let session = store.session(self.session)?;
        let groups = load_groups(store, &session)?;
        let target = groups
            .iter()
            .find(|g| g.id == self.target_group)
            .cloned()
            .ok_or(TrainingError::GroupNotInSession {
                group: self.target_group,
                session: session.id,
            })?;

        check_no_shared_seance(store, &groups)?;
        let reference = reference_group(&session, &groups, target.id)?;

        let selected: Vec<Participation> = participations
            .iter()
            .map(|id| store.participation(*id))
            .collect::<Result<_>>()?;

        // Validation done: writes start here.
        let (target_seances, created_seances) = if target.seance_ids.is_empty() {
            let mut created = Vec::with_capacity(reference.seance_ids.len());
            for seance in store.group_seances(reference.id)? {
                created.push(store.create_seance(SeanceCopy::of(&seance, target.id))?);
            }
            tracing::debug!(
                group = %target.id,
                count = created.len(),
                "copied reference seances into empty group"
            );
            (created.clone(), created)
        } else {
            (target.seance_ids.clone(), Vec::new())
        };

        let sisters = sister_sets(store, &session)?;
        let mapping = build_mapping(store, &sisters, &target_seances)?;

        let plan = selected
            .iter()
            .map(|p| {
                mapping
                    .get(&p.seance)
                    .map(|to| Repoint {
                        participation: p.id,
                        from: p.seance,
                        to: *to,
                    })
                    .ok_or(TrainingError::UnmappedSeance {
                        participation: p.id,
                        seance: p.seance,
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        for repoint in &plan {
            store.set_participation_seance(repoint.participation, repoint.to)?;
        }

        tracing::info!(
            session = %session.id,
            reference = %reference.id,
            target = %target.id,
            created = created_seances.len(),
            repointed = plan.len(),
            "seances matched"
        );

        Ok(MatchOutcome {
            session: session.id,
            reference_group: reference.id,
            target_group: target.id,
            created_seances,
            mapping,
            repointed: plan,
        })
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

fn load_groups<S: TrainingStore>(store: &S, session: &Session) -> Result<Vec<Group>> {
    session.group_ids.iter().map(|id| store.group(*id)).collect()
}

/// Fails on the first seance listed by two groups or linked to two sessions.
fn check_no_shared_seance<S: TrainingStore>(store: &S, groups: &[Group]) -> Result<()> {
    let mut owner: HashMap<SeanceId, GroupId> = HashMap::new();
    for group in groups {
        for id in &group.seance_ids {
            if let Some(other) = owner.insert(*id, group.id) {
                if other != group.id {
                    return Err(TrainingError::SharedSeanceConflict(*id));
                }
            }
            if store.seance(*id)?.session_ids.len() > 1 {
                return Err(TrainingError::SharedSeanceConflict(*id));
            }
        }
    }
    Ok(())
}

/// First group other than `target`, once all such groups are known to be the same size.
fn reference_group<'a>(session: &Session, groups: &'a [Group], target: GroupId) -> Result<&'a Group> {
    let siblings: Vec<&Group> = groups.iter().filter(|g| g.id != target).collect();
    let sizes = siblings.iter().map(|g| g.seance_ids.len());
    let (Some(min), Some(max)) = (sizes.clone().min(), sizes.max()) else {
        return Err(TrainingError::NoReferenceGroup(session.id));
    };
    if min != max {
        return Err(TrainingError::GroupSizeMismatch { min, max });
    }
    Ok(siblings[0])
}

/// Slot key to seance ids, over every group of the session as currently stored.
pub fn sister_sets<S: TrainingStore>(store: &S, session: &Session) -> Result<SisterSets> {
    let mut sisters = SisterSets::new();
    for group in &session.group_ids {
        for seance in store.group_seances(*group)? {
            sisters
                .entry(seance.slot_key())
                .or_default()
                .insert(seance.id);
        }
    }
    Ok(sisters)
}

/// Map every sister of a target seance's slot to that target seance.
///
/// Slots with no target seance stay unmapped; participations on them are
/// reported when they are resolved.
pub fn build_mapping<S: TrainingStore>(
    store: &S,
    sisters: &SisterSets,
    target_seances: &[SeanceId],
) -> Result<BTreeMap<SeanceId, SeanceId>> {
    let mut mapping = BTreeMap::new();
    for id in target_seances {
        let key = store.seance(*id)?.slot_key();
        if let Some(set) = sisters.get(&key) {
            for sister in set {
                mapping.insert(*sister, *id);
            }
        }
    }
    Ok(mapping)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
