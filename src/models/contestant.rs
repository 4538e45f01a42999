//! Contestant: the fixed group of participants that plays as one side of a match.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a participant (a single person).
pub type ParticipantId = Uuid;

/// One side of a match (1 member for singles, 2 for doubles).
/// Only compared for equality; the engine never looks at who the members are.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contestant {
    members: Vec<ParticipantId>,
}

impl Contestant {
    pub fn new(members: Vec<ParticipantId>) -> Self {
        Self { members }
    }

    /// Single-member contestant.
    pub fn single(id: ParticipantId) -> Self {
        Self { members: vec![id] }
    }

    /// Two-member contestant (doubles team).
    pub fn pair(first: ParticipantId, second: ParticipantId) -> Self {
        Self {
            members: vec![first, second],
        }
    }

    pub fn members(&self) -> &[ParticipantId] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl From<Vec<ParticipantId>> for Contestant {
    fn from(members: Vec<ParticipantId>) -> Self {
        Self::new(members)
    }
}
