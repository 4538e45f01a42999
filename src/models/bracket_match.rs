//! BracketMatch, Slot, SlotSide and Score for single-elimination rounds.

use crate::models::contestant::Contestant;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which slot of a match (first or second contestant).
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotSide {
    #[default]
    A,
    B,
}

impl SlotSide {
    pub fn other(self) -> Self {
        match self {
            SlotSide::A => SlotSide::B,
            SlotSide::B => SlotSide::A,
        }
    }
}

impl std::fmt::Display for SlotSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotSide::A => write!(f, "A"),
            SlotSide::B => write!(f, "B"),
        }
    }
}

/// Contents of one side of a match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Slot {
    /// A real contestant, known at creation or written in by advancement.
    /// `advanced_from` keeps the (round, position) tag of the placeholder it replaced.
    Resolved {
        contestant: Contestant,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        advanced_from: Option<(u32, u32)>,
    },
    /// Waiting for the winner of the match at (round, position).
    Pending { round: u32, position: u32 },
    /// A top seed placed here without playing the previous round.
    Bye { contestant: Contestant },
}

impl Slot {
    pub fn resolved(contestant: Contestant) -> Self {
        Slot::Resolved {
            contestant,
            advanced_from: None,
        }
    }

    /// A winner written over the placeholder that waited on (round, position).
    pub fn advanced(contestant: Contestant, round: u32, position: u32) -> Self {
        Slot::Resolved {
            contestant,
            advanced_from: Some((round, position)),
        }
    }

    pub fn pending(round: u32, position: u32) -> Self {
        Slot::Pending { round, position }
    }

    pub fn bye(contestant: Contestant) -> Self {
        Slot::Bye { contestant }
    }

    /// The contestant in this slot, if one is known (byes included).
    pub fn contestant(&self) -> Option<&Contestant> {
        match self {
            Slot::Resolved { contestant, .. } | Slot::Bye { contestant } => Some(contestant),
            Slot::Pending { .. } => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.contestant().is_some()
    }

    /// True if this is a placeholder waiting on the winner of (round, position).
    pub fn is_pending_for(&self, round: u32, position: u32) -> bool {
        matches!(self, Slot::Pending { round: r, position: p } if *r == round && *p == position)
    }

    /// The (round, position) this slot waits on, or was filled from.
    pub fn source_tag(&self) -> Option<(u32, u32)> {
        match self {
            Slot::Pending { round, position } => Some((*round, *position)),
            Slot::Resolved { advanced_from, .. } => *advanced_from,
            Slot::Bye { .. } => None,
        }
    }

    /// True if this slot waits on, or was already filled by, the winner of (round, position).
    pub fn is_fed_by(&self, round: u32, position: u32) -> bool {
        self.source_tag() == Some((round, position))
    }
}

/// Final score of a match. Not interpreted beyond "present implies completed".
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub a: u32,
    pub b: u32,
}

impl Score {
    pub fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }
}

/// A single elimination match. `completed` is derived from `winner`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "MatchRecord", into = "MatchRecord")]
pub struct BracketMatch {
    pub id: MatchId,
    /// 1 = first elimination round, increasing toward the final.
    pub round: u32,
    /// Unique and ascending within a round; says nothing about other rounds.
    pub position: u32,
    pub slot_a: Slot,
    pub slot_b: Slot,
    /// None if not yet played.
    pub winner: Option<SlotSide>,
    pub score: Option<Score>,
}

impl BracketMatch {
    pub fn new(round: u32, position: u32, slot_a: Slot, slot_b: Slot) -> Self {
        Self {
            id: Uuid::new_v4(),
            round,
            position,
            slot_a,
            slot_b,
            winner: None,
            score: None,
        }
    }

    pub fn completed(&self) -> bool {
        self.winner.is_some()
    }

    pub fn slot(&self, side: SlotSide) -> &Slot {
        match side {
            SlotSide::A => &self.slot_a,
            SlotSide::B => &self.slot_b,
        }
    }

    pub fn slot_mut(&mut self, side: SlotSide) -> &mut Slot {
        match side {
            SlotSide::A => &mut self.slot_a,
            SlotSide::B => &mut self.slot_b,
        }
    }

    /// Contestant in the winning slot, once the match is decided.
    pub fn winning_contestant(&self) -> Option<&Contestant> {
        self.winner.and_then(|side| self.slot(side).contestant())
    }

    /// Both sides known, so the match can be played.
    pub fn is_ready(&self) -> bool {
        self.slot_a.is_resolved() && self.slot_b.is_resolved()
    }
}

/// Stored / wire shape of a match: same fields plus an explicit `completed` flag.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct MatchRecord {
    id: MatchId,
    round: u32,
    position: u32,
    slot_a: Slot,
    slot_b: Slot,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    winner_slot: Option<SlotSide>,
    #[serde(default)]
    score: Option<Score>,
}

impl From<MatchRecord> for BracketMatch {
    fn from(r: MatchRecord) -> Self {
        // `completed` on input is informational; the winner decides.
        Self {
            id: r.id,
            round: r.round,
            position: r.position,
            slot_a: r.slot_a,
            slot_b: r.slot_b,
            winner: r.winner_slot,
            score: r.score,
        }
    }
}

impl From<BracketMatch> for MatchRecord {
    fn from(m: BracketMatch) -> Self {
        Self {
            id: m.id,
            round: m.round,
            position: m.position,
            completed: m.winner.is_some(),
            slot_a: m.slot_a,
            slot_b: m.slot_b,
            winner_slot: m.winner,
            score: m.score,
        }
    }
}

/// Where a winner goes: one slot of one match in the next round.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct AdvancementTarget {
    pub round: u32,
    pub position: u32,
    pub slot: SlotSide,
}

impl std::fmt::Display for AdvancementTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "round {} position {} slot {}", self.round, self.position, self.slot)
    }
}
