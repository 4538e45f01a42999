//! Bracket envelope and BracketError.

use crate::models::bracket_match::{AdvancementTarget, BracketMatch, MatchId, SlotSide};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during bracket operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// Malformed contestant list or match list.
    InvalidInput(String),
    /// No match with this id in the bracket.
    MatchNotFound(MatchId),
    /// Advancement asked for a match that has no winner yet.
    MatchNotCompleted(MatchId),
    /// A result was recorded for a match that already has one.
    MatchAlreadyCompleted(MatchId),
    /// The match still has a placeholder slot and cannot be decided.
    SlotNotResolved(MatchId),
    /// More than one slot in the next round waits on the same match.
    AmbiguousAdvancement {
        first: AdvancementTarget,
        second: AdvancementTarget,
    },
    /// The resolved target match does not exist.
    TargetNotFound { round: u32, position: u32 },
    /// The target slot already holds a contestant.
    SlotAlreadyResolved {
        round: u32,
        position: u32,
        side: SlotSide,
    },
    /// Round layout cannot be reconciled (missing round, index out of range).
    MalformedBracket(String),
    /// Caller's expected version does not match the stored one.
    VersionConflict { expected: u64, actual: u64 },
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            BracketError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            BracketError::MatchNotCompleted(id) => write!(f, "Match {} has no winner yet", id),
            BracketError::MatchAlreadyCompleted(id) => {
                write!(f, "Match {} already has a result", id)
            }
            BracketError::SlotNotResolved(id) => {
                write!(f, "Match {} still waits on a previous match", id)
            }
            BracketError::AmbiguousAdvancement { first, second } => write!(
                f,
                "Ambiguous advancement: both {} and {} wait on the same match",
                first, second
            ),
            BracketError::TargetNotFound { round, position } => {
                write!(f, "No match at round {} position {}", round, position)
            }
            BracketError::SlotAlreadyResolved {
                round,
                position,
                side,
            } => write!(
                f,
                "Slot {} of round {} position {} is already filled",
                side, round, position
            ),
            BracketError::MalformedBracket(msg) => write!(f, "Malformed bracket: {}", msg),
            BracketError::VersionConflict { expected, actual } => write!(
                f,
                "Bracket changed meanwhile (expected version {}, found {})",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for BracketError {}

/// Unique identifier for a bracket.
pub type BracketId = Uuid;

/// One elimination phase: the match list plus bookkeeping for persistence.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bracket {
    pub id: BracketId,
    pub name: String,
    /// Bumped on every replacement of `matches` (optimistic concurrency).
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub matches: Vec<BracketMatch>,
}

impl Bracket {
    /// Wrap a freshly generated or imported match list.
    pub fn new(name: impl Into<String>, matches: Vec<BracketMatch>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            version: 1,
            created_at: now,
            updated_at: now,
            matches,
        }
    }

    /// Fail with `VersionConflict` unless `expected` is absent or equal to the current version.
    pub fn check_version(&self, expected: Option<u64>) -> Result<(), BracketError> {
        match expected {
            Some(v) if v != self.version => Err(BracketError::VersionConflict {
                expected: v,
                actual: self.version,
            }),
            _ => Ok(()),
        }
    }

    /// Swap in a whole new match list (never a partial edit).
    pub fn replace_matches(&mut self, matches: Vec<BracketMatch>) {
        self.matches = matches;
        self.version += 1;
        self.updated_at = Utc::now();
    }

    pub fn get_match(&self, id: MatchId) -> Option<&BracketMatch> {
        self.matches.iter().find(|m| m.id == id)
    }
}
