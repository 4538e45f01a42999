//! Data structures for elimination brackets: contestants, matches, slots, bracket envelope.

mod bracket;
mod bracket_match;
mod contestant;

pub use bracket::{Bracket, BracketError, BracketId};
pub use bracket_match::{AdvancementTarget, BracketMatch, MatchId, Score, Slot, SlotSide};
pub use contestant::{Contestant, ParticipantId};
