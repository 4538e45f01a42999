//! Single-elimination bracket engine: library with models and bracket logic.

pub mod logic;
pub mod models;

pub use logic::{
    advance_winner, apply_advancement, bracket_size, byes_needed, champion, generate_bracket,
    parse_seeding_csv, record_match_result, resolve_advancement, round_count, round_matches,
    submit_bracket_result, submit_result, validate_bracket, winner_of, Advancement,
};
pub use models::{
    AdvancementTarget, Bracket, BracketError, BracketId, BracketMatch, Contestant, MatchId,
    ParticipantId, Score, Slot, SlotSide,
};
