//! Bracket logic: generation, advancement resolution, mutation, results, validation, seeding.

mod generator;
mod mutator;
mod resolver;
mod results;
mod seeding;
mod validation;

pub use generator::{bracket_size, byes_needed, generate_bracket};
pub use mutator::apply_advancement;
pub use resolver::{resolve_advancement, round_count, round_matches};
pub use results::{
    advance_winner, champion, record_match_result, submit_bracket_result, submit_result, winner_of,
    Advancement,
};
pub use seeding::parse_seeding_csv;
pub use validation::validate_bracket;
