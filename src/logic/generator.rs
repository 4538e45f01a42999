//! Bracket generation: ranked contestants → every elimination match, byes and placeholders included.

use crate::models::{BracketError, BracketMatch, Contestant, Slot};
use std::collections::HashSet;

/// Smallest power of two that holds `n` contestants.
pub fn bracket_size(n: usize) -> usize {
    n.next_power_of_two()
}

/// Number of top seeds that skip round 1.
pub fn byes_needed(n: usize) -> usize {
    bracket_size(n) - n
}

/// Generate all matches for a single-elimination bracket.
///
/// `contestants` is ordered best-to-worst (index 0 = seed 1).
///
/// 1. Lay seeds out on bracket lines in standard seed order (1 vs 8, 4 vs 5, 2 vs 7, 3 vs 6 ...).
/// 2. A line pair whose lower seed does not exist is a bye: the top seed goes straight into round 2.
///    Only the best `byes_needed` seeds can hit such a pair.
/// 3. Every other pair is a round-1 match; its round-2 slot is a placeholder tagged (1, position).
/// 4. From round 2 on, match k takes the slots of pair (2k-1, 2k) until one match is left.
pub fn generate_bracket(contestants: &[Contestant]) -> Result<Vec<BracketMatch>, BracketError> {
    validate_contestants(contestants)?;

    let n = contestants.len();
    let size = bracket_size(n);
    let order = seed_order(size);

    let mut matches: Vec<BracketMatch> = Vec::with_capacity(n - 1);
    let mut feeders: Vec<Slot> = Vec::with_capacity(size / 2);
    let mut position = 0u32;

    for line in order.chunks_exact(2) {
        let (top, bottom) = (line[0], line[1]);
        let top_contestant = contestants[top - 1].clone();
        if bottom > n {
            feeders.push(Slot::bye(top_contestant));
            continue;
        }
        position += 1;
        matches.push(BracketMatch::new(
            1,
            position,
            Slot::resolved(top_contestant),
            Slot::resolved(contestants[bottom - 1].clone()),
        ));
        feeders.push(Slot::pending(1, position));
    }

    let mut round = 2u32;
    while feeders.len() >= 2 {
        let mut next = Vec::with_capacity(feeders.len() / 2);
        let mut slots = feeders.into_iter();
        let mut position = 0u32;
        while let (Some(slot_a), Some(slot_b)) = (slots.next(), slots.next()) {
            position += 1;
            matches.push(BracketMatch::new(round, position, slot_a, slot_b));
            next.push(Slot::pending(round, position));
        }
        feeders = next;
        round += 1;
    }

    log::debug!(
        "Generated bracket: {} contestants, size {}, {} byes, {} rounds, {} matches",
        n,
        size,
        byes_needed(n),
        round - 1,
        matches.len()
    );
    Ok(matches)
}

/// At least two contestants, none empty, no participant listed twice.
fn validate_contestants(contestants: &[Contestant]) -> Result<(), BracketError> {
    if contestants.len() < 2 {
        return Err(BracketError::InvalidInput(format!(
            "need at least 2 contestants, got {}",
            contestants.len()
        )));
    }
    let mut seen = HashSet::new();
    for (i, c) in contestants.iter().enumerate() {
        if c.is_empty() {
            return Err(BracketError::InvalidInput(format!(
                "contestant at rank {} has no participants",
                i + 1
            )));
        }
        for id in c.members() {
            if !seen.insert(*id) {
                return Err(BracketError::InvalidInput(format!(
                    "participant {} appears more than once",
                    id
                )));
            }
        }
    }
    Ok(())
}

/// Seed numbers (1-based) in bracket-line order for a power-of-two size.
/// Each doubling splits seed s into (s, size + 1 - s), so adjacent lines always sum to size + 1.
fn seed_order(size: usize) -> Vec<usize> {
    let mut order = vec![1];
    while order.len() < size {
        let next_size = order.len() * 2;
        order = order
            .iter()
            .flat_map(|&s| [s, next_size + 1 - s])
            .collect();
    }
    order
}
