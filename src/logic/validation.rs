//! Structural checks for match lists that did not come from the generator (imports, stored data).

use crate::models::{BracketError, BracketMatch};
use std::collections::{HashMap, HashSet};

/// Check a match list before accepting it.
///
/// Rejects: duplicate ids, duplicate (round, position), round 0, tagged slots in round 1,
/// tags (placeholders, or advanced winners) pointing at a match that is not in the previous round,
/// two slots tagged with the same match, a winner on an unresolved slot, and a score without a winner.
/// Missing placeholders are accepted; advancement falls back to position order for those.
pub fn validate_bracket(matches: &[BracketMatch]) -> Result<(), BracketError> {
    if matches.is_empty() {
        return Err(BracketError::InvalidInput("bracket has no matches".into()));
    }

    let mut ids = HashSet::new();
    let mut places = HashSet::new();
    for m in matches {
        if m.round == 0 {
            return Err(BracketError::InvalidInput(format!("match {} has round 0", m.id)));
        }
        if !ids.insert(m.id) {
            return Err(BracketError::InvalidInput(format!("duplicate match id {}", m.id)));
        }
        if !places.insert((m.round, m.position)) {
            return Err(BracketError::InvalidInput(format!(
                "two matches at round {} position {}",
                m.round, m.position
            )));
        }
    }

    let mut waiting_on: HashMap<(u32, u32), (u32, u32)> = HashMap::new();
    for m in matches {
        for slot in [&m.slot_a, &m.slot_b] {
            let Some((round, position)) = slot.source_tag() else {
                continue;
            };
            if m.round == 1 {
                return Err(BracketError::InvalidInput(format!(
                    "round 1 match at position {} has a tagged slot",
                    m.position
                )));
            }
            if round + 1 != m.round || !places.contains(&(round, position)) {
                return Err(BracketError::InvalidInput(format!(
                    "round {} position {} waits on missing match round {} position {}",
                    m.round, m.position, round, position
                )));
            }
            if let Some((r, p)) = waiting_on.insert((round, position), (m.round, m.position)) {
                return Err(BracketError::InvalidInput(format!(
                    "round {} position {} feeds both round {} position {} and round {} position {}",
                    round, position, r, p, m.round, m.position
                )));
            }
        }

        match m.winner {
            Some(side) if !m.slot(side).is_resolved() => {
                return Err(BracketError::InvalidInput(format!(
                    "match {} has a winner in an unresolved slot",
                    m.id
                )));
            }
            None if m.score.is_some() => {
                return Err(BracketError::InvalidInput(format!(
                    "match {} has a score but no winner",
                    m.id
                )));
            }
            _ => {}
        }
    }

    Ok(())
}
