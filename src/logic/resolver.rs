//! Advancement resolution: which slot of which match receives a completed match's winner.

use crate::models::{AdvancementTarget, BracketError, BracketMatch, MatchId, SlotSide};

/// Highest round present, or None for an empty list.
pub fn round_count(matches: &[BracketMatch]) -> Option<u32> {
    matches.iter().map(|m| m.round).max()
}

/// Matches of one round, sorted by position.
pub fn round_matches(matches: &[BracketMatch], round: u32) -> Vec<&BracketMatch> {
    let mut in_round: Vec<_> = matches.iter().filter(|m| m.round == round).collect();
    in_round.sort_by_key(|m| m.position);
    in_round
}

/// Find where the winner of `completed_id` goes.
///
/// Returns `Ok(None)` when the match is in the highest round (the final).
/// Otherwise the next round is scanned for a slot tagged with the match's (round, position):
/// a placeholder still waiting on it, or a contestant already written in from it. Resolving an
/// advancement that was already applied therefore returns the same target again.
///
/// Only when no slot names the match is the target derived from its index within its round
/// (index / 2 in the next round, slot A for even indexes, B for odd). That reproduces generated
/// brackets from round 2 on, and round 1 when there are no byes. With byes, generated round 1 is
/// compact and the index rule points elsewhere, so untagged round-1 data with byes is only
/// approximated.
pub fn resolve_advancement(
    matches: &[BracketMatch],
    completed_id: MatchId,
) -> Result<Option<AdvancementTarget>, BracketError> {
    let source = matches
        .iter()
        .find(|m| m.id == completed_id)
        .ok_or(BracketError::MatchNotFound(completed_id))?;
    if !source.completed() {
        return Err(BracketError::MatchNotCompleted(completed_id));
    }

    let last_round = round_count(matches).unwrap_or(source.round);
    if source.round >= last_round {
        return Ok(None);
    }

    if let Some(target) = find_tagged_slot(matches, source)? {
        log::debug!(
            "Match {} (round {} position {}) advances to {}",
            source.id,
            source.round,
            source.position,
            target
        );
        return Ok(Some(target));
    }

    let target = positional_target(matches, source)?;
    log::warn!(
        "No slot is tagged with round {} position {}; using positional target {}",
        source.round,
        source.position,
        target
    );
    Ok(Some(target))
}

/// The one next-round slot waiting on, or filled from, `source`'s (round, position), if any.
fn find_tagged_slot(
    matches: &[BracketMatch],
    source: &BracketMatch,
) -> Result<Option<AdvancementTarget>, BracketError> {
    let next_round = source.round + 1;
    let mut found: Option<AdvancementTarget> = None;
    for m in round_matches(matches, next_round) {
        for side in [SlotSide::A, SlotSide::B] {
            if !m.slot(side).is_fed_by(source.round, source.position) {
                continue;
            }
            let target = AdvancementTarget {
                round: m.round,
                position: m.position,
                slot: side,
            };
            if let Some(first) = found {
                return Err(BracketError::AmbiguousAdvancement {
                    first,
                    second: target,
                });
            }
            found = Some(target);
        }
    }
    Ok(found)
}

/// Target derived from position order alone: same pairing the generator uses from round 2 on.
/// Round 1 with byes is laid out by seed lines, not index / 2.
fn positional_target(
    matches: &[BracketMatch],
    source: &BracketMatch,
) -> Result<AdvancementTarget, BracketError> {
    let source_index = round_matches(matches, source.round)
        .iter()
        .position(|m| m.id == source.id)
        .ok_or(BracketError::MatchNotFound(source.id))?;

    let next_round = source.round + 1;
    let next = round_matches(matches, next_round);
    let target = next.get(source_index / 2).ok_or_else(|| {
        BracketError::MalformedBracket(format!(
            "round {} has {} matches, no room for index {} of round {}",
            next_round,
            next.len(),
            source_index,
            source.round
        ))
    })?;

    Ok(AdvancementTarget {
        round: target.round,
        position: target.position,
        slot: if source_index % 2 == 0 {
            SlotSide::A
        } else {
            SlotSide::B
        },
    })
}
