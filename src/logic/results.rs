//! Recording match results and pushing winners forward one round.

use crate::logic::mutator::apply_advancement;
use crate::logic::resolver::{resolve_advancement, round_count};
use crate::models::{
    AdvancementTarget, Bracket, BracketError, BracketMatch, Contestant, MatchId, Score, SlotSide,
};

/// What happened to a completed match's winner.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Advancement {
    /// The final was decided; nothing left to propagate.
    Champion(Contestant),
    /// The winner was written into this slot.
    Advanced(AdvancementTarget),
    /// The slot already held this winner (replayed submission); list unchanged.
    AlreadyApplied(AdvancementTarget),
}

/// Contestant who won `m`, if decided.
pub fn winner_of(m: &BracketMatch) -> Option<&Contestant> {
    m.winning_contestant()
}

/// Winner of the final, once it has been played.
pub fn champion(matches: &[BracketMatch]) -> Option<&Contestant> {
    let last = round_count(matches)?;
    let mut finals = matches.iter().filter(|m| m.round == last);
    let final_match = finals.next()?;
    if finals.next().is_some() {
        return None;
    }
    winner_of(final_match)
}

/// Mark one match as completed. Returns a new list; the input is untouched.
///
/// Both slots must hold contestants. Changing an existing result is not supported here.
pub fn record_match_result(
    matches: &[BracketMatch],
    match_id: MatchId,
    winner: SlotSide,
    score: Option<Score>,
) -> Result<Vec<BracketMatch>, BracketError> {
    let index = matches
        .iter()
        .position(|m| m.id == match_id)
        .ok_or(BracketError::MatchNotFound(match_id))?;
    let m = &matches[index];
    if m.completed() {
        return Err(BracketError::MatchAlreadyCompleted(match_id));
    }
    if !m.is_ready() {
        return Err(BracketError::SlotNotResolved(match_id));
    }

    let mut updated = matches.to_vec();
    updated[index].winner = Some(winner);
    updated[index].score = score;
    Ok(updated)
}

/// Resolve and apply the advancement of a completed match in one step.
///
/// Always returns the resulting list (a plain copy when nothing had to change).
/// A target slot already holding this same winner is reported as `AlreadyApplied`;
/// one holding somebody else is still `SlotAlreadyResolved`.
pub fn advance_winner(
    matches: &[BracketMatch],
    match_id: MatchId,
) -> Result<(Vec<BracketMatch>, Advancement), BracketError> {
    let source = matches
        .iter()
        .find(|m| m.id == match_id)
        .ok_or(BracketError::MatchNotFound(match_id))?;
    if !source.completed() {
        return Err(BracketError::MatchNotCompleted(match_id));
    }
    let winner = winner_of(source)
        .ok_or(BracketError::SlotNotResolved(match_id))?
        .clone();

    let target = match resolve_advancement(matches, match_id)? {
        Some(target) => target,
        None => {
            log::info!("Final {} decided", match_id);
            return Ok((matches.to_vec(), Advancement::Champion(winner)));
        }
    };

    match apply_advancement(matches, target, &winner) {
        Ok(updated) => Ok((updated, Advancement::Advanced(target))),
        Err(BracketError::SlotAlreadyResolved { .. }) if slot_holds(matches, target, &winner) => {
            log::debug!("Advancement of {} to {} already applied", match_id, target);
            Ok((matches.to_vec(), Advancement::AlreadyApplied(target)))
        }
        Err(e) => Err(e),
    }
}

/// Record a result and advance the winner.
///
/// Submitting the same winner for an already completed match is a replay: the stored score is kept
/// and advancement is retried, which finishes a propagation interrupted earlier or reports
/// `AlreadyApplied`. A different winner for a completed match is `MatchAlreadyCompleted`.
pub fn submit_result(
    matches: &[BracketMatch],
    match_id: MatchId,
    winner: SlotSide,
    score: Option<Score>,
) -> Result<(Vec<BracketMatch>, Advancement), BracketError> {
    let existing = matches
        .iter()
        .find(|m| m.id == match_id)
        .ok_or(BracketError::MatchNotFound(match_id))?
        .winner;

    match existing {
        Some(side) if side == winner => advance_winner(matches, match_id),
        Some(_) => Err(BracketError::MatchAlreadyCompleted(match_id)),
        None => {
            let recorded = record_match_result(matches, match_id, winner, score)?;
            advance_winner(&recorded, match_id)
        }
    }
}

/// Submit a result against a stored bracket, replacing its matches when something changed.
///
/// `expected_version` guards new results only: resending a winner the match already has is a
/// replay and skips the check, so a client retrying with the version it saw before its first
/// (successful) attempt gets the no-op instead of `VersionConflict`.
pub fn submit_bracket_result(
    bracket: &mut Bracket,
    match_id: MatchId,
    winner: SlotSide,
    score: Option<Score>,
    expected_version: Option<u64>,
) -> Result<Advancement, BracketError> {
    let is_replay = bracket
        .get_match(match_id)
        .is_some_and(|m| m.winner == Some(winner));
    if !is_replay {
        bracket.check_version(expected_version)?;
    }

    let (matches, advancement) = submit_result(&bracket.matches, match_id, winner, score)?;
    if matches != bracket.matches {
        bracket.replace_matches(matches);
    } else {
        log::info!(
            "Result for match {} in bracket {} was already applied",
            match_id,
            bracket.id
        );
    }
    Ok(advancement)
}

fn slot_holds(matches: &[BracketMatch], target: AdvancementTarget, contestant: &Contestant) -> bool {
    matches
        .iter()
        .find(|m| m.round == target.round && m.position == target.position)
        .and_then(|m| m.slot(target.slot).contestant())
        .is_some_and(|c| c == contestant)
}
