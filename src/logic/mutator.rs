//! Applying an advancement: write a winner into its target slot, returning a new match list.

use crate::models::{AdvancementTarget, BracketError, BracketMatch, Contestant, Slot};

/// Return a copy of `matches` where the target slot holds `winner` instead of its placeholder.
///
/// The input is left untouched; on error nothing is returned, so callers never see a half-applied list.
/// A slot that already holds a contestant (resolved or bye) is `SlotAlreadyResolved`, never overwritten.
/// The written slot keeps the placeholder's tag, so a later resolve still finds it.
pub fn apply_advancement(
    matches: &[BracketMatch],
    target: AdvancementTarget,
    winner: &Contestant,
) -> Result<Vec<BracketMatch>, BracketError> {
    let index = matches
        .iter()
        .position(|m| m.round == target.round && m.position == target.position)
        .ok_or(BracketError::TargetNotFound {
            round: target.round,
            position: target.position,
        })?;

    let (source_round, source_position) = match *matches[index].slot(target.slot) {
        Slot::Pending { round, position } => (round, position),
        _ => {
            return Err(BracketError::SlotAlreadyResolved {
                round: target.round,
                position: target.position,
                side: target.slot,
            })
        }
    };

    let mut updated = matches.to_vec();
    *updated[index].slot_mut(target.slot) =
        Slot::advanced(winner.clone(), source_round, source_position);
    Ok(updated)
}
