//! Integration tests for recording results and playing brackets out to a champion.

use knockout_bracket_web::{
    advance_winner, champion, generate_bracket, record_match_result, resolve_advancement,
    round_count, round_matches, submit_bracket_result, submit_result, validate_bracket,
    Advancement, AdvancementTarget, Bracket, BracketError, BracketMatch, Contestant, Score, Slot,
    SlotSide,
};
use rand::Rng;
use uuid::Uuid;

fn ranked(n: usize) -> Vec<Contestant> {
    (0..n)
        .map(|_| Contestant::pair(Uuid::new_v4(), Uuid::new_v4()))
        .collect()
}

fn at(matches: &[BracketMatch], round: u32, position: u32) -> &BracketMatch {
    matches
        .iter()
        .find(|m| m.round == round && m.position == position)
        .unwrap()
}

/// Submit results for the earliest playable match until the final is decided.
/// Returns the final list, the champion and the number of submissions.
fn play_out(
    mut matches: Vec<BracketMatch>,
    mut pick: impl FnMut() -> SlotSide,
) -> (Vec<BracketMatch>, Contestant, usize) {
    let mut submissions = 0;
    loop {
        let next = matches
            .iter()
            .filter(|m| !m.completed() && m.is_ready())
            .min_by_key(|m| (m.round, m.position))
            .map(|m| m.id)
            .expect("a playable match");
        let (updated, advancement) = submit_result(&matches, next, pick(), None).unwrap();
        matches = updated;
        submissions += 1;
        if let Advancement::Champion(c) = advancement {
            return (matches, c, submissions);
        }
    }
}

#[test]
fn record_sets_winner_and_score() {
    let matches = generate_bracket(&ranked(4)).unwrap();
    let id = at(&matches, 1, 1).id;
    let updated = record_match_result(&matches, id, SlotSide::B, Some(Score::new(1, 3))).unwrap();
    let m = updated.iter().find(|m| m.id == id).unwrap();
    assert!(m.completed());
    assert_eq!(m.winner, Some(SlotSide::B));
    assert_eq!(m.score, Some(Score::new(1, 3)));
    assert!(!matches.iter().any(|m| m.completed()), "input must not change");
}

#[test]
fn record_rejects_unknown_finished_and_undecided_matches() {
    let matches = generate_bracket(&ranked(4)).unwrap();
    let missing = Uuid::new_v4();
    assert_eq!(
        record_match_result(&matches, missing, SlotSide::A, None),
        Err(BracketError::MatchNotFound(missing))
    );

    let final_id = at(&matches, 2, 1).id;
    assert_eq!(
        record_match_result(&matches, final_id, SlotSide::A, None),
        Err(BracketError::SlotNotResolved(final_id))
    );

    let id = at(&matches, 1, 1).id;
    let done = record_match_result(&matches, id, SlotSide::A, None).unwrap();
    assert_eq!(
        record_match_result(&done, id, SlotSide::B, None),
        Err(BracketError::MatchAlreadyCompleted(id))
    );
}

#[test]
fn advance_moves_winner_into_placeholder() {
    let c = ranked(8);
    let matches = generate_bracket(&c).unwrap();
    let id = at(&matches, 1, 2).id;
    let (matches, advancement) = submit_result(&matches, id, SlotSide::B, None).unwrap();
    assert_eq!(
        advancement,
        Advancement::Advanced(AdvancementTarget {
            round: 2,
            position: 1,
            slot: SlotSide::B,
        })
    );
    // Round 1 position 2 is seed 4 vs seed 5; B won.
    assert_eq!(at(&matches, 2, 1).slot_b, Slot::advanced(c[4].clone(), 1, 2));
    assert_eq!(at(&matches, 2, 1).slot_a, Slot::pending(1, 1));
}

#[test]
fn replayed_submission_is_a_no_op() {
    let matches = generate_bracket(&ranked(8)).unwrap();
    let id = at(&matches, 1, 1).id;
    let (once, first) = submit_result(&matches, id, SlotSide::A, Some(Score::new(3, 0))).unwrap();
    let (twice, second) = submit_result(&once, id, SlotSide::A, Some(Score::new(3, 1))).unwrap();

    assert!(matches!(first, Advancement::Advanced(_)));
    assert!(matches!(second, Advancement::AlreadyApplied(t) if t.round == 2 && t.position == 1));
    assert_eq!(once, twice);
}

#[test]
fn changing_a_recorded_winner_is_rejected() {
    let matches = generate_bracket(&ranked(8)).unwrap();
    let id = at(&matches, 1, 1).id;
    let (once, _) = submit_result(&matches, id, SlotSide::A, None).unwrap();
    assert_eq!(
        submit_result(&once, id, SlotSide::B, None),
        Err(BracketError::MatchAlreadyCompleted(id))
    );
}

#[test]
fn replay_finishes_an_interrupted_advancement() {
    let c = ranked(8);
    let matches = generate_bracket(&c).unwrap();
    let id = at(&matches, 1, 1).id;
    // Result stored but the advancement never made it.
    let recorded = record_match_result(&matches, id, SlotSide::A, None).unwrap();
    let (matches, advancement) = submit_result(&recorded, id, SlotSide::A, None).unwrap();
    assert!(matches!(advancement, Advancement::Advanced(_)));
    assert_eq!(at(&matches, 2, 1).slot_a, Slot::advanced(c[0].clone(), 1, 1));
}

#[test]
fn advance_into_slot_held_by_someone_else_is_an_error() {
    let c = ranked(8);
    let matches = generate_bracket(&c).unwrap();
    let id = at(&matches, 1, 1).id;
    let mut recorded = record_match_result(&matches, id, SlotSide::A, None).unwrap();
    for m in &mut recorded {
        if m.round == 2 && m.position == 1 {
            m.slot_a = Slot::resolved(c[5].clone());
        }
    }
    // Tag is gone, so the positional target is used and found occupied.
    assert_eq!(
        advance_winner(&recorded, id),
        Err(BracketError::SlotAlreadyResolved {
            round: 2,
            position: 1,
            side: SlotSide::A,
        })
    );
}

#[test]
fn two_contestant_bracket_is_decided_in_one_submission() {
    let c = ranked(2);
    let matches = generate_bracket(&c).unwrap();
    let (matches, winner, submissions) = play_out(matches, || SlotSide::B);
    assert_eq!(submissions, 1);
    assert_eq!(winner, c[1]);
    assert_eq!(champion(&matches), Some(&c[1]));
}

#[test]
fn favourites_always_winning_crowns_the_top_seed() {
    for n in [3, 5, 6, 7, 8, 10, 16, 23] {
        let c = ranked(n);
        let matches = generate_bracket(&c).unwrap();
        let (_, winner, _) = play_out(matches, || SlotSide::A);
        assert_eq!(winner, c[0], "n = {n}");
    }
}

#[test]
fn random_results_always_reach_a_single_champion() {
    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let n = rng.gen_range(2..=64);
        let c = ranked(n);
        let matches = generate_bracket(&c).unwrap();
        let (matches, winner, submissions) = play_out(matches, || {
            if rng.gen_bool(0.5) {
                SlotSide::A
            } else {
                SlotSide::B
            }
        });

        assert_eq!(submissions, n - 1, "n = {n}");
        assert!(matches.iter().all(|m| m.completed()), "n = {n}");
        assert!(matches
            .iter()
            .all(|m| !matches!(m.slot_a, Slot::Pending { .. }) && !matches!(m.slot_b, Slot::Pending { .. })));
        assert!(c.contains(&winner));
        assert_eq!(champion(&matches), Some(&winner));

        let last = round_count(&matches).unwrap();
        let final_match = matches.iter().find(|m| m.round == last).unwrap();
        assert_eq!(resolve_advancement(&matches, final_match.id), Ok(None));
    }
}

#[test]
fn no_champion_before_the_final() {
    let matches = generate_bracket(&ranked(4)).unwrap();
    assert_eq!(champion(&matches), None);
}

fn target(round: u32, position: u32, slot: SlotSide) -> AdvancementTarget {
    AdvancementTarget {
        round,
        position,
        slot,
    }
}

#[test]
fn round_one_winners_land_on_their_seed_lines_with_byes() {
    // (n, round-1 position, expected target), submitted in the listed order.
    let cases: [(usize, &[(u32, AdvancementTarget)]); 3] = [
        (5, &[(1, target(2, 1, SlotSide::B))]),
        (
            6,
            &[
                (2, target(2, 2, SlotSide::B)),
                (1, target(2, 1, SlotSide::B)),
            ],
        ),
        (
            10,
            &[
                (2, target(2, 3, SlotSide::B)),
                (1, target(2, 1, SlotSide::B)),
            ],
        ),
    ];
    for (n, steps) in cases {
        let c = ranked(n);
        let mut matches = generate_bracket(&c).unwrap();
        for &(position, want) in steps {
            let id = at(&matches, 1, position).id;
            let (updated, advancement) = submit_result(&matches, id, SlotSide::A, None).unwrap();
            assert_eq!(advancement, Advancement::Advanced(want), "n = {n}, position {position}");
            matches = updated;
        }
    }

    // n = 10: seed 7 beat seed 10 and now meets seed 2.
    let c = ranked(10);
    let matches = generate_bracket(&c).unwrap();
    let id = at(&matches, 1, 2).id;
    let (matches, _) = submit_result(&matches, id, SlotSide::A, None).unwrap();
    assert_eq!(at(&matches, 2, 3).slot_a, Slot::bye(c[1].clone()));
    assert_eq!(at(&matches, 2, 3).slot_b, Slot::advanced(c[6].clone(), 1, 2));
    assert_eq!(at(&matches, 2, 1).slot_b, Slot::pending(1, 1));
}

#[test]
fn replays_are_no_ops_with_byes() {
    for n in [5, 6, 10] {
        let c = ranked(n);
        let mut matches = generate_bracket(&c).unwrap();
        // Play round by round, latest position first, replaying every submission once.
        for round in 1..=round_count(&matches).unwrap() {
            let positions: Vec<u32> =
                round_matches(&matches, round).iter().map(|m| m.position).collect();
            for position in positions.into_iter().rev() {
                let id = at(&matches, round, position).id;
                let (once, first) = submit_result(&matches, id, SlotSide::B, None).unwrap();
                let (twice, second) = submit_result(&once, id, SlotSide::B, None).unwrap();

                assert_eq!(once, twice, "n = {n}, round {round} position {position}");
                match first {
                    Advancement::Advanced(t) => {
                        assert_eq!(second, Advancement::AlreadyApplied(t), "n = {n}")
                    }
                    Advancement::Champion(winner) => {
                        assert_eq!(second, Advancement::Champion(winner), "n = {n}")
                    }
                    Advancement::AlreadyApplied(_) => panic!("first submission was a replay"),
                }
                matches = twice;
            }
        }
        assert!(champion(&matches).is_some(), "n = {n}");
        assert_eq!(validate_bracket(&matches), Ok(()), "n = {n}");

        // Each round-2 slot filled from round 1 holds exactly one contestant, no duplicates.
        let mut seen: Vec<&Contestant> = Vec::new();
        for m in round_matches(&matches, 2) {
            for slot in [&m.slot_a, &m.slot_b] {
                let contestant = slot.contestant().unwrap();
                assert!(!seen.contains(&contestant), "n = {n}: contestant placed twice");
                seen.push(contestant);
            }
        }
    }
}

#[test]
fn bracket_replay_skips_the_version_check() {
    let c = ranked(6);
    let mut bracket = Bracket::new("Cup", generate_bracket(&c).unwrap());
    let id = at(&bracket.matches, 1, 2).id;

    let first = submit_bracket_result(&mut bracket, id, SlotSide::A, None, Some(1)).unwrap();
    assert_eq!(first, Advancement::Advanced(target(2, 2, SlotSide::B)));
    assert_eq!(bracket.version, 2);
    let snapshot = bracket.matches.clone();

    // Same request again, still carrying the version seen before the first attempt.
    let second = submit_bracket_result(&mut bracket, id, SlotSide::A, None, Some(1)).unwrap();
    assert_eq!(second, Advancement::AlreadyApplied(target(2, 2, SlotSide::B)));
    assert_eq!(bracket.version, 2);
    assert_eq!(bracket.matches, snapshot);
}

#[test]
fn bracket_new_results_still_need_the_current_version() {
    let c = ranked(6);
    let mut bracket = Bracket::new("Cup", generate_bracket(&c).unwrap());
    let first = at(&bracket.matches, 1, 1).id;
    let second = at(&bracket.matches, 1, 2).id;
    submit_bracket_result(&mut bracket, first, SlotSide::A, None, Some(1)).unwrap();

    assert_eq!(
        submit_bracket_result(&mut bracket, second, SlotSide::A, None, Some(1)),
        Err(BracketError::VersionConflict {
            expected: 1,
            actual: 2
        })
    );
    assert_eq!(
        submit_bracket_result(&mut bracket, first, SlotSide::B, None, Some(2)),
        Err(BracketError::MatchAlreadyCompleted(first))
    );
    assert_eq!(bracket.version, 2);
    assert!(submit_bracket_result(&mut bracket, second, SlotSide::A, None, None).is_ok());
    assert_eq!(bracket.version, 3);
}
