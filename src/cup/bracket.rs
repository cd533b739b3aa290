use crate::cup::format::{CupFormat, RoundFormat};
use crate::cup::{Bracket, CupError, Entry, MatchId, Matchup, Outcome, Participant, Round, Seed, Seeding};
use log::debug;
use std::collections::{HashMap, HashSet};

/// Compute every round of the cup as of `current_week`.
///
/// Pure and deterministic: the same seeding, week and format always give the
/// same bracket. Inputs are validated up front so scoring never sees a
/// broken seeding, format, or week log.
pub fn generate_bracket(
    seeding: &Seeding,
    current_week: u8,
    format: &CupFormat,
) -> Result<Bracket, CupError> {
    validate_format(format)?;
    validate_seeding(seeding, format)?;
    for (_, participant) in seeding.iter() {
        validate_weeks(participant)?;
    }

    let mut outcomes: HashMap<MatchId, Outcome> = HashMap::with_capacity(format.matchup_count());
    let mut rounds = Vec::with_capacity(format.rounds.len());

    for round in &format.rounds {
        let matchups: Vec<Matchup> = round
            .pairings
            .iter()
            .map(|p| build_matchup(p.match_id, [p.home, p.away], round, seeding, &outcomes, current_week))
            .collect();

        // Later rounds only read outcomes of rounds already complete.
        for m in &matchups {
            outcomes.insert(m.match_id, m.winner.clone());
        }

        rounds.push(Round { number: round.number, label: round.label.clone(), matchups });
    }

    debug!(
        "bracket at week {current_week}: {} of {} matchups decided",
        outcomes.values().filter(|o| o.is_decided()).count(),
        outcomes.len()
    );

    Ok(Bracket { rounds })
}

fn build_matchup(
    match_id: MatchId,
    inputs: [Entry; 2],
    round: &RoundFormat,
    seeding: &Seeding,
    outcomes: &HashMap<MatchId, Outcome>,
    current_week: u8,
) -> Matchup {
    let team1 = resolve_entry(inputs[0], seeding, outcomes);
    let team2 = resolve_entry(inputs[1], seeding, outcomes);

    let (team1_score, team2_score, winner) = match (&team1, &team2) {
        (Some(a), Some(b)) => {
            let score_a = aggregate(&a.participant, round.legs, current_week);
            let score_b = aggregate(&b.participant, round.legs, current_week);
            let winner = if current_week < round.legs[1] {
                Outcome::Pending
            } else {
                Outcome::Decided { entrant: pick_winner(a, score_a, b, score_b).clone() }
            };
            (Some(score_a), Some(score_b), winner)
        }
        _ => (None, None, Outcome::Pending),
    };

    Matchup {
        match_id,
        round: round.number,
        legs: round.legs,
        inputs,
        team1,
        team2,
        team1_score,
        team2_score,
        winner,
    }
}

fn resolve_entry(
    entry: Entry,
    seeding: &Seeding,
    outcomes: &HashMap<MatchId, Outcome>,
) -> Option<Seed> {
    match entry {
        Entry::Seed(slot) => seeding.seed(slot),
        Entry::WinnerOf(id) => outcomes.get(&id).and_then(Outcome::entrant).cloned(),
    }
}

/// Sum of points over the leg weeks already reached. Unplayed and unrecorded
/// weeks both count 0.
pub fn aggregate(participant: &Participant, legs: [u8; 2], current_week: u8) -> f64 {
    legs.iter()
        .filter(|week| **week <= current_week)
        .map(|week| participant.points_in(*week).unwrap_or(0.0))
        .sum()
}

/// Higher aggregate wins; level aggregates go to the lower slot.
fn pick_winner<'a>(a: &'a Seed, score_a: f64, b: &'a Seed, score_b: f64) -> &'a Seed {
    if score_a > score_b {
        a
    } else if score_b > score_a {
        b
    } else if a.slot <= b.slot {
        a
    } else {
        b
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_format(format: &CupFormat) -> Result<(), CupError> {
    if format.rounds.is_empty() {
        return Err(CupError::InvalidFormat("no rounds".into()));
    }

    let mut produced: HashSet<MatchId> = HashSet::new();
    for round in &format.rounds {
        if round.pairings.is_empty() {
            return Err(CupError::InvalidFormat(format!("{} has no matchups", round.label)));
        }
        let [first_leg, second_leg] = round.legs;
        if first_leg == 0 || first_leg >= second_leg {
            return Err(CupError::InvalidFormat(format!(
                "{} legs {first_leg}/{second_leg} are not two ascending weeks",
                round.label
            )));
        }

        for p in &round.pairings {
            for entry in [p.home, p.away] {
                if let Entry::WinnerOf(id) = entry
                    && !produced.contains(&id)
                {
                    return Err(CupError::InvalidFormat(format!(
                        "M{} takes the winner of M{id}, which no earlier round plays",
                        p.match_id
                    )));
                }
            }
        }

        for p in &round.pairings {
            if !produced.insert(p.match_id) {
                return Err(CupError::InvalidFormat(format!("match id M{} used twice", p.match_id)));
            }
        }
    }
    Ok(())
}

fn validate_seeding(seeding: &Seeding, format: &CupFormat) -> Result<(), CupError> {
    let expected = format.seed_slots();

    let missing: Vec<String> = expected
        .iter()
        .filter(|slot| seeding.get(**slot).is_none())
        .map(ToString::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(CupError::InvalidSeeding(format!("missing slots {}", missing.join(", "))));
    }

    let unexpected: Vec<String> = seeding
        .slots()
        .filter(|slot| expected.binary_search(slot).is_err())
        .map(|slot| slot.to_string())
        .collect();
    if !unexpected.is_empty() {
        return Err(CupError::InvalidSeeding(format!(
            "slots {} are not part of the cup",
            unexpected.join(", ")
        )));
    }
    Ok(())
}

fn validate_weeks(participant: &Participant) -> Result<(), CupError> {
    let malformed = |reason: String| CupError::MalformedWeekData {
        participant: participant.name.clone(),
        reason,
    };

    let mut seen = HashSet::new();
    for result in &participant.weekly {
        if result.week == 0 {
            return Err(malformed("week 0".into()));
        }
        if !result.points.is_finite() {
            return Err(malformed(format!("week {} points are {}", result.week, result.points)));
        }
        if !seen.insert(result.week) {
            return Err(malformed(format!("week {} recorded twice", result.week)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cup::format::Pairing;
    use crate::cup::{Division, SeedSlot};
    use sleeper_api::WeeklyResult;

    fn participant(slot: SeedSlot, weekly: &[(u8, f64)]) -> Participant {
        Participant {
            id: format!("u{slot}"),
            roster_id: Some(slot as u32),
            name: format!("Team {slot}"),
            weekly: weekly.iter().map(|&(week, points)| WeeklyResult { week, points }).collect(),
            placeholder: false,
        }
    }

    /// Every slot scores `points(slot, week)` in weeks 3–12.
    fn seeding_with(points: impl Fn(SeedSlot, u8) -> f64) -> Seeding {
        (1..=24u8)
            .map(|slot| {
                let weekly: Vec<(u8, f64)> = (3..=12).map(|w| (w, points(slot, w))).collect();
                (slot, participant(slot, &weekly))
            })
            .collect()
    }

    fn fsl(seeding: &Seeding, week: u8) -> Bracket {
        generate_bracket(seeding, week, &CupFormat::fsl_cup()).unwrap()
    }

    fn all_matchups(bracket: &Bracket) -> impl Iterator<Item = &Matchup> {
        bracket.rounds.iter().flat_map(|r| r.matchups.iter())
    }

    #[test]
    fn bracket_has_23_matchups_in_five_rounds() {
        let bracket = fsl(&seeding_with(|_, _| 100.0), 3);
        let sizes: Vec<usize> = bracket.rounds.iter().map(|r| r.matchups.len()).collect();
        assert_eq!(sizes, vec![8, 8, 4, 2, 1]);
        let ids: Vec<MatchId> = all_matchups(&bracket).map(|m| m.match_id).collect();
        assert_eq!(ids, (1..=23).collect::<Vec<_>>());
    }

    #[test]
    fn every_seed_appears_exactly_once_in_round_one_or_two() {
        let bracket = fsl(&seeding_with(|_, _| 0.0), 3);
        let mut seen: Vec<SeedSlot> = bracket.rounds[..2]
            .iter()
            .flat_map(|r| r.matchups.iter())
            .flat_map(|m| m.inputs)
            .filter_map(|e| match e {
                Entry::Seed(slot) => Some(slot),
                Entry::WinnerOf(_) => None,
            })
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..=24).collect::<Vec<_>>());
    }

    #[test]
    fn before_second_leg_everything_is_pending_and_scores_count_played_weeks() {
        let seeding = seeding_with(|slot, week| slot as f64 + week as f64);
        let bracket = fsl(&seeding, 3);

        assert!(all_matchups(&bracket).all(|m| m.winner == Outcome::Pending));

        // M1 is 16 v 17, only week 3 counts.
        let m1 = bracket.matchup(1).unwrap();
        assert_eq!(m1.team1.as_ref().unwrap().slot, 16);
        assert_eq!(m1.team2.as_ref().unwrap().slot, 17);
        assert_eq!(m1.team1_score, Some(19.0));
        assert_eq!(m1.team2_score, Some(20.0));
    }

    #[test]
    fn scores_sum_both_legs() {
        let seeding = seeding_with(|slot, week| if week == 3 { slot as f64 } else { 10.0 });
        let m2 = fsl(&seeding, 4).matchup(2).cloned().unwrap();
        // 15 v 18
        assert_eq!(m2.team1_score, Some(25.0));
        assert_eq!(m2.team2_score, Some(28.0));
        assert_eq!(m2.winner.entrant().unwrap().slot, 18);
    }

    #[test]
    fn decided_winner_is_one_of_the_entrants() {
        let seeding = seeding_with(|slot, week| ((slot as u32 * 7 + week as u32 * 3) % 11) as f64);
        let bracket = fsl(&seeding, 12);
        for m in all_matchups(&bracket) {
            let winner = m.winner.entrant().expect("decided at week 12");
            let a = m.team1.as_ref().unwrap();
            let b = m.team2.as_ref().unwrap();
            assert!(winner == a || winner == b, "M{} winner not an entrant", m.match_id);
        }
    }

    #[test]
    fn unresolved_side_has_null_scores_and_pending_winner() {
        let bracket = fsl(&seeding_with(|_, _| 50.0), 5);
        // Round 2 needs round 1 winners, which are decided at week 5.
        assert!(bracket.rounds[1].matchups.iter().all(|m| m.team2.is_some()));
        // Quarterfinals need round 2 winners, which are not.
        for m in &bracket.rounds[2].matchups {
            assert!(m.team1.is_none() && m.team2.is_none());
            assert_eq!(m.team1_score, None);
            assert_eq!(m.team2_score, None);
            assert_eq!(m.winner, Outcome::Pending);
        }
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let seeding = seeding_with(|slot, week| (slot as f64 * 1.5) - week as f64);
        let a = fsl(&seeding, 9);
        let b = fsl(&seeding, 9);
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn all_zero_scores_at_week_12_crown_seed_one() {
        let bracket = fsl(&seeding_with(|_, _| 0.0), 12);
        assert!(all_matchups(&bracket).all(|m| m.winner.is_decided()));
        // Lower slot wins every tie: 16 beats 17 in round 1, then 1 beats 16.
        assert_eq!(bracket.matchup(1).unwrap().winner.entrant().unwrap().slot, 16);
        assert_eq!(bracket.matchup(9).unwrap().winner.entrant().unwrap().slot, 1);
        assert_eq!(bracket.champion().unwrap().slot, 1);
    }

    #[test]
    fn week_four_decides_round_one_only() {
        let seeding = seeding_with(|slot, _| slot as f64);
        let bracket = fsl(&seeding, 4);

        assert!(bracket.rounds[0].matchups.iter().all(|m| m.winner.is_decided()));

        for m in &bracket.rounds[1].matchups {
            assert_eq!(m.winner, Outcome::Pending);
            // Bye seed and round 1 winner are known; weeks 5/6 are unplayed.
            assert!(m.team1.is_some() && m.team2.is_some());
            assert_eq!(m.team1_score, Some(0.0));
            assert_eq!(m.team2_score, Some(0.0));
        }
        for round in &bracket.rounds[2..] {
            for m in &round.matchups {
                assert_eq!(m.winner, Outcome::Pending);
                assert!(m.team1.is_none() && m.team2.is_none());
                assert_eq!((m.team1_score, m.team2_score), (None, None));
            }
        }
    }

    #[test]
    fn missing_week_counts_as_zero() {
        let mut seeding = seeding_with(|_, _| 0.0);
        // 16 has no week 3 but 50 in week 4; 17 scores 20 + 20.
        seeding.insert(16, participant(16, &[(4, 50.0)]));
        seeding.insert(17, participant(17, &[(3, 20.0), (4, 20.0)]));

        let m1 = fsl(&seeding, 4).matchup(1).cloned().unwrap();
        assert_eq!(m1.team1_score, Some(50.0));
        assert_eq!(m1.team2_score, Some(40.0));
        assert_eq!(m1.winner.entrant().unwrap().slot, 16);
    }

    #[test]
    fn pending_propagates_through_later_rounds() {
        let bracket = fsl(&seeding_with(|_, _| 10.0), 4);
        let final_match = bracket.matchup(23).unwrap();
        assert_eq!(final_match.winner, Outcome::Pending);
        assert!(bracket.champion().is_none());
    }

    #[test]
    fn winners_advance_with_their_seed() {
        // Higher slot always outscores, so underdogs advance.
        let bracket = fsl(&seeding_with(|slot, _| slot as f64), 12);
        let m9 = bracket.matchup(9).unwrap();
        assert_eq!(m9.team2.as_ref().unwrap().slot, 17);
        assert_eq!(m9.winner.entrant().unwrap().slot, 17);
        assert_eq!(bracket.champion().unwrap().slot, 24);
    }

    #[test]
    fn placeholders_can_play_and_lose() {
        let mut seeding = seeding_with(|_, _| 10.0);
        seeding.insert(24, Participant::placeholder(Division::Championship, 12));
        let m8 = fsl(&seeding, 4).matchup(8).cloned().unwrap();
        assert_eq!(m8.team2_score, Some(0.0));
        assert_eq!(m8.winner.entrant().unwrap().slot, 9);
    }

    #[test]
    fn missing_slot_is_invalid_seeding() {
        let mut seeding: Seeding = seeding_with(|_, _| 0.0)
            .iter()
            .filter(|(slot, _)| *slot != 12)
            .map(|(slot, p)| (slot, p.clone()))
            .collect();
        let err = generate_bracket(&seeding, 4, &CupFormat::fsl_cup()).unwrap_err();
        assert_eq!(err, CupError::InvalidSeeding("missing slots 12".into()));

        seeding.insert(12, participant(12, &[]));
        seeding.insert(25, participant(25, &[]));
        let err = generate_bracket(&seeding, 4, &CupFormat::fsl_cup()).unwrap_err();
        assert!(matches!(err, CupError::InvalidSeeding(msg) if msg.contains("25")));
    }

    #[test]
    fn malformed_week_data_is_rejected() {
        let cases = [
            vec![(0, 10.0)],
            vec![(3, f64::NAN)],
            vec![(3, f64::INFINITY)],
            vec![(3, 10.0), (3, 12.0)],
        ];
        for weekly in cases {
            let mut seeding = seeding_with(|_, _| 0.0);
            seeding.insert(5, participant(5, &weekly));
            let err = generate_bracket(&seeding, 4, &CupFormat::fsl_cup()).unwrap_err();
            assert!(
                matches!(&err, CupError::MalformedWeekData { participant, .. } if participant == "Team 5"),
                "{weekly:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn format_referencing_unplayed_match_is_invalid() {
        let mut format = CupFormat::fsl_cup();
        format.rounds[1].pairings[0] = Pairing::new(9, Entry::Seed(1), Entry::WinnerOf(30));
        let err = generate_bracket(&seeding_with(|_, _| 0.0), 4, &format).unwrap_err();
        assert!(matches!(err, CupError::InvalidFormat(_)));
    }

    #[test]
    fn format_with_same_round_dependency_is_invalid() {
        let mut format = CupFormat::fsl_cup();
        format.rounds[0].pairings[1] = Pairing::new(2, Entry::Seed(15), Entry::WinnerOf(1));
        let err = generate_bracket(&seeding_with(|_, _| 0.0), 4, &format).unwrap_err();
        assert!(matches!(err, CupError::InvalidFormat(_)));
    }

    #[test]
    fn format_with_duplicate_match_id_is_invalid() {
        let mut format = CupFormat::fsl_cup();
        format.rounds[4].pairings[0].match_id = 22;
        let err = generate_bracket(&seeding_with(|_, _| 0.0), 4, &format).unwrap_err();
        assert_eq!(err, CupError::InvalidFormat("match id M22 used twice".into()));
    }

    #[test]
    fn aggregate_ignores_future_leg() {
        let p = participant(1, &[(5, 40.0), (6, 60.0)]);
        assert_eq!(aggregate(&p, [5, 6], 4), 0.0);
        assert_eq!(aggregate(&p, [5, 6], 5), 40.0);
        assert_eq!(aggregate(&p, [5, 6], 6), 100.0);
    }

    #[test]
    fn bracket_json_round_trips() {
        let bracket = fsl(&seeding_with(|slot, week| slot as f64 + week as f64 / 10.0), 7);
        let json = serde_json::to_string(&bracket).unwrap();
        let back: Bracket = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bracket);
    }
}
