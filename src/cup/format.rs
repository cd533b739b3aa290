use crate::cup::{Division, Entry, MatchId, SeedSlot};
use std::ops::RangeInclusive;

/// One matchup in a round table: its id and where each side comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pairing {
    pub match_id: MatchId,
    pub home: Entry,
    pub away: Entry,
}

impl Pairing {
    pub const fn new(match_id: MatchId, home: Entry, away: Entry) -> Self {
        Self { match_id, home, away }
    }
}

/// Round descriptor: number, display label, two leg weeks, pairings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundFormat {
    pub number: u8,
    pub label: String,
    pub legs: [u8; 2],
    pub pairings: Vec<Pairing>,
}

/// Declarative shape of a cup. Consumed round by round by `generate_bracket`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CupFormat {
    pub rounds: Vec<RoundFormat>,
}

impl CupFormat {
    /// The 24-team FSL Cup: eight play-in ties, seeds 1–8 enter in round 2,
    /// two-leg aggregate ties in weeks 3 through 12.
    pub fn fsl_cup() -> Self {
        use Entry::{Seed, WinnerOf};

        // (16,17) (15,18) ... (9,24)
        let round_1 = (1..=8u8)
            .map(|i| Pairing::new(i, Seed(17 - i), Seed(16 + i)))
            .collect();
        // (1,M1) ... (8,M8)
        let round_2 = (1..=8u8)
            .map(|i| Pairing::new(8 + i, Seed(i), WinnerOf(i)))
            .collect();
        let round_3 = (0..4u8)
            .map(|i| Pairing::new(17 + i, WinnerOf(9 + 2 * i), WinnerOf(10 + 2 * i)))
            .collect();
        let round_4 = vec![
            Pairing::new(21, WinnerOf(17), WinnerOf(18)),
            Pairing::new(22, WinnerOf(19), WinnerOf(20)),
        ];
        let round_5 = vec![Pairing::new(23, WinnerOf(21), WinnerOf(22))];

        let labels = ["Round 1", "Round 2", "Quarterfinals", "Semifinals", "Final"];
        let rounds = [round_1, round_2, round_3, round_4, round_5]
            .into_iter()
            .zip(labels)
            .zip(1u8..)
            .map(|((pairings, label), number)| RoundFormat {
                number,
                label: label.to_string(),
                legs: [2 * number + 1, 2 * number + 2],
                pairings,
            })
            .collect();

        Self { rounds }
    }

    /// Every seed slot the format draws from, ascending.
    pub fn seed_slots(&self) -> Vec<SeedSlot> {
        let mut slots: Vec<SeedSlot> = self
            .rounds
            .iter()
            .flat_map(|r| r.pairings.iter())
            .flat_map(|p| [p.home, p.away])
            .filter_map(|e| match e {
                Entry::Seed(slot) => Some(slot),
                Entry::WinnerOf(_) => None,
            })
            .collect();
        slots.sort_unstable();
        slots.dedup();
        slots
    }

    /// Weeks spanned by the cup, first leg of the first round to second leg
    /// of the last.
    pub fn weeks(&self) -> Option<RangeInclusive<u8>> {
        let first = self.rounds.first()?.legs[0];
        let last = self.rounds.last()?.legs[1];
        Some(first..=last)
    }

    pub fn matchup_count(&self) -> usize {
        self.rounds.iter().map(|r| r.pairings.len()).sum()
    }
}

/// Which division ranks fill which consecutive seed slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedBand {
    pub division: Division,
    /// 1-based division ranks.
    pub ranks: RangeInclusive<usize>,
    pub first_slot: SeedSlot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedingPolicy {
    pub bands: Vec<SeedBand>,
}

impl SeedingPolicy {
    /// Fixed interleave: top four of each division take the byes, the rest
    /// fill 9–24 Premier first.
    pub fn fsl_cup() -> Self {
        let band = |division, ranks, first_slot| SeedBand { division, ranks, first_slot };
        Self {
            bands: vec![
                band(Division::Premier, 1..=4, 1),
                band(Division::Championship, 1..=4, 5),
                band(Division::Premier, 5..=12, 9),
                band(Division::Championship, 5..=12, 17),
            ],
        }
    }

    /// Slot a division rank lands in, if the policy seeds it at all.
    pub fn slot_for(&self, division: Division, rank: usize) -> Option<SeedSlot> {
        self.bands
            .iter()
            .filter(|b| b.division == division && b.ranks.contains(&rank))
            .find_map(|b| {
                let offset = u8::try_from(rank - b.ranks.start()).ok()?;
                b.first_slot.checked_add(offset)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fsl_cup_has_five_rounds_of_8_8_4_2_1() {
        let format = CupFormat::fsl_cup();
        let sizes: Vec<usize> = format.rounds.iter().map(|r| r.pairings.len()).collect();
        assert_eq!(sizes, vec![8, 8, 4, 2, 1]);
        assert_eq!(format.matchup_count(), 23);
    }

    #[test]
    fn round_one_pairs_sixteen_with_seventeen() {
        let format = CupFormat::fsl_cup();
        let pairs: Vec<(Entry, Entry)> =
            format.rounds[0].pairings.iter().map(|p| (p.home, p.away)).collect();
        assert_eq!(pairs[0], (Entry::Seed(16), Entry::Seed(17)));
        assert_eq!(pairs[5], (Entry::Seed(11), Entry::Seed(22)));
        assert_eq!(pairs[7], (Entry::Seed(9), Entry::Seed(24)));
    }

    #[test]
    fn later_rounds_feed_from_previous_match_ids() {
        let format = CupFormat::fsl_cup();
        let r2 = &format.rounds[1].pairings;
        assert_eq!(r2[0], Pairing::new(9, Entry::Seed(1), Entry::WinnerOf(1)));
        assert_eq!(r2[7], Pairing::new(16, Entry::Seed(8), Entry::WinnerOf(8)));
        let r3 = &format.rounds[2].pairings;
        assert_eq!(r3[3], Pairing::new(20, Entry::WinnerOf(15), Entry::WinnerOf(16)));
        let fin = &format.rounds[4].pairings;
        assert_eq!(fin[0], Pairing::new(23, Entry::WinnerOf(21), Entry::WinnerOf(22)));
    }

    #[test]
    fn legs_and_labels() {
        let format = CupFormat::fsl_cup();
        let legs: Vec<[u8; 2]> = format.rounds.iter().map(|r| r.legs).collect();
        assert_eq!(legs, vec![[3, 4], [5, 6], [7, 8], [9, 10], [11, 12]]);
        assert_eq!(format.weeks(), Some(3..=12));
        assert_eq!(format.rounds[2].label, "Quarterfinals");
        assert_eq!(format.rounds[4].label, "Final");
    }

    #[test]
    fn format_draws_on_all_24_slots() {
        let slots = CupFormat::fsl_cup().seed_slots();
        assert_eq!(slots, (1..=24).collect::<Vec<_>>());
    }

    #[test]
    fn seeding_policy_interleaves_divisions() {
        let policy = SeedingPolicy::fsl_cup();
        assert_eq!(policy.slot_for(Division::Premier, 1), Some(1));
        assert_eq!(policy.slot_for(Division::Premier, 4), Some(4));
        assert_eq!(policy.slot_for(Division::Championship, 1), Some(5));
        assert_eq!(policy.slot_for(Division::Premier, 5), Some(9));
        assert_eq!(policy.slot_for(Division::Premier, 12), Some(16));
        assert_eq!(policy.slot_for(Division::Championship, 5), Some(17));
        assert_eq!(policy.slot_for(Division::Championship, 12), Some(24));
        assert_eq!(policy.slot_for(Division::Championship, 13), None);
    }
}
