pub mod bracket;
pub mod format;
pub mod loader;
pub mod seeding;

use serde::{Deserialize, Serialize};
use sleeper_api::WeeklyResult;
use std::collections::BTreeMap;
use std::fmt;

pub use bracket::generate_bracket;
pub use format::{CupFormat, SeedingPolicy};
pub use seeding::build_seeding;

/// Bracket slot number. The FSL Cup uses 1–24.
pub type SeedSlot = u8;

/// Match ids are unique across the whole bracket (1–23 for the FSL Cup).
pub type MatchId = u8;

// ---------------------------------------------------------------------------
// Divisions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Division {
    #[default]
    Premier,
    Championship,
}

impl Division {
    pub fn label(&self) -> &'static str {
        match self {
            Division::Premier => "Premier League",
            Division::Championship => "Championship",
        }
    }

    /// Name given to a slot the division could not fill.
    pub fn placeholder_name(&self, rank: usize) -> String {
        match self {
            Division::Premier => format!("Premier Team {rank}"),
            Division::Championship => format!("Championship Team {rank}"),
        }
    }

    pub fn other(&self) -> Division {
        match self {
            Division::Premier => Division::Championship,
            Division::Championship => Division::Premier,
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Participants and seeding
// ---------------------------------------------------------------------------

/// A cup entrant: who they are plus their current-season weekly scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Sleeper user id when known, else a synthetic id.
    pub id: String,
    /// Roster id in the current season's league.
    pub roster_id: Option<u32>,
    pub name: String,
    /// Ordered by week. A week with no entry has no recorded result, which is
    /// not the same as scoring 0.0.
    pub weekly: Vec<WeeklyResult>,
    #[serde(default)]
    pub placeholder: bool,
}

impl Participant {
    pub fn placeholder(division: Division, rank: usize) -> Self {
        let id = match division {
            Division::Premier => format!("placeholder-premier-{rank}"),
            Division::Championship => format!("placeholder-championship-{rank}"),
        };
        Self {
            id,
            roster_id: None,
            name: division.placeholder_name(rank),
            weekly: Vec::new(),
            placeholder: true,
        }
    }

    /// Points recorded for `week`, if any.
    pub fn points_in(&self, week: u8) -> Option<f64> {
        self.weekly.iter().find(|w| w.week == week).map(|w| w.points)
    }
}

/// A participant bound to a bracket slot. Also used as the resolved entrant
/// of a matchup, since entrants keep their slot for tie-breaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    pub slot: SeedSlot,
    pub participant: Participant,
}

/// Slot → participant. Slots are unique; ordering is by slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seeding(BTreeMap<SeedSlot, Participant>);

impl Seeding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `participant` to `slot`, returning whatever held the slot before.
    pub fn insert(&mut self, slot: SeedSlot, participant: Participant) -> Option<Participant> {
        self.0.insert(slot, participant)
    }

    pub fn get(&self, slot: SeedSlot) -> Option<&Participant> {
        self.0.get(&slot)
    }

    pub fn seed(&self, slot: SeedSlot) -> Option<Seed> {
        self.get(slot).map(|p| Seed { slot, participant: p.clone() })
    }

    pub fn slots(&self) -> impl Iterator<Item = SeedSlot> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SeedSlot, &Participant)> {
        self.0.iter().map(|(slot, p)| (*slot, p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(SeedSlot, Participant)> for Seeding {
    fn from_iter<I: IntoIterator<Item = (SeedSlot, Participant)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------
// Bracket
// ---------------------------------------------------------------------------

/// Where a matchup side comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "ref", rename_all = "snake_case")]
pub enum Entry {
    Seed(SeedSlot),
    WinnerOf(MatchId),
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Seed(slot) => write!(f, "Seed {slot}"),
            Entry::WinnerOf(id) => write!(f, "Winner M{id}"),
        }
    }
}

/// A matchup's result. `Pending` is the normal state until both legs are
/// played and both entrants are known.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    #[default]
    Pending,
    Decided { entrant: Seed },
}

impl Outcome {
    pub fn entrant(&self) -> Option<&Seed> {
        match self {
            Outcome::Pending => None,
            Outcome::Decided { entrant } => Some(entrant),
        }
    }

    pub fn is_decided(&self) -> bool {
        matches!(self, Outcome::Decided { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub match_id: MatchId,
    pub round: u8,
    /// First and second leg weeks.
    pub legs: [u8; 2],
    pub inputs: [Entry; 2],
    pub team1: Option<Seed>,
    pub team2: Option<Seed>,
    /// Aggregate over the legs played so far; null while the side is unresolved.
    pub team1_score: Option<f64>,
    pub team2_score: Option<f64>,
    pub winner: Outcome,
}

impl Matchup {
    pub fn is_winner(&self, seed: &Seed) -> bool {
        self.winner.entrant().is_some_and(|w| w.slot == seed.slot)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub number: u8,
    pub label: String,
    pub matchups: Vec<Matchup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub rounds: Vec<Round>,
}

impl Bracket {
    pub fn matchup(&self, match_id: MatchId) -> Option<&Matchup> {
        self.rounds
            .iter()
            .flat_map(|r| r.matchups.iter())
            .find(|m| m.match_id == match_id)
    }

    /// Winner of the last round's only matchup, once decided.
    pub fn champion(&self) -> Option<&Seed> {
        self.rounds
            .last()
            .and_then(|r| r.matchups.first())
            .and_then(|m| m.winner.entrant())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Fatal cup errors. No partial bracket is produced when one of these occurs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CupError {
    #[error("{0} standings are empty")]
    IncompleteStandings(Division),

    #[error("Invalid seeding: {0}")]
    InvalidSeeding(String),

    #[error("Malformed week data for {participant}: {reason}")]
    MalformedWeekData { participant: String, reason: String },

    #[error("Invalid cup format: {0}")]
    InvalidFormat(String),
}
