pub mod client;
pub mod sleeper;
pub mod standings;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Domain types, independent of the Sleeper wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct League {
    pub id: String,
    pub name: String,
    pub season: String,
    /// Current scoring week. `None` before the season has started.
    pub current_week: Option<u8>,
    pub previous_league_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
}

impl Record {
    pub fn summary(&self) -> String {
        format!("{}-{}-{}", self.wins, self.losses, self.ties)
    }
}

/// One game's result in a team's recent form strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormResult {
    Win,
    Loss,
    /// Padding when fewer than five games have been played.
    Unplayed,
}

impl FormResult {
    pub fn symbol(&self) -> char {
        match self {
            FormResult::Win => 'W',
            FormResult::Loss => 'L',
            FormResult::Unplayed => '-',
        }
    }
}

/// Points a roster scored in one week of the current season.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyResult {
    pub week: u8,
    pub points: f64,
}

/// A team's line in a division table, plus the bits of current-season history
/// the cup needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    /// Roster id in the league these standings were computed from.
    pub roster_id: u32,
    /// Roster id of the same owner in the current season's league, if found.
    pub current_roster_id: Option<u32>,
    pub user_id: Option<String>,
    pub name: String,
    pub owner: String,
    pub avatar: Option<String>,
    pub record: Record,
    pub points_for: f64,
    pub points_against: f64,
    /// Last five results, most recent first, padded with `Unplayed`.
    pub form: Vec<FormResult>,
    /// Current-season weekly points, ordered by week. Weeks without a result are absent.
    pub weekly: Vec<WeeklyResult>,
}

/// Who came out of a league's end-of-season playoff brackets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffOutcome {
    /// Winner of the final-round winners-bracket match.
    pub champion: Option<u32>,
    /// Winner of the final-round losers-bracket match.
    pub consolation_winner: Option<u32>,
}

/// Combine Sleeper's split points (`fpts` + `fpts_decimal` hundredths) into one value.
pub fn combine_points(whole: i64, hundredths: i64) -> f64 {
    whole as f64 + hundredths as f64 / 100.0
}
