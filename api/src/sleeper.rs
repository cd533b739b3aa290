/// Sleeper API raw wire types: serde shapes for deserializing Sleeper responses.
/// These map to our clean domain types via the mapping functions in standings.rs.
///
/// Sleeper is loose about nulls: almost every field can be missing or `null`
/// depending on league age and settings, so everything is optional or defaulted.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// League  (GET /league/{league_id})
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SleeperLeague {
    #[serde(default)]
    pub league_id: String,
    pub name: Option<String>,
    pub season: Option<String>,
    pub status: Option<String>,
    pub previous_league_id: Option<String>,
    pub total_rosters: Option<u32>,
    #[serde(default)]
    pub settings: SleeperLeagueSettings,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SleeperLeagueSettings {
    /// Current scoring week ("leg"). Null before the season starts.
    pub leg: Option<u8>,
    pub playoff_week_start: Option<u8>,
    pub num_teams: Option<u32>,
}

// ---------------------------------------------------------------------------
// Users  (GET /league/{league_id}/users)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SleeperUser {
    #[serde(default)]
    pub user_id: String,
    pub display_name: Option<String>,
    pub avatar: Option<String>,
}

// ---------------------------------------------------------------------------
// Rosters  (GET /league/{league_id}/rosters)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SleeperRoster {
    pub roster_id: u32,
    pub owner_id: Option<String>,
    /// `null` on most leagues; a populated list means the first co-owner is
    /// the account the roster is attributed to.
    pub co_owners: Option<Vec<String>>,
    #[serde(default)]
    pub settings: SleeperRosterSettings,
    pub metadata: Option<SleeperRosterMetadata>,
}

impl SleeperRoster {
    /// The user id this roster belongs to: first co-owner if any, else the owner.
    pub fn effective_owner(&self) -> Option<&str> {
        self.co_owners
            .as_deref()
            .and_then(|owners| owners.first())
            .or(self.owner_id.as_ref())
            .map(String::as_str)
    }
}

/// Season totals. Points arrive split: `fpts` is the integer part and
/// `fpts_decimal` the hundredths (0–99).
#[derive(Debug, Deserialize, Default, Clone)]
pub struct SleeperRosterSettings {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    #[serde(default)]
    pub fpts: i64,
    #[serde(default)]
    pub fpts_decimal: i64,
    #[serde(default)]
    pub fpts_against: i64,
    #[serde(default)]
    pub fpts_against_decimal: i64,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SleeperRosterMetadata {
    /// Game-by-game results as a string of `W`/`L`/`T`, oldest first.
    pub record: Option<String>,
}

// ---------------------------------------------------------------------------
// Matchups  (GET /league/{league_id}/matchups/{week})
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SleeperMatchup {
    pub roster_id: u32,
    pub matchup_id: Option<u32>,
    pub points: Option<f64>,
    pub custom_points: Option<f64>,
}

impl SleeperMatchup {
    /// Commissioner overrides win over computed points.
    pub fn effective_points(&self) -> Option<f64> {
        self.custom_points.or(self.points)
    }
}

// ---------------------------------------------------------------------------
// Playoff brackets  (GET /league/{league_id}/winners_bracket | losers_bracket)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SleeperBracketMatch {
    /// Round number.
    pub r: u32,
    /// Match id.
    pub m: u32,
    /// Roster ids; null until the feeding match is decided.
    pub t1: Option<u32>,
    pub t2: Option<u32>,
    /// Winner / loser roster ids; null until played.
    pub w: Option<u32>,
    pub l: Option<u32>,
    /// Placement this match decides (1 = championship game).
    pub p: Option<u32>,
}
