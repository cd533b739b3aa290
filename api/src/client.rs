use crate::League;
use crate::sleeper::{
    SleeperBracketMatch, SleeperLeague, SleeperMatchup, SleeperRoster, SleeperUser,
};
use crate::standings::{WeekMatchups, playoff_outcome};
use crate::PlayoffOutcome;
use futures_util::future::try_join;
use log::debug;
use reqwest::Client;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const SLEEPER_V1: &str = "https://api.sleeper.app/v1";

/// Sleeper API client. Read-only endpoints, no authentication.
#[derive(Debug, Clone)]
pub struct SleeperApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for SleeperApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("fslcup/0.1 (terminal cup viewer)")
                .build()
                .unwrap_or_default(),
            base_url: SLEEPER_V1.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error for {1}: {0}")]
    Network(#[source] reqwest::Error, String),
    #[error("API error for {1}: {0}")]
    Api(#[source] reqwest::Error, String),
    #[error("Parse error for {1}: {0}")]
    Parsing(#[source] reqwest::Error, String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl SleeperApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at another host (a mirror, or a mock server in tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch league metadata. Sleeper answers unknown ids with a `null` body.
    pub async fn fetch_league(&self, league_id: &str) -> ApiResult<League> {
        let url = format!("{}/league/{league_id}", self.base_url);
        let raw: SleeperLeague = self.get(&url).await?;
        if raw.league_id.is_empty() {
            return Err(ApiError::NotFound(format!("league {league_id}")));
        }
        Ok(map_league(raw))
    }

    pub async fn fetch_users(&self, league_id: &str) -> ApiResult<Vec<SleeperUser>> {
        let url = format!("{}/league/{league_id}/users", self.base_url);
        self.get(&url).await
    }

    pub async fn fetch_rosters(&self, league_id: &str) -> ApiResult<Vec<SleeperRoster>> {
        let url = format!("{}/league/{league_id}/rosters", self.base_url);
        self.get(&url).await
    }

    /// Fetch one week's matchups, tagged with the week they belong to.
    pub async fn fetch_matchups(&self, league_id: &str, week: u8) -> ApiResult<WeekMatchups> {
        let url = format!("{}/league/{league_id}/matchups/{week}", self.base_url);
        let matchups: Vec<SleeperMatchup> = self.get(&url).await?;
        debug!("league {league_id} week {week}: {} matchup entries", matchups.len());
        Ok(WeekMatchups { week, matchups })
    }

    /// Fetch winners and losers brackets together and read the outcome.
    pub async fn fetch_playoff_outcome(&self, league_id: &str) -> ApiResult<PlayoffOutcome> {
        let winners_url = format!("{}/league/{league_id}/winners_bracket", self.base_url);
        let losers_url = format!("{}/league/{league_id}/losers_bracket", self.base_url);
        let (winners, losers) = try_join(
            self.get::<Vec<SleeperBracketMatch>>(&winners_url),
            self.get::<Vec<SleeperBracketMatch>>(&losers_url),
        )
        .await?;
        Ok(playoff_outcome(&winners, &losers))
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<Option<T>>()
                .await
                .map(Option::unwrap_or_default)
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: Sleeper wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_league(raw: SleeperLeague) -> League {
    League {
        name: raw.name.unwrap_or_else(|| format!("League {}", raw.league_id)),
        id: raw.league_id,
        season: raw.season.unwrap_or_default(),
        current_week: raw.settings.leg.filter(|w| *w > 0),
        previous_league_id: raw
            .previous_league_id
            .filter(|id| !id.is_empty() && id != "0"),
    }
}
