use crate::cup::{
    Bracket, CupFormat, Division, Participant, Seeding, SeedingPolicy, build_seeding,
    generate_bracket,
};
use crate::state::app_settings::AppSettings;
use anyhow::{Context, bail};
use futures_util::future::{join, try_join, try_join3, try_join5, try_join_all};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use sleeper_api::client::{ApiResult, SleeperApi};
use sleeper_api::sleeper::{SleeperRoster, SleeperUser};
use sleeper_api::standings::{WeekMatchups, build_standings};
use sleeper_api::{League, PlayoffOutcome, TeamStanding};
use std::ops::RangeInclusive;

/// Table positions that take an FSL Cup bye.
pub const CUP_BYE_POSITIONS: usize = 4;
/// Bottom position of a full division.
pub const RELEGATION_POSITION: usize = 12;

/// One division's ranked table, from whichever season it was loaded for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DivisionTable {
    pub division: Division,
    pub league_id: String,
    pub league_name: String,
    pub season: String,
    pub standings: Vec<TeamStanding>,
    /// End-of-season playoff results, when the brackets could be read.
    pub playoffs: Option<PlayoffOutcome>,
}

/// Table annotations for one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Markers {
    pub promotion: bool,
    pub relegation: bool,
    pub champion: bool,
    pub cup_bye: bool,
}

impl DivisionTable {
    /// Markers for the team at 1-based `position`.
    pub fn markers(&self, position: usize) -> Markers {
        let Some(team) = self.standings.get(position.wrapping_sub(1)) else {
            return Markers::default();
        };
        let playoffs = self.playoffs.unwrap_or_default();
        let champion = playoffs.champion == Some(team.roster_id);
        Markers {
            promotion: self.division == Division::Championship && (position == 1 || champion),
            relegation: position == RELEGATION_POSITION
                || playoffs.consolation_winner == Some(team.roster_id),
            champion,
            cup_bye: position <= CUP_BYE_POSITIONS,
        }
    }

    pub fn participants(&self) -> Vec<Participant> {
        self.standings.iter().map(Participant::from).collect()
    }
}

/// Everything one cup run produced. Also the record written by `--json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CupSnapshot {
    pub season: String,
    pub current_week: u8,
    pub div_1_league_id: String,
    pub div_2_league_id: String,
    /// Previous-season tables the seeding was drawn from, Premier first.
    pub divisions: [DivisionTable; 2],
    pub seeding: Seeding,
    pub bracket: Bracket,
}

/// Raw inputs for one division's seeding table.
struct DivisionInputs {
    previous: League,
    users: Vec<SleeperUser>,
    previous_rosters: Vec<SleeperRoster>,
    current_rosters: Vec<SleeperRoster>,
    weeks: Vec<WeekMatchups>,
}

/// Load every cup input, then seed and compute the bracket.
///
/// All required fetches run concurrently and must all succeed; nothing
/// partial ever reaches the engine.
pub async fn load_cup(api: &SleeperApi, settings: &AppSettings) -> anyhow::Result<CupSnapshot> {
    let format = CupFormat::fsl_cup();
    let legs = format.weeks().context("Cup format has no rounds")?;
    let window = settings.cup_weeks();
    if !window.contains(legs.start()) || !window.contains(legs.end()) {
        bail!(
            "Cup window weeks {}-{} does not cover the cup's legs (weeks {}-{})",
            settings.week_start,
            settings.week_end,
            legs.start(),
            legs.end()
        );
    }

    let (div1, div2) = try_join(
        api.fetch_league(&settings.div1_league_id),
        api.fetch_league(&settings.div2_league_id),
    )
    .await
    .context("Failed to load current leagues")?;

    let current_week = shared_week(&div1, &div2)?;
    if !settings.cup_weeks().contains(&current_week) {
        bail!(
            "Week {current_week} is outside the cup window (weeks {}-{})",
            settings.week_start,
            settings.week_end
        );
    }

    let previous_1 = previous_league_id(&div1, settings.div1_previous_league_id.as_deref())?;
    let previous_2 = previous_league_id(&div2, settings.div2_previous_league_id.as_deref())?;
    // Scores only ever come from leg weeks, so nothing before the first leg is fetched.
    let weeks = *legs.start()..=current_week;

    info!("loading cup inputs for week {current_week}");
    let (inputs_1, inputs_2) = try_join(
        fetch_division(api, &div1.id, &previous_1, weeks.clone()),
        fetch_division(api, &div2.id, &previous_2, weeks),
    )
    .await
    .context("Failed to load cup inputs")?;

    let table_1 = inputs_1.into_table(Division::Premier)?;
    let table_2 = inputs_2.into_table(Division::Championship)?;

    let seeding = build_seeding(
        &table_1.participants(),
        &table_2.participants(),
        &SeedingPolicy::fsl_cup(),
    )?;
    let bracket = generate_bracket(&seeding, current_week, &format)?;

    Ok(CupSnapshot {
        season: div1.season,
        current_week,
        div_1_league_id: div1.id,
        div_2_league_id: div2.id,
        divisions: [table_1, table_2],
        seeding,
        bracket,
    })
}

/// Load both divisions' current-season tables with playoff markers.
pub async fn load_standings(
    api: &SleeperApi,
    settings: &AppSettings,
) -> anyhow::Result<[DivisionTable; 2]> {
    let (premier, championship) = try_join(
        current_table(api, &settings.div1_league_id, Division::Premier),
        current_table(api, &settings.div2_league_id, Division::Championship),
    )
    .await?;
    Ok([premier, championship])
}

async fn current_table(
    api: &SleeperApi,
    league_id: &str,
    division: Division,
) -> anyhow::Result<DivisionTable> {
    let (required, playoffs) = join(
        try_join3(
            api.fetch_league(league_id),
            api.fetch_users(league_id),
            api.fetch_rosters(league_id),
        ),
        api.fetch_playoff_outcome(league_id),
    )
    .await;

    let (league, users, rosters) =
        required.with_context(|| format!("Failed to load {division} standings"))?;
    if rosters.is_empty() {
        bail!("{division} league {league_id} has no rosters");
    }

    let playoffs = playoffs
        .inspect_err(|e| warn!("{division} playoff brackets unavailable: {e}"))
        .ok();

    Ok(DivisionTable {
        division,
        standings: build_standings(&users, &rosters, &rosters, &[]),
        league_id: league.id,
        league_name: league.name,
        season: league.season,
        playoffs,
    })
}

async fn fetch_division(
    api: &SleeperApi,
    current_id: &str,
    previous_id: &str,
    weeks: RangeInclusive<u8>,
) -> ApiResult<DivisionInputs> {
    debug!("fetching {previous_id} -> {current_id}, weeks {weeks:?}");
    let (previous, users, previous_rosters, current_rosters, weeks) = try_join5(
        api.fetch_league(previous_id),
        api.fetch_users(previous_id),
        api.fetch_rosters(previous_id),
        api.fetch_rosters(current_id),
        try_join_all(weeks.map(|week| api.fetch_matchups(current_id, week))),
    )
    .await?;

    Ok(DivisionInputs { previous, users, previous_rosters, current_rosters, weeks })
}

impl DivisionInputs {
    fn into_table(self, division: Division) -> anyhow::Result<DivisionTable> {
        if self.previous_rosters.is_empty() {
            bail!("{division} previous season league {} has no rosters", self.previous.id);
        }
        if self.current_rosters.is_empty() {
            bail!("{division} current league has no rosters");
        }
        if self.users.is_empty() {
            bail!("{division} previous season league {} has no users", self.previous.id);
        }
        if let Some(empty) = self.weeks.iter().find(|w| w.matchups.is_empty()) {
            bail!("{division} has no matchups for week {}", empty.week);
        }

        let standings = build_standings(
            &self.users,
            &self.previous_rosters,
            &self.current_rosters,
            &self.weeks,
        );
        Ok(DivisionTable {
            division,
            league_id: self.previous.id,
            league_name: self.previous.name,
            season: self.previous.season,
            standings,
            playoffs: None,
        })
    }
}

fn shared_week(div1: &League, div2: &League) -> anyhow::Result<u8> {
    match (div1.current_week, div2.current_week) {
        (Some(a), Some(b)) if a == b => Ok(a),
        (Some(a), Some(b)) => bail!(
            "Leagues disagree on the current week: {} is on week {a}, {} on week {b}",
            div1.name,
            div2.name
        ),
        _ => bail!("Current week is not available; the season has not started"),
    }
}

fn previous_league_id(league: &League, configured: Option<&str>) -> anyhow::Result<String> {
    configured
        .map(str::to_string)
        .or_else(|| league.previous_league_id.clone())
        .with_context(|| format!("No previous season league for {}", league.name))
}
