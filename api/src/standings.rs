use crate::sleeper::{SleeperBracketMatch, SleeperMatchup, SleeperRoster, SleeperUser};
use crate::{FormResult, PlayoffOutcome, Record, TeamStanding, WeeklyResult, combine_points};

/// Number of games shown in a team's form strip.
pub const FORM_LENGTH: usize = 5;

/// Matchups returned by one `/matchups/{week}` call, tagged with their week.
#[derive(Debug, Clone, Default)]
pub struct WeekMatchups {
    pub week: u8,
    pub matchups: Vec<SleeperMatchup>,
}

/// Build a ranked division table.
///
/// `rosters`/`users` are the league the table is computed from (the previous
/// season when seeding the cup). `current_rosters` links each owner to their
/// roster in the current season so `weeks` can be attached as weekly results.
/// For a plain current-season table pass the same rosters twice.
pub fn build_standings(
    users: &[SleeperUser],
    rosters: &[SleeperRoster],
    current_rosters: &[SleeperRoster],
    weeks: &[WeekMatchups],
) -> Vec<TeamStanding> {
    let mut standings: Vec<TeamStanding> = rosters
        .iter()
        .map(|roster| map_roster(roster, users, current_rosters, weeks))
        .collect();
    rank_standings(&mut standings);
    standings
}

/// Sort by wins, then points for, both descending. Remaining ties fall back
/// to ascending roster id so the order never depends on API response order.
pub fn rank_standings(standings: &mut [TeamStanding]) {
    standings.sort_by(|a, b| {
        b.record
            .wins
            .cmp(&a.record.wins)
            .then_with(|| b.points_for.total_cmp(&a.points_for))
            .then_with(|| a.roster_id.cmp(&b.roster_id))
    });
}

fn map_roster(
    roster: &SleeperRoster,
    users: &[SleeperUser],
    current_rosters: &[SleeperRoster],
    weeks: &[WeekMatchups],
) -> TeamStanding {
    let user = roster
        .effective_owner()
        .and_then(|owner| users.iter().find(|u| u.user_id == owner));
    let display_name = user.and_then(|u| u.display_name.clone());

    let current_roster_id = user.and_then(|u| {
        current_rosters
            .iter()
            .find(|r| r.effective_owner() == Some(u.user_id.as_str()))
            .map(|r| r.roster_id)
    });

    let weekly = current_roster_id
        .map(|rid| weekly_results(rid, weeks))
        .unwrap_or_default();

    let s = &roster.settings;
    TeamStanding {
        roster_id: roster.roster_id,
        current_roster_id,
        user_id: user.map(|u| u.user_id.clone()),
        name: display_name
            .clone()
            .unwrap_or_else(|| format!("Team {}", roster.roster_id)),
        owner: display_name.unwrap_or_else(|| "Unknown Owner".to_string()),
        avatar: user.and_then(|u| u.avatar.clone()),
        record: Record { wins: s.wins, losses: s.losses, ties: s.ties },
        points_for: combine_points(s.fpts, s.fpts_decimal),
        points_against: combine_points(s.fpts_against, s.fpts_against_decimal),
        form: parse_form(
            roster
                .metadata
                .as_ref()
                .and_then(|m| m.record.as_deref())
                .unwrap_or(""),
        ),
        weekly,
    }
}

/// Collect one roster's points across the fetched weeks, ordered by week.
/// A week where the roster has no matchup entry (or no points) is left out.
pub fn weekly_results(roster_id: u32, weeks: &[WeekMatchups]) -> Vec<WeeklyResult> {
    let mut results: Vec<WeeklyResult> = weeks
        .iter()
        .filter_map(|w| {
            w.matchups
                .iter()
                .find(|m| m.roster_id == roster_id)
                .and_then(SleeperMatchup::effective_points)
                .map(|points| WeeklyResult { week: w.week, points })
        })
        .collect();
    results.sort_by_key(|r| r.week);
    results
}

/// Parse Sleeper's `metadata.record` string ("WWLWT...", oldest first) into
/// the last five wins and losses, most recent first. Ties are skipped.
pub fn parse_form(record: &str) -> Vec<FormResult> {
    let mut form: Vec<FormResult> = record
        .chars()
        .filter_map(|c| match c {
            'W' => Some(FormResult::Win),
            'L' => Some(FormResult::Loss),
            _ => None,
        })
        .rev()
        .take(FORM_LENGTH)
        .collect();
    form.resize(FORM_LENGTH, FormResult::Unplayed);
    form
}

/// Read champion and consolation winner out of a finished league's brackets.
///
/// The deciding match is the one in the last round that settles first place
/// (`p == 1`); brackets without placement tags fall back to the first match
/// of the last round.
pub fn playoff_outcome(
    winners: &[SleeperBracketMatch],
    losers: &[SleeperBracketMatch],
) -> PlayoffOutcome {
    PlayoffOutcome {
        champion: deciding_match(winners).and_then(|m| m.w),
        consolation_winner: deciding_match(losers).and_then(|m| m.w),
    }
}

fn deciding_match(bracket: &[SleeperBracketMatch]) -> Option<&SleeperBracketMatch> {
    let last_round = bracket.iter().map(|m| m.r).max()?;
    let finals: Vec<&SleeperBracketMatch> = bracket.iter().filter(|m| m.r == last_round).collect();
    finals
        .iter()
        .find(|m| m.p == Some(1))
        .or_else(|| finals.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleeper::{SleeperRosterMetadata, SleeperRosterSettings};

    fn user(id: &str, name: &str) -> SleeperUser {
        SleeperUser {
            user_id: id.into(),
            display_name: Some(name.into()),
            avatar: None,
        }
    }

    fn roster(roster_id: u32, owner: &str, wins: u32, fpts: i64, fpts_decimal: i64) -> SleeperRoster {
        SleeperRoster {
            roster_id,
            owner_id: Some(owner.into()),
            co_owners: None,
            settings: SleeperRosterSettings {
                wins,
                losses: 13 - wins,
                fpts,
                fpts_decimal,
                ..Default::default()
            },
            metadata: None,
        }
    }

    fn matchup(roster_id: u32, points: f64) -> SleeperMatchup {
        SleeperMatchup {
            roster_id,
            matchup_id: Some(1),
            points: Some(points),
            custom_points: None,
        }
    }

    #[test]
    fn standings_sort_by_wins_then_points_for() {
        let users = vec![user("a", "Alpha"), user("b", "Bravo"), user("c", "Charlie")];
        let rosters = vec![
            roster(1, "a", 8, 1500, 0),
            roster(2, "b", 10, 1400, 0),
            roster(3, "c", 8, 1600, 25),
        ];
        let table = build_standings(&users, &rosters, &rosters, &[]);
        let names: Vec<&str> = table.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Bravo", "Charlie", "Alpha"]);
        assert!((table[1].points_for - 1600.25).abs() < 1e-9);
    }

    #[test]
    fn full_ties_fall_back_to_roster_id() {
        let users = vec![user("a", "Alpha"), user("b", "Bravo")];
        let rosters = vec![roster(7, "a", 6, 1200, 10), roster(3, "b", 6, 1200, 10)];
        let table = build_standings(&users, &rosters, &rosters, &[]);
        assert_eq!(table[0].roster_id, 3);
        assert_eq!(table[1].roster_id, 7);
    }

    #[test]
    fn unknown_owner_gets_placeholder_names() {
        let rosters = vec![roster(4, "ghost", 5, 1000, 0)];
        let table = build_standings(&[], &rosters, &rosters, &[]);
        assert_eq!(table[0].name, "Team 4");
        assert_eq!(table[0].owner, "Unknown Owner");
        assert!(table[0].user_id.is_none());
        assert!(table[0].current_roster_id.is_none());
    }

    #[test]
    fn co_owner_takes_precedence_over_owner() {
        let users = vec![user("owner", "Owner"), user("co", "CoOwner")];
        let mut r = roster(1, "owner", 5, 1000, 0);
        r.co_owners = Some(vec!["co".into(), "owner".into()]);
        let table = build_standings(&users, &[r.clone()], &[r], &[]);
        assert_eq!(table[0].name, "CoOwner");
    }

    #[test]
    fn previous_season_roster_links_to_current_roster_weeks() {
        let users = vec![user("a", "Alpha")];
        let previous = vec![roster(9, "a", 7, 1300, 0)];
        let current = vec![roster(2, "a", 0, 0, 0)];
        let weeks = vec![
            WeekMatchups { week: 4, matchups: vec![matchup(2, 101.5), matchup(9, 5.0)] },
            WeekMatchups { week: 3, matchups: vec![matchup(2, 88.0)] },
            WeekMatchups { week: 5, matchups: vec![matchup(1, 77.0)] },
        ];
        let table = build_standings(&users, &previous, &current, &weeks);
        assert_eq!(table[0].roster_id, 9);
        assert_eq!(table[0].current_roster_id, Some(2));
        assert_eq!(
            table[0].weekly,
            vec![
                WeeklyResult { week: 3, points: 88.0 },
                WeeklyResult { week: 4, points: 101.5 },
            ]
        );
    }

    #[test]
    fn custom_points_override_computed_points() {
        let mut m = matchup(1, 90.0);
        m.custom_points = Some(95.0);
        let weeks = vec![WeekMatchups { week: 3, matchups: vec![m] }];
        assert_eq!(weekly_results(1, &weeks), vec![WeeklyResult { week: 3, points: 95.0 }]);
    }

    #[test]
    fn matchup_without_points_is_absent_not_zero() {
        let m = SleeperMatchup { roster_id: 1, matchup_id: None, points: None, custom_points: None };
        let weeks = vec![WeekMatchups { week: 3, matchups: vec![m] }];
        assert!(weekly_results(1, &weeks).is_empty());
    }

    #[test]
    fn form_is_most_recent_first_and_padded() {
        use FormResult::*;
        assert_eq!(parse_form("WWLWLLW"), vec![Win, Loss, Loss, Win, Loss]);
        assert_eq!(parse_form("WT"), vec![Win, Unplayed, Unplayed, Unplayed, Unplayed]);
        assert_eq!(parse_form(""), vec![Unplayed; FORM_LENGTH]);
    }

    #[test]
    fn ties_do_not_push_results_out_of_the_form_strip() {
        use FormResult::*;
        assert_eq!(parse_form("WLWLWTT"), vec![Win, Loss, Win, Loss, Win]);
        assert_eq!(parse_form("LWWWWTW"), vec![Win, Win, Win, Win, Win]);
    }

    #[test]
    fn roster_metadata_record_feeds_form() {
        let mut r = roster(1, "a", 1, 0, 0);
        r.metadata = Some(SleeperRosterMetadata { record: Some("LW".into()) });
        let table = build_standings(&[user("a", "Alpha")], &[r.clone()], &[r], &[]);
        assert_eq!(table[0].form[0], FormResult::Win);
        assert_eq!(table[0].form[1], FormResult::Loss);
    }

    #[test]
    fn playoff_outcome_reads_final_round_first_place_match() {
        let bm = |r, m, w, p| SleeperBracketMatch { r, m, t1: None, t2: None, w, l: None, p };
        let winners = vec![
            bm(1, 1, Some(3), None),
            bm(2, 3, Some(5), None),
            bm(3, 5, Some(8), Some(3)),
            bm(3, 6, Some(5), Some(1)),
        ];
        let losers = vec![bm(1, 1, Some(2), None), bm(3, 4, Some(11), None)];
        let outcome = playoff_outcome(&winners, &losers);
        assert_eq!(outcome.champion, Some(5));
        assert_eq!(outcome.consolation_winner, Some(11));
    }

    #[test]
    fn playoff_outcome_empty_brackets() {
        assert_eq!(playoff_outcome(&[], &[]), PlayoffOutcome::default());
    }
}
