use crate::app::MenuItem;
use crate::cup::loader::{CupSnapshot, DivisionTable};
use crate::cup::{Bracket, Division, Matchup};

// ---------------------------------------------------------------------------
// Standings state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct StandingsState {
    /// Premier League then Championship.
    pub tables: Option<[DivisionTable; 2]>,
    /// Division currently shown.
    pub division: Division,
    pub selected_row: usize,
}

impl StandingsState {
    pub fn load(&mut self, tables: [DivisionTable; 2]) {
        self.tables = Some(tables);
        self.clamp_selection();
    }

    pub fn table(&self) -> Option<&DivisionTable> {
        let tables = self.tables.as_ref()?;
        tables.iter().find(|t| t.division == self.division)
    }

    pub fn toggle_division(&mut self) {
        self.division = self.division.other();
        self.clamp_selection();
    }

    pub fn navigate_row_down(&mut self) {
        let max = self.row_count().saturating_sub(1);
        if self.selected_row < max {
            self.selected_row += 1;
        }
    }

    pub fn navigate_row_up(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    fn row_count(&self) -> usize {
        self.table().map(|t| t.standings.len()).unwrap_or(0)
    }

    fn clamp_selection(&mut self) {
        self.selected_row = self.selected_row.min(self.row_count().saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// Cup state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct CupState {
    pub snapshot: Option<CupSnapshot>,
    /// Round index (0 = Round 1) holding the selection.
    pub view_round: usize,
    /// Matchup index within `view_round`.
    pub selected_match: usize,
}

impl CupState {
    /// Store a fresh snapshot. The first load jumps to the round in play;
    /// later refreshes keep the user's selection.
    pub fn load(&mut self, snapshot: CupSnapshot) {
        if self.snapshot.is_none() {
            self.view_round = active_round(&snapshot.bracket, snapshot.current_week);
            self.selected_match = 0;
        }
        self.snapshot = Some(snapshot);
        self.view_round = self.view_round.min(self.round_count().saturating_sub(1));
        self.selected_match = self.selected_match.min(self.matchups_in(self.view_round).saturating_sub(1));
    }

    pub fn bracket(&self) -> Option<&Bracket> {
        self.snapshot.as_ref().map(|s| &s.bracket)
    }

    /// Move right, keeping the selection on the matchup the current one feeds.
    pub fn navigate_round_next(&mut self) {
        if self.view_round + 1 < self.round_count() {
            self.move_to_round(self.view_round + 1);
        }
    }

    /// Move left, landing on the upper of the matchups feeding the current one.
    pub fn navigate_round_prev(&mut self) {
        if self.view_round > 0 {
            self.move_to_round(self.view_round - 1);
        }
    }

    pub fn navigate_match_down(&mut self) {
        let max = self.matchups_in(self.view_round).saturating_sub(1);
        if self.selected_match < max {
            self.selected_match += 1;
        }
    }

    pub fn navigate_match_up(&mut self) {
        self.selected_match = self.selected_match.saturating_sub(1);
    }

    pub fn selected_matchup(&self) -> Option<&Matchup> {
        self.bracket()?
            .rounds
            .get(self.view_round)?
            .matchups
            .get(self.selected_match)
    }

    fn move_to_round(&mut self, round: usize) {
        let from = self.matchups_in(self.view_round).max(1);
        let to = self.matchups_in(round);
        self.selected_match = (self.selected_match * to / from).min(to.saturating_sub(1));
        self.view_round = round;
    }

    fn round_count(&self) -> usize {
        self.bracket().map(|b| b.rounds.len()).unwrap_or(0)
    }

    fn matchups_in(&self, round: usize) -> usize {
        self.bracket()
            .and_then(|b| b.rounds.get(round))
            .map(|r| r.matchups.len())
            .unwrap_or(0)
    }
}

/// The round being played in `current_week`: the first whose second leg is
/// still ahead or this week. Past the end, the last round.
fn active_round(bracket: &Bracket, current_week: u8) -> usize {
    bracket
        .rounds
        .iter()
        .position(|r| r.matchups.first().is_some_and(|m| m.legs[1] >= current_week))
        .unwrap_or_else(|| bracket.rounds.len().saturating_sub(1))
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    /// Local time of the last successful load, `HH:MM:SS`.
    pub last_updated: Option<String>,
    pub standings: StandingsState,
    pub cup: CupState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cup::{CupFormat, Participant, Seeding, generate_bracket};
    use sleeper_api::TeamStanding;

    fn snapshot(week: u8) -> CupSnapshot {
        let seeding: Seeding = (1..=24u8)
            .map(|slot| (slot, Participant::placeholder(Division::Premier, slot as usize)))
            .collect();
        let bracket = generate_bracket(&seeding, week, &CupFormat::fsl_cup()).unwrap();
        CupSnapshot {
            season: "2025".into(),
            current_week: week,
            div_1_league_id: "1".into(),
            div_2_league_id: "2".into(),
            divisions: [table(Division::Premier, 12), table(Division::Championship, 10)],
            seeding,
            bracket,
        }
    }

    fn table(division: Division, teams: u32) -> DivisionTable {
        DivisionTable {
            division,
            league_id: "l".into(),
            league_name: division.label().into(),
            season: "2025".into(),
            standings: (1..=teams)
                .map(|i| TeamStanding { roster_id: i, ..Default::default() })
                .collect(),
            playoffs: None,
        }
    }

    #[test]
    fn first_load_jumps_to_active_round() {
        let mut cup = CupState::default();
        cup.load(snapshot(4));
        assert_eq!(cup.view_round, 0);

        let mut cup = CupState::default();
        cup.load(snapshot(7));
        assert_eq!(cup.view_round, 2);

        let mut cup = CupState::default();
        cup.load(snapshot(12));
        assert_eq!(cup.view_round, 4);
    }

    #[test]
    fn refresh_keeps_selection() {
        let mut cup = CupState::default();
        cup.load(snapshot(4));
        cup.navigate_round_next();
        cup.navigate_match_down();
        cup.load(snapshot(5));
        assert_eq!((cup.view_round, cup.selected_match), (1, 1));
    }

    #[test]
    fn round_navigation_follows_the_bracket_path() {
        let mut cup = CupState::default();
        cup.load(snapshot(4));
        for _ in 0..5 {
            cup.navigate_match_down();
        }
        assert_eq!(cup.selected_matchup().unwrap().match_id, 6);

        // Round 1 → Round 2 is one to one.
        cup.navigate_round_next();
        assert_eq!(cup.selected_matchup().unwrap().match_id, 14);

        // M14 feeds M19.
        cup.navigate_round_next();
        assert_eq!(cup.selected_matchup().unwrap().match_id, 19);

        cup.navigate_round_next();
        cup.navigate_round_next();
        assert_eq!(cup.selected_matchup().unwrap().match_id, 23);
        cup.navigate_round_next();
        assert_eq!(cup.view_round, 4);

        // Back left lands on the upper feeder.
        cup.navigate_round_prev();
        assert_eq!(cup.selected_matchup().unwrap().match_id, 21);
    }

    #[test]
    fn match_navigation_is_bounded() {
        let mut cup = CupState::default();
        cup.load(snapshot(9));
        assert_eq!(cup.view_round, 3);
        cup.navigate_match_up();
        assert_eq!(cup.selected_match, 0);
        cup.navigate_match_down();
        cup.navigate_match_down();
        assert_eq!(cup.selected_match, 1);
    }

    #[test]
    fn empty_cup_state_has_no_selection() {
        let mut cup = CupState::default();
        cup.navigate_round_next();
        cup.navigate_match_down();
        assert!(cup.selected_matchup().is_none());
    }

    #[test]
    fn standings_toggle_and_clamp() {
        let mut standings = StandingsState::default();
        standings.load([table(Division::Premier, 12), table(Division::Championship, 10)]);
        assert_eq!(standings.table().unwrap().division, Division::Premier);

        for _ in 0..20 {
            standings.navigate_row_down();
        }
        assert_eq!(standings.selected_row, 11);

        standings.toggle_division();
        assert_eq!(standings.table().unwrap().division, Division::Championship);
        assert_eq!(standings.selected_row, 9);

        standings.navigate_row_up();
        assert_eq!(standings.selected_row, 8);
    }
}
