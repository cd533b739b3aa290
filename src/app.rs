use crate::cup::loader::{CupSnapshot, DivisionTable};
use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use chrono::Local;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Standings,
    Cup,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        log::set_max_level(settings.log_level);
        tui_logger::set_default_level(settings.log_level);

        Self {
            state: AppState::new(),
            settings,
        }
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_standings_loaded(&mut self, tables: [DivisionTable; 2]) {
        self.state.last_error = None;
        self.state.standings.load(tables);
        self.touch();
    }

    pub fn on_cup_loaded(&mut self, snapshot: CupSnapshot) {
        self.state.last_error = None;
        self.state.cup.load(snapshot);
        self.touch();
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    fn touch(&mut self) {
        self.state.last_updated = Some(Local::now().format("%H:%M:%S").to_string());
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Navigation, delegated to StandingsState / CupState
    // -----------------------------------------------------------------------

    pub fn standings_toggle_division(&mut self) {
        self.state.standings.toggle_division();
    }

    pub fn standings_row_down(&mut self) {
        self.state.standings.navigate_row_down();
    }

    pub fn standings_row_up(&mut self) {
        self.state.standings.navigate_row_up();
    }

    pub fn cup_next_round(&mut self) {
        self.state.cup.navigate_round_next();
    }

    pub fn cup_prev_round(&mut self) {
        self.state.cup.navigate_round_prev();
    }

    pub fn cup_match_down(&mut self) {
        self.state.cup.navigate_match_down();
    }

    pub fn cup_match_up(&mut self) {
        self.state.cup.navigate_match_up();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_returns_to_previous_tab() {
        let mut app = App::new(AppSettings::default());
        app.update_tab(MenuItem::Cup);
        app.update_tab(MenuItem::Help);
        app.exit_help();
        assert_eq!(app.state.active_tab, MenuItem::Cup);
    }

    #[test]
    fn errors_clear_on_next_load() {
        let mut app = App::new(AppSettings::default());
        app.on_error("boom".into());
        assert_eq!(app.state.last_error.as_deref(), Some("boom"));
        app.on_standings_loaded(Default::default());
        assert!(app.state.last_error.is_none());
        assert!(app.state.last_updated.is_some());
    }
}
