use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Standings),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Cup),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Standings navigation
        (MenuItem::Standings, Char('d'), _) => guard.standings_toggle_division(),
        (MenuItem::Standings, Char('j') | KeyCode::Down, _) => guard.standings_row_down(),
        (MenuItem::Standings, Char('k') | KeyCode::Up, _) => guard.standings_row_up(),

        // Cup navigation
        (MenuItem::Cup, Char('l') | KeyCode::Right, _) => guard.cup_next_round(),
        (MenuItem::Cup, Char('h') | KeyCode::Left, _) => guard.cup_prev_round(),
        (MenuItem::Cup, Char('j') | KeyCode::Down, _) => guard.cup_match_down(),
        (MenuItem::Cup, Char('k') | KeyCode::Up, _) => guard.cup_match_up(),

        // Global
        (_, Char('r'), _) => {
            drop(guard);
            for request in [NetworkRequest::LoadStandings, NetworkRequest::LoadCup] {
                let _ = network_requests.send(request).await;
            }
        }
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
