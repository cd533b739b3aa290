use crate::cup::loader::{CupSnapshot, DivisionTable};
use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadStandings,
    LoadCup,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    StandingsLoaded { tables: Box<[DivisionTable; 2]> },
    CupLoaded { snapshot: Box<CupSnapshot> },
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
