use tui::style::{Color, Modifier, Style};

/// Semantic colors shared by the bracket and standings views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CupColor {
    /// Matchups currently being played.
    Primary,
    Accent,
    Dim,
    Winner,
    Promotion,
    Relegation,
}

pub fn resolve(color: CupColor) -> Style {
    match color {
        CupColor::Primary => Style::default().fg(Color::Rgb(0, 122, 195)),
        CupColor::Accent => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        CupColor::Dim => Style::default().fg(Color::Indexed(240)),
        CupColor::Winner => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        CupColor::Promotion => Style::default().fg(Color::Green),
        CupColor::Relegation => Style::default().fg(Color::Red),
    }
}
