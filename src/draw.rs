use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::bracket::{BracketGrid, CupBracketView};
use crate::components::theme::{CupColor, resolve};
use crate::cup::Matchup;
use crate::cup::loader::{CupSnapshot, DivisionTable};
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;

static TABS: &[&str; 2] = &["Standings", "FSL Cup"];

const HELP_TEXT: &str = "\
Navigation
  1          Standings
  2          FSL Cup
  ?          this help (Esc to go back)
  q, Ctrl-c  quit

Standings
  j/k        move between teams
  d          switch division

FSL Cup
  h/l        previous / next round
  j/k        move between matchups

Global
  r          reload from Sleeper
  f          toggle full screen
  \"          toggle log pane";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Standings => draw_standings(f, layout.main, app),
            MenuItem::Cup => draw_cup(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }
        draw_status(f, layout.status, app);
        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        error!("Failed to draw frame: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Standings => 0,
        MenuItem::Cup => 1,
        MenuItem::Help => match app.state.previous_tab {
            MenuItem::Cup => 1,
            _ => 0,
        },
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

fn draw_standings(f: &mut Frame, area: Rect, app: &App) {
    let standings = &app.state.standings;
    let title = format!(" {} ", standings.division.label());
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(table) = standings.table() else {
        draw_waiting(f, inner, app, "Loading standings...");
        return;
    };

    let [header, content, legend] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    f.render_widget(
        Paragraph::new(format!("{} {} | d=switch division  j/k=move", table.league_name, table.season))
            .style(Style::default().fg(Color::DarkGray)),
        header,
    );

    let widths = [
        Constraint::Length(4),
        Constraint::Fill(2),
        Constraint::Fill(1),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(6),
        Constraint::Length(4),
    ];
    let header_row = Row::new(["Pos", "Team", "Owner", "W-L-T", "PF", "PA", "Form", ""])
        .style(resolve(CupColor::Accent));
    let table_widget = Table::new(standings_rows(table), widths)
        .header(header_row)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default().with_selected(Some(standings.selected_row));
    f.render_stateful_widget(table_widget, content, &mut state);

    f.render_widget(
        Paragraph::new("▲ promoted  ▼ relegated  ★ champion  B cup bye")
            .style(Style::default().fg(Color::DarkGray)),
        legend,
    );
}

fn standings_rows(table: &DivisionTable) -> Vec<Row<'_>> {
    table
        .standings
        .iter()
        .enumerate()
        .map(|(idx, team)| {
            let position = idx + 1;
            let markers = table.markers(position);
            let style = if markers.promotion {
                resolve(CupColor::Promotion)
            } else if markers.relegation {
                resolve(CupColor::Relegation)
            } else {
                Style::default()
            };
            let mut marks = String::new();
            if markers.champion {
                marks.push('★');
            }
            if markers.promotion {
                marks.push('▲');
            }
            if markers.relegation {
                marks.push('▼');
            }
            if markers.cup_bye {
                marks.push('B');
            }
            let form: String = team.form.iter().map(|r| r.symbol()).collect();

            Row::new([
                Cell::from(format!("{position:>3}")),
                Cell::from(team.name.as_str()),
                Cell::from(team.owner.as_str()),
                Cell::from(team.record.summary()),
                Cell::from(format!("{:.2}", team.points_for)),
                Cell::from(format!("{:.2}", team.points_against)),
                Cell::from(form),
                Cell::from(marks),
            ])
            .style(style)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Cup
// ---------------------------------------------------------------------------

fn draw_cup(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" FSL Cup ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cup = &app.state.cup;
    let Some(snapshot) = cup.snapshot.as_ref() else {
        draw_waiting(f, inner, app, "Loading cup bracket...");
        return;
    };

    let [header, key_legend, content] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Fill(1)]).areas(inner);

    let round_label = snapshot
        .bracket
        .rounds
        .get(cup.view_round)
        .map(|r| r.label.as_str())
        .unwrap_or("-");
    let mut header_spans = vec![Span::raw(format!(
        "FSL Cup {} | Week {} | {}",
        snapshot.season, snapshot.current_week, round_label
    ))];
    if let Some(champion) = snapshot.bracket.champion() {
        header_spans.push(Span::raw(" | "));
        header_spans.push(Span::styled(
            format!("Champion: {}", champion.participant.name),
            resolve(CupColor::Winner),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(header_spans)), header);
    f.render_widget(
        Paragraph::new("Keys: h/l=round  j/k=matchup  r=reload  ?=help  q=quit")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    let mut bracket_area = content;
    let mut detail_area: Option<Rect> = None;
    if content.width >= 140 {
        let [left, right] = Layout::horizontal([Constraint::Fill(1), Constraint::Length(36)]).areas(content);
        bracket_area = left;
        detail_area = Some(right);
    } else if content.height >= 42 {
        let [top, bottom] = Layout::vertical([Constraint::Fill(1), Constraint::Length(9)]).areas(content);
        bracket_area = top;
        detail_area = Some(bottom);
    }

    let grid = BracketGrid::compute(bracket_area.width);
    let scroll_offset = grid.scroll_for(cup.view_round, cup.selected_match, bracket_area.height);
    f.render_widget(
        CupBracketView {
            bracket: &snapshot.bracket,
            grid: &grid,
            current_week: snapshot.current_week,
            selected_round: cup.view_round,
            selected_match: cup.selected_match,
            scroll_offset,
        },
        bracket_area,
    );

    if let Some(detail) = detail_area {
        draw_matchup_detail(f, detail, snapshot, cup.selected_matchup(), round_label);
    }
}

fn draw_matchup_detail(
    f: &mut Frame,
    area: Rect,
    snapshot: &CupSnapshot,
    matchup: Option<&Matchup>,
    round_label: &str,
) {
    let Some(m) = matchup else {
        draw_placeholder(f, area, "No matchup selected");
        return;
    };

    let block = default_border(Color::DarkGray).title(format!(" M{} · {round_label} ", m.match_id));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let week = snapshot.current_week;
    let leg_points = |points: Option<f64>, leg: u8| -> String {
        match points {
            Some(p) if leg <= week => format!("{p:>7.2}"),
            _ => format!("{:>7}", "-"),
        }
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{:<14}{:>7}{:>7}{:>8}", "", format!("Wk{}", m.legs[0]), format!("Wk{}", m.legs[1]), "Agg"),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    for (side, seed) in [m.team1.as_ref(), m.team2.as_ref()].into_iter().enumerate() {
        let score = if side == 0 { m.team1_score } else { m.team2_score };
        let line = match seed {
            Some(s) => {
                let name: String = format!("{:>2} {}", s.slot, s.participant.name).chars().take(13).collect();
                let style = if m.is_winner(s) {
                    resolve(CupColor::Winner)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Line::from(Span::styled(
                    format!(
                        "{name:<14}{}{}{:>8}",
                        leg_points(s.participant.points_in(m.legs[0]), m.legs[0]),
                        leg_points(s.participant.points_in(m.legs[1]), m.legs[1]),
                        score.map(|p| format!("{p:.2}")).unwrap_or_else(|| "-".to_string()),
                    ),
                    style,
                ))
            }
            None => Line::from(Span::styled(
                format!("   {} (TBD)", m.inputs[side]),
                Style::default().fg(Color::DarkGray),
            )),
        };
        lines.push(line);
    }

    lines.push(Line::from(""));
    lines.push(match m.winner.entrant() {
        Some(winner) => Line::from(Span::styled(
            format!("Advances: {}", winner.participant.name),
            resolve(CupColor::Winner),
        )),
        None if week < m.legs[0] => Line::from(format!("Starts week {}", m.legs[0])),
        None => Line::from(Span::styled("In progress", resolve(CupColor::Primary))),
    });

    f.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Help, logs, status
// ---------------------------------------------------------------------------

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::White).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(Paragraph::new(HELP_TEXT), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::DarkGray))
        .block(default_border(Color::DarkGray).title(" Logs "));
    f.render_widget(logs, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let line = match (&app.state.last_error, &app.state.last_updated) {
        (Some(err), _) => Line::from(Span::styled(
            format!(" {err}"),
            Style::default().fg(Color::Red),
        )),
        (None, Some(at)) => Line::from(Span::styled(
            format!(" Updated {at}"),
            Style::default().fg(Color::DarkGray),
        )),
        (None, None) => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_waiting(f: &mut Frame, area: Rect, app: &App, loading_msg: &str) {
    let msg = match app.state.last_error.as_deref() {
        Some(err) => format!("Load failed:\n{err}\n\nPress r to retry"),
        None => loading_msg.to_string(),
    };
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    let block = default_border(Color::DarkGray);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
