use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

use crate::components::theme::{CupColor, resolve};
use crate::cup::{Bracket, Entry, Matchup, Seed};

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Rows per match cell: first entrant, legs/status line, second entrant.
pub const GAME_HEIGHT: u16 = 3;

/// Slot heights per bracket depth. SH[0] = GAME_HEIGHT; SH[d] = 2 * SH[d-1] + 1.
const SH: [u16; 4] = [
    GAME_HEIGHT,                              // Round 1 / Round 2:  3
    2 * GAME_HEIGHT + 1,                      // Quarterfinals:      7
    2 * (2 * GAME_HEIGHT + 1) + 1,            // Semifinals:        15
    2 * (2 * (2 * GAME_HEIGHT + 1) + 1) + 1,  // Final:             31
];

/// Total rows the cup grid occupies. Equals SH[3] = 31.
pub const CUP_HEIGHT: u16 = SH[3];

/// Width of the connector zone drawn between adjacent round columns.
pub const CONNECTOR_WIDTH: u16 = 3;

/// Maximum match cell width in wider terminals.
const CELL_W_FULL: u16 = 24;

const ROUNDS: usize = 5;

/// Row depth per round. Round 2 pairs one to one with Round 1, so both sit
/// on the leaf rows.
const ROUND_DEPTH: [usize; ROUNDS] = [0, 0, 1, 2, 3];

const MATCH_COUNTS: [usize; ROUNDS] = [8, 8, 4, 2, 1];

/// Start of each round within `BracketGrid::cells`.
const OFFSETS: [usize; ROUNDS + 1] = [0, 8, 16, 20, 22, 23];

// ---------------------------------------------------------------------------
// MatchCell / BracketGrid
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct MatchCell {
    /// Row of the status line, relative to the grid origin. Not scroll-adjusted.
    pub center_row: u16,
    /// Starting x-column within the grid.
    pub col: u16,
    pub cell_width: u16,
    /// Round index, 0 = Round 1.
    pub round: usize,
    /// Index of the matchup within its round.
    pub match_idx: usize,
}

/// Pre-computed layout for the five-round cup.
///
/// Column order left → right: R1 | conn | R2 | conn | QF | conn | SF | conn | Final
#[derive(Debug, Clone)]
pub struct BracketGrid {
    /// Round-major: 8 + 8 + 4 + 2 + 1 = 23 cells.
    pub cells: Vec<MatchCell>,
    pub round_cols: [u16; ROUNDS],
    pub total_width: u16,
    pub cell_width: u16,
}

impl BracketGrid {
    /// Lay the grid out for `terminal_width`:
    /// `5 * cell_width + 4 * CONNECTOR_WIDTH <= terminal_width`.
    ///
    /// Center rows per round:
    ///   Round 1 / Round 2: [1, 5, 9, 13, 17, 21, 25, 29]
    ///   Quarterfinals:     [3, 11, 19, 27]
    ///   Semifinals:        [7, 23]
    ///   Final:             [15]
    pub fn compute(terminal_width: u16) -> Self {
        let connector_total = CONNECTOR_WIDTH * (ROUNDS as u16 - 1);
        let per_col = terminal_width.saturating_sub(connector_total) / ROUNDS as u16;
        let cell_width = per_col.clamp(1, CELL_W_FULL);
        let stride = cell_width + CONNECTOR_WIDTH;
        let round_cols = [0, stride, stride * 2, stride * 3, stride * 4];
        let total_width = stride * 4 + cell_width;

        let first_center = [SH[0] / 2, SH[1] / 2, SH[2] / 2, SH[3] / 2];
        let spacing = [SH[1] - SH[0], SH[2] - SH[1], SH[3] - SH[2], 0];

        let mut cells = Vec::with_capacity(OFFSETS[ROUNDS]);
        for round in 0..ROUNDS {
            let depth = ROUND_DEPTH[round];
            for i in 0..MATCH_COUNTS[round] {
                cells.push(MatchCell {
                    center_row: first_center[depth] + i as u16 * spacing[depth],
                    col: round_cols[round],
                    cell_width,
                    round,
                    match_idx: i,
                });
            }
        }

        Self { cells, round_cols, total_width, cell_width }
    }

    pub fn cells_for_round(&self, round: usize) -> &[MatchCell] {
        &self.cells[OFFSETS[round]..OFFSETS[round + 1]]
    }

    /// Scroll offset that keeps the selected cell on screen when the
    /// viewport is shorter than the grid.
    pub fn scroll_for(&self, round: usize, match_idx: usize, viewport_height: u16) -> u16 {
        if viewport_height >= CUP_HEIGHT || round >= ROUNDS {
            return 0;
        }
        let Some(cell) = self.cells_for_round(round).get(match_idx) else {
            return 0;
        };
        let max_scroll = CUP_HEIGHT - viewport_height;
        cell.center_row.saturating_sub(viewport_height / 2).min(max_scroll)
    }
}

// ---------------------------------------------------------------------------
// CupBracketView widget
// ---------------------------------------------------------------------------

/// Renders the full cup, Round 1 through the Final, with connectors.
pub struct CupBracketView<'a> {
    pub bracket: &'a Bracket,
    /// Rebuild only on resize.
    pub grid: &'a BracketGrid,
    pub current_week: u8,
    pub selected_round: usize,
    pub selected_match: usize,
    pub scroll_offset: u16,
}

impl Widget for CupBracketView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < GAME_HEIGHT {
            return;
        }

        for cell in &self.grid.cells {
            let matchup = self
                .bracket
                .rounds
                .get(cell.round)
                .and_then(|r| r.matchups.get(cell.match_idx));
            let selected = cell.round == self.selected_round && cell.match_idx == self.selected_match;
            draw_match_cell(matchup, cell, selected, self.current_week, area, self.scroll_offset, buf);
        }

        let style = resolve(CupColor::Dim);
        let limit_x = area.x + area.width;

        // Round 1 feeds Round 2 straight across.
        let conn_x = area.x + self.grid.round_cols[0] + self.grid.cell_width;
        for cell in self.grid.cells_for_round(0) {
            let Some(sy) = screen_y(cell.center_row, self.scroll_offset, area) else {
                continue;
            };
            for x in conn_x..(conn_x + CONNECTOR_WIDTH).min(limit_x) {
                put_char(buf, x, sy, '─', style);
            }
        }

        // Later rounds merge pairs.
        for round in 1..ROUNDS - 1 {
            let children = self.grid.cells_for_round(round);
            let parents = self.grid.cells_for_round(round + 1);
            let conn_x = area.x + self.grid.round_cols[round] + self.grid.cell_width;
            for (j, parent) in parents.iter().enumerate() {
                draw_connector(
                    children[2 * j].center_row,
                    parent.center_row,
                    children[2 * j + 1].center_row,
                    conn_x,
                    area,
                    self.scroll_offset,
                    buf,
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Drawing helpers
// ---------------------------------------------------------------------------

/// Bracket row → absolute screen y, or `None` when scrolled off.
fn screen_y(bracket_row: u16, scroll: u16, area: Rect) -> Option<u16> {
    if bracket_row < scroll {
        return None;
    }
    let rel = bracket_row - scroll;
    if rel >= area.height {
        return None;
    }
    Some(area.y + rel)
}

fn draw_match_cell(
    matchup: Option<&Matchup>,
    cell: &MatchCell,
    selected: bool,
    current_week: u8,
    area: Rect,
    scroll: u16,
    buf: &mut Buffer,
) {
    let x = area.x + cell.col;
    if x >= area.x + area.width {
        return;
    }
    let avail_w = (area.x + area.width).saturating_sub(x) as usize;
    let width = cell.cell_width as usize;

    let base_style = if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let rows = [
        cell.center_row.saturating_sub(1),
        cell.center_row,
        cell.center_row.saturating_add(1),
    ];

    for (slot_idx, bracket_row) in rows.into_iter().enumerate() {
        let Some(sy) = screen_y(bracket_row, scroll, area) else {
            continue;
        };

        let (content, style) = match (matchup, slot_idx) {
            (None, _) => (" ".repeat(width), base_style),
            (Some(m), 1) => {
                let style = if is_live(m, current_week) {
                    resolve(CupColor::Primary)
                } else {
                    resolve(CupColor::Dim)
                };
                (format_status_line(m, current_week, width), style)
            }
            (Some(m), _) => {
                let side = if slot_idx == 0 { 0 } else { 1 };
                let (seed, score) = if side == 0 {
                    (m.team1.as_ref(), m.team1_score)
                } else {
                    (m.team2.as_ref(), m.team2_score)
                };
                let style = match seed {
                    Some(s) if m.is_winner(s) => resolve(CupColor::Winner),
                    Some(s) if s.participant.placeholder => resolve(CupColor::Dim),
                    Some(_) => base_style,
                    None => resolve(CupColor::Dim),
                };
                (format_team_line(seed, m.inputs[side], score, width), style)
            }
        };

        let text: String = content.chars().take(avail_w).collect();
        buf.set_string(x, sy, &text, style);
    }
}

/// Both entrants known and the first leg reached, but not yet decided.
fn is_live(m: &Matchup, current_week: u8) -> bool {
    !m.winner.is_decided()
        && m.team1.is_some()
        && m.team2.is_some()
        && current_week >= m.legs[0]
}

/// `"[slot] [name       ] [score] "`, exactly `width` columns when
/// `width >= 10`.
pub fn format_team_line(seed: Option<&Seed>, source: Entry, score: Option<f64>, width: usize) -> String {
    let slot = match seed {
        Some(s) => format!("{:2}", s.slot),
        None => "  ".to_string(),
    };
    let name = match seed {
        Some(s) => s.participant.name.clone(),
        None => source.to_string(),
    };
    let score_str = match score {
        Some(points) => format!("{points:5.1}"),
        None => "     ".to_string(),
    };
    // 2 (slot) + 1 + name + 1 + 5 (score) + 1
    let name_w = width.saturating_sub(10);
    let name_trunc: String = name.chars().take(name_w).collect();
    format!("{slot} {name_trunc:<name_w$} {score_str} ")
}

/// Legs and state, e.g. `" Wk 5/6 live"`, padded or clipped to `width`.
pub fn format_status_line(m: &Matchup, current_week: u8, width: usize) -> String {
    let legs = format!(" Wk {}/{}", m.legs[0], m.legs[1]);
    let raw = if m.winner.is_decided() {
        format!("{legs} final")
    } else if is_live(m, current_week) {
        format!("{legs} live")
    } else {
        legs
    };
    let clipped: String = raw.chars().take(width).collect();
    format!("{clipped:<width$}")
}

/// Box-drawing connector between one parent and its two children.
///
/// ```text
///  child_top  ──┐
///               │
///  parent     ──├──
///               │
///  child_bot  ──┘
/// ```
fn draw_connector(
    r_top: u16,
    r_mid: u16,
    r_bot: u16,
    conn_base_x: u16,
    area: Rect,
    scroll: u16,
    buf: &mut Buffer,
) {
    let style = resolve(CupColor::Dim);
    let col_a = conn_base_x;
    let col_b = conn_base_x + 1;
    let col_c = conn_base_x + 2;
    let limit_x = area.x + area.width;

    let mut put = |x: u16, row: u16, ch: char| {
        if x < limit_x
            && let Some(sy) = screen_y(row, scroll, area)
        {
            put_char(buf, x, sy, ch, style);
        }
    };

    put(col_a, r_top, '─');
    put(col_b, r_top, '┐');
    for row in (r_top + 1)..r_mid {
        put(col_b, row, '│');
    }
    put(col_a, r_mid, '─');
    put(col_b, r_mid, '├');
    put(col_c, r_mid, '─');
    for row in (r_mid + 1)..r_bot {
        put(col_b, row, '│');
    }
    put(col_a, r_bot, '─');
    put(col_b, r_bot, '┘');
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
