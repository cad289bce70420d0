use bingo::{
    bingo::BoardReport,
    celebration::{CelebrationAnimation, Stage},
    cell::{CellState, TimerPhase, TimerState},
    grid::{AssemblyStatus, GridPosition, CELL_COUNT, GRID_SIDE},
    word::WordKind,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;
const HELP: &str =
    "←↑↓→/hjkl move · enter/space mark · x disable · r re-deal · q quit · mouse: left mark, right disable";

fn screen_areas(area: Rect) -> [Rect; 4] {
    Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(GRID_SIDE as u16),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .horizontal_margin(HORIZONTAL_MARGIN)
    .areas(area)
}

/// Where the 5x5 grid is drawn inside the whole screen.
pub fn board_area(screen: Rect) -> Rect {
    screen_areas(screen)[1]
}

/// One rect per grid position, row-major.
pub fn cell_rects(board: Rect) -> [Rect; CELL_COUNT] {
    let fifths = [Constraint::Ratio(1, GRID_SIDE as u32); GRID_SIDE];
    let rows: [Rect; GRID_SIDE] = Layout::vertical(fifths).areas(board);
    let grid: [[Rect; GRID_SIDE]; GRID_SIDE] =
        rows.map(|row| Layout::horizontal(fifths).areas(row));
    std::array::from_fn(|i| grid[i / GRID_SIDE][i % GRID_SIDE])
}

/// Grid position under a screen coordinate, if any.
pub fn hit_test(screen: Rect, x: u16, y: u16) -> Option<GridPosition> {
    cell_rects(board_area(screen))
        .iter()
        .position(|r| x >= r.x && x < r.right() && y >= r.y && y < r.bottom())
        .and_then(GridPosition::new)
}

pub fn stage_for(screen: Rect) -> Stage {
    let mut stage = Stage::new(screen.width, screen.height);
    for (center, rect) in stage
        .cell_centers
        .iter_mut()
        .zip(cell_rects(board_area(screen)))
    {
        *center = (rect.x + rect.width / 2, rect.y + rect.height / 2);
    }
    stage
}

/// Cuts `text` to at most `max` columns, ending in `…` when shortened.
fn ellipsize(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

fn timer_label(timer: &TimerState) -> String {
    let phase = match timer.phase {
        TimerPhase::Ready => "ready",
        TimerPhase::Running => "running",
        TimerPhase::Paused => "paused",
        TimerPhase::Completed => "done",
        TimerPhase::Disabled { .. } => "off",
    };
    format!("{}s · {phase}", timer.remaining)
}

fn cell_style(state: &CellState) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    if state.disabled {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT | Modifier::DIM)
    } else if state.marked {
        bold.fg(Color::Black).bg(Color::Green)
    } else if state.kind == WordKind::Free {
        bold.fg(Color::Cyan)
    } else if matches!(
        state.timer.map(|t| t.phase),
        Some(TimerPhase::Running | TimerPhase::Paused)
    ) {
        bold.fg(Color::Yellow)
    } else {
        Style::default()
    }
}

fn render_cell(
    text: Option<(&str, CellState)>,
    selected: bool,
    rect: Rect,
    buf: &mut Buffer,
) {
    let border_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        })
        .border_style(border_style);
    let inner = block.inner(rect);
    block.render(rect, buf);

    let Some((text, state)) = text else {
        Paragraph::new(Span::styled("·", Style::default().add_modifier(Modifier::DIM)))
            .alignment(Alignment::Center)
            .render(inner, buf);
        return;
    };

    let style = cell_style(&state);
    buf.set_style(inner, style);

    let mut lines = Vec::new();
    let timer_line = state.timer.as_ref().map(timer_label);
    let text_rows = inner.height.saturating_sub(timer_line.is_some() as u16);
    if text_rows <= 1 {
        lines.push(Line::from(Span::styled(
            ellipsize(text, inner.width as usize),
            style,
        )));
    } else {
        lines.push(Line::from(Span::styled(text.to_string(), style)));
    }
    if let Some(label) = timer_line {
        lines.push(Line::from(Span::styled(
            ellipsize(&label, inner.width as usize),
            style.add_modifier(Modifier::ITALIC),
        )));
    }

    let top_pad = inner.height.saturating_sub(lines.len() as u16) / 2;
    let body = Rect {
        y: inner.y + top_pad,
        height: inner.height - top_pad,
        ..inner
    };
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(body, buf);
}

fn status_line(report: &BoardReport, status: AssemblyStatus, app: &App) -> Line<'static> {
    let mut spans = vec![
        Span::raw(format!("lines: {}", report.completed_lines)),
        Span::raw("  "),
        Span::raw(format!("marked: {}/{}", report.counted, report.eligible)),
    ];
    if let Some(tier) = app.last_tier {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            tier.banner(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ));
    }
    if let AssemblyStatus::Insufficient { filled, missing } = status {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("not enough words: {filled} placed, {missing} squares empty"),
            Style::default().fg(Color::Red),
        ));
    }
    Line::from(spans)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [title, board, status, help] = screen_areas(area);

        Paragraph::new(Span::styled(
            "B I N G O",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(title, buf);

        for (index, rect) in cell_rects(board).into_iter().enumerate() {
            let Some(position) = GridPosition::new(index) else {
                continue;
            };
            let cell = self.board.cell(position);
            let content = cell.map(|c| (c.entry().text.as_str(), c.state()));
            render_cell(content, position == self.cursor, rect, buf);
        }

        Paragraph::new(status_line(
            &self.board.report(),
            self.board.status(),
            self,
        ))
        .render(status, buf);

        Paragraph::new(Span::styled(
            ellipsize(HELP, help.width as usize),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(help, buf);

        if self.celebration.is_active() {
            render_celebration_particles(&self.celebration, area, buf);
        }
    }
}

/// Render celebration particles on top of the board
fn render_celebration_particles(celebration: &CelebrationAnimation, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in &celebration.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let x = particle.x as u16;
        let y = particle.y as u16;

        if x < area.width && y < area.height {
            let color = colors[particle.color_index % colors.len()];
            let alpha = 1.0 - (particle.age / particle.max_age);

            let style = if particle.is_text {
                if alpha > 0.4 {
                    Style::default().fg(color).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(color)
                }
            } else if alpha > 0.7 {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else if alpha > 0.3 {
                Style::default().fg(color)
            } else {
                Style::default().fg(color).add_modifier(Modifier::DIM)
            };

            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                cell.set_symbol(&particle.symbol.to_string());
                cell.set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bingo::celebration::{Effect, EffectSink};
    use bingo::config::Config;
    use bingo::schedule::ManualScheduler;
    use bingo::word::WordEntry;
    use std::rc::Rc;

    fn app_with(entries: Vec<WordEntry>) -> App {
        let config = Config {
            shuffle: false,
            ..Config::default()
        };
        App::new(entries, config, Rc::new(ManualScheduler::new())).unwrap()
    }

    fn full_entries() -> Vec<WordEntry> {
        let mut entries: Vec<WordEntry> =
            (0..24).map(|i| WordEntry::field(format!("W{i}"))).collect();
        entries[3] = WordEntry::timer("Hold", 45);
        entries.push(WordEntry::free("FREE"));
        entries
    }

    fn render(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn cell_rects_tile_the_board() {
        let board = Rect::new(2, 1, 100, 25);
        let rects = cell_rects(board);
        assert_eq!(rects[0].x, 2);
        assert_eq!(rects[0].y, 1);
        assert_eq!(rects[24].right(), board.right());
        assert_eq!(rects[24].bottom(), board.bottom());
        assert_eq!(rects[1].y, rects[0].y);
        assert_eq!(rects[5].x, rects[0].x);
        assert!(rects[5].y > rects[0].y);
    }

    #[test]
    fn hit_test_maps_coordinates_to_positions() {
        let screen = Rect::new(0, 0, 104, 30);
        let rects = cell_rects(board_area(screen));
        for (index, rect) in rects.iter().enumerate() {
            assert_eq!(
                hit_test(screen, rect.x, rect.y),
                GridPosition::new(index),
                "top-left of {index}"
            );
        }
        // title row and margins are outside the grid
        assert_eq!(hit_test(screen, 50, 0), None);
        assert_eq!(hit_test(screen, 0, 10), None);
    }

    #[test]
    fn stage_centers_sit_inside_their_cells() {
        let screen = Rect::new(0, 0, 90, 32);
        let stage = stage_for(screen);
        let rects = cell_rects(board_area(screen));
        for (i, (x, y)) in stage.cell_centers.iter().enumerate() {
            assert_eq!(hit_test(screen, *x, *y), GridPosition::new(i));
            assert!(rects[i].x <= *x && *x < rects[i].right());
        }
    }

    #[test]
    fn ellipsize_respects_display_width() {
        assert_eq!(ellipsize("short", 10), "short");
        assert_eq!(ellipsize("overlong words", 6), "overl…");
        assert_eq!(ellipsize("日本語テキスト", 5), "日本…");
    }

    #[test]
    fn renders_words_timer_and_status() {
        let app = app_with(full_entries());
        let content = render(&app, 120, 40);
        assert!(content.contains("B I N G O"));
        assert!(content.contains("W0"));
        assert!(content.contains("FREE"));
        assert!(content.contains("45s"));
        assert!(content.contains("lines: 0"));
        assert!(content.contains("marked: 1/25"));
        assert!(!content.contains("not enough words"));
    }

    #[test]
    fn renders_insufficient_notice() {
        let app = app_with(vec![WordEntry::field("alpha"), WordEntry::field("beta")]);
        let content = render(&app, 120, 40);
        assert!(content.contains("not enough words: 2 placed, 23 squares empty"));
        assert!(content.contains("marked: 0/2"));
    }

    #[test]
    fn renders_last_tier_banner() {
        let mut app = app_with(full_entries());
        app.last_tier = Some(bingo::bingo::Tier::TwoLines);
        let content = render(&app, 120, 40);
        assert!(content.contains("DOUBLE BINGO!"));
    }

    #[test]
    fn renders_particles_and_small_screens_without_panic() {
        let mut app = app_with(full_entries());
        app.resize(60, 20);
        app.celebration.fire(Effect::Firework);
        assert!(app.celebration.is_active());
        render(&app, 60, 20);
        render(&app, 10, 4);
        render(&app, 1, 1);
    }
}
