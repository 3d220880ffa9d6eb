//! Poster gallery screen
//!
//! ```text
//! ┌ Movies · 24 item(s) ────────────────────── gallery ┐
//! ┌Alien─────────┐┌Heat──────────┐┌Ronin─────────┐
//! │ ▣ poster     ││ ▣ poster     ││ ▣ poster     │
//! │ ✓ watched    ││ ███░░░░ 30%  ││          [4] │
//! │ ▶ trailer CC ││              ││              │
//! └──────────────┘└──────────────┘└──────────────┘
//!  ←→ move  g grid  r refresh  q quit
//! ```

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::theme::Theme;
use crate::app::{App, Viewport};
use crate::gallery::{Cell, CellSize};

const HEADER_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 1;

/// Terminal columns / rows per density-independent unit
const DP_PER_COLUMN: u32 = 8;
const DP_PER_ROW: u32 = 16;

/// Character footprint of a cell
pub fn cell_chars(size: CellSize) -> (u16, u16) {
    let width = (size.width_dp / DP_PER_COLUMN).max(4);
    let height = (size.height_dp / DP_PER_ROW).max(3);
    (width as u16, height as u16)
}

/// Cells that fit into a terminal of `width` x `height`
pub fn viewport(width: u16, height: u16, size: CellSize) -> Viewport {
    let (cell_width, cell_height) = cell_chars(size);
    let body_height = height.saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT);
    Viewport {
        columns: (width / cell_width).max(1) as usize,
        rows: (body_height / cell_height).max(1) as usize,
    }
}

/// Text progress bar filling `width` columns
pub fn progress_bar(width: usize, percent: u8) -> (String, String) {
    let filled = (width * percent.min(100) as usize) / 100;
    ("█".repeat(filled), "░".repeat(width - filled))
}

/// Draw the whole screen
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Theme::text()), area);

    let [header, body, footer] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(1),
        Constraint::Length(FOOTER_HEIGHT),
    ])
    .areas(area);

    render_header(frame, header, app);
    render_cells(frame, body, app);
    render_footer(frame, footer);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let heading = match app.adapter.summary() {
        Some(summary) => summary.to_string(),
        None => app.adapter.source().to_string(),
    };

    let mut spans = vec![Span::styled(heading, Theme::title())];
    if let Some(message) = app.loading.message() {
        let style = if app.loading.is_error() {
            Theme::error()
        } else {
            Theme::loading()
        };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(message.to_string(), style));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::cell_border())
        .title_bottom(
            Line::from(Span::styled(
                format!(" {} ", app.adapter.presentation()),
                Theme::dimmed(),
            ))
            .alignment(Alignment::Right),
        );
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_cells(frame: &mut Frame, area: Rect, app: &App) {
    let (cell_width, cell_height) = cell_chars(app.adapter.cell_size());
    let columns = app.viewport().columns;

    for (slot, (position, id, cell)) in app.visible_cells().into_iter().enumerate() {
        let column = (slot % columns) as u16;
        let row = (slot / columns) as u16;
        let rect = Rect {
            x: area.x + column * cell_width,
            y: area.y + row * cell_height,
            width: cell_width,
            height: cell_height,
        }
        .intersection(area);
        if rect.is_empty() {
            continue;
        }

        let selected = position == app.selection.selected;
        render_cell(frame, rect, cell, app.poster(id).is_some(), selected);
    }
}

fn render_cell(frame: &mut Frame, area: Rect, cell: &Cell, has_poster: bool, selected: bool) {
    let border = if selected {
        Theme::cell_selected()
    } else {
        Theme::cell_border()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(Span::styled(cell.title.clone(), border));
    let inner_width = area.width.saturating_sub(2) as usize;

    frame.render_widget(
        Paragraph::new(cell_lines(cell, has_poster, inner_width))
            .style(Theme::cell())
            .block(block),
        area,
    );
}

/// Body lines of a cell: poster placeholder, watch indicator, info strip
pub fn cell_lines(cell: &Cell, has_poster: bool, width: usize) -> Vec<Line<'static>> {
    let indicators = cell.indicators();
    let mut lines = Vec::new();

    lines.push(if has_poster {
        Line::from(Span::styled("▣ poster", Theme::dimmed()))
    } else {
        Line::from(Span::styled("…", Theme::dimmed()))
    });

    if indicators.watched_overlay {
        lines.push(Line::from(Span::styled("✓ watched", Theme::watched())));
    } else if let Some(percent) = indicators.progress {
        let label = format!(" {}%", percent);
        let bar_width = width.saturating_sub(label.len());
        let (filled, empty) = progress_bar(bar_width, percent);
        lines.push(Line::from(vec![
            Span::styled(filled, Theme::progress_bar()),
            Span::styled(empty, Theme::progress_bar_empty()),
            Span::raw(label),
        ]));
    } else if let Some(count) = indicators.unwatched_badge {
        lines.push(
            Line::from(Span::styled(format!(" {} ", count), Theme::badge()))
                .alignment(Alignment::Right),
        );
    } else {
        lines.push(Line::default());
    }

    if indicators.info_strip {
        let mut strip = Vec::new();
        if indicators.trailer {
            strip.push(Span::styled("▶ trailer", Theme::info_strip()));
        }
        if indicators.subtitles {
            if !strip.is_empty() {
                strip.push(Span::raw(" "));
            }
            strip.push(Span::styled("CC", Theme::info_strip()));
        }
        lines.push(Line::from(strip));
    }

    lines
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let keys = [
        ("←→↑↓", "move"),
        ("g", "grid"),
        ("r", "refresh"),
        ("q", "quit"),
    ];
    let mut spans = Vec::new();
    for (key, desc) in keys {
        spans.push(Span::styled(format!(" {}", key), Theme::keybind()));
        spans.push(Span::styled(format!(" {} ", desc), Theme::keybind_desc()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::WatchIndicator;

    fn text(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_cell_chars_follow_size_class() {
        assert_eq!(cell_chars(CellSize::new(130, 200)), (16, 12));
        assert_eq!(cell_chars(CellSize::new(120, 180)), (15, 11));
        assert_eq!(cell_chars(CellSize::new(150, 220)), (18, 13));
    }

    #[test]
    fn test_viewport() {
        let vp = viewport(80, 24, CellSize::new(120, 180));
        assert_eq!(vp, Viewport { columns: 5, rows: 1 });

        let vp = viewport(200, 50, CellSize::new(120, 180));
        assert_eq!(vp, Viewport { columns: 13, rows: 4 });

        let tiny = viewport(3, 2, CellSize::new(120, 180));
        assert_eq!(tiny, Viewport { columns: 1, rows: 1 });
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(10, 30), ("███".into(), "░░░░░░░".into()));
        assert_eq!(progress_bar(4, 100), ("████".into(), String::new()));
        assert_eq!(progress_bar(0, 50), (String::new(), String::new()));
    }

    #[test]
    fn test_indicator_lines() {
        let mut cell = Cell::default();
        cell.show_watch(WatchIndicator::InProgress(30));
        cell.show_trailer();
        cell.show_subtitles();
        assert_eq!(
            text(&cell_lines(&cell, true, 14)),
            vec!["▣ poster", "███░░░░░░░ 30%", "▶ trailer CC"]
        );

        let mut cell = Cell::default();
        cell.show_watch(WatchIndicator::Unwatched { badge: Some(4) });
        assert_eq!(text(&cell_lines(&cell, true, 14)), vec!["▣ poster", " 4 "]);
    }

    #[test]
    fn test_empty_cell_lines() {
        let cell = Cell::default();
        assert_eq!(text(&cell_lines(&cell, false, 12)), vec!["…", ""]);
    }
}
