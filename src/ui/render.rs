//! Render functions for the TUI.

use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{content, help, menu, status, tabs, tree};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 50;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render function: tab bar, search bar, tree and content panels,
/// status bar, then any overlay.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);

    tabs::render(f, app, chunks[0]);
    render_search_bar(f, app, chunks[1]);
    tree::render(f, app, body[0]);
    content::render(f, app, body[1]);
    status::render(f, app, chunks[3]);

    if app.menu.is_some() {
        menu::render(f, app);
    }
    if app.show_help {
        help::render(f, app);
    }
}

fn render_search_bar(f: &mut Frame, app: &App, area: Rect) {
    let (border, line) = if app.search_mode {
        (
            app.style("search_active"),
            Line::from(vec![
                Span::raw(app.search_input.as_str()),
                Span::styled("_", app.style("search_active")),
            ]),
        )
    } else if app.search_input.is_empty() {
        (
            app.style("panel_border"),
            Line::from(Span::styled("Press / to search", app.style("search_idle"))),
        )
    } else {
        (app.style("panel_border"), Line::from(app.search_input.as_str()))
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Search ");
    f.render_widget(Paragraph::new(line).block(block), area);
}

/// Create a centered rectangle with the given percentage of the parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let width = area.width * percent_x / 100;
    let height = area.height * percent_y / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
