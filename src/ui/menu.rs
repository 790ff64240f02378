use crate::app::{App, MENU_ITEMS};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Render the options popup over the tree panel.
pub fn render(f: &mut Frame, app: &App) {
    let Some(selected) = app.menu else {
        return;
    };
    let area = f.area();
    let width = 24.min(area.width);
    let height = (MENU_ITEMS.len() as u16 + 2).min(area.height);
    // Top-left of the tree panel, below the tab and search bars
    let popup = Rect::new(area.x + 1, area.y + 4, width, height).intersection(area);
    if popup.width < 4 || popup.height < 3 {
        return;
    }

    let lines: Vec<Line> = MENU_ITEMS
        .iter()
        .enumerate()
        .map(|(i, (label, _))| {
            if i == selected {
                Line::from(Span::styled(format!("> {label}"), app.style("menu_selected")))
            } else {
                Line::from(format!("  {label}"))
            }
        })
        .collect();

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(" Options "),
        ),
        popup,
    );
}
