use crate::app::{App, ContentPanel, PageState};
use crate::theme::StyleMap;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the content panel: the activated node's title, its link, and the
/// page heading once loaded.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border"))
        .title(" Content ");

    let lines = match &app.content {
        Some(panel) => panel_lines(panel, &app.theme),
        None => vec![Line::from(Span::styled(
            "Select a node and press Enter",
            app.style("content_meta"),
        ))],
    };

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

pub(super) fn panel_lines(panel: &ContentPanel, theme: &StyleMap) -> Vec<Line<'static>> {
    let meta = theme.resolve("content_meta");
    let link = panel
        .url
        .as_ref()
        .map(|u| u.to_string())
        .unwrap_or_else(|| panel.href.clone());

    let mut lines = vec![
        Line::from(Span::styled(
            panel.title.clone(),
            theme.resolve("content_heading"),
        )),
        Line::from(Span::styled(link, meta)),
        Line::from(""),
    ];

    lines.push(match &panel.page {
        PageState::Loading => Line::from(Span::styled("Loading...", meta)),
        PageState::Loaded(page) => Line::from(page.display_heading().to_string()),
        PageState::Unfetched(reason) => Line::from(Span::styled(reason.clone(), meta)),
        PageState::Failed(e) => Line::from(Span::styled(
            format!("Failed to load page: {e}"),
            theme.resolve("content_error"),
        )),
    });
    lines
}
