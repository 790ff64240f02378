use crate::app::App;
use ratatui::{layout::Rect, text::Line, widgets::Tabs, Frame};

/// Render the tab bar: one tab per top-level node.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }
    let Some(session) = app.controller.session() else {
        return;
    };

    let titles: Vec<Line> = session
        .tabs
        .tabs()
        .iter()
        .map(|tab| Line::from(format!(" {} ", tab.label())))
        .collect();
    let selected = session
        .tabs
        .selected_id()
        .and_then(|id| session.tabs.tabs().iter().position(|t| t.id() == id));

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.style("tab_normal"))
        .highlight_style(app.style("tab_selected"))
        .divider("|");
    f.render_widget(tabs, area);
}
