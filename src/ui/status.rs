use crate::app::{App, LoadState};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.search_mode {
        Cow::Borrowed("Type to filter | ESC clear | ENTER keep results")
    } else {
        match app.load_state {
            LoadState::Loading => Cow::Owned(format!("Loading {}", app.source.describe())),
            LoadState::Failed(_) => Cow::Borrowed("[r]etry [q]uit"),
            LoadState::Ready => Cow::Borrowed(
                "[/]search [Space]toggle [Enter]open [Tab]tab [a/d]sort [m]enu [?]help [q]uit",
            ),
        }
    };

    let style = match app.load_state {
        LoadState::Failed(_) => app.style("status_error"),
        _ => app.style("status_bar"),
    };
    f.render_widget(Paragraph::new(text).style(style), area);
}
