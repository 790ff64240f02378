//! Help overlay: the live keybinding table, including config overrides,
//! grouped by mode.

use crate::app::App;
use crate::keybindings::{Action, Context};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
    Frame,
};

use super::render::centered_rect;

const SECTIONS: [(Context, &str); 3] = [
    (Context::Global, "Tree"),
    (Context::Search, "Search"),
    (Context::Menu, "Options menu"),
];

/// One line of the help table.
#[derive(Debug, PartialEq, Eq)]
enum HelpRow {
    Section(&'static str),
    Binding { key: String, description: &'static str },
    Blank,
}

fn help_rows(bindings: &[(Context, String, Action, &'static str)]) -> Vec<HelpRow> {
    let mut rows = Vec::new();
    for (ctx, title) in SECTIONS {
        let mut section = bindings.iter().filter(|(c, ..)| *c == ctx).peekable();
        if section.peek().is_none() {
            continue;
        }
        if !rows.is_empty() {
            rows.push(HelpRow::Blank);
        }
        rows.push(HelpRow::Section(title));
        rows.extend(section.map(|(_, key, _, description)| HelpRow::Binding {
            key: key.clone(),
            description: *description,
        }));
    }
    rows
}

pub fn render(f: &mut Frame, app: &App) {
    let overlay = centered_rect(80, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }
    f.render_widget(Clear, overlay);

    let rows = help_rows(&app.keybindings.all_bindings());
    let visible_height = overlay.height.saturating_sub(3) as usize;
    let max_scroll = rows.len().saturating_sub(visible_height);
    let scroll = app.help_scroll_offset.min(max_scroll);

    let section_style = app.style("content_heading").add_modifier(Modifier::BOLD);
    let table_rows: Vec<Row> = rows
        .into_iter()
        .skip(scroll)
        .take(visible_height)
        .map(|row| match row {
            HelpRow::Section(title) => Row::new(vec![
                Line::from(Span::styled(format!("-- {title} --"), section_style)),
                Line::from(""),
            ]),
            HelpRow::Binding { key, description } => {
                Row::new(vec![format!("  {key}"), description.to_string()])
            }
            HelpRow::Blank => Row::new(vec![String::new(), String::new()]),
        })
        .collect();

    let title = if max_scroll > 0 {
        format!(" Help ({}/{}) ", scroll + 1, max_scroll + 1)
    } else {
        " Help (? to close) ".to_string()
    };

    let table = Table::new(table_rows, [Constraint::Length(16), Constraint::Min(20)])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border_focused"))
                .title(title),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        );
    f.render_widget(table, overlay);

    if scroll < max_scroll {
        let hint = Line::from(Span::styled(
            " j/k to scroll, ? or Esc to close ",
            app.style("content_meta"),
        ));
        let hint_area = Rect {
            x: overlay.x + 1,
            y: overlay.y + overlay.height.saturating_sub(1),
            width: overlay.width.saturating_sub(2),
            height: 1,
        };
        f.render_widget(Paragraph::new(hint), hint_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keybindings::KeybindingRegistry;

    #[test]
    fn test_sections_in_order() {
        let rows = help_rows(&KeybindingRegistry::new().all_bindings());
        let sections: Vec<&str> = rows
            .iter()
            .filter_map(|r| match r {
                HelpRow::Section(t) => Some(*t),
                _ => None,
            })
            .collect();
        assert_eq!(sections, vec!["Tree", "Search", "Options menu"]);
        assert_eq!(rows.first(), Some(&HelpRow::Section("Tree")));
    }

    #[test]
    fn test_empty_sections_skipped() {
        let bindings = vec![(Context::Search, "Esc".to_string(), Action::ExitSearch, "x")];
        assert_eq!(
            help_rows(&bindings),
            vec![
                HelpRow::Section("Search"),
                HelpRow::Binding {
                    key: "Esc".into(),
                    description: "x"
                }
            ]
        );
    }
}
