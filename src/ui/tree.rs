//! Tree panel: displayed nodes indented by tier, with toggle glyphs and
//! search highlights.

use crate::app::{App, LoadState};
use crate::nav::{RealizedNode, TitleClass};
use crate::theme::StyleMap;
use crate::util::truncate_to_width;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::ops::Range;

const GLYPH_EXPANDED: &str = "v ";
const GLYPH_COLLAPSED: &str = "> ";
const GLYPH_LEAF: &str = "  ";

pub fn render(f: &mut Frame, app: &mut App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let title = match app.controller.session() {
        Some(s) if s.search.is_active() => " Results ".to_string(),
        Some(s) => s
            .tabs
            .selected_id()
            .and_then(|id| s.tree.by_id(id))
            .map(|n| format!(" {} ", n.label()))
            .unwrap_or_else(|| " Navigation ".to_string()),
        None => " Navigation ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(title);

    let placeholder = match &app.load_state {
        LoadState::Loading => Some("Loading navigation...".to_string()),
        LoadState::Failed(e) => Some(format!("Failed to load navigation:\n{e}\n\nPress r to retry")),
        LoadState::Ready => None,
    };
    if let Some(text) = placeholder {
        let style = match app.load_state {
            LoadState::Failed(_) => app.style("content_error"),
            _ => app.style("content_meta"),
        };
        f.render_widget(Paragraph::new(text).style(style).block(block), area);
        return;
    }

    let height = area.height.saturating_sub(2) as usize;
    let width = area.width.saturating_sub(2) as usize;
    let rows = app.rows();
    let cursor = app.cursor_index(&rows);

    // Scroll so the cursor stays in view
    app.tree_viewport_height = height;
    if let Some(c) = cursor {
        if c < app.tree_offset {
            app.tree_offset = c;
        } else if c >= app.tree_offset + height {
            app.tree_offset = c + 1 - height;
        }
    }
    app.tree_offset = app.tree_offset.min(rows.len().saturating_sub(height));

    let Some(tree) = app.controller.tree() else {
        return;
    };
    let lines: Vec<Line> = if rows.is_empty() {
        vec![Line::from(Span::styled("No matches", app.theme.resolve("content_meta")))]
    } else {
        rows.iter()
            .enumerate()
            .skip(app.tree_offset)
            .take(height)
            .map(|(i, &key)| node_line(tree.node(key), width, Some(i) == cursor, &app.theme))
            .collect()
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// One tree row: indent, toggle glyph, then the label split into plain and
/// highlighted spans, cut to `width` columns.
pub(super) fn node_line(
    node: &RealizedNode,
    width: usize,
    is_cursor: bool,
    theme: &StyleMap,
) -> Line<'static> {
    let indent = "  ".repeat(usize::from(node.tier().depth().saturating_sub(1)));
    let glyph = match node.is_collapsed() {
        Some(false) => GLYPH_EXPANDED,
        Some(true) => GLYPH_COLLAPSED,
        None => GLYPH_LEAF,
    };

    let mut base = theme.resolve(node.tier().class().theme_role());
    match node.title_class() {
        Some(TitleClass::Active) => base = base.patch(theme.resolve("title_active")),
        Some(TitleClass::Filtering) => base = base.patch(theme.resolve("title_filtering")),
        None => {}
    }
    if is_cursor {
        base = base.patch(theme.resolve("cursor"));
    }

    let room = width.saturating_sub(indent.len() + glyph.len());
    let label = truncate_to_width(node.label(), room);
    // Highlights past a truncation point are dropped with the cut text
    let kept = if label.len() == node.label().len() {
        label.len()
    } else {
        label.trim_end_matches("...").len()
    };

    let mut spans = vec![
        Span::styled(indent, base),
        Span::styled(glyph, theme.resolve("toggle_glyph").patch(cursor_bg(is_cursor, theme))),
    ];
    spans.extend(highlight_spans(
        &label,
        node.highlights(),
        kept,
        base,
        base.patch(theme.resolve("match_highlight")),
    ));
    Line::from(spans)
}

fn cursor_bg(is_cursor: bool, theme: &StyleMap) -> Style {
    if is_cursor {
        theme.resolve("cursor")
    } else {
        Style::default()
    }
}

/// Split `text` into spans, styling the byte ranges in `ranges` (clipped to
/// `limit`) with `highlight`.
fn highlight_spans(
    text: &str,
    ranges: &[Range<usize>],
    limit: usize,
    base: Style,
    highlight: Style,
) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut pos = 0;
    for range in ranges {
        let start = range.start.min(limit);
        let end = range.end.min(limit);
        if start >= end || start < pos {
            continue;
        }
        if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            continue;
        }
        if start > pos {
            spans.push(Span::styled(text[pos..start].to_string(), base));
        }
        spans.push(Span::styled(text[start..end].to_string(), highlight));
        pos = end;
    }
    if pos < text.len() {
        spans.push(Span::styled(text[pos..].to_string(), base));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::{Command, Controller, Node};
    use crate::theme::ThemeVariant;

    fn theme() -> StyleMap {
        StyleMap::from_palette(&ThemeVariant::Dark.palette())
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn controller() -> Controller {
        let mut c = Controller::default();
        c.initialize(&[Node::new("A", "Alpha").with_children(vec![
            Node::new("A1", "Apple pie").with_children(vec![Node::new("A1a", "Core")]),
            Node::new("A2", "Banana"),
        ])]);
        c
    }

    #[test]
    fn test_glyphs_and_indent() {
        let c = controller();
        let tree = c.tree().unwrap();
        let theme = theme();

        assert_eq!(line_text(&node_line(tree.by_id("A").unwrap(), 40, false, &theme)), "v Alpha");
        assert_eq!(
            line_text(&node_line(tree.by_id("A1").unwrap(), 40, false, &theme)),
            "  > Apple pie"
        );
        assert_eq!(
            line_text(&node_line(tree.by_id("A2").unwrap(), 40, false, &theme)),
            "    Banana"
        );
    }

    #[test]
    fn test_match_is_highlighted() {
        let mut c = controller();
        c.dispatch(Command::Search("pie".into()));
        let theme = theme();
        let line = node_line(c.tree().unwrap().by_id("A1").unwrap(), 40, false, &theme);

        let highlighted: Vec<&str> = line
            .spans
            .iter()
            .filter(|s| s.style == theme.resolve("tier_2").patch(theme.resolve("match_highlight")))
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(highlighted, vec!["pie"]);
    }

    #[test]
    fn test_truncated_label_drops_cut_highlight() {
        let spans = highlight_spans("Apple...", &[6..9], 5, Style::default(), Style::default());
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "Apple...");
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_highlight_spans_split() {
        let hl = Style::default().fg(ratatui::style::Color::Yellow);
        let spans = highlight_spans("Big Ball", &[4..8], 8, Style::default(), hl);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].content, "Big ");
        assert_eq!(spans[1].content, "Ball");
        assert_eq!(spans[1].style, hl);
    }
}
