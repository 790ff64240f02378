//! Theme system for the TUI.
//!
//! Semantic color roles map to ratatui `Style` values. `ThemeVariant`
//! selects between Dark and Light palettes, and `StyleMap` resolves role
//! names (including the per-tier roles `tier_1`..`tier_5`) to styles.

use ratatui::style::{Color, Modifier, Style};
use std::collections::HashMap;

/// Available theme variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeVariant {
    Dark,
    Light,
}

impl ThemeVariant {
    /// Parse a variant name (case-insensitive).
    pub fn from_str_name(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }

    pub fn palette(self) -> ColorPalette {
        match self {
            Self::Dark => ColorPalette::dark(),
            Self::Light => ColorPalette::light(),
        }
    }

    /// Cycle to the next variant: Dark → Light → Dark.
    pub fn next(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "Dark",
            Self::Light => "Light",
        }
    }
}

/// A complete color palette mapping every semantic UI role to a `Style`.
#[derive(Debug, Clone)]
pub struct ColorPalette {
    // -- Tab bar --
    pub tab_normal: Style,
    pub tab_selected: Style,

    // -- Tree --
    /// Label styles by tier; deeper tiers reuse the last entry
    pub tiers: [Style; 5],
    pub cursor: Style,
    pub toggle_glyph: Style,
    pub match_highlight: Style,
    pub title_active: Style,
    pub title_filtering: Style,

    // -- Content panel --
    pub content_heading: Style,
    pub content_meta: Style,
    pub content_error: Style,

    // -- Chrome --
    pub search_active: Style,
    pub search_idle: Style,
    pub status_bar: Style,
    pub status_error: Style,
    pub panel_border: Style,
    pub panel_border_focused: Style,
    pub menu_selected: Style,
}

impl ColorPalette {
    fn dark() -> Self {
        let selected = Style::default().bg(Color::DarkGray).fg(Color::White);
        Self {
            tab_normal: Style::default().fg(Color::Gray),
            tab_selected: selected.add_modifier(Modifier::BOLD),

            tiers: [
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::White),
                Style::default().fg(Color::Gray),
                Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
                Style::default().fg(Color::DarkGray),
            ],
            cursor: selected,
            toggle_glyph: Style::default().fg(Color::Yellow),
            match_highlight: Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            title_active: Style::default().add_modifier(Modifier::UNDERLINED),
            title_filtering: Style::default().add_modifier(Modifier::ITALIC),

            content_heading: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            content_meta: Style::default().fg(Color::DarkGray),
            content_error: Style::default().fg(Color::Red),

            search_active: Style::default().fg(Color::Yellow),
            search_idle: Style::default().fg(Color::DarkGray),
            status_bar: selected,
            status_error: Style::default().bg(Color::Red).fg(Color::White),
            panel_border: Style::default(),
            panel_border_focused: Style::default().fg(Color::Cyan),
            menu_selected: selected.add_modifier(Modifier::BOLD),
        }
    }

    /// Adapted for light terminal backgrounds.
    fn light() -> Self {
        let selected = Style::default().bg(Color::Blue).fg(Color::White);
        Self {
            tab_normal: Style::default().fg(Color::DarkGray),
            tab_selected: selected.add_modifier(Modifier::BOLD),

            tiers: [
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Black),
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
                Style::default().fg(Color::Gray),
            ],
            cursor: selected,
            toggle_glyph: Style::default().fg(Color::Magenta),
            match_highlight: Style::default()
                .fg(Color::Black)
                .bg(Color::LightYellow)
                .add_modifier(Modifier::BOLD),
            title_active: Style::default().add_modifier(Modifier::UNDERLINED),
            title_filtering: Style::default().add_modifier(Modifier::ITALIC),

            content_heading: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            content_meta: Style::default().fg(Color::DarkGray),
            content_error: Style::default().fg(Color::Red),

            search_active: Style::default().fg(Color::Magenta),
            search_idle: Style::default().fg(Color::DarkGray),
            status_bar: Style::default().bg(Color::White).fg(Color::Black),
            status_error: Style::default().bg(Color::Red).fg(Color::White),
            panel_border: Style::default().fg(Color::DarkGray),
            panel_border_focused: Style::default().fg(Color::Blue),
            menu_selected: selected.add_modifier(Modifier::BOLD),
        }
    }

    /// Every role as (name, style), in declaration order.
    fn roles(&self) -> Vec<(&'static str, Style)> {
        vec![
            ("tab_normal", self.tab_normal),
            ("tab_selected", self.tab_selected),
            ("tier_1", self.tiers[0]),
            ("tier_2", self.tiers[1]),
            ("tier_3", self.tiers[2]),
            ("tier_4", self.tiers[3]),
            ("tier_5", self.tiers[4]),
            ("cursor", self.cursor),
            ("toggle_glyph", self.toggle_glyph),
            ("match_highlight", self.match_highlight),
            ("title_active", self.title_active),
            ("title_filtering", self.title_filtering),
            ("content_heading", self.content_heading),
            ("content_meta", self.content_meta),
            ("content_error", self.content_error),
            ("search_active", self.search_active),
            ("search_idle", self.search_idle),
            ("status_bar", self.status_bar),
            ("status_error", self.status_error),
            ("panel_border", self.panel_border),
            ("panel_border_focused", self.panel_border_focused),
            ("menu_selected", self.menu_selected),
        ]
    }
}

/// String-keyed style lookup.
#[derive(Debug, Clone)]
pub struct StyleMap {
    map: HashMap<&'static str, Style>,
}

impl StyleMap {
    pub fn from_palette(p: &ColorPalette) -> Self {
        Self {
            map: p.roles().into_iter().collect(),
        }
    }

    /// Resolve a role name to its `Style`; unknown roles get `Style::default()`.
    pub fn resolve(&self, role: &str) -> Style {
        self.map.get(role).copied().unwrap_or_default()
    }
}
