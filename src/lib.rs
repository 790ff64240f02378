//! treenav: a terminal navigator for tabbed, searchable, sortable
//! navigation trees loaded from a JSON document.
//!
//! The [`nav`] module holds the tree state and the [`nav::Controller`] that
//! every user action goes through; [`ui`] is the terminal front end on top.

pub mod app;
pub mod config;
pub mod content;
pub mod document;
pub mod keybindings;
pub mod nav;
pub mod theme;
pub mod ui;
pub mod util;
