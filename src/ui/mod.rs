//! Terminal User Interface module.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling for browse, search and menu modes
//! - `events` - Background task event processing
//! - `helpers` - Effect execution and task spawning
//! - `render` - Layout and view dispatch
//! - `tabs`, `tree`, `content`, `status`, `help`, `menu` - Widgets

mod content;
mod events;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod menu;
mod render;
mod status;
mod tabs;
mod tree;

pub use helpers::spawn_document_load;
pub use loop_runner::{run, Action};
