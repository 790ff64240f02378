//! The navigation tree state manager.
//!
//! [`TreeBuilder`] realizes raw [`Node`]s into a [`NavTree`]; the
//! [`Controller`] owns that tree together with the expansion store, tab
//! registry and search filter, and mutates them in response to
//! [`Command`]s.

mod builder;
mod controller;
mod error;
mod expansion;
mod node;
mod search;
mod sort;
mod tabs;

pub use builder::{NavTree, NodeKey, RealizedNode, Submenu, TreeBuilder};
pub use controller::{Command, Controller, Effect, NavSession};
pub use error::StructuralError;
pub use expansion::ExpansionStateStore;
pub use node::{derive_href, Node, Tier, TierClass, TitleClass, PAGE_SUFFIX};
pub use search::SearchFilter;
pub use sort::Sorter;
pub use tabs::{TabEntry, TabRegistry};
