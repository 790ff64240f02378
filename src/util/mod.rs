//! Text helpers shared by the document parser, search filter and renderer.
//!
//! ```
//! use treenav::util::{find_case_insensitive, truncate_to_width};
//!
//! assert_eq!(find_case_insensitive("Apple pie", "APP"), vec![0..3]);
//! assert_eq!(truncate_to_width("Navigation", 7), "Navi...");
//! ```

mod text;

pub use text::{display_width, find_case_insensitive, strip_control_chars, truncate_to_width};

/// Maximum accepted search query length.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
