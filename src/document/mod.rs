//! Loading the navigation document.
//!
//! The document is a JSON array of nodes, each with `id`, `label`, an
//! optional `url` and optional `children`. Anything else at the root is a
//! structural error; malformed entries below it are dropped individually.

mod fetcher;
mod parse;

pub use crate::nav::StructuralError;
pub(crate) use fetcher::read_limited_bytes;
pub use fetcher::{fetch_document, FetchError};
pub use parse::{from_value, load_document_file, parse_document, DocumentError, ParsedDocument};

/// Where the navigation document is fetched from unless configured otherwise.
pub const DEFAULT_DOCUMENT_URL: &str =
    "https://raw.githubusercontent.com/MichaelScottBurke/msb-data/main/nav-data-all-modules.min.json";
