//! Page content for the main panel.
//!
//! Activating a node loads the page behind its href and shows the page's
//! first heading, or "Page not found" when it has none.

mod cache;
mod heading;

pub use cache::PageCache;
pub use heading::extract_heading;

use crate::document::{read_limited_bytes, FetchError};
use thiserror::Error;
use url::Url;

const MAX_PAGE_SIZE: usize = 5 * 1024 * 1024; // 5MB

/// Shown in the content panel when a page has no heading.
pub const PAGE_NOT_FOUND: &str = "Page not found";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Relative link '{0}' has no document URL to resolve against")]
    NoBase(String),
    #[error("Invalid link '{href}': {source}")]
    InvalidUrl {
        href: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported link scheme '{0}'")]
    UnsupportedScheme(String),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// What the content panel shows for a loaded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    pub heading: Option<String>,
}

impl PageContent {
    pub fn display_heading(&self) -> &str {
        self.heading.as_deref().unwrap_or(PAGE_NOT_FOUND)
    }
}

/// Resolve a node href to an absolute http(s) URL.
///
/// Absolute hrefs are used as they are; relative ones are joined onto
/// `base`, the URL the navigation document came from.
pub fn resolve_href(base: Option<&Url>, href: &str) -> Result<Url, ContentError> {
    let url = match Url::parse(href) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let base = base.ok_or_else(|| ContentError::NoBase(href.to_string()))?;
            base.join(href).map_err(|source| ContentError::InvalidUrl {
                href: href.to_string(),
                source,
            })?
        }
        Err(source) => {
            return Err(ContentError::InvalidUrl {
                href: href.to_string(),
                source,
            })
        }
    };

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ContentError::UnsupportedScheme(other.to_string())),
    }
}

/// Fetch a page and extract its heading.
pub async fn load_page(client: &reqwest::Client, url: &Url) -> Result<PageContent, ContentError> {
    tracing::debug!(url = %url, "Loading page");

    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(FetchError::Network)?;
    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()).into());
    }

    let bytes = read_limited_bytes(response, MAX_PAGE_SIZE).await?;
    let html = String::from_utf8_lossy(&bytes);
    Ok(PageContent {
        heading: extract_heading(&html),
    })
}
