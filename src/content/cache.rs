use super::PageContent;
use lru::LruCache;
use std::num::NonZeroUsize;

const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(32) {
    Some(n) => n,
    None => unreachable!(),
};

/// Recently loaded pages keyed by absolute URL.
#[derive(Debug)]
pub struct PageCache {
    pages: LruCache<String, PageContent>,
}

impl PageCache {
    /// A cache holding up to `capacity` pages; zero falls back to 32.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(DEFAULT_CAPACITY);
        Self {
            pages: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, url: &str) -> Option<&PageContent> {
        self.pages.get(url)
    }

    pub fn insert(&mut self, url: String, page: PageContent) {
        self.pages.put(url, page);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY.get())
    }
}
