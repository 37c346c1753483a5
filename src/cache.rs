use std::collections::HashMap;
use std::future::Future;

/// Per-run memo of the artifacts already fetched for each page URL.
///
/// Owned by a pipeline for the duration of one run and touched only
/// between pool invocations, so it needs no locking. There is no eviction;
/// entries live until the process exits.
#[derive(Debug, Default)]
pub struct PageCache<T> {
    entries: HashMap<String, Vec<T>>,
}

impl<T: Clone> PageCache<T> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Return the cached artifacts for a page, fetching on first use.
    ///
    /// The first call for a given page URL runs `fetch` and stores its
    /// result (even an empty one); later calls return the stored list
    /// without re-fetching.
    pub async fn get_or_fetch<F, Fut>(&mut self, page_url: &str, fetch: F) -> Vec<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Vec<T>>,
    {
        if let Some(existing) = self.entries.get(page_url) {
            ::log::debug!("cache hit for {}", page_url);
            return existing.clone();
        }

        let fetched = fetch().await;
        self.entries
            .insert(page_url.to_string(), fetched.clone());
        fetched
    }

    /// Whether a page already has a cache entry
    pub fn contains(&self, page_url: &str) -> bool {
        self.entries.contains_key(page_url)
    }

    /// Number of cached pages
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_fetches_once_per_page() {
        let calls = AtomicUsize::new(0);
        let mut cache = PageCache::new();

        for _ in 0..3 {
            let result = cache
                .get_or_fetch("https://example.wiki/w/Villager", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    vec![1, 2, 3]
                })
                .await;
            assert_eq!(result, vec![1, 2, 3]);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_caches_empty_results() {
        let calls = AtomicUsize::new(0);
        let mut cache: PageCache<u8> = PageCache::new();

        for _ in 0..2 {
            let result = cache
                .get_or_fetch("https://example.wiki/w/Empty", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Vec::new()
                })
                .await;
            assert!(result.is_empty());
        }

        // An empty fetch still populates the entry exactly once
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.contains("https://example.wiki/w/Empty"));
    }

    #[tokio::test]
    async fn test_distinct_pages_fetch_separately() {
        let mut cache = PageCache::new();

        let first = cache.get_or_fetch("page-a", || async { vec!["a"] }).await;
        let second = cache.get_or_fetch("page-b", || async { vec!["b"] }).await;

        assert_eq!(first, vec!["a"]);
        assert_eq!(second, vec!["b"]);
        assert_eq!(cache.len(), 2);
    }
}
