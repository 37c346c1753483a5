use crate::config::FetchConfig;
use crate::connect::Connector;
use crate::extract;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::error::Error;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use url::Url;

/// Options controlling one page-fetch operation
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Base URL for resolving relative references
    pub base: Url,

    /// CSS selector for fragments carrying file references
    pub selector: String,

    /// Required extension for extracted references (empty = any)
    pub extension: String,

    /// Substrings excluding a resolved URL from being fetched
    pub ignore: Vec<String>,

    /// Bound on concurrent downloads
    pub max_concurrency: usize,
}

impl FetchOptions {
    /// Build options from a fetch configuration
    pub fn from_config(config: &FetchConfig) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            base: Url::parse(&config.base_url)?,
            selector: config.selector.clone(),
            extension: config.extension.clone(),
            ignore: config.ignore.clone(),
            max_concurrency: config.max_concurrency,
        })
    }
}

/// Fetches every matching file reference on a page.
///
/// Connects to the page, selects fragments with the configured CSS
/// selector, extracts and resolves one file reference per fragment, and
/// submits each surviving reference to `download` on its own task, bounded
/// by a semaphore. `download` is the pipeline's strategy for turning one
/// file URL into an artifact; it returns `None` for any reference that
/// should contribute nothing.
///
/// A failed page connection or a non-200 status is terminal for the page
/// and yields an empty list. Each reference is fetched at most once per
/// invocation; one task's failure never aborts its siblings.
pub async fn fetch_page<T, F, Fut>(
    connector: &Connector,
    page_url: &str,
    options: &FetchOptions,
    download: F,
) -> Vec<T>
where
    T: Send + 'static,
    F: Fn(Connector, String) -> Fut,
    Fut: Future<Output = Option<T>> + Send + 'static,
{
    let Some(response) = connector.get(page_url).await else {
        ::log::warn!("skipping {}: unable to connect", page_url);
        return Vec::new();
    };

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        ::log::warn!("skipping {}: status {}", page_url, status);
        return Vec::new();
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(error) => {
            ::log::warn!("failed to read body of {}: {}", page_url, error);
            return Vec::new();
        }
    };
    ::log::info!("connected to {}", page_url);

    let references = select_references(&body, options);
    ::log::debug!("{}: {} file reference(s) to fetch", page_url, references.len());

    let semaphore = Arc::new(Semaphore::new(options.max_concurrency.max(1)));
    let mut handles = Vec::with_capacity(references.len());

    for file_url in references {
        let semaphore = Arc::clone(&semaphore);
        // The future is created here but only polled once its task holds a
        // permit, so the semaphore bounds actual download concurrency
        let future = download(connector.clone(), file_url);
        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok()?;
            future.await
        }));
    }

    let mut artifacts = Vec::new();
    for handle in handles {
        match handle.await {
            Ok(Some(artifact)) => artifacts.push(artifact),
            Ok(None) => {}
            Err(error) => ::log::error!("download task for {} panicked: {}", page_url, error),
        }
    }

    ::log::info!("completed {} download(s) from {}", artifacts.len(), page_url);
    artifacts
}

/// Extracts, resolves, filters, and deduplicates file references from a
/// page body
fn select_references(body: &str, options: &FetchOptions) -> Vec<String> {
    let selector = match Selector::parse(&options.selector) {
        Ok(selector) => selector,
        Err(error) => {
            ::log::error!("invalid selector {:?}: {}", options.selector, error);
            return Vec::new();
        }
    };

    let document = Html::parse_document(body);
    let mut seen = HashSet::new();
    let mut references = Vec::new();

    for element in document.select(&selector) {
        let fragment = element.html();
        let Some(value) = extract::source_url(&fragment, &options.extension) else {
            continue;
        };
        let Some(resolved) = extract::resolve(&options.base, &value) else {
            continue;
        };

        if options
            .ignore
            .iter()
            .any(|needle| !needle.is_empty() && resolved.contains(needle.as_str()))
        {
            ::log::debug!("ignoring {}", resolved);
            continue;
        }

        if seen.insert(resolved.clone()) {
            references.push(resolved);
        }
    }

    references
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(selector: &str, extension: &str, ignore: &[&str]) -> FetchOptions {
        FetchOptions {
            base: Url::parse("https://example.wiki").unwrap(),
            selector: selector.to_string(),
            extension: extension.to_string(),
            ignore: ignore.iter().map(|s| s.to_string()).collect(),
            max_concurrency: 4,
        }
    }

    #[test]
    fn test_select_references_resolves_against_base() {
        let body = r#"<html><body>
            <img src="/images/a.png">
            <img src="https://cdn.example.wiki/b.png">
        </body></html>"#;

        let references = select_references(body, &options("img", "", &[]));
        assert_eq!(
            references,
            vec![
                "https://example.wiki/images/a.png".to_string(),
                "https://cdn.example.wiki/b.png".to_string(),
            ]
        );
    }

    #[test]
    fn test_select_references_applies_ignore_set() {
        let body = r#"<html><body>
            <img src="/images/a.png">
            <img src="/sprites/icon.png">
            <img src="/images/b.png">
        </body></html>"#;

        let references = select_references(body, &options("img", "", &["sprites"]));
        assert_eq!(references.len(), 2);
        assert!(references.iter().all(|url| !url.contains("sprites")));
    }

    #[test]
    fn test_select_references_empty_ignore_entries_are_inert() {
        let body = r#"<html><body><img src="/images/a.png"></body></html>"#;
        let references = select_references(body, &options("img", "", &[""]));
        assert_eq!(references.len(), 1);
    }

    #[test]
    fn test_select_references_deduplicates() {
        let body = r#"<html><body>
            <img src="/images/a.png">
            <img src="/images/a.png">
        </body></html>"#;

        let references = select_references(body, &options("img", "", &[]));
        assert_eq!(references.len(), 1);
    }

    #[test]
    fn test_select_references_attribute_selector_with_extension() {
        let body = r#"<html><body>
            <audio data-title="MP3" src="/w/Foo.mp3"></audio>
            <audio data-title="MP3" src="/w/Bar.ogg"></audio>
        </body></html>"#;

        let references =
            select_references(body, &options(r#"[data-title="MP3"]"#, ".mp3", &[]));
        assert_eq!(references, vec!["https://example.wiki/w/Foo.mp3".to_string()]);
    }

    #[test]
    fn test_select_references_invalid_selector() {
        let body = r#"<html><body><img src="/a.png"></body></html>"#;
        assert!(select_references(body, &options("img[", "", &[])).is_empty());
    }
}
