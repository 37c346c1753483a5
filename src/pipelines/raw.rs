use crate::config::RawPipelineConfig;
use crate::connect::Connector;
use crate::extract;
use crate::fetch::{self, FetchOptions};
use crate::utils;
use reqwest::StatusCode;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Pipeline that streams matching files straight to disk, one
/// subdirectory per processed page
pub struct RawPipeline {
    config: RawPipelineConfig,
    connector: Connector,
}

impl RawPipeline {
    /// Create a pipeline from its configuration
    pub fn new(config: RawPipelineConfig) -> Self {
        let connector = Connector::new(Duration::from_secs(config.fetch.timeout_secs));
        Self { config, connector }
    }

    /// Process every page in the list file.
    ///
    /// One page's failure never aborts the run; only configuration
    /// problems (bad base URL, unreadable list file) do.
    pub async fn run(&self) -> Result<(), Box<dyn Error>> {
        let options = FetchOptions::from_config(&self.config.fetch)?;
        let pages = super::read_page_list(Path::new(&self.config.fetch.list_file))?;

        for line in pages {
            let Some(page_url) = extract::resolve(&options.base, &line) else {
                ::log::warn!("skipping unresolvable page reference {:?}", line);
                continue;
            };
            self.process_page(&page_url, &options).await;
        }

        Ok(())
    }

    /// Download all matching files from one page into its subdirectory
    async fn process_page(&self, page_url: &str, options: &FetchOptions) {
        let parsed = match Url::parse(page_url) {
            Ok(parsed) => parsed,
            Err(error) => {
                ::log::warn!("skipping {}: {}", page_url, error);
                return;
            }
        };

        let dir = Path::new(&self.config.fetch.save_path).join(utils::page_dir_name(&parsed));
        if let Err(error) = std::fs::create_dir_all(&dir) {
            ::log::warn!(
                "skipping {}: cannot create {}: {}",
                page_url,
                dir.display(),
                error
            );
            return;
        }

        let saved = fetch::fetch_page(&self.connector, page_url, options, |connector, file_url| {
            let dir = dir.clone();
            async move { save_file(&connector, &file_url, &dir).await }
        })
        .await;

        ::log::info!(
            "saved {} file(s) from {} to {}",
            saved.len(),
            page_url,
            dir.display()
        );

        // A page that yielded nothing leaves no directory behind;
        // remove_dir refuses to delete a non-empty one
        if saved.is_empty() {
            let _ = std::fs::remove_dir(&dir);
        }
    }
}

/// Stream one file to disk; any failure drops this artifact only
async fn save_file(connector: &Connector, file_url: &str, dir: &Path) -> Option<PathBuf> {
    let response = connector.get(file_url).await?;

    let status = response.status();
    if status != StatusCode::OK {
        ::log::warn!("skipping {}: status {}", file_url, status);
        return None;
    }

    let Some(name) = utils::file_name_from_url(file_url) else {
        ::log::warn!("skipping {}: no usable filename", file_url);
        return None;
    };
    let path = dir.join(name);

    match write_stream(response, &path).await {
        Ok(()) => {
            ::log::info!("saved {}", path.display());
            Some(path)
        }
        Err(error) => {
            ::log::warn!("failed to save {}: {}", file_url, error);
            // Drop the partially written file
            let _ = tokio::fs::remove_file(&path).await;
            None
        }
    }
}

/// Write the response body to `path` chunk by chunk
async fn write_stream(
    mut response: reqwest::Response,
    path: &Path,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut file = tokio::fs::File::create(path).await?;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}
