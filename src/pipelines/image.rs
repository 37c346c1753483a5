use crate::assemble;
use crate::cache::PageCache;
use crate::config::{ColorMode, ImagePipelineConfig};
use crate::connect::Connector;
use crate::extract;
use crate::fetch::{self, FetchOptions};
use crate::utils;
use image::DynamicImage;
use reqwest::StatusCode;
use std::error::Error;
use std::path::Path;
use std::time::Duration;

/// Prefix for generated output filenames
const PIPELINE_NAME: &str = "ImagePipeline";

/// Pipeline that decodes downloaded images and assembles them into
/// composite outputs (vertical strips or multi-page PDFs)
pub struct ImagePipeline {
    config: ImagePipelineConfig,
    connector: Connector,
    cache: PageCache<DynamicImage>,
}

impl ImagePipeline {
    /// Create a pipeline from its configuration
    pub fn new(config: ImagePipelineConfig) -> Self {
        let connector = Connector::new(Duration::from_secs(config.fetch.timeout_secs));
        Self {
            config,
            connector,
            cache: PageCache::new(),
        }
    }

    /// Process every page in the list file and assemble the results.
    ///
    /// In combined mode all images (seed directory first, then every page
    /// in list order) become one output saved at end of run. In per-page
    /// mode the seed images are assembled once on their own, then each
    /// page becomes its own output with a generated name. Either way each
    /// image set is assembled exactly once.
    pub async fn run(&mut self) -> Result<(), Box<dyn Error>> {
        let options = FetchOptions::from_config(&self.config.fetch)?;
        let pages = super::read_page_list(Path::new(&self.config.fetch.list_file))?;
        let seeded = self.load_seed_images();

        if pages.is_empty() && seeded.is_empty() {
            ::log::info!("no pages and no seed images, nothing to assemble");
            return Ok(());
        }

        if self.config.assemble.combine {
            let mut combined = seeded;
            for line in &pages {
                let Some(page_url) = extract::resolve(&options.base, line) else {
                    ::log::warn!("skipping unresolvable page reference {:?}", line);
                    continue;
                };
                combined.extend(self.page_images(&page_url, &options).await);
            }
            self.assemble_output(&combined, self.config.assemble.output_name.clone());
        } else {
            if !seeded.is_empty() {
                self.assemble_output(&seeded, self.config.assemble.output_name.clone());
            }
            for line in &pages {
                let Some(page_url) = extract::resolve(&options.base, line) else {
                    ::log::warn!("skipping unresolvable page reference {:?}", line);
                    continue;
                };
                let images = self.page_images(&page_url, &options).await;
                self.assemble_output(&images, None);
            }
        }

        Ok(())
    }

    /// Images kept from one page, fetched through the per-run cache
    async fn page_images(&mut self, page_url: &str, options: &FetchOptions) -> Vec<DynamicImage> {
        let connector = self.connector.clone();
        let options = options.clone();
        let mode = self.config.color_mode;
        let min_height = self.config.min_height;
        let url = page_url.to_string();

        self.cache
            .get_or_fetch(page_url, move || async move {
                fetch::fetch_page(&connector, &url, &options, |connector, file_url| async move {
                    download_image(&connector, &file_url, mode, min_height).await
                })
                .await
            })
            .await
    }

    /// Assemble one image set into a single output file; an empty set is
    /// reported and produces nothing
    fn assemble_output(&self, images: &[DynamicImage], name: Option<String>) {
        let dest = self
            .config
            .assemble
            .destination
            .as_deref()
            .unwrap_or(&self.config.fetch.save_path);
        let dest = Path::new(dest);
        if let Err(error) = std::fs::create_dir_all(dest) {
            ::log::warn!("cannot create {}: {}", dest.display(), error);
            return;
        }

        let format = self.config.assemble.format;
        let file_name = match name {
            Some(name) => utils::with_extension(&name, format.extension()),
            None => utils::generated_filename(PIPELINE_NAME, format.extension()),
        };
        let path = dest.join(file_name);

        let result = if format.is_document() {
            assemble::document::document(images, &path)
        } else {
            assemble::stack::stack_to_file(images, self.config.color_mode, &path)
        };

        if let Err(error) = result {
            ::log::warn!("could not assemble {}: {}", path.display(), error);
        }
    }

    /// Images loaded from the configured seed directory, if any
    fn load_seed_images(&self) -> Vec<DynamicImage> {
        let Some(dir) = &self.config.source_dir else {
            return Vec::new();
        };
        let dir = Path::new(dir);
        if !dir.is_dir() {
            ::log::warn!("seed directory {} does not exist", dir.display());
            return Vec::new();
        }

        match assemble::images_from_dir(dir, self.config.color_mode) {
            Ok(images) => {
                ::log::info!("loaded {} seed image(s) from {}", images.len(), dir.display());
                images
            }
            Err(error) => {
                ::log::warn!("cannot read seed directory {}: {}", dir.display(), error);
                Vec::new()
            }
        }
    }
}

/// Fetch and decode one image.
///
/// `None` drops the artifact: transport failure, bad status, undecodable
/// body, or a height below the minimum.
async fn download_image(
    connector: &Connector,
    file_url: &str,
    mode: ColorMode,
    min_height: u32,
) -> Option<DynamicImage> {
    let response = connector.get(file_url).await?;

    let status = response.status();
    if status != StatusCode::OK {
        ::log::warn!("skipping {}: status {}", file_url, status);
        return None;
    }

    let bytes = match response.bytes().await {
        Ok(bytes) => bytes,
        Err(error) => {
            ::log::warn!("failed to read {}: {}", file_url, error);
            return None;
        }
    };

    let decoded = match image::load_from_memory(&bytes) {
        Ok(decoded) => decoded,
        Err(error) => {
            ::log::warn!("skipping {}: not a decodable image: {}", file_url, error);
            return None;
        }
    };

    let converted = assemble::convert(decoded, mode);
    if converted.height() < min_height {
        ::log::debug!(
            "discarding {}: height {} below minimum {}",
            file_url,
            converted.height(),
            min_height
        );
        return None;
    }

    Some(converted)
}
