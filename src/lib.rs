// Re-export modules
pub mod assemble;
pub mod cache;
pub mod config;
pub mod connect;
pub mod extract;
pub mod fetch;
pub mod pipelines;
pub mod utils;

// Re-export commonly used types for convenience
pub use cache::PageCache;
pub use config::{
    AssembleConfig, ColorMode, FetchConfig, ImagePipelineConfig, OutputFormat, PipelineConfig,
    RawPipelineConfig,
};
pub use connect::{ConnectFailure, Connector};
pub use fetch::FetchOptions;

use std::error::Error;
use std::path::Path;

/// Entry point that runs a configured pipeline over its page list
pub struct Harvest {
    config: PipelineConfig,
}

impl Harvest {
    /// Create a harvest run from a pipeline configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Load the configuration from a JSON file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        Ok(Self::new(PipelineConfig::from_file(path)?))
    }

    /// Short name of the configured pipeline
    pub fn pipeline_name(&self) -> &'static str {
        match &self.config {
            PipelineConfig::Raw(_) => "raw",
            PipelineConfig::Image(_) => "image",
        }
    }

    /// Run the selected pipeline to completion
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        match self.config {
            PipelineConfig::Raw(config) => pipelines::raw::RawPipeline::new(config).run().await,
            PipelineConfig::Image(config) => {
                pipelines::image::ImagePipeline::new(config).run().await
            }
        }
    }
}
