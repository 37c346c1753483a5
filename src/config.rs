use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Shared settings for fetching media references from pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Base URL that relative page and file references resolve against
    pub base_url: String,

    /// CSS selector identifying fragments that carry file references
    #[serde(default = "default_selector")]
    pub selector: String,

    /// Required file extension for extracted references (empty = any)
    #[serde(default)]
    pub extension: String,

    /// Substrings that exclude a resolved file URL from being fetched
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Maximum number of concurrent downloads per page
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// File containing one page URL (or base-relative path) per line
    #[serde(default = "default_list_file")]
    pub list_file: String,

    /// Root directory downloads are saved under
    #[serde(default = "default_save_path")]
    pub save_path: String,
}

impl FetchConfig {
    /// Create a new configuration with default values
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            selector: default_selector(),
            extension: String::new(),
            ignore: Vec::new(),
            max_concurrency: default_max_concurrency(),
            timeout_secs: default_timeout_secs(),
            list_file: default_list_file(),
            save_path: default_save_path(),
        }
    }
}

/// Color space applied to decoded images before thresholding and assembly
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Rgb,
    Grayscale,
}

/// Output container produced by the assemblers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pdf,
    Jpg,
    Png,
}

impl OutputFormat {
    /// Filename extension for this format
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    /// Whether this format is a paginated document rather than a flat image
    pub fn is_document(self) -> bool {
        matches!(self, OutputFormat::Pdf)
    }
}

/// Settings for combining downloaded images into composite outputs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssembleConfig {
    /// Combine artifacts from all pages into one output instead of one per page
    #[serde(default)]
    pub combine: bool,

    /// Destination directory for assembled outputs (save_path if unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Output filename for combined-mode outputs (generated if unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_name: Option<String>,

    /// Output container format
    #[serde(default)]
    pub format: OutputFormat,
}

/// Configuration for the raw-file pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPipelineConfig {
    /// Fetch settings
    pub fetch: FetchConfig,
}

impl RawPipelineConfig {
    /// Create a new configuration with default values
    pub fn new(base_url: &str) -> Self {
        Self {
            fetch: FetchConfig::new(base_url),
        }
    }
}

/// Configuration for the image pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePipelineConfig {
    /// Fetch settings
    pub fetch: FetchConfig,

    /// Minimum height in pixels; shorter images are discarded
    #[serde(default = "default_min_height")]
    pub min_height: u32,

    /// Color space applied to every decoded image
    #[serde(default)]
    pub color_mode: ColorMode,

    /// Local directory of images used to seed assembly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<String>,

    /// Assembly settings
    #[serde(default)]
    pub assemble: AssembleConfig,
}

impl ImagePipelineConfig {
    /// Create a new configuration with default values
    pub fn new(base_url: &str) -> Self {
        Self {
            fetch: FetchConfig::new(base_url),
            min_height: default_min_height(),
            color_mode: ColorMode::default(),
            source_dir: None,
            assemble: AssembleConfig::default(),
        }
    }
}

/// Enum containing all pipeline configuration types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PipelineConfig {
    /// Raw-file pipeline configuration
    Raw(RawPipelineConfig),

    /// Image pipeline configuration
    Image(ImagePipelineConfig),
}

impl PipelineConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// The fetch settings shared by every pipeline type
    pub fn fetch(&self) -> &FetchConfig {
        match self {
            PipelineConfig::Raw(cfg) => &cfg.fetch,
            PipelineConfig::Image(cfg) => &cfg.fetch,
        }
    }
}

/// Default value for selector
fn default_selector() -> String {
    "img".to_string()
}

/// Default value for max_concurrency
fn default_max_concurrency() -> usize {
    4
}

/// Default per-request timeout in seconds
fn default_timeout_secs() -> u64 {
    5
}

/// Default page list filename
fn default_list_file() -> String {
    "urls.txt".to_string()
}

/// Default save path
fn default_save_path() -> String {
    ".".to_string()
}

/// Default minimum image height in pixels
fn default_min_height() -> u32 {
    300
}
