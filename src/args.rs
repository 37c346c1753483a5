use clap::{Parser, ValueEnum};
use media_harvest::config::{
    AssembleConfig, ColorMode, FetchConfig, ImagePipelineConfig, OutputFormat, PipelineConfig,
    RawPipelineConfig,
};

#[derive(Parser, Debug)]
#[command(name = "media-harvest")]
#[command(about = "Downloads media files referenced by web pages, with optional image assembly")]
#[command(version)]
pub struct Args {
    /// Base URL that relative page and file references resolve against
    pub base_url: String,

    /// Pipeline to run
    #[arg(short, long, value_enum, default_value_t = PipelineArg::Raw)]
    pub pipeline: PipelineArg,

    /// File with one page URL (or base-relative path) per line
    #[arg(short, long, default_value = "urls.txt")]
    pub list: String,

    /// Directory downloads are saved under
    #[arg(short, long, default_value = ".")]
    pub save_path: String,

    /// CSS selector for fragments carrying file references
    #[arg(long, default_value = "img")]
    pub selector: String,

    /// Required extension for extracted references (empty accepts any)
    #[arg(long, default_value = "")]
    pub extension: String,

    /// Substring excluding matching file URLs (repeatable)
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Number of concurrent downloads per page
    #[arg(short, long, default_value_t = 4)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 5)]
    pub timeout: u64,

    /// Combine artifacts from all pages into one output (image pipeline)
    #[arg(long)]
    pub combine: bool,

    /// Output filename for combined outputs (image pipeline)
    #[arg(long)]
    pub output: Option<String>,

    /// Destination directory for assembled outputs (image pipeline)
    #[arg(long)]
    pub dest: Option<String>,

    /// Output format for assembled artifacts (image pipeline)
    #[arg(long, value_enum, default_value_t = FormatArg::Pdf)]
    pub format: FormatArg,

    /// Color mode applied to downloaded images (image pipeline)
    #[arg(long, value_enum, default_value_t = ColorArg::Rgb)]
    pub color_mode: ColorArg,

    /// Minimum image height in pixels (image pipeline)
    #[arg(long, default_value_t = 300)]
    pub min_height: u32,

    /// Directory of local images used to seed assembly (image pipeline)
    #[arg(long)]
    pub source_dir: Option<String>,

    /// JSON configuration file; when given, it replaces the other flags
    #[arg(long)]
    pub config: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum PipelineArg {
    Raw,
    Image,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Pdf,
    Jpg,
    Png,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
    Rgb,
    Grayscale,
}

/// Convert command-line arguments into a pipeline configuration
pub fn build_config(args: &Args) -> PipelineConfig {
    let mut fetch = FetchConfig::new(&args.base_url);
    fetch.selector = args.selector.clone();
    fetch.extension = args.extension.clone();
    fetch.ignore = args.ignore.clone();
    fetch.max_concurrency = args.concurrency;
    fetch.timeout_secs = args.timeout;
    fetch.list_file = args.list.clone();
    fetch.save_path = args.save_path.clone();

    match args.pipeline {
        PipelineArg::Raw => PipelineConfig::Raw(RawPipelineConfig { fetch }),
        PipelineArg::Image => PipelineConfig::Image(ImagePipelineConfig {
            fetch,
            min_height: args.min_height,
            color_mode: convert_color_mode(args.color_mode),
            source_dir: args.source_dir.clone(),
            assemble: AssembleConfig {
                combine: args.combine,
                destination: args.dest.clone(),
                output_name: args.output.clone(),
                format: convert_format(args.format),
            },
        }),
    }
}

/// Convert from CLI argument color mode to internal color mode
pub fn convert_color_mode(arg: ColorArg) -> ColorMode {
    match arg {
        ColorArg::Rgb => ColorMode::Rgb,
        ColorArg::Grayscale => ColorMode::Grayscale,
    }
}

/// Convert from CLI argument format to internal output format
pub fn convert_format(arg: FormatArg) -> OutputFormat {
    match arg {
        FormatArg::Pdf => OutputFormat::Pdf,
        FormatArg::Jpg => OutputFormat::Jpg,
        FormatArg::Png => OutputFormat::Png,
    }
}
