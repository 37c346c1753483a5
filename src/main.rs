use clap::Parser;
use media_harvest::{Harvest, PipelineConfig};

mod args;
use args::{Args, build_config};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    // A config file replaces the individual flags when provided
    let config = match &args.config {
        Some(path) => match PipelineConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config file {}: {}", path, e);
                return;
            }
        },
        None => build_config(&args),
    };

    let harvest = Harvest::new(config);
    ::log::info!(
        "Starting {} pipeline against {}",
        harvest.pipeline_name(),
        args.base_url
    );

    let start_time = std::time::Instant::now();

    if let Err(e) = harvest.run().await {
        ::log::error!("Run failed: {}", e);
    }

    let duration = start_time.elapsed();
    ::log::info!("Total runtime: {:.2} second(s)", duration.as_secs_f64());
}
