use std::fs::File;
use std::path::PathBuf;

use canopy::core::config;
use canopy::core::tree;
use canopy::tui;
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(name = "canopy", about = "Concept map navigator with chat delivery")]
struct Args {
    /// Concept map JSON file (overrides config file and default)
    #[arg(short, long)]
    map: Option<PathBuf>,
}

/// Print to stderr and exit non-zero. Only used before the terminal is initialized.
fn fail(message: String) -> ! {
    log::error!("{}", message);
    eprintln!("canopy: {message}");
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to canopy.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("canopy.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| fail(e.to_string()));
    let resolved = config::resolve(&file_config, args.map.as_deref());
    log::info!("Canopy starting up with {:?}", resolved);

    let tree = tree::load_file(&resolved.map_path).unwrap_or_else(|e| {
        fail(format!(
            "cannot load {}: {e}",
            resolved.map_path.display()
        ))
    });

    tui::run(tree, resolved)
}
