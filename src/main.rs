use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

mod models;
mod repositories;
pub mod services;
pub mod settings;

use repositories::storage::{FileStore, MemoryStore};
use services::renderer::{SharedRenderer, TerminalRenderer};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,
    #[arg(long, default_value = "log4rs.yaml")]
    log4rs: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    init_logging(&args.log4rs)?;
    let settings = settings::Settings::new(&args.config).context("Could not load config file.")?;
    log::info!("Starting selfcare portal.");

    let local_store = FileStore::open(settings.storage.data_path())?;
    log::info!("Persistent storage at {}.", local_store.path().display());

    let renderer: SharedRenderer = Arc::new(TerminalRenderer::new());
    let channels = services::start_services(
        settings,
        Arc::new(local_store),
        Arc::new(MemoryStore::new()),
        renderer,
    )
    .await?;

    services::console::run_console(channels).await
}

fn init_logging(path: &str) -> Result<(), anyhow::Error> {
    if !Path::new("logs").exists() {
        fs::create_dir("logs")?;
    }

    if !Path::new(path).exists() {
        let stderr = ConsoleAppender::builder()
            .target(Target::Stderr)
            .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {l} {t} - {m}{n}")))
            .build();
        let config = Config::builder()
            .appender(Appender::builder().build("stderr", Box::new(stderr)))
            .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;

        log4rs::init_config(config)?;
        log::warn!("{} not found, logging warnings to stderr.", path);
        return Ok(());
    }

    match log4rs::init_file(path, Default::default()) {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("[ERROR] Failed to initialize logging: {}", e);
            Err(anyhow::anyhow!("Could not initialize logging: {}", e))
        }
    }
}
