use harvestrs::account::AccountBook;
use harvestrs::client::HttpClientFactory;
use harvestrs::clock::{Sleeper, TokioSleeper};
use harvestrs::configuration::Settings;
use harvestrs::display::banner;
use harvestrs::payload::FilePayloadSource;
use harvestrs::signal::wait_for_interrupt;
use harvestrs::Scheduler;
use log::{error, info, warn};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Warn) // Default warn
        .filter_module("harvestrs", log::LevelFilter::Info)
        .parse_default_env()
        .init();

    println!("{}", banner());

    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Failed to load configuration: {}. Using defaults.", e);
            Settings::default()
        }
    };

    tokio::select! {
        result = run(settings) => {
            if let Err(e) = result {
                error!("Fatal error: {}", e);
                std::process::exit(1);
            }
        }
        _ = wait_for_interrupt(tokio::signal::ctrl_c()) => {
            info!("Gracefully shutting down...");
            std::process::exit(0);
        }
    }
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    let book = AccountBook::load(&settings).await?;

    let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);
    let factory = HttpClientFactory::from_settings(&settings, sleeper.clone());
    let payloads = FilePayloadSource::new(&settings.harvest_file);
    let scheduler = Scheduler::new(&settings, book, factory, payloads, sleeper);

    match scheduler.run().await {
        Ok(never) => match never {},
        Err(e) => Err(e.into()),
    }
}
