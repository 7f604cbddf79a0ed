use std::fs;
use std::path::Path;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;

mod models;
mod network;
mod repositories;
pub mod services;
pub mod settings;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config.toml")]
    config: String,
    #[arg(long, default_value = "log4rs.yaml")]
    log4rs: String,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    init_logging(&args.log4rs).expect("Failed to initialize logging.");

    let settings = settings::Settings::load(&args.config).expect("Could not load config file.");
    let conn = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.postgres.url)
        .await
        .expect("Could not connect to database.");

    log::info!("Starting Heaven Network services.");
    services::start_services(conn, settings)
        .await
        .expect("Could not start services.");

    Ok(())
}

fn init_logging(path: &str) -> Result<(), anyhow::Error> {
    if !Path::new("logs").exists() {
        fs::create_dir("logs")?;
    }

    match log4rs::init_file(path, Default::default()) {
        Ok(_) => {
            println!("[*] Logging initialized successfully.");
            Ok(())
        }
        Err(e) => {
            println!("[ERROR] Failed to initialize logging: {}", e);
            Err(anyhow::anyhow!("Could not initialize logging: {}", e))
        }
    }
}
