use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use booking_cell::HttpSchedulingBackend;
use cli::{Cli, Command};
use shared_config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::from_env();
    if !config.is_configured() {
        bail!("BOOKING_API_BASE_URL must be set");
    }

    info!("Booking console talking to {}", config.api_base_url);
    let backend = Arc::new(HttpSchedulingBackend::new(&config)?);

    match cli.command {
        Command::Doctors => commands::list_doctors(backend.as_ref()).await,
        Command::Roster => commands::list_roster(backend.as_ref()).await,
        Command::Patients { query } => commands::list_patients(backend.as_ref(), query.as_deref()).await,
        Command::Slots { date, doctor_id, branch } => {
            commands::list_slots(backend.as_ref(), date, doctor_id, branch).await
        }
        Command::Book { date, branch, doctor_id, slot_id, purpose } => {
            commands::book_as_client(backend, date, &branch, doctor_id, slot_id, &purpose.join(" ")).await
        }
        Command::BookFor { client_id, date, doctor_id, slot_id, purpose } => {
            commands::book_as_staff(backend, client_id, date, doctor_id, slot_id, &purpose.join(" ")).await
        }
    }
}
