//! One pass of reminder delivery, meant to be run from cron.

use chrono::Local;
use color_eyre::eyre::Result;
use dotenv::dotenv;
use sorriso_api::{config::ApiConfig, services::reminders::process_due_reminders};
use sorriso_integrations::Integrations;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    let config = ApiConfig::from_env()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let db_pool = sorriso_db::create_pool(&config.database_url).await?;
    let integrations = Integrations::from_config(&config.integrations)?;

    let report = process_due_reminders(
        &db_pool,
        integrations.messages.as_ref(),
        Local::now().naive_local(),
    )
    .await?;

    for reminder in &report.reminders {
        info!("Reminder {} via {}: {}", reminder.id, reminder.method, reminder.status);
    }
    info!("Processed {} reminders", report.processed);

    Ok(())
}
