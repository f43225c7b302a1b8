//! tabdash - a terminal "new tab" dashboard for Todoist tasks
//!
//! Features:
//! - Today's tasks for the configured filter, overdue first
//! - Relative due phrases ("today at 14:30", "tomorrow")
//! - Bookmarks and a command bar for closing tasks and editing settings

use anyhow::{Context, Result};
use std::sync::Arc;
use tabdash::settings::{FileSettings, SettingsStore};
use tabdash::shell::Dashboard;
use tabdash::todoist::TodoistClient;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = FileSettings::default_path().context("Failed to resolve the settings path")?;
    tracing::info!("using settings at {:?}", path);

    let settings: Arc<dyn SettingsStore> = Arc::new(FileSettings::open(path));
    let client = TodoistClient::new(settings.clone());

    Dashboard::new(client, settings).run().await?;

    Ok(())
}
