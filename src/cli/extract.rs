//! Extraction commands

use std::sync::Arc;

use anyhow::{bail, Result};

use lsvedit::backend::DivineBackend;
use lsvedit::config::Config;
use lsvedit::gateway::CommandGateway;
use lsvedit::session::SaveSession;

/// Extract a save archive into the working area
///
/// Without an explicit path, the most recent save in the folder is taken.
pub async fn extract_command(config: &Config, save: Option<String>) -> Result<()> {
    let backend = Arc::new(DivineBackend::new(config));
    let mut session = SaveSession::new(backend, config.saves_folder.clone());

    let message = open_save(&mut session, save).await?;
    println!("{}", message);

    if let Some(metadata) = session.extraction.metadata() {
        println!("\nSave info:\n{}", metadata.to_pretty_string());
    }
    if let Some(total) = session.gold.committed() {
        println!("\nGold: {}", total);
    }

    Ok(())
}

/// Show the metadata of the extracted save
pub async fn info_command(config: &Config) -> Result<()> {
    let backend = Arc::new(DivineBackend::new(config));
    let gateway = CommandGateway::new(backend);

    let metadata = gateway.read_save_info().await?;
    println!("{}", metadata.to_pretty_string());

    Ok(())
}

/// Open the named save, or the most recent one from the catalog
pub(crate) async fn open_save(
    session: &mut SaveSession,
    save: Option<String>,
) -> Result<String> {
    if let Some(path) = save {
        return Ok(session.open_save(&path).await?);
    }

    session.catalog.list_saves().await;
    match session.open_selected().await? {
        Some(message) => Ok(message),
        None => {
            let reason = session
                .status()
                .map(|line| line.text)
                .unwrap_or_else(|| "No saves found in folder".to_string());
            bail!("{}", reason);
        }
    }
}
