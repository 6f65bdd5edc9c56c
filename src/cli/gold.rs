//! Gold inspection and editing commands

use std::sync::Arc;

use anyhow::{bail, Result};

use lsvedit::backend::DivineBackend;
use lsvedit::config::Config;
use lsvedit::gateway::CommandGateway;
use lsvedit::session::SaveSession;

use super::extract::open_save;

/// Print the gold of the extracted save
pub async fn get_command(config: &Config) -> Result<()> {
    let backend = Arc::new(DivineBackend::new(config));
    let gateway = CommandGateway::new(backend);

    let gold = gateway.get_gold_count().await?;
    println!("Total gold: {}", gold.total_gold);
    for item in &gold.items {
        println!("  {} x{}", item.name, item.amount);
    }

    Ok(())
}

/// Change the gold total and write a new archive
///
/// Extracts the save first, so the edit always runs against fresh data.
pub async fn set_command(config: &Config, save: Option<String>, amount: i32) -> Result<()> {
    let backend = Arc::new(DivineBackend::new(config));
    let mut session = SaveSession::new(backend, config.saves_folder.clone());

    let message = open_save(&mut session, save).await?;
    println!("{}", message);

    if !session.is_loaded() {
        bail!("Gold data could not be loaded from this save");
    }

    println!("Current gold: {}", session.gold.committed().unwrap_or(0));

    session.gold.begin_edit();
    session.gold.set_draft(amount);
    let outcome = session.commit_gold().await?;

    match session.status() {
        Some(line) if line.is_error() => bail!("{}", line.text),
        Some(line) => println!("{}", line.text),
        None => {}
    }

    if outcome.is_saved() {
        println!("Gold is now: {}", session.gold.committed().unwrap_or(amount));
    }

    Ok(())
}
