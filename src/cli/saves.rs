//! Save listing commands

use std::sync::Arc;

use anyhow::{bail, Result};

use lsvedit::backend::DivineBackend;
use lsvedit::config::Config;
use lsvedit::session::SaveSession;

/// List the save archives under the configured folder
pub async fn list_command(config: &Config) -> Result<()> {
    let backend = Arc::new(DivineBackend::new(config));
    let mut session = SaveSession::new(backend, config.saves_folder.clone());

    session.catalog.list_saves().await;
    print_catalog(&session)
}

/// Pick a saves folder with the native dialog, then list it
#[cfg(feature = "dialog")]
pub async fn browse_command(
    config: &Config,
    config_path: Option<std::path::PathBuf>,
    save: bool,
) -> Result<()> {
    use lsvedit::backend::NativeFolderPicker;

    let backend = Arc::new(DivineBackend::new(config));
    let mut session = SaveSession::new(backend, config.saves_folder.clone());

    if !session.catalog.browse_folder(&NativeFolderPicker).await {
        println!("No folder selected.");
        return Ok(());
    }

    println!("Folder: {}", session.catalog.folder());
    print_catalog(&session)?;

    if save {
        let mut updated = config.clone();
        updated.saves_folder = session.catalog.folder().to_string();
        let path = config_path.unwrap_or_else(Config::default_path);
        updated.save_to_file(&path)?;
        println!("Saved folder to {}", path.display());
    }

    Ok(())
}

/// Print the catalog's status line and entries
fn print_catalog(session: &SaveSession) -> Result<()> {
    if let Some(line) = session.catalog.status() {
        if line.is_error() {
            bail!("{}", line.text);
        }
        println!("{}", line.text);
    }

    for (index, save) in session.catalog.entries().iter().enumerate() {
        println!("  {}. {} ({})", index + 1, save.name, save.modified);
        println!("     {}", save.path);
    }

    Ok(())
}
