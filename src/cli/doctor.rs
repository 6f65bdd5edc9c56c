//! Toolchain check command

use std::sync::Arc;

use anyhow::{bail, Result};

use lsvedit::backend::DivineBackend;
use lsvedit::config::Config;
use lsvedit::session::SaveSession;

/// Check that the LSLib toolchain is usable
pub async fn check_command(config: &Config) -> Result<()> {
    let backend = Arc::new(DivineBackend::new(config));
    let mut session = SaveSession::new(backend, config.saves_folder.clone());

    session.lslib.check().await;

    if session.lslib.available() != Some(true) {
        let text = session
            .lslib
            .status()
            .map(|line| line.text)
            .unwrap_or_else(|| "LSLib status unknown".to_string());
        bail!("{}", text);
    }

    if let Some(line) = session.lslib.status() {
        println!("{}", line.text);
    }
    println!("Saves folder: {}", config.saves_folder);
    println!("Working area: {}", config.extraction_dir().display());

    Ok(())
}
