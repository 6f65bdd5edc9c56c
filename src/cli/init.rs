//! Init command implementation

use std::path::PathBuf;

use anyhow::{bail, Result};

use lsvedit::config::Config;

/// Default configuration template for lsvedit init
///
/// `{saves_folder}` is replaced with the platform default at render time.
pub const DEFAULT_CONFIG: &str = r#"# lsvedit configuration
#
# Available options:
#   saves_folder - Folder scanned for save archives.
#                  %LOCALAPPDATA% and $env:LOCALAPPDATA are expanded at scan time.
#   divine_path  - Explicit path to LSLib's Divine executable.
#                  When unset, the bundled copy and then PATH are searched.
#   work_dir     - Directory holding the extraction working area.
#                  When unset, the user cache directory is used.

saves_folder = "{saves_folder}"

# divine_path = "C:\\Tools\\lslib\\Divine.exe"
# work_dir = "C:\\Temp\\lsvedit"
"#;

fn render_default_config() -> String {
    let folder = Config::default().saves_folder.replace('\\', "\\\\");
    DEFAULT_CONFIG.replace("{saves_folder}", &folder)
}

/// Initialize a new lsvedit configuration file
/// By default creates the config at the user config directory.
/// Use --config to specify a custom path.
pub async fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::default_path);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(&config_path, render_default_config())?;
    println!("Created: {}", config_path.display());

    Ok(())
}
