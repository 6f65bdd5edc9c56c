//! Production backend driving LSLib's Divine executable.
//!
//! Divine does all archive work (unpack, resource conversion, repack); this
//! module owns locating the executable, the extraction working area, and the
//! filesystem plumbing around each command.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::process::Command;
use tracing::{debug, info};

use super::{BackendError, SaveBackend, lsx};
use crate::config::Config;
use crate::domain::{GoldState, SaveEntry, SaveMetadata};

/// Conventional LSLib layouts probed when nothing is configured
const BUNDLED_DIVINE_PATHS: [&str; 2] = [
    "tools/lslib/Packed/Tools/Divine.exe",
    "../tools/lslib/Packed/Tools/Divine.exe",
];

/// Marker file recording which archive the working area came from
const SOURCE_MARKER: &str = ".source_path";

/// The cached level file holding character inventories
const LEVEL_FILE: &str = "LevelCache/WLD_Main_A";

/// `SaveBackend` implementation backed by the Divine CLI
pub struct DivineBackend {
    divine_path: Option<PathBuf>,
    work_dir: PathBuf,
}

impl DivineBackend {
    pub fn new(config: &Config) -> Self {
        Self {
            divine_path: config.divine_path.clone(),
            work_dir: config.extraction_dir(),
        }
    }

    /// The working area saves are unpacked into
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Locate the Divine executable
    ///
    /// Order: config override, `DIVINE_PATH` environment variable, the
    /// conventional bundled layout, then `PATH`.
    fn locate_divine(&self) -> Result<PathBuf, BackendError> {
        if let Some(configured) = &self.divine_path {
            if configured.is_file() {
                return Ok(configured.clone());
            }
            return Err(BackendError::Toolchain(format!(
                "Divine not found at configured path: {}",
                configured.display()
            )));
        }

        if let Ok(from_env) = std::env::var("DIVINE_PATH") {
            let candidate = PathBuf::from(&from_env);
            if candidate.is_file() {
                return Ok(candidate);
            }
            return Err(BackendError::Toolchain(format!(
                "Divine not found at DIVINE_PATH: {}",
                from_env
            )));
        }

        for bundled in BUNDLED_DIVINE_PATHS {
            let candidate = PathBuf::from(bundled);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }

        for name in ["Divine.exe", "divine"] {
            if let Some(found) = find_in_path(name) {
                return Ok(found);
            }
        }

        Err(BackendError::Toolchain(
            "Divine executable not found. Set divine_path in the config or add it to PATH."
                .to_string(),
        ))
    }

    /// Run Divine with the given arguments, failing on a non-zero exit
    async fn run_divine(&self, args: &[&str]) -> Result<(), BackendError> {
        let divine = self.locate_divine()?;
        debug!(divine = %divine.display(), ?args, "running divine");

        let output = Command::new(&divine)
            .args(args)
            .output()
            .await
            .map_err(|e| BackendError::Toolchain(format!("Failed to execute Divine: {}", e)))?;

        if !output.status.success() {
            return Err(BackendError::Toolchain(format!(
                "Divine failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(())
    }

    async fn convert_resource(
        &self,
        src: &Path,
        dst: &Path,
        from: &str,
        to: &str,
    ) -> Result<(), BackendError> {
        let src = src.to_string_lossy();
        let dst = dst.to_string_lossy();
        self.run_divine(&[
            "-g",
            "bg3",
            "-a",
            "convert-resource",
            "-s",
            src.as_ref(),
            "-d",
            dst.as_ref(),
            "-i",
            from,
            "-o",
            to,
        ])
        .await
    }

    /// Convert an `.lsf` resource to editable `.lsx` text, if it exists
    async fn convert_to_lsx_if_present(&self, stem: &str) -> Result<(), BackendError> {
        let lsf = self.work_dir.join(format!("{}.lsf", stem));
        if !lsf.exists() {
            debug!(resource = stem, "skipping conversion, resource missing");
            return Ok(());
        }
        let lsx = self.work_dir.join(format!("{}.lsx", stem));
        self.convert_resource(&lsf, &lsx, "lsf", "lsx").await
    }

    fn level_lsx_path(&self) -> PathBuf {
        self.work_dir.join(format!("{}.lsx", LEVEL_FILE))
    }
}

#[async_trait]
impl SaveBackend for DivineBackend {
    async fn list_saves(&self, folder_path: &str) -> Result<Vec<SaveEntry>, BackendError> {
        let expanded = expand_path_variables(folder_path)?;
        let dir = Path::new(&expanded);

        if !dir.is_dir() {
            return Err(BackendError::InvalidPath(format!(
                "Invalid directory: {}",
                expanded
            )));
        }

        // Each save lives in its own subdirectory holding one .lsv archive
        let mut saves: Vec<(SystemTime, SaveEntry)> = Vec::new();
        for entry in std::fs::read_dir(dir)?.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(lsv_path) = find_save_in_dir(&path) else {
                continue;
            };

            let modified = std::fs::metadata(&lsv_path)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);

            saves.push((
                modified,
                SaveEntry {
                    name: path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("Unknown")
                        .to_string(),
                    path: lsv_path.to_string_lossy().to_string(),
                    modified: format_timestamp(modified),
                },
            ));
        }

        saves.sort_by(|a, b| b.0.cmp(&a.0));
        debug!(folder = %expanded, count = saves.len(), "listed saves");
        Ok(saves.into_iter().map(|(_, entry)| entry).collect())
    }

    async fn read_save_info(&self) -> Result<SaveMetadata, BackendError> {
        let info_path = self.work_dir.join("SaveInfo.json");
        if !info_path.exists() {
            return Err(BackendError::MissingArtifact(
                "SaveInfo.json not found. Extract a save first.".to_string(),
            ));
        }

        let content = std::fs::read_to_string(info_path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        Ok(SaveMetadata::new(value))
    }

    async fn extract_save(&self, save_path: &str) -> Result<String, BackendError> {
        if !Path::new(save_path).exists() {
            return Err(BackendError::InvalidPath(format!(
                "File not found: {}",
                save_path
            )));
        }

        // Fresh working area for every extraction
        if self.work_dir.exists() {
            std::fs::remove_dir_all(&self.work_dir)?;
        }
        std::fs::create_dir_all(&self.work_dir)?;

        let dest = self.work_dir.to_string_lossy().to_string();
        info!(save = save_path, dest = %dest, "extracting save archive");
        self.run_divine(&[
            "-g",
            "bg3",
            "-a",
            "extract-package",
            "-s",
            save_path,
            "-d",
            &dest,
        ])
        .await?;

        self.convert_to_lsx_if_present("Globals").await?;
        self.convert_to_lsx_if_present(LEVEL_FILE).await?;

        // Remember where the archive came from for the repack step
        std::fs::write(self.work_dir.join(SOURCE_MARKER), save_path)?;

        Ok(format!("Save extracted and converted to {}", dest))
    }

    async fn get_gold_count(&self) -> Result<GoldState, BackendError> {
        let lsx_path = self.level_lsx_path();
        if !lsx_path.exists() {
            return Err(BackendError::MissingArtifact(
                "Level data not found (WLD_Main_A.lsx).".to_string(),
            ));
        }

        // The cached level file can run past 100 MB
        let content = tokio::fs::read_to_string(&lsx_path).await?;
        Ok(lsx::scan_gold(&content))
    }

    async fn modify_and_save_gold(&self, new_gold: i32) -> Result<String, BackendError> {
        if new_gold < 0 {
            return Err(BackendError::InvalidValue(
                "Gold amount cannot be negative".to_string(),
            ));
        }

        let source_path = std::fs::read_to_string(self.work_dir.join(SOURCE_MARKER))
            .map_err(|_| {
                BackendError::MissingArtifact(
                    "Original save path not found. Please extract a save first.".to_string(),
                )
            })?
            .trim()
            .to_string();

        let lsx_path = self.level_lsx_path();
        if !lsx_path.exists() {
            return Err(BackendError::MissingArtifact(
                "Level data not found (WLD_Main_A.lsx). Extract a save first.".to_string(),
            ));
        }

        let backup_path = backup_save(&source_path)?;

        let content = tokio::fs::read_to_string(&lsx_path).await?;
        let modified = lsx::rewrite_gold(&content, new_gold)?;
        tokio::fs::write(&lsx_path, modified).await?;

        let lsf_path = self.work_dir.join(format!("{}.lsf", LEVEL_FILE));
        self.convert_resource(&lsx_path, &lsf_path, "lsx", "lsf")
            .await?;

        let output_save = modified_save_path(&source_path);
        let work = self.work_dir.to_string_lossy();
        self.run_divine(&[
            "-g",
            "bg3",
            "-a",
            "create-package",
            "-s",
            work.as_ref(),
            "-d",
            &output_save,
        ])
        .await?;

        info!(new_gold, output = %output_save, "save repacked with modified gold");
        Ok(format!(
            "Save modified successfully!\nBackup: {}\nNew save: {}",
            backup_path, output_save
        ))
    }

    async fn check_lslib_status(&self) -> Result<String, BackendError> {
        let divine = self.locate_divine()?;
        Ok(format!("LSLib tools found at: {}", divine.display()))
    }
}

/// Expand `%LOCALAPPDATA%` / `$env:LOCALAPPDATA` in a folder path
fn expand_path_variables(path: &str) -> Result<String, BackendError> {
    expand_with(path, |key| std::env::var(key).ok())
}

fn expand_with(
    path: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, BackendError> {
    if !path.contains("%LOCALAPPDATA%") && !path.contains("$env:LOCALAPPDATA") {
        return Ok(path.to_string());
    }

    let local_appdata = lookup("LOCALAPPDATA")
        .or_else(|| lookup("UserProfile").map(|p| format!("{}\\AppData\\Local", p)))
        .ok_or_else(|| {
            BackendError::InvalidPath("Could not determine LocalAppData folder".to_string())
        })?;

    Ok(path
        .replace("%LOCALAPPDATA%", &local_appdata)
        .replace("$env:LOCALAPPDATA", &local_appdata))
}

/// First `.lsv` archive directly inside `dir`
fn find_save_in_dir(dir: &Path) -> Option<PathBuf> {
    std::fs::read_dir(dir)
        .ok()?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|s| s.to_str()) == Some("lsv"))
}

fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Copy the archive aside before anything near it gets overwritten
fn backup_save(source_path: &str) -> Result<String, BackendError> {
    if !Path::new(source_path).exists() {
        return Err(BackendError::InvalidPath(format!(
            "File not found: {}",
            source_path
        )));
    }

    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    let backup_path = format!("{}.backup_{}", source_path, stamp);
    std::fs::copy(source_path, &backup_path)?;

    debug!(source = source_path, backup = %backup_path, "created backup");
    Ok(backup_path)
}

/// Output path for the repacked archive, next to its source
fn modified_save_path(source_path: &str) -> String {
    format!("{}_modified.lsv", source_path.trim_end_matches(".lsv"))
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
