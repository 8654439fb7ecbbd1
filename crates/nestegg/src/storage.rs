//! Data directory layout and YAML loading

use std::fs;
use std::path::{Path, PathBuf};

use nestegg_core::model::RetirementProfileInput;

use crate::error::StorageError;
use crate::settings::Settings;

/// The directory holding settings, the log file and the run log
pub struct DataDirectory {
    root: PathBuf,
}

impl DataDirectory {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// `~/.nestegg`, or `./.nestegg` when there is no home directory
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".nestegg")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn settings_path(&self) -> PathBuf {
        self.root.join("settings.yaml")
    }

    pub fn run_log_path(&self) -> PathBuf {
        self.root.join("runs.csv")
    }

    pub fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)
            .map_err(|e| StorageError::Io(format!("Failed to create data directory: {e}")))
    }

    /// Settings from `settings.yaml`, or defaults when the file is absent
    pub fn load_settings(&self) -> Result<Settings, StorageError> {
        let path = self.settings_path();
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read settings: {e}")))?;
        serde_saphyr::from_str(&content)
            .map_err(|e| StorageError::Parse(format!("Failed to parse settings: {e}")))
    }
}

/// Read one retiree profile from a YAML file
pub fn load_profile(path: &Path) -> Result<RetirementProfileInput, StorageError> {
    let content = fs::read_to_string(path).map_err(|e| {
        StorageError::Io(format!("Failed to read profile {}: {e}", path.display()))
    })?;
    serde_saphyr::from_str(&content).map_err(|e| {
        StorageError::Parse(format!("Failed to parse profile {}: {e}", path.display()))
    })
}
