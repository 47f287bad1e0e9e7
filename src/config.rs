//! Identity of the installed application and the per-user base directories it is installed under

use crate::common::{APP_NAME, APP_PUBLISHER, UNINSTALLER_NAME};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to determine the {0} directory")]
    MissingDirectory(&'static str),
}

/// The fixed identity of the application being installed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIdentity {
    pub name: String,
    pub publisher: String,
    /// File name of the main executable inside the install directory
    pub exe_name: String,
    /// File name of the uninstaller inside the install directory
    pub uninstaller_name: String,
}

impl Default for AppIdentity {
    fn default() -> Self {
        Self {
            name: APP_NAME.to_owned(),
            publisher: APP_PUBLISHER.to_owned(),
            exe_name: format!("{}.exe", APP_NAME),
            uninstaller_name: UNINSTALLER_NAME.to_owned(),
        }
    }
}

/// Per-user directories everything else is computed from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseDirs {
    pub desktop: PathBuf,
    /// Roaming application data (`%APPDATA%`)
    pub roaming: PathBuf,
    /// Local application data (`%LOCALAPPDATA%`)
    pub local: PathBuf,
    pub temp: PathBuf,
}

impl BaseDirs {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            desktop: dirs::desktop_dir().ok_or(ConfigError::MissingDirectory("desktop"))?,
            roaming: dirs::data_dir().ok_or(ConfigError::MissingDirectory("application data"))?,
            local: dirs::data_local_dir()
                .ok_or(ConfigError::MissingDirectory("local application data"))?,
            temp: std::env::temp_dir(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallerConfig {
    pub identity: AppIdentity,
    pub base: BaseDirs,
}

impl InstallerConfig {
    pub fn new(identity: AppIdentity, base: BaseDirs) -> Self {
        Self { identity, base }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(AppIdentity::default(), BaseDirs::from_env()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_identity() {
        let identity = AppIdentity::default();
        assert_eq!(identity.name, "TinyWiiBackupManager");
        assert_eq!(identity.exe_name, "TinyWiiBackupManager.exe");
        assert_eq!(identity.uninstaller_name, "uninstall.exe");
        assert_eq!(identity.publisher, "Manuel Quarneti");
    }
}
