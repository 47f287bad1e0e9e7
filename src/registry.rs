//! The per-user uninstall record read by the "Installed apps" settings page

use crate::config::AppIdentity;
use crate::paths::InstallPaths;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegValue {
    String(String),
    Dword(u32),
}

impl Display for RegValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RegValue::String(s) => write!(f, "REG_SZ {}", s),
            RegValue::Dword(d) => write!(f, "REG_DWORD {}", d),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UninstallRecord {
    /// Key relative to `HKEY_CURRENT_USER`
    pub key: String,
    pub values: Vec<(String, RegValue)>,
}

impl UninstallRecord {
    pub fn new(identity: &AppIdentity, version: &str, paths: &InstallPaths) -> Self {
        let install_location = paths.install_dir.display().to_string();
        let icon = paths.executable.display().to_string();
        let values = vec![
            ("DisplayName", RegValue::String(identity.name.clone())),
            ("DisplayVersion", RegValue::String(version.to_owned())),
            ("Publisher", RegValue::String(identity.publisher.clone())),
            ("InstallLocation", RegValue::String(install_location)),
            ("DisplayIcon", RegValue::String(icon)),
            ("UninstallString", RegValue::String(uninstall_command(paths))),
            ("NoModify", RegValue::Dword(1)),
            ("NoRepair", RegValue::Dword(1)),
        ];
        Self {
            key: paths.registry_key.clone(),
            values: values
                .into_iter()
                .map(|(name, value)| (name.to_owned(), value))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&RegValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// Command line the OS runs when the user picks "Uninstall"
pub fn uninstall_command(paths: &InstallPaths) -> String {
    format!("\"{}\" uninstall", paths.uninstaller.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BaseDirs, InstallerConfig};
    use std::path::PathBuf;

    fn record() -> UninstallRecord {
        let config = InstallerConfig::new(
            AppIdentity::default(),
            BaseDirs {
                desktop: PathBuf::from("desktop"),
                roaming: PathBuf::from("roaming"),
                local: PathBuf::from("local"),
                temp: PathBuf::from("temp"),
            },
        );
        let paths = InstallPaths::resolve(&config);
        UninstallRecord::new(&config.identity, "4.0.0", &paths)
    }

    #[test]
    fn field_values() {
        let record = record();
        let install = PathBuf::from("local").join("TinyWiiBackupManager");
        assert_eq!(
            record.get("InstallLocation"),
            Some(&RegValue::String(install.display().to_string()))
        );
        assert_eq!(
            record.get("DisplayIcon"),
            Some(&RegValue::String(
                install.join("TinyWiiBackupManager.exe").display().to_string()
            ))
        );
        assert_eq!(
            record.get("DisplayVersion"),
            Some(&RegValue::String("4.0.0".to_owned()))
        );
        assert_eq!(record.get("NoModify"), Some(&RegValue::Dword(1)));
        assert_eq!(record.get("NoRepair"), Some(&RegValue::Dword(1)));
        assert_eq!(record.values.len(), 8);
    }

    #[test]
    fn uninstall_string_points_into_install_dir() {
        let record = record();
        let Some(RegValue::String(cmd)) = record.get("UninstallString") else {
            panic!("UninstallString missing");
        };
        let install = PathBuf::from("local").join("TinyWiiBackupManager");
        assert!(cmd.contains("uninstall.exe"));
        assert!(cmd.contains(&install.display().to_string()));
        assert!(cmd.ends_with(" uninstall"));
    }
}
