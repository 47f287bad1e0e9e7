//! Computes every location the installer touches from an [InstallerConfig]

use crate::config::InstallerConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};

const START_MENU_PROGRAMS: &str = r"Microsoft\Windows\Start Menu\Programs";

const UNINSTALL_SUBTREE: &str = r"Software\Microsoft\Windows\CurrentVersion\Uninstall";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallPaths {
    pub desktop_shortcut: PathBuf,
    pub start_menu_dir: PathBuf,
    pub start_menu_shortcut: PathBuf,
    pub install_dir: PathBuf,
    pub executable: PathBuf,
    pub uninstaller: PathBuf,
    pub data_dir: PathBuf,
    pub temp_dir: PathBuf,
    /// Registry key relative to `HKEY_CURRENT_USER`
    pub registry_key: String,
}

impl InstallPaths {
    pub fn resolve(config: &InstallerConfig) -> Self {
        let identity = &config.identity;
        let base = &config.base;
        let shortcut_name = format!("{}.lnk", identity.name);
        let start_menu_dir = start_menu_programs(&base.roaming).join(&identity.name);
        let install_dir = base.local.join(&identity.name);
        Self {
            desktop_shortcut: base.desktop.join(&shortcut_name),
            start_menu_shortcut: start_menu_dir.join(&shortcut_name),
            start_menu_dir,
            executable: install_dir.join(&identity.exe_name),
            uninstaller: install_dir.join(&identity.uninstaller_name),
            install_dir,
            data_dir: base.roaming.join(&identity.name),
            temp_dir: base.temp.clone(),
            registry_key: format!(r"{}\{}", UNINSTALL_SUBTREE, identity.name),
        }
    }

    /// A directory outside the install directory to move the working directory to
    pub fn safe_working_dir(&self) -> &Path {
        if self.temp_dir.starts_with(&self.install_dir) {
            self.install_dir.parent().unwrap_or(Path::new("/"))
        } else {
            &self.temp_dir
        }
    }
}

fn start_menu_programs(roaming: &Path) -> PathBuf {
    START_MENU_PROGRAMS.split('\\').fold(roaming.to_path_buf(), |p, c| p.join(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppIdentity, BaseDirs};

    fn config(temp: &str) -> InstallerConfig {
        InstallerConfig::new(
            AppIdentity::default(),
            BaseDirs {
                desktop: PathBuf::from("home").join("Desktop"),
                roaming: PathBuf::from("home").join("Roaming"),
                local: PathBuf::from("home").join("Local"),
                temp: PathBuf::from(temp),
            },
        )
    }

    #[test]
    fn resolves_layout() {
        let paths = InstallPaths::resolve(&config("tmp"));
        let install = Path::new("home").join("Local").join("TinyWiiBackupManager");
        assert_eq!(paths.install_dir, install);
        assert_eq!(paths.executable, install.join("TinyWiiBackupManager.exe"));
        assert_eq!(paths.uninstaller, install.join("uninstall.exe"));
        assert_eq!(
            paths.desktop_shortcut,
            Path::new("home").join("Desktop").join("TinyWiiBackupManager.lnk")
        );
        assert_eq!(
            paths.data_dir,
            Path::new("home").join("Roaming").join("TinyWiiBackupManager")
        );
        let start_menu = Path::new("home")
            .join("Roaming")
            .join("Microsoft")
            .join("Windows")
            .join("Start Menu")
            .join("Programs")
            .join("TinyWiiBackupManager");
        assert_eq!(paths.start_menu_dir, start_menu);
        assert_eq!(
            paths.start_menu_shortcut,
            start_menu.join("TinyWiiBackupManager.lnk")
        );
        assert_eq!(
            paths.registry_key,
            r"Software\Microsoft\Windows\CurrentVersion\Uninstall\TinyWiiBackupManager"
        );
    }

    #[test]
    fn safe_working_dir_avoids_install_dir() {
        let paths = InstallPaths::resolve(&config("tmp"));
        assert_eq!(paths.safe_working_dir(), Path::new("tmp"));

        let nested = Path::new("home")
            .join("Local")
            .join("TinyWiiBackupManager")
            .join("tmp");
        let paths = InstallPaths::resolve(&config(nested.to_str().unwrap()));
        assert_eq!(paths.safe_working_dir(), Path::new("home").join("Local"));
    }

    #[cfg(windows)]
    #[test]
    fn windows_install_location() {
        let config = InstallerConfig::new(
            AppIdentity::default(),
            BaseDirs {
                desktop: PathBuf::from(r"C:\Users\u\Desktop"),
                roaming: PathBuf::from(r"C:\Users\u\AppData\Roaming"),
                local: PathBuf::from(r"C:\Users\u\AppData\Local"),
                temp: PathBuf::from(r"C:\Users\u\AppData\Local\Temp"),
            },
        );
        let paths = InstallPaths::resolve(&config);
        assert_eq!(
            paths.install_dir.to_str(),
            Some(r"C:\Users\u\AppData\Local\TinyWiiBackupManager")
        );
        assert_eq!(
            paths.start_menu_dir.to_str(),
            Some(r"C:\Users\u\AppData\Roaming\Microsoft\Windows\Start Menu\Programs\TinyWiiBackupManager")
        );
    }
}
