use crate::host::Host;
use crate::paths::InstallPaths;
use serde::Serialize;
use std::path::PathBuf;

/// Which of the installed artifacts are currently present
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallStatus {
    pub installed: bool,
    pub install_dir: PathBuf,
    pub executable: bool,
    pub desktop_shortcut: bool,
    pub start_menu: bool,
    pub registry_key: bool,
    pub data_dir: bool,
}

impl InstallStatus {
    pub fn detect(host: &dyn Host, paths: &InstallPaths) -> Self {
        Self {
            installed: host.exists(&paths.install_dir),
            install_dir: paths.install_dir.clone(),
            executable: host.exists(&paths.executable),
            desktop_shortcut: host.exists(&paths.desktop_shortcut),
            start_menu: host.exists(&paths.start_menu_dir),
            registry_key: host.registry_key_exists(&paths.registry_key),
            data_dir: host.exists(&paths.data_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppIdentity, BaseDirs, InstallerConfig};
    use crate::host::MemoryHost;

    #[test]
    fn installed_follows_install_dir() {
        let config = InstallerConfig::new(
            AppIdentity::default(),
            BaseDirs {
                desktop: PathBuf::from("/d"),
                roaming: PathBuf::from("/r"),
                local: PathBuf::from("/l"),
                temp: PathBuf::from("/t"),
            },
        );
        let paths = InstallPaths::resolve(&config);

        let status = InstallStatus::detect(&MemoryHost::new("/"), &paths);
        assert!(!status.installed);
        assert!(!status.registry_key);

        let host = MemoryHost::new("/").with_dir(&paths.data_dir).with_dir(&paths.install_dir);
        let status = InstallStatus::detect(&host, &paths);
        assert!(status.installed);
        assert!(status.data_dir);
        assert!(!status.executable);
        assert!(!status.desktop_shortcut);
    }
}
