use crate::paths::InstallPaths;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A `.lnk` shell shortcut
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortcut {
    pub target: PathBuf,
    pub working_dir: PathBuf,
    pub icon: PathBuf,
    pub icon_index: i32,
    pub description: String,
}

impl Shortcut {
    /// Shortcut launching the installed executable, using its embedded icon
    pub fn for_app(name: &str, paths: &InstallPaths) -> Self {
        Self {
            target: paths.executable.clone(),
            working_dir: paths.install_dir.clone(),
            icon: paths.executable.clone(),
            icon_index: 0,
            description: format!("Launch {}", name),
        }
    }
}
