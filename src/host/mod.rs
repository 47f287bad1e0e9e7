//! The narrow set of operating system capabilities the installer relies on

pub mod fs;
mod memory;

use crate::registry::UninstallRecord;
use crate::shortcut::Shortcut;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use memory::{Entry, MemoryHost, Operation};

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        mod windows;
        pub use self::windows::WindowsHost;
    }
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Registry key HKCU\\{key}: {source}")]
    Registry {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("Unable to create shortcut {}: {message}", .path.display())]
    Shortcut { path: PathBuf, message: String },
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("COM initialisation failed: {0}")]
    Com(String),
    #[error("Working directory {} is inside {}", .cwd.display(), .path.display())]
    WorkingDirectory { cwd: PathBuf, path: PathBuf },
    #[error("Installing is only supported on Windows")]
    Unsupported,
}

impl HostError {
    pub fn io(path: &Path) -> impl FnOnce(io::Error) -> HostError + '_ {
        move |source| HostError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn registry(key: &str) -> impl FnOnce(io::Error) -> HostError + '_ {
        move |source| HostError::Registry {
            key: key.to_owned(),
            source,
        }
    }
}

/// Filesystem, shortcut and registry operations.
///
/// All `*_if_exists` operations succeed when there is nothing to remove.
pub trait Host {
    fn exists(&self, path: &Path) -> bool;

    fn remove_file_if_exists(&mut self, path: &Path) -> Result<(), HostError>;

    /// Recursively and forcefully removes a directory
    fn remove_dir_all_if_exists(&mut self, path: &Path) -> Result<(), HostError>;

    fn create_dir_all(&mut self, path: &Path) -> Result<(), HostError>;

    fn copy_file(&mut self, from: &Path, to: &Path) -> Result<(), HostError>;

    fn write_file(&mut self, path: &Path, data: &[u8]) -> Result<(), HostError>;

    fn create_shortcut(&mut self, path: &Path, shortcut: &Shortcut) -> Result<(), HostError>;

    fn registry_key_exists(&self, key: &str) -> bool;

    fn remove_registry_key_if_exists(&mut self, key: &str) -> Result<(), HostError>;

    /// Creates the key if needed and sets every value of the record
    fn write_registry_key(&mut self, record: &UninstallRecord) -> Result<(), HostError>;

    fn current_dir(&self) -> Result<PathBuf, HostError>;

    fn set_current_dir(&mut self, path: &Path) -> Result<(), HostError>;

    /// Starts a detached process
    fn launch(&mut self, exe: &Path, working_dir: &Path) -> Result<(), HostError>;
}

/// The host backed by the real operating system
#[cfg(windows)]
pub fn platform_host() -> Result<Box<dyn Host>, HostError> {
    Ok(Box::new(WindowsHost::new()?))
}

#[cfg(not(windows))]
pub fn platform_host() -> Result<Box<dyn Host>, HostError> {
    Err(HostError::Unsupported)
}
