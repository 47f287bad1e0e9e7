//! Installs and uninstalls TinyWiiBackupManager for the current Windows user

pub mod common;
pub mod config;
pub mod console_window;
pub mod host;
pub mod install;
pub mod paths;
pub mod prompt;
pub mod registry;
pub mod release;
pub mod shortcut;
pub mod status;
pub mod uninstall;
