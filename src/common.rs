//! Common constants and helper functions shared by the installer and uninstaller

use anyhow::Context;
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

pub const APP_NAME: &str = "TinyWiiBackupManager";

pub const APP_PUBLISHER: &str = "Manuel Quarneti";

pub const UNINSTALLER_NAME: &str = "uninstall.exe";

const LOG_FILE_NAME: &str = "twbm-installer.log";

pub fn install_logger(debug: bool, to_disk: bool) -> anyhow::Result<()> {
    let filter = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = simplelog::ConfigBuilder::default()
        .set_target_level(LevelFilter::Debug)
        .build();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        filter,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )];
    if to_disk {
        let file = File::create(get_log_path()).context("Unable to create log file")?;
        loggers.push(WriteLogger::new(filter, config, file));
    }
    CombinedLogger::init(loggers)?;
    if debug {
        log::warn!("Debug logging enabled");
    }
    Ok(())
}

/// Path of the log file, kept outside the install directory
pub fn get_log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}
