use crate::config::AppIdentity;
use crate::host::Host;
use crate::paths::InstallPaths;
use crate::registry::UninstallRecord;
use crate::shortcut::Shortcut;
use anyhow::Context;
use std::path::PathBuf;

/// Where the application executable comes from
#[derive(Debug, Clone)]
pub enum AppSource {
    /// A local file, copied as is
    File(PathBuf),
    /// Extracted from a downloaded release archive
    Bytes(Vec<u8>),
}

/// Files placed into a fresh install directory
#[derive(Debug, Clone)]
pub struct Payload {
    pub executable: AppSource,
    pub uninstaller: PathBuf,
}

/// Creates the desktop shortcut, the start menu entry and the uninstall record.
///
/// Each artifact is deleted before being recreated. Nothing is rolled back on failure.
pub fn install(
    host: &mut dyn Host,
    identity: &AppIdentity,
    version: &str,
    paths: &InstallPaths,
) -> anyhow::Result<()> {
    log::info!("Starting install of {} v{}", identity.name, version);

    let shortcut = Shortcut::for_app(&identity.name, paths);
    host.remove_file_if_exists(&paths.desktop_shortcut)
        .context("Removing old desktop shortcut")?;
    host.create_shortcut(&paths.desktop_shortcut, &shortcut)
        .context("Creating desktop shortcut")?;

    host.remove_dir_all_if_exists(&paths.start_menu_dir)
        .context("Removing old start menu folder")?;
    host.create_dir_all(&paths.start_menu_dir)
        .context("Creating start menu folder")?;
    host.copy_file(&paths.desktop_shortcut, &paths.start_menu_shortcut)
        .context("Copying shortcut to start menu")?;

    let record = UninstallRecord::new(identity, version, paths);
    host.remove_registry_key_if_exists(&record.key)
        .context("Removing old uninstall registry key")?;
    host.write_registry_key(&record)
        .context("Writing uninstall registry key")?;

    log::info!("Completed install");
    Ok(())
}

/// Replaces the install directory with the executable and the uninstaller
pub fn deploy(host: &mut dyn Host, paths: &InstallPaths, payload: &Payload) -> anyhow::Result<()> {
    log::info!("Deploying to {}", paths.install_dir.display());
    host.remove_dir_all_if_exists(&paths.install_dir)
        .context("Removing existing install")?;
    host.create_dir_all(&paths.install_dir)
        .context("Creating install folder")?;
    match &payload.executable {
        AppSource::File(path) => host.copy_file(path, &paths.executable),
        AppSource::Bytes(data) => host.write_file(&paths.executable, data),
    }
    .context("Writing executable")?;
    host.copy_file(&payload.uninstaller, &paths.uninstaller)
        .context("Writing uninstaller")?;
    Ok(())
}

pub fn launch(host: &mut dyn Host, paths: &InstallPaths) -> anyhow::Result<()> {
    host.launch(&paths.executable, &paths.install_dir)
        .context("Launching application")?;
    Ok(())
}
