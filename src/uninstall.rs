use crate::config::AppIdentity;
use crate::host::{Host, HostError};
use crate::paths::InstallPaths;
use crate::prompt::{Confirmation, Prompt};
use anyhow::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// The user declined, nothing was touched
    Aborted,
    Completed,
}

/// Removes everything [crate::install] and [crate::install::deploy] may have created.
///
/// Missing artifacts are skipped. The first failure aborts the remaining steps
/// and no completion message is shown.
pub fn uninstall(
    host: &mut dyn Host,
    prompt: &mut dyn Prompt,
    identity: &AppIdentity,
    paths: &InstallPaths,
) -> anyhow::Result<UninstallOutcome> {
    let title = format!("Uninstall {}", identity.name);
    let question = format!("Are you sure you want to uninstall {}?", identity.name);
    if prompt.confirm(&title, &question) != Confirmation::Confirmed {
        log::info!("Uninstall cancelled");
        return Ok(UninstallOutcome::Aborted);
    }

    log::info!("Starting uninstall");
    host.remove_file_if_exists(&paths.desktop_shortcut)
        .context("Removing desktop shortcut")?;
    host.remove_dir_all_if_exists(&paths.start_menu_dir)
        .context("Removing start menu folder")?;
    host.remove_dir_all_if_exists(&paths.data_dir)
        .context("Removing application data")?;
    host.remove_registry_key_if_exists(&paths.registry_key)
        .context("Removing uninstall registry key")?;

    if host.exists(&paths.install_dir) {
        leave_install_dir(host, paths)?;
        host.remove_dir_all_if_exists(&paths.install_dir)
            .context("Removing install folder")?;
    }

    log::info!("Completed uninstall");
    prompt.notify(&title, &format!("{} successfully uninstalled", identity.name));
    Ok(UninstallOutcome::Completed)
}

/// Moves the working directory somewhere the install directory removal can't affect
fn leave_install_dir(host: &mut dyn Host, paths: &InstallPaths) -> anyhow::Result<()> {
    let target = paths.safe_working_dir();
    host.set_current_dir(target)
        .context("Leaving install folder")?;
    let cwd = host.current_dir()?;
    if cwd.starts_with(&paths.install_dir) {
        return Err(HostError::WorkingDirectory {
            cwd,
            path: paths.install_dir.clone(),
        }
        .into());
    }
    Ok(())
}
