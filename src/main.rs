//! Entry point for the installer and the uninstaller
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::PathBuf;
use twbm_installer::common::{install_logger, APP_NAME};
use twbm_installer::config::{AppIdentity, InstallerConfig};
use twbm_installer::host::platform_host;
use twbm_installer::install::{self, AppSource, Payload};
use twbm_installer::paths::InstallPaths;
use twbm_installer::prompt::{Confirmation, ConsolePrompt, Preset, Prompt};
use twbm_installer::release::{self, Arch, Os};
use twbm_installer::status::InstallStatus;
use twbm_installer::uninstall::{uninstall, UninstallOutcome};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Installs TinyWiiBackupManager for the current user
    Install {
        /// Install this executable instead of downloading a release
        #[arg(long, requires = "app_version")]
        payload: Option<PathBuf>,
        /// Release to install, the latest one by default
        #[arg(long)]
        app_version: Option<String>,
        /// Start TinyWiiBackupManager once installed
        #[arg(long)]
        launch: bool,
    },
    /// Uninstalls TinyWiiBackupManager for the current user
    Uninstall {
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
        /// Ask on the terminal instead of a dialog
        #[arg(long)]
        console: bool,
    },
    /// Prints which parts of the installation are present
    Status,
}

/// `uninstall.exe` in the install folder is a copy of this binary
fn default_command(exe_name: Option<&str>, config: &InstallerConfig) -> Command {
    if exe_name == Some(config.identity.uninstaller_name.as_str()) {
        Command::Uninstall {
            yes: false,
            console: false,
        }
    } else {
        Command::Install {
            payload: None,
            app_version: None,
            launch: false,
        }
    }
}

/// Dialog driven uninstalls don't need the console the shell opened for us
fn hides_console(command: &Command) -> bool {
    matches!(
        command,
        Command::Uninstall {
            yes: false,
            console: false
        }
    )
}

fn current_exe_name() -> Option<String> {
    let exe = std::env::current_exe().ok()?;
    exe.file_name().and_then(OsStr::to_str).map(str::to_owned)
}

#[cfg(windows)]
fn dialog_prompt() -> Box<dyn Prompt> {
    Box::<twbm_installer::prompt::MessageBoxPrompt>::default()
}

#[cfg(not(windows))]
fn dialog_prompt() -> Box<dyn Prompt> {
    Box::<ConsolePrompt>::default()
}

/// Downloads a release and returns its version alongside the application executable
fn fetch_release(
    identity: &AppIdentity,
    version: Option<String>,
) -> anyhow::Result<(String, Vec<u8>)> {
    let version = match version {
        Some(version) => release::parse_version(&version)?,
        None => release::fetch_latest_version().context("Unable to fetch the latest version")?,
    };
    let (os, arch) = (Os::detect(), Arch::detect());
    log::info!(
        "Installing v{} for {} {}",
        version,
        os.as_str(),
        arch.as_str()
    );
    let archive = release::download_archive(&version, os, arch)
        .with_context(|| format!("Unable to download v{}", version))?;
    let executable = release::extract_file(&archive, &identity.exe_name)?;
    Ok((version, executable))
}

fn run(args: Args) -> anyhow::Result<()> {
    log::info!(
        "Starting {} installer, version: {}",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    let config = InstallerConfig::from_env().context("Unable to locate user folders")?;
    let command = match args.command {
        Some(command) => command,
        None => default_command(current_exe_name().as_deref(), &config),
    };
    if hides_console(&command) {
        twbm_installer::console_window::hide_owned_console();
    }
    match command {
        Command::Install {
            payload,
            app_version,
            launch,
        } => {
            let paths = InstallPaths::resolve(&config);
            let (version, executable) = match (payload, app_version) {
                (Some(path), Some(version)) => (version, AppSource::File(path)),
                (None, version) => {
                    let (version, bytes) = fetch_release(&config.identity, version)?;
                    (version, AppSource::Bytes(bytes))
                }
                (Some(_), None) => anyhow::bail!("--payload requires --app-version"),
            };
            let uninstaller =
                std::env::current_exe().context("Unable to locate the running installer")?;
            let mut host = platform_host()?;
            install::deploy(
                host.as_mut(),
                &paths,
                &Payload {
                    executable,
                    uninstaller,
                },
            )?;
            install::install(host.as_mut(), &config.identity, &version, &paths)?;
            if launch {
                install::launch(host.as_mut(), &paths)?;
            }
        }
        Command::Uninstall { yes, console } => {
            let paths = InstallPaths::resolve(&config);
            let mut prompt: Box<dyn Prompt> = if yes {
                Box::new(Preset::new(Confirmation::Confirmed))
            } else if console {
                Box::<ConsolePrompt>::default()
            } else {
                dialog_prompt()
            };
            let mut host = platform_host()?;
            if uninstall(host.as_mut(), prompt.as_mut(), &config.identity, &paths)?
                == UninstallOutcome::Aborted
            {
                log::info!("Nothing was removed");
            }
        }
        Command::Status => {
            let paths = InstallPaths::resolve(&config);
            let host = platform_host()?;
            let status = InstallStatus::detect(host.as_ref(), &paths);
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }
    Ok(())
}

fn main() {
    let args: Args = Args::parse();

    // Setup logging
    if let Err(e) = install_logger(args.debug, true) {
        eprintln!("Unable to install logger: {:#}", e);
        std::process::exit(1);
    }
    // Run the installer logic
    if let Err(e) = run(args) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use twbm_installer::config::BaseDirs;
    use twbm_installer::registry::uninstall_command;

    fn config() -> InstallerConfig {
        InstallerConfig::new(
            AppIdentity::default(),
            BaseDirs {
                desktop: PathBuf::from("/home/Desktop"),
                roaming: PathBuf::from("/home/Roaming"),
                local: PathBuf::from("/home/Local"),
                temp: PathBuf::from("/tmp"),
            },
        )
    }

    #[test]
    fn uninstall_string_hides_console() {
        let paths = InstallPaths::resolve(&config());
        let command_line = uninstall_command(&paths);
        assert!(command_line.ends_with(" uninstall"));

        let args = Args::try_parse_from([paths.uninstaller.as_os_str(), OsStr::new("uninstall")])
            .unwrap();
        let command = args.command.unwrap();
        assert_eq!(
            command,
            Command::Uninstall {
                yes: false,
                console: false
            }
        );
        assert!(hides_console(&command));
    }

    #[test]
    fn console_kept_for_terminal_uninstall() {
        for argv in [
            ["twbm-installer", "uninstall", "--console"],
            ["twbm-installer", "uninstall", "--yes"],
        ] {
            let command = Args::try_parse_from(argv).unwrap().command.unwrap();
            assert!(!hides_console(&command));
        }
    }

    #[test]
    fn uninstaller_name_defaults_to_uninstall() {
        let config = config();
        let command = default_command(Some("uninstall.exe"), &config);
        assert!(hides_console(&command));
        assert_eq!(
            command,
            Command::Uninstall {
                yes: false,
                console: false
            }
        );
    }

    #[test]
    fn other_names_default_to_install() {
        let config = config();
        let install = Command::Install {
            payload: None,
            app_version: None,
            launch: false,
        };
        assert_eq!(default_command(Some("twbm-installer.exe"), &config), install);
        assert_eq!(default_command(None, &config), install);
        assert!(!hides_console(&install));
    }

    #[test]
    fn payload_needs_app_version() {
        assert!(Args::try_parse_from(["twbm-installer", "install", "--payload", "app.exe"]).is_err());
        let args = Args::try_parse_from([
            "twbm-installer",
            "install",
            "--payload",
            "app.exe",
            "--app-version",
            "4.2.0",
        ])
        .unwrap();
        assert_eq!(
            args.command,
            Some(Command::Install {
                payload: Some(PathBuf::from("app.exe")),
                app_version: Some("4.2.0".to_owned()),
                launch: false,
            })
        );
    }
}
