use super::{fs, Host, HostError};
use crate::registry::{RegValue, UninstallRecord};
use crate::shortcut::Shortcut;
use std::io;
use std::os::windows::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use windows::core::{ComInterface, HSTRING};
use windows::Win32::Foundation::TRUE;
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, IPersistFile, CLSCTX_INPROC_SERVER,
    COINIT_APARTMENTTHREADED,
};
use windows::Win32::UI::Shell::{IShellLinkW, ShellLink};
use winreg::enums::HKEY_CURRENT_USER;
use winreg::RegKey;

const DETACHED_PROCESS: u32 = 0x00000008;

pub struct WindowsHost {
    hkcu: RegKey,
}

impl WindowsHost {
    pub fn new() -> Result<Self, HostError> {
        log::trace!("Initialising COM");
        unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }
            .map_err(|e| HostError::Com(e.message().to_string()))?;
        Ok(Self {
            hkcu: RegKey::predef(HKEY_CURRENT_USER),
        })
    }
}

impl Drop for WindowsHost {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
    }
}

impl Host for WindowsHost {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_file_if_exists(&mut self, path: &Path) -> Result<(), HostError> {
        fs::remove_file_if_exists(path)
    }

    fn remove_dir_all_if_exists(&mut self, path: &Path) -> Result<(), HostError> {
        // The running uninstaller may live inside the directory being removed
        if let Ok(exe) = std::env::current_exe() {
            if path.is_dir() && exe.starts_with(path) {
                log::info!("Scheduling removal of running {}", exe.display());
                self_replace::self_delete_outside_path(path).map_err(HostError::io(&exe))?;
            }
        }
        fs::remove_dir_all_if_exists(path)
    }

    fn create_dir_all(&mut self, path: &Path) -> Result<(), HostError> {
        fs::create_dir_all(path)
    }

    fn copy_file(&mut self, from: &Path, to: &Path) -> Result<(), HostError> {
        fs::copy_file(from, to)
    }

    fn write_file(&mut self, path: &Path, data: &[u8]) -> Result<(), HostError> {
        fs::write_file(path, data)
    }

    fn create_shortcut(&mut self, path: &Path, shortcut: &Shortcut) -> Result<(), HostError> {
        log::info!("Creating shortcut {}", path.display());
        let save = || -> windows::core::Result<()> {
            unsafe {
                let link: IShellLinkW = CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER)?;
                link.SetPath(&HSTRING::from(shortcut.target.as_os_str()))?;
                link.SetWorkingDirectory(&HSTRING::from(shortcut.working_dir.as_os_str()))?;
                link.SetIconLocation(&HSTRING::from(shortcut.icon.as_os_str()), shortcut.icon_index)?;
                link.SetDescription(&HSTRING::from(shortcut.description.as_str()))?;
                let file: IPersistFile = link.cast()?;
                file.Save(&HSTRING::from(path.as_os_str()), TRUE)
            }
        };
        save().map_err(|e| HostError::Shortcut {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    fn registry_key_exists(&self, key: &str) -> bool {
        self.hkcu.open_subkey(key).is_ok()
    }

    fn remove_registry_key_if_exists(&mut self, key: &str) -> Result<(), HostError> {
        match self.hkcu.delete_subkey_all(key) {
            Ok(()) => {
                log::info!("Deleted registry key HKCU\\{}", key);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("No registry key HKCU\\{}", key);
                Ok(())
            }
            Err(e) => Err(HostError::registry(key)(e)),
        }
    }

    fn write_registry_key(&mut self, record: &UninstallRecord) -> Result<(), HostError> {
        log::info!("Writing registry key HKCU\\{}", record.key);
        let (key, _) = self
            .hkcu
            .create_subkey(&record.key)
            .map_err(HostError::registry(&record.key))?;
        for (name, value) in &record.values {
            log::debug!("{} = {}", name, value);
            let result = match value {
                RegValue::String(s) => key.set_value(name, s),
                RegValue::Dword(d) => key.set_value(name, d),
            };
            result.map_err(HostError::registry(&record.key))?;
        }
        Ok(())
    }

    fn current_dir(&self) -> Result<PathBuf, HostError> {
        std::env::current_dir().map_err(HostError::io(Path::new(".")))
    }

    fn set_current_dir(&mut self, path: &Path) -> Result<(), HostError> {
        log::info!("Changing working directory to {}", path.display());
        std::env::set_current_dir(path).map_err(HostError::io(path))
    }

    fn launch(&mut self, exe: &Path, working_dir: &Path) -> Result<(), HostError> {
        log::info!("Launching {}", exe.display());
        Command::new(exe)
            .current_dir(working_dir)
            .creation_flags(DETACHED_PROCESS)
            .spawn()
            .map_err(HostError::io(exe))?;
        Ok(())
    }
}
