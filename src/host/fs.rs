//! Plain filesystem helpers

use super::HostError;
use std::fs;
use std::path::Path;

pub fn remove_file_if_exists(path: &Path) -> Result<(), HostError> {
    if path.is_file() {
        log::info!("Removing file {}", path.display());
        fs::remove_file(path).map_err(HostError::io(path))?;
    } else {
        log::debug!("No file at {}", path.display());
    }
    Ok(())
}

pub fn remove_dir_all_if_exists(path: &Path) -> Result<(), HostError> {
    if path.is_dir() {
        log::info!("Deleting folder {}", path.display());
        #[cfg(windows)]
        clear_readonly(path)?;
        fs::remove_dir_all(path).map_err(HostError::io(path))?;
    } else if path.exists() {
        return Err(HostError::NotADirectory(path.to_path_buf()));
    } else {
        log::debug!("No folder at {}", path.display());
    }
    Ok(())
}

pub fn create_dir_all(path: &Path) -> Result<(), HostError> {
    log::info!("Creating folder {}", path.display());
    fs::create_dir_all(path).map_err(HostError::io(path))
}

pub fn copy_file(from: &Path, to: &Path) -> Result<(), HostError> {
    log::info!("Copying {} to {}", from.display(), to.display());
    fs::copy(from, to).map_err(HostError::io(from))?;
    Ok(())
}

pub fn write_file(path: &Path, data: &[u8]) -> Result<(), HostError> {
    log::info!("Writing {} ({} bytes)", path.display(), data.len());
    fs::write(path, data).map_err(HostError::io(path))
}

// remove_dir_all refuses read-only files on Windows
#[cfg(windows)]
fn clear_readonly(path: &Path) -> Result<(), HostError> {
    for entry in fs::read_dir(path).map_err(HostError::io(path))? {
        let entry = entry.map_err(HostError::io(path))?;
        let child = entry.path();
        let meta = entry.metadata().map_err(HostError::io(&child))?;
        if meta.is_dir() {
            clear_readonly(&child)?;
        } else if meta.permissions().readonly() {
            let mut perms = meta.permissions();
            perms.set_readonly(false);
            fs::set_permissions(&child, perms).map_err(HostError::io(&child))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn remove_missing_is_ok() {
        let dir = tempdir().unwrap();
        remove_file_if_exists(&dir.path().join("missing.lnk")).unwrap();
        remove_dir_all_if_exists(&dir.path().join("missing")).unwrap();
    }

    #[test]
    fn remove_dir_recursively() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("app");
        create_dir_all(&target.join("nested")).unwrap();
        fs::write(target.join("nested").join("data.bin"), b"data").unwrap();
        remove_dir_all_if_exists(&target).unwrap();
        assert!(!target.exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn remove_file_ignores_directories() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("app");
        create_dir_all(&target).unwrap();
        remove_file_if_exists(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn remove_dir_rejects_plain_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("TinyWiiBackupManager");
        write_file(&target, b"not a folder").unwrap();
        let err = remove_dir_all_if_exists(&target).unwrap_err();
        assert!(matches!(err, HostError::NotADirectory(p) if p == target));
        assert!(target.is_file());
    }

    #[test]
    fn copy_file_contents() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("a.exe");
        let to = dir.path().join("b.exe");
        fs::write(&from, b"MZ").unwrap();
        copy_file(&from, &to).unwrap();
        assert_eq!(fs::read(&to).unwrap(), b"MZ");
    }

    #[test]
    fn copy_missing_source_reports_path() {
        let dir = tempdir().unwrap();
        let from = dir.path().join("missing.exe");
        let err = copy_file(&from, &dir.path().join("b.exe")).unwrap_err();
        match err {
            HostError::Io { path, .. } => assert_eq!(path, from),
            e => panic!("unexpected error {e}"),
        }
    }
}
