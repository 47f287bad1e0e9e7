use super::{Host, HostError};
use crate::registry::{RegValue, UninstallRecord};
use crate::shortcut::Shortcut;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    File(Vec<u8>),
    Shortcut(Shortcut),
}

/// A mutation performed against a [MemoryHost]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    RemoveFile(PathBuf),
    RemoveDir { path: PathBuf, working_dir: PathBuf },
    CreateDir(PathBuf),
    CopyFile { from: PathBuf, to: PathBuf },
    WriteFile(PathBuf),
    CreateShortcut(PathBuf),
    RemoveRegistryKey(String),
    WriteRegistryKey(String),
    SetCurrentDir(PathBuf),
    Launch { exe: PathBuf, working_dir: PathBuf },
}

/// In-memory filesystem and registry.
///
/// Like Windows, it refuses to remove the directory containing the working directory.
#[derive(Debug, Default)]
pub struct MemoryHost {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, Entry>,
    registry: BTreeMap<String, Vec<(String, RegValue)>>,
    cwd: PathBuf,
    journal: Vec<Operation>,
    locked: BTreeSet<PathBuf>,
}

impl MemoryHost {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        let cwd = cwd.into();
        let mut host = Self::default();
        host.insert_dir(&cwd);
        host.cwd = cwd;
        host
    }

    pub fn with_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.insert_dir(path.as_ref());
        self
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, data: &[u8]) -> Self {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.insert_dir(parent);
        }
        self.files
            .insert(path.to_path_buf(), Entry::File(data.to_vec()));
        self
    }

    pub fn with_registry_value(mut self, key: &str, name: &str, value: RegValue) -> Self {
        set_value(self.registry.entry(key.to_owned()).or_default(), name, value);
        self
    }

    /// Any removal touching this path fails, as if a file were in use
    pub fn lock(&mut self, path: impl Into<PathBuf>) {
        self.locked.insert(path.into());
    }

    pub fn entry(&self, path: impl AsRef<Path>) -> Option<&Entry> {
        self.files.get(path.as_ref())
    }

    pub fn shortcut(&self, path: impl AsRef<Path>) -> Option<&Shortcut> {
        match self.entry(path) {
            Some(Entry::Shortcut(s)) => Some(s),
            _ => None,
        }
    }

    pub fn registry_values(&self, key: &str) -> Option<&[(String, RegValue)]> {
        self.registry.get(key).map(Vec::as_slice)
    }

    pub fn registry_value(&self, key: &str, name: &str) -> Option<&RegValue> {
        self.registry_values(key)?
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn journal(&self) -> &[Operation] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    fn insert_dir(&mut self, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn check_parent(&self, path: &Path) -> Result<(), HostError> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.dirs.contains(parent) => {
                Err(not_found(parent))
            }
            _ => Ok(()),
        }
    }

    fn check_unlocked(&self, path: &Path) -> Result<(), HostError> {
        match self.locked.iter().find(|l| l.starts_with(path)) {
            Some(l) => Err(HostError::Io {
                path: l.clone(),
                source: io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "The process cannot access the file because it is being used by another process",
                ),
            }),
            None => Ok(()),
        }
    }
}

fn not_found(path: &Path) -> HostError {
    HostError::Io {
        path: path.to_path_buf(),
        source: io::Error::from(io::ErrorKind::NotFound),
    }
}

fn set_value(values: &mut Vec<(String, RegValue)>, name: &str, value: RegValue) {
    match values.iter_mut().find(|(n, _)| n == name) {
        Some((_, v)) => *v = value,
        None => values.push((name.to_owned(), value)),
    }
}

impl Host for MemoryHost {
    fn exists(&self, path: &Path) -> bool {
        self.dirs.contains(path) || self.files.contains_key(path)
    }

    fn remove_file_if_exists(&mut self, path: &Path) -> Result<(), HostError> {
        if self.files.contains_key(path) {
            self.check_unlocked(path)?;
            self.files.remove(path);
            self.journal.push(Operation::RemoveFile(path.to_path_buf()));
        }
        Ok(())
    }

    fn remove_dir_all_if_exists(&mut self, path: &Path) -> Result<(), HostError> {
        if self.files.contains_key(path) {
            return Err(HostError::NotADirectory(path.to_path_buf()));
        }
        if !self.dirs.contains(path) {
            return Ok(());
        }
        if self.cwd.starts_with(path) {
            return Err(HostError::Io {
                path: path.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "The process cannot access the file because it is being used by another process",
                ),
            });
        }
        self.check_unlocked(path)?;
        self.dirs.retain(|d| !d.starts_with(path));
        self.files.retain(|f, _| !f.starts_with(path));
        self.journal.push(Operation::RemoveDir {
            path: path.to_path_buf(),
            working_dir: self.cwd.clone(),
        });
        Ok(())
    }

    fn create_dir_all(&mut self, path: &Path) -> Result<(), HostError> {
        self.insert_dir(path);
        self.journal.push(Operation::CreateDir(path.to_path_buf()));
        Ok(())
    }

    fn copy_file(&mut self, from: &Path, to: &Path) -> Result<(), HostError> {
        let entry = self.files.get(from).cloned().ok_or_else(|| not_found(from))?;
        self.check_parent(to)?;
        self.files.insert(to.to_path_buf(), entry);
        self.journal.push(Operation::CopyFile {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
        });
        Ok(())
    }

    fn write_file(&mut self, path: &Path, data: &[u8]) -> Result<(), HostError> {
        self.check_parent(path)?;
        self.files
            .insert(path.to_path_buf(), Entry::File(data.to_vec()));
        self.journal.push(Operation::WriteFile(path.to_path_buf()));
        Ok(())
    }

    fn create_shortcut(&mut self, path: &Path, shortcut: &Shortcut) -> Result<(), HostError> {
        self.check_parent(path)?;
        self.files
            .insert(path.to_path_buf(), Entry::Shortcut(shortcut.clone()));
        self.journal.push(Operation::CreateShortcut(path.to_path_buf()));
        Ok(())
    }

    fn registry_key_exists(&self, key: &str) -> bool {
        self.registry.contains_key(key)
    }

    fn remove_registry_key_if_exists(&mut self, key: &str) -> Result<(), HostError> {
        if self.registry.remove(key).is_some() {
            self.journal.push(Operation::RemoveRegistryKey(key.to_owned()));
        }
        Ok(())
    }

    fn write_registry_key(&mut self, record: &UninstallRecord) -> Result<(), HostError> {
        let values = self.registry.entry(record.key.clone()).or_default();
        for (name, value) in &record.values {
            set_value(values, name, value.clone());
        }
        self.journal
            .push(Operation::WriteRegistryKey(record.key.clone()));
        Ok(())
    }

    fn current_dir(&self) -> Result<PathBuf, HostError> {
        Ok(self.cwd.clone())
    }

    fn set_current_dir(&mut self, path: &Path) -> Result<(), HostError> {
        if !self.dirs.contains(path) {
            return Err(not_found(path));
        }
        self.cwd = path.to_path_buf();
        self.journal.push(Operation::SetCurrentDir(path.to_path_buf()));
        Ok(())
    }

    fn launch(&mut self, exe: &Path, working_dir: &Path) -> Result<(), HostError> {
        if !self.files.contains_key(exe) {
            return Err(not_found(exe));
        }
        self.journal.push(Operation::Launch {
            exe: exe.to_path_buf(),
            working_dir: working_dir.to_path_buf(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_to_remove_working_directory() {
        let mut host = MemoryHost::new("/app/bin");
        assert!(host.remove_dir_all_if_exists(Path::new("/app")).is_err());
        host.set_current_dir(Path::new("/")).unwrap();
        host.remove_dir_all_if_exists(Path::new("/app")).unwrap();
        assert!(!host.exists(Path::new("/app/bin")));
        assert!(host.exists(Path::new("/")));
    }

    #[test]
    fn locked_file_blocks_parent_removal() {
        let mut host = MemoryHost::new("/").with_file("/app/data.bin", b"1");
        host.lock("/app/data.bin");
        assert!(host.remove_dir_all_if_exists(Path::new("/app")).is_err());
        assert!(host.exists(Path::new("/app/data.bin")));
        assert!(host.journal().is_empty());
    }

    #[test]
    fn directory_removal_rejects_file() {
        let mut host = MemoryHost::new("/").with_file("/app", b"1");
        assert!(matches!(
            host.remove_dir_all_if_exists(Path::new("/app")),
            Err(HostError::NotADirectory(_))
        ));
        assert!(host.exists(Path::new("/app")));
        assert!(host.journal().is_empty());
    }

    #[test]
    fn registry_writes_merge_values() {
        let mut host =
            MemoryHost::new("/").with_registry_value("Key", "Stale", RegValue::Dword(7));
        let record = UninstallRecord {
            key: "Key".to_owned(),
            values: vec![("Fresh".to_owned(), RegValue::Dword(1))],
        };
        host.write_registry_key(&record).unwrap();
        assert_eq!(host.registry_value("Key", "Stale"), Some(&RegValue::Dword(7)));
        assert_eq!(host.registry_value("Key", "Fresh"), Some(&RegValue::Dword(1)));
    }

    #[test]
    fn shortcut_needs_parent_directory() {
        let mut host = MemoryHost::new("/");
        let shortcut = Shortcut {
            target: PathBuf::from("/app/app.exe"),
            working_dir: PathBuf::from("/app"),
            icon: PathBuf::from("/app/app.exe"),
            icon_index: 0,
            description: "Launch app".to_owned(),
        };
        assert!(host
            .create_shortcut(Path::new("/desktop/app.lnk"), &shortcut)
            .is_err());
        let mut host = host.with_dir("/desktop");
        host.create_shortcut(Path::new("/desktop/app.lnk"), &shortcut)
            .unwrap();
        assert_eq!(host.shortcut("/desktop/app.lnk"), Some(&shortcut));
    }
}
