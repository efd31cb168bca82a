// Key-value storage, the local equivalent of a browser's localStorage.
// <project_dir>/.padboard/<key>

use std::path::{Path, PathBuf};

use anyhow::Context;

pub const PADBOARD_DIR: &str = ".padboard";

pub trait Storage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
}

pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(project_dir: &Path) -> Self {
        Self { dir: project_dir.join(PADBOARD_DIR) }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        // keys are ours, but never let one climb out of the directory
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(file)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.key_path(key);
        match std::fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    // Making the directory if it doesn't exist already
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.key_path(key);
        std::fs::write(&path, value).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_read_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get("soundboardState").unwrap(), None);
    }

    #[test]
    fn set_then_get_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        storage.set("currentLayout", "layout-alt1").unwrap();
        storage.set("currentLayout", "layout-alt2").unwrap();
        assert_eq!(storage.get("currentLayout").unwrap().as_deref(), Some("layout-alt2"));
        assert!(dir.path().join(PADBOARD_DIR).join("currentLayout").exists());
    }

    #[test]
    fn odd_keys_stay_inside_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());
        storage.set("../escape", "x").unwrap();
        assert!(!dir.path().join("escape").exists());
        assert_eq!(storage.get("../escape").unwrap().as_deref(), Some("x"));
    }
}
