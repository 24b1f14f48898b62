//! Snapshot stores
//!
//! The session only needs "load the last snapshot, if any" and "save this
//! snapshot". [`JsonFileStore`] keeps it in a single JSON file with file
//! locking and atomic writes; [`MemoryStore`] keeps it in process.
//!
//! Writers serialize on a `<file>.lock` sidecar and replace the sheet by
//! renaming a uniquely named temp file over it, so readers only ever see a
//! complete old or new sheet.

use std::cell::{Cell, RefCell};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use tempfile::NamedTempFile;
use thiserror::Error;

use super::snapshot::Snapshot;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Saved sheet at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store is unavailable")]
    Unavailable,
}

/// Loads and saves whole snapshots
pub trait SnapshotStore {
    /// Returns the last saved snapshot, or `None` if nothing was saved yet
    fn load(&self) -> Result<Option<Snapshot>>;

    /// Replaces the saved snapshot
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for &S {
    fn load(&self) -> Result<Option<Snapshot>> {
        (**self).load()
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        (**self).save(snapshot)
    }
}

/// Snapshot kept in a single JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sidecar file writers lock while replacing the sheet
    pub fn lock_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".lock");
        PathBuf::from(name)
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let mut file = File::open(&self.path)
            .with_context(|| format!("Failed to open saved sheet: {}", self.path.display()))?;

        file.lock_shared()
            .context("Failed to acquire read lock on saved sheet")?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .with_context(|| format!("Failed to read saved sheet: {}", self.path.display()))?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let snapshot = Snapshot::from_json(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let dir = self.dir();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

        let json = snapshot.to_json().context("Failed to serialize sheet")?;

        let lock_path = self.lock_path();
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;

        // Held until `lock` drops at the end of the save
        lock.lock_exclusive()
            .context("Failed to acquire write lock on saved sheet")?;

        let temp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            writeln!(writer, "{}", json).context("Failed to write sheet")?;
            writer.flush().context("Failed to flush saved sheet")?;
        }

        // Atomic rename
        temp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to replace saved sheet: {}", self.path.display()))?;

        Ok(())
    }
}

/// Snapshot kept in memory; used by tests and embedders without a disk
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RefCell<Option<Snapshot>>,
    fail_saves: Cell<bool>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with an already saved snapshot
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        let store = Self::default();
        store.snapshot.replace(Some(snapshot));
        store
    }

    /// Makes every following save fail with [`StoreError::Unavailable`]
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.snapshot.borrow().clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        Ok(self.snapshot.borrow().clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if self.fail_saves.get() {
            return Err(StoreError::Unavailable.into());
        }
        self.snapshot.replace(Some(snapshot.clone()));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Mark, PlayerId, Session};
    use tempfile::TempDir;

    fn sample() -> Snapshot {
        let mut session = Session::new(["Ann", "Ben"]);
        session.set("rope", PlayerId::new(2), Mark::Maybe);
        Snapshot::capture(&session)
    }

    #[test]
    fn load_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("sheet.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn load_blank_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sheet.json");
        fs::write(&path, "\n").unwrap();
        assert!(JsonFileStore::new(path).load().unwrap().is_none());
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("sheet.json"));
        let snapshot = sample();

        store.save(&snapshot).unwrap();
        let loaded = store.load().unwrap().unwrap();

        assert_eq!(loaded, snapshot);

        let mut left: Vec<_> = fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        left.sort();
        assert_eq!(left, vec!["sheet.json", "sheet.json.lock"]);
    }

    #[test]
    fn save_waits_for_the_write_lock() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("sheet.json"));
        store.save(&sample()).unwrap();

        let held = File::create(store.lock_path()).unwrap();
        held.lock_exclusive().unwrap();

        let writer = {
            let store = store.clone();
            std::thread::spawn(move || {
                let solo = Snapshot::capture(&Session::new(["Solo"]));
                store.save(&solo)
            })
        };

        std::thread::sleep(std::time::Duration::from_millis(100));
        assert_eq!(store.load().unwrap().unwrap().players.len(), 2);

        held.unlock().unwrap();
        writer.join().unwrap().unwrap();
        assert_eq!(store.load().unwrap().unwrap().players.len(), 1);
    }

    #[test]
    fn concurrent_saves_leave_a_complete_sheet() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sheet.json");

        let writers: Vec<_> = (1..=4)
            .map(|n| {
                let store = JsonFileStore::new(&path);
                std::thread::spawn(move || {
                    let names: Vec<String> = (0..n).map(|i| format!("P{}", i)).collect();
                    let snapshot = Snapshot::capture(&Session::new(names));
                    for _ in 0..20 {
                        store.save(&snapshot)?;
                    }
                    anyhow::Ok(())
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap().unwrap();
        }

        let loaded = JsonFileStore::new(&path).load().unwrap().unwrap();
        assert!((1..=4).contains(&loaded.players.len()));

        let stray = fs::read_dir(dir.path())
            .unwrap()
            .filter(|entry| {
                let name = entry.as_ref().unwrap().file_name();
                name != "sheet.json" && name != "sheet.json.lock"
            })
            .count();
        assert_eq!(stray, 0);
    }

    #[test]
    fn save_overwrites() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("sheet.json"));
        store.save(&sample()).unwrap();

        let session = Session::new(["Solo"]);
        let replacement = Snapshot::capture(&session);
        store.save(&replacement).unwrap();

        assert_eq!(store.load().unwrap().unwrap().players.len(), 1);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sheet.json");
        fs::write(&path, "{not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn memory_store_can_fail() {
        let store = MemoryStore::new();
        store.save(&sample()).unwrap();
        store.set_fail_saves(true);
        assert!(store.save(&sample()).is_err());
        assert_eq!(store.save_count(), 1);
        assert!(store.load().unwrap().is_some());
    }
}
