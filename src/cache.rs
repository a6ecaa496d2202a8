use crate::types::{Result, Rss2DayOneError};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Backing store for the seen-item cache.
pub trait CacheStorage {
    /// Current contents, or `None` if nothing has been stored yet.
    fn read(&self) -> std::io::Result<Option<Vec<u8>>>;

    /// Replace the stored contents entirely.
    fn write(&self, data: &[u8]) -> std::io::Result<()>;
}

/// Cache kept in a JSON file on disk.
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CacheStorage for FileStorage {
    fn read(&self) -> std::io::Result<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, data: &[u8]) -> std::io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        // Write beside the target and rename over it so a crash never leaves a truncated file.
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// In-process storage, mostly useful for tests.
#[derive(Default)]
pub struct MemoryStorage {
    data: RefCell<Option<Vec<u8>>>,
    writes: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: RefCell::new(Some(data.into())),
            writes: Cell::new(0),
        }
    }

    pub fn contents(&self) -> Option<Vec<u8>> {
        self.data.borrow().clone()
    }

    /// Number of times `write` has been called.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl CacheStorage for MemoryStorage {
    fn read(&self) -> std::io::Result<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    fn write(&self, data: &[u8]) -> std::io::Result<()> {
        *self.data.borrow_mut() = Some(data.to_vec());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

/// Identifiers of feed items that have already been turned into journal entries.
#[derive(Debug, Default)]
pub struct SeenSet {
    ids: HashSet<String>,
    modified: bool,
}

impl SeenSet {
    /// Load the set from `storage`. Missing or blank storage yields an empty set.
    pub fn load(storage: &dyn CacheStorage) -> Result<Self> {
        // An unreadable cache is treated like a missing one; the next save replaces it.
        let data = match storage.read() {
            Ok(data) => data.unwrap_or_default(),
            Err(e) => {
                debug!("Could not read seen-item cache, starting empty: {}", e);
                Vec::new()
            }
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let ids: Vec<String> = serde_json::from_slice(&data).map_err(Rss2DayOneError::Decode)?;
        debug!("Loaded {} seen item ids", ids.len());

        Ok(Self {
            ids: ids.into_iter().collect(),
            modified: false,
        })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn add(&mut self, id: &str) {
        if self.ids.insert(id.to_string()) {
            self.modified = true;
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether any `add` changed membership since load.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Write the set back to `storage` if it changed since load.
    pub fn save(&mut self, storage: &dyn CacheStorage) -> Result<()> {
        if !self.modified {
            debug!("Seen-item cache unchanged, skipping write");
            return Ok(());
        }

        let mut ids: Vec<&String> = self.ids.iter().collect();
        ids.sort();

        let data = serde_json::to_vec_pretty(&ids)
            .map_err(|e| Rss2DayOneError::Persist(format!("serialising seen data: {}", e)))?;
        storage
            .write(&data)
            .map_err(|e| Rss2DayOneError::Persist(e.to_string()))?;

        self.modified = false;
        debug!("Saved {} seen item ids", ids.len());
        Ok(())
    }
}
