//! Persistent store of uploaded Markdown files.
//!
//! Records get auto-incrementing ids starting at 1 and keep insertion
//! order. The store also remembers which record the viewer has selected;
//! deleting the selected record clears the selection.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Record identifier.
pub type RecordId = u64;

/// A stored Markdown file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Record id
    pub id: RecordId,
    /// Original filename
    pub filename: String,
    /// Raw Markdown
    pub content: String,
    /// When the record was added
    pub created: DateTime<Utc>,
}

/// Storage for uploaded files.
pub trait FileStore {
    /// Add a file and return its id.
    fn add(&mut self, filename: &str, content: &str) -> Result<RecordId>;

    /// All records in insertion order.
    fn list(&self) -> Vec<FileRecord>;

    /// Get a record by id.
    fn get(&self, id: RecordId) -> Option<FileRecord>;

    /// Delete a record.
    fn delete(&mut self, id: RecordId) -> Result<()>;

    /// Select a record for display.
    fn select(&mut self, id: RecordId) -> Result<()>;

    /// Clear the selection.
    fn clear_selection(&mut self) -> Result<()>;

    /// Selected record id.
    fn selected(&self) -> Option<RecordId>;

    /// The selected record.
    fn selected_record(&self) -> Option<FileRecord> {
        self.selected().and_then(|id| self.get(id))
    }
}

/// In-process store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    next_id: RecordId,
    records: Vec<FileRecord>,
    #[serde(default)]
    selected: Option<RecordId>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            records: Vec::new(),
            selected: None,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStore for MemoryStore {
    fn add(&mut self, filename: &str, content: &str) -> Result<RecordId> {
        if filename.trim().is_empty() {
            return Err(Error::InvalidFilename);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.records.push(FileRecord {
            id,
            filename: filename.to_string(),
            content: content.to_string(),
            created: Utc::now(),
        });
        Ok(id)
    }

    fn list(&self) -> Vec<FileRecord> {
        self.records.clone()
    }

    fn get(&self, id: RecordId) -> Option<FileRecord> {
        self.position(id).map(|i| self.records[i].clone())
    }

    fn delete(&mut self, id: RecordId) -> Result<()> {
        let index = self.position(id).ok_or(Error::RecordNotFound(id))?;
        self.records.remove(index);
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(())
    }

    fn select(&mut self, id: RecordId) -> Result<()> {
        self.position(id).ok_or(Error::RecordNotFound(id))?;
        self.selected = Some(id);
        Ok(())
    }

    fn clear_selection(&mut self) -> Result<()> {
        self.selected = None;
        Ok(())
    }

    fn selected(&self) -> Option<RecordId> {
        self.selected
    }
}

/// Store persisted as a JSON file, rewritten after every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`, creating an empty one if it does not exist.
    ///
    /// When records exist and none is selected, the first is selected.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut inner = if path.exists() {
            let data = fs::read_to_string(&path)?;
            serde_json::from_str(&data)?
        } else {
            MemoryStore::new()
        };

        if inner.selected.is_none() {
            inner.selected = inner.records.first().map(|r| r.id);
        }
        log::debug!(
            "Opened store {} with {} records",
            path.display(),
            inner.records.len()
        );
        Ok(Self { path, inner })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.inner)?)?;
        Ok(())
    }
}

impl FileStore for JsonFileStore {
    fn add(&mut self, filename: &str, content: &str) -> Result<RecordId> {
        let id = self.inner.add(filename, content)?;
        self.save()?;
        Ok(id)
    }

    fn list(&self) -> Vec<FileRecord> {
        self.inner.list()
    }

    fn get(&self, id: RecordId) -> Option<FileRecord> {
        self.inner.get(id)
    }

    fn delete(&mut self, id: RecordId) -> Result<()> {
        self.inner.delete(id)?;
        self.save()
    }

    fn select(&mut self, id: RecordId) -> Result<()> {
        self.inner.select(id)?;
        self.save()
    }

    fn clear_selection(&mut self) -> Result<()> {
        self.inner.clear_selection()?;
        self.save()
    }

    fn selected(&self) -> Option<RecordId> {
        self.inner.selected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increment() {
        let mut store = MemoryStore::new();
        assert_eq!(store.add("a.md", "# A").unwrap(), 1);
        assert_eq!(store.add("b.md", "# B").unwrap(), 2);
        store.delete(2).unwrap();
        assert_eq!(store.add("c.md", "# C").unwrap(), 3);

        let names: Vec<String> = store.list().into_iter().map(|r| r.filename).collect();
        assert_eq!(names, vec!["a.md", "c.md"]);
    }

    #[test]
    fn test_invalid_filename() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.add("", "x"), Err(Error::InvalidFilename)));
        assert!(matches!(store.add("  ", "x"), Err(Error::InvalidFilename)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_missing() {
        let mut store = MemoryStore::new();
        assert!(matches!(store.delete(7), Err(Error::RecordNotFound(7))));
    }

    #[test]
    fn test_selection() {
        let mut store = MemoryStore::new();
        let id = store.add("a.md", "# A").unwrap();
        assert!(store.select(99).is_err());

        store.select(id).unwrap();
        assert_eq!(store.selected_record().unwrap().content, "# A");

        store.delete(id).unwrap();
        assert_eq!(store.selected(), None);
    }
}
