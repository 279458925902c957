//! File-based document store for persistent storage.

use crate::address::Address;
use crate::error::{StorageError, StorageResult};
use crate::store::DocumentStore;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::trace;
use uuid::Uuid;

/// File extension of stored documents.
const DOCUMENT_EXTENSION: &str = "xml";

/// A directory-backed document store.
///
/// Every document lives in its own file:
///
/// - `<uuid>` is stored at `<root>/<uuid>.xml`
/// - `<segment>/<uuid>` is stored at `<root>/<segment>/<uuid>.xml`
///
/// Data survives process restarts.
///
/// # Durability
///
/// A write goes to a uniquely named temporary file in the target directory,
/// is synced, and is then renamed over the target. A reader therefore sees
/// either the complete previous document or the complete new one.
///
/// # Example
///
/// ```no_run
/// use atomlog_storage::{Address, DocumentStore, FileStore};
/// use std::path::Path;
/// use uuid::Uuid;
///
/// let store = FileStore::open(Path::new("streams")).unwrap();
/// store.write(&Address::new(Uuid::new_v4()), b"<feed/>").unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens or creates a store rooted at `root`.
    ///
    /// The directory (and its parents) are created if missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created, or if `root`
    /// exists but is not a directory.
    pub fn open(root: &Path) -> StorageResult<Self> {
        fs::create_dir_all(root)?;
        if !root.is_dir() {
            return Err(StorageError::Corrupted(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file path a document address maps to.
    #[must_use]
    pub fn path_of(&self, address: &Address) -> PathBuf {
        let file_name = format!("{}.{DOCUMENT_EXTENSION}", address.id().hyphenated());
        match address.segment() {
            Some(segment) => self.root.join(segment).join(file_name),
            None => self.root.join(file_name),
        }
    }

    fn collect_documents(
        dir: &Path,
        segment: Option<&str>,
        out: &mut Vec<Address>,
    ) -> StorageResult<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type()?;

            if file_type.is_dir() {
                // Only one level of nesting is addressable.
                if segment.is_none() {
                    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                        Self::collect_documents(&path, Some(name), out)?;
                    }
                }
                continue;
            }

            if path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXTENSION) {
                continue;
            }
            let Some(id) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| Uuid::parse_str(s).ok())
            else {
                continue;
            };

            let address = match segment {
                Some(segment) => match Address::with_segment(segment, id) {
                    Ok(address) => address,
                    Err(_) => continue,
                },
                None => Address::new(id),
            };
            out.push(address);
        }
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn read(&self, address: &Address) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(self.path_of(address)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, address: &Address, document: &[u8]) -> StorageResult<()> {
        let path = self.path_of(address);
        let dir = path
            .parent()
            .ok_or_else(|| StorageError::invalid_address(address.to_string()))?;
        fs::create_dir_all(dir)?;

        let temp = dir.join(format!(".{}.tmp", Uuid::new_v4().simple()));
        let result = (|| -> io::Result<()> {
            let mut file = File::create(&temp)?;
            file.write_all(document)?;
            file.sync_all()?;
            fs::rename(&temp, &path)
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }

        trace!(%address, bytes = document.len(), "document written");
        Ok(())
    }

    fn addresses(&self) -> StorageResult<Vec<Address>> {
        let mut addresses = Vec::new();
        Self::collect_documents(&self.root, None, &mut addresses)?;
        addresses.sort();
        Ok(addresses)
    }
}
