//! Whole-file JSON documents addressed by a logical key.

use crate::StoreError;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Map, Serializer, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Key of the document holding every guild configuration.
pub const CONFIGS_KEY: &str = "configs";

/// Key of the document holding every panel edit session.
pub const EDIT_SESSIONS_KEY: &str = "edit_sessions";

/// A JSON object stored on disk.
pub type Document = Map<String, Value>;

/// Directory of JSON documents, one file per key.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    /// Opens a document directory, creating it when missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Writes an empty object for each known document that does not exist yet.
    pub fn init(&self) -> Result<(), StoreError> {
        for key in [CONFIGS_KEY, EDIT_SESSIONS_KEY] {
            if !self.path_for(key).exists() {
                debug!(key, "Seeding empty document");
                self.save(key, &Document::new())?;
            }
        }
        Ok(())
    }

    /// Directory the documents live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing a key.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Loads a document.
    ///
    /// A missing, unreadable or non-object file is treated as empty.
    pub fn load(&self, key: &str) -> Document {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Document::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read document");
                return Document::new();
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(document)) => document,
            Ok(_) => {
                warn!(path = %path.display(), "Document is not a JSON object, treating as empty");
                Document::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to parse document");
                Document::new()
            }
        }
    }

    /// Replaces a document.
    ///
    /// The content goes to a temporary file in the same directory which is
    /// then renamed over the target, so readers never see a partial write.
    pub fn save(&self, key: &str, document: &Document) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;

        let mut file = NamedTempFile::new_in(&self.dir)?;
        {
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut serializer = Serializer::with_formatter(file.as_file_mut(), formatter);
            document.serialize(&mut serializer)?;
        }
        file.as_file_mut().flush()?;

        let path = self.path_for(key);
        file.persist(&path).map_err(|e| StoreError::Io(e.error))?;
        debug!(path = %path.display(), entries = document.len(), "Saved document");
        Ok(())
    }
}
