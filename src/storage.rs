// src/storage.rs
use crate::error::{StoreError, StoreResult};
use crate::models::PasswordRecord;
use log;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File name of the record file inside the application data directory.
pub const RECORDS_FILE_NAME: &str = "passes.json";

/// Snapshot persistence for the record collection.
///
/// Implementations never keep a copy of the records: every `save` replaces
/// the whole stored collection and every `load` reads it back from scratch.
pub trait RecordStorage {
    fn save(&self, records: &[PasswordRecord]) -> StoreResult<()>;
    fn load(&self) -> StoreResult<Vec<PasswordRecord>>;
}

/// Stores the collection as a pretty-printed JSON array in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStorage for JsonFileStorage {
    /// Writes the records to a sibling temp file, then renames it over the target.
    fn save(&self, records: &[PasswordRecord]) -> StoreResult<()> {
        log::debug!("Saving {} records to {:?}", records.len(), self.path);
        let json = serde_json::to_string_pretty(records).map_err(|e| {
            let msg = format!("JSON serialization failed: {}", e);
            log::error!("save: {}", msg);
            StoreError::Serialization(msg)
        })?;

        write_atomic(&self.path, json.as_bytes()).map_err(|e| {
            log::error!("Failed to write record file {:?}: {:?}", self.path, e);
            StoreError::Io(e)
        })?;

        log::info!("Saved {} records to {:?}", records.len(), self.path);
        Ok(())
    }

    /// A missing or blank file is an empty collection; anything unparsable is fatal.
    fn load(&self) -> StoreResult<Vec<PasswordRecord>> {
        log::info!("Loading records from {:?}", self.path);
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("Record file {:?} does not exist yet, starting empty", self.path);
                return Ok(Vec::new());
            }
            Err(e) => {
                log::error!("Failed to read record file {:?}: {:?}", self.path, e);
                return Err(StoreError::Io(e));
            }
        };

        if contents.trim().is_empty() {
            log::info!("Record file {:?} is empty, starting empty", self.path);
            return Ok(Vec::new());
        }

        let records: Vec<PasswordRecord> = serde_json::from_str(&contents).map_err(|e| {
            let msg = format!("{:?}: {}", self.path, e);
            log::error!("load: {}", msg);
            StoreError::Parse(msg)
        })?;

        log::info!("Loaded {} records from {:?}", records.len(), self.path);
        Ok(records)
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(RECORDS_FILE_NAME);
    let temp_path = parent_dir.join(format!(".{}.{}.tmp", file_name, std::process::id()));

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}
