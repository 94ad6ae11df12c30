#![cfg(feature = "std")]
//! Save/load collaborators for mid-match persistence.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::core::MatchState;

/// Errors reported by a persistence backend.
#[derive(Debug)]
pub enum PersistError {
    /// No saved match exists under the id.
    NotFound(String),
    /// The id cannot be used as a save name.
    InvalidId(String),
    /// Reading or writing the backing store failed.
    Io(std::io::Error),
    /// The saved bytes are not a valid match.
    Corrupt(String),
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistError::NotFound(id) => write!(f, "No saved match named {:?}", id),
            PersistError::InvalidId(id) => write!(f, "Invalid save id {:?}", id),
            PersistError::Io(e) => write!(f, "Save file I/O error: {}", e),
            PersistError::Corrupt(msg) => write!(f, "Save file is corrupt: {}", msg),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(err: std::io::Error) -> Self {
        PersistError::Io(err)
    }
}

/// Stores and retrieves whole matches by id. Calls are blocking.
pub trait Persistence: Send {
    fn save(&mut self, state: &MatchState, id: &str) -> Result<(), PersistError>;
    fn load(&mut self, id: &str) -> Result<MatchState, PersistError>;
}

/// Ids travel inside a single protocol line and name files on disk.
pub fn validate_id(id: &str) -> Result<(), PersistError> {
    let ok = !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(PersistError::InvalidId(id.to_string()))
    }
}

/// Keeps saves in process memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    saves: HashMap<String, MatchState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.saves.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.saves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saves.is_empty()
    }
}

impl Persistence for MemoryStore {
    fn save(&mut self, state: &MatchState, id: &str) -> Result<(), PersistError> {
        validate_id(id)?;
        self.saves.insert(id.to_string(), state.clone());
        Ok(())
    }

    fn load(&mut self, id: &str) -> Result<MatchState, PersistError> {
        self.saves
            .get(id)
            .cloned()
            .ok_or_else(|| PersistError::NotFound(id.to_string()))
    }
}

/// Writes each save as `<dir>/<id>.sav`, bincode-encoded.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.sav", id))
    }
}

impl Persistence for FileStore {
    fn save(&mut self, state: &MatchState, id: &str) -> Result<(), PersistError> {
        validate_id(id)?;
        fs::create_dir_all(&self.dir)?;
        let data = bincode::serialize(state).map_err(|e| PersistError::Corrupt(e.to_string()))?;
        let path = self.path_for(id);
        let tmp = path.with_extension("sav.tmp");
        fs::write(&tmp, &data)?;
        fs::rename(&tmp, &path)?;
        log::info!("saved match {:?} to {}", id, path.display());
        Ok(())
    }

    fn load(&mut self, id: &str) -> Result<MatchState, PersistError> {
        validate_id(id)?;
        let path = self.path_for(id);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PersistError::NotFound(id.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        let state: MatchState =
            bincode::deserialize(&data).map_err(|e| PersistError::Corrupt(e.to_string()))?;
        state
            .validate()
            .map_err(|e| PersistError::Corrupt(e.to_string()))?;
        Ok(state)
    }
}
