use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::calendar::EventLog;
use crate::links::LinkBoard;
use crate::notes::Notes;
use crate::profile::User;
use crate::timer::TimerEngine;
use crate::todo::TodoList;

/// Everything the app persists, as one JSON document. Every field carries
/// a serde default so a malformed or partial file degrades to defaults
/// instead of failing the load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileData {
    pub user: Option<User>,
    pub todos: TodoList,
    pub notes: Notes,
    pub links: LinkBoard,
    pub events: EventLog,
    pub timer: TimerEngine,
}

pub trait ProfileStore {
    fn load(&self) -> ProfileData;
    fn save(&self, data: &ProfileData) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileProfileStore {
    path: PathBuf,
}

impl FileProfileStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "cozyspace") {
            pd.data_dir().join("profile.json")
        } else {
            PathBuf::from("cozyspace_profile.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileStore for FileProfileStore {
    fn load(&self) -> ProfileData {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(data) = serde_json::from_slice::<ProfileData>(&bytes) {
                return data;
            }
        }
        ProfileData::default()
    }

    fn save(&self, data: &ProfileData) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(data).unwrap_or_default();
        fs::write(&self.path, bytes)
    }
}

/// Writes an export of the whole profile to `path`.
pub fn export_to(path: &Path, data: &ProfileData) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let bytes = serde_json::to_vec_pretty(data).unwrap_or_default();
    fs::write(path, bytes)
}

/// Reads a previously exported profile. Unlike [`ProfileStore::load`] this
/// surfaces the failure, so the UI can tell the user the file was bad.
pub fn import_from(path: &Path) -> io::Result<ProfileData> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
