//! Program memory: the last used configuration, saved between cycles.
//!
//! The snapshot is a small JSON file holding a timestamp and the
//! `ProgramConfig`, written atomically with file locking.

use crate::{Error, ProgramConfig, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// File name used inside the data directory
pub const DEFAULT_FILE_NAME: &str = "531bbb_memory.json";

/// A saved configuration and when it was saved
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub saved_at: DateTime<Utc>,
    pub config: ProgramConfig,
}

impl Snapshot {
    /// Load a snapshot with shared locking
    ///
    /// Returns None if the file doesn't exist. Unlike user-facing config,
    /// a file that exists but can't be read or parsed is an error.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            tracing::debug!("No memory file found at {:?}", path);
            return Ok(None);
        }

        let file = File::open(path)
            .map_err(|e| Error::Memory(format!("failed to read {:?}: {}", path, e)))?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read.map_err(|e| Error::Memory(format!("failed to read {:?}: {}", path, e)))?;

        let snapshot: Snapshot = serde_json::from_str(&contents)
            .map_err(|e| Error::Memory(format!("failed to parse {:?}: {}", path, e)))?;

        tracing::debug!("Loaded memory snapshot from {:?}", path);
        Ok(Some(snapshot))
    }

    /// Save `config` with the current time
    ///
    /// Atomically writes the snapshot by:
    /// 1. Writing to a temp file (owner-only permissions)
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(path: &Path, config: &ProgramConfig) -> Result<Self> {
        let snapshot = Snapshot {
            saved_at: Utc::now(),
            config: config.clone(),
        };
        snapshot.write(path)?;
        Ok(snapshot)
    }

    fn write(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::info!("Saved program memory to {:?}", path);
        Ok(())
    }
}
