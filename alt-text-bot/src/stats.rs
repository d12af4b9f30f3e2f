use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Durable count of reminders sent.
pub trait StatsStore: Send + Sync {
    fn read(&self) -> Result<u64>;

    /// Adds one reminder and returns the new count.
    fn increment(&self) -> Result<u64>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StatsFile {
    reminders: u64,
}

/// Stats persisted as a small TOML file.
pub struct FileStats {
    path: PathBuf,
    temp_path: PathBuf,
    // Guards read-modify-write so concurrent handlers never lose an increment
    lock: Mutex<()>,
}

impl FileStats {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut temp_path = path.clone().into_os_string();
        temp_path.push(".tmp");

        Self {
            path,
            temp_path: temp_path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<StatsFile> {
        match fs::read_to_string(&self.path) {
            Ok(content) => toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", self.path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(StatsFile::default()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        }
    }

    /// Save to disk atomically (write to temp file, then rename).
    fn save(&self, stats: &StatsFile) -> Result<()> {
        fs::write(&self.temp_path, toml::to_string_pretty(stats)?)
            .context("Failed to write temp stats file")?;
        fs::rename(&self.temp_path, &self.path).context("Failed to rename stats file")?;
        Ok(())
    }
}

impl StatsStore for FileStats {
    fn read(&self) -> Result<u64> {
        let _guard = self.lock.lock().unwrap();
        Ok(self.load()?.reminders)
    }

    fn increment(&self) -> Result<u64> {
        let _guard = self.lock.lock().unwrap();
        let mut stats = self.load()?;
        stats.reminders += 1;
        self.save(&stats)?;
        Ok(stats.reminders)
    }
}
