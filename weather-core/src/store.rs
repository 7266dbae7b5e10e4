//! Persistence slot for the last successfully searched city.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use std::{
    fmt::Debug,
    fs, io,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

pub trait LastCityStore: Send + Sync + Debug {
    fn save(&self, city: &str) -> Result<()>;
    fn load(&self) -> Result<Option<String>>;
}

/// Plain text file holding a single city name, no expiry.
#[derive(Debug, Clone)]
pub struct FileLastCityStore {
    path: PathBuf,
}

impl FileLastCityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform data directory.
    pub fn in_data_dir() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(Self::new(dirs.data_dir().join("last_city")))
    }
}

impl LastCityStore for FileLastCityStore {
    fn save(&self, city: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {}", parent.display()))?;
        }

        fs::write(&self.path, city)
            .with_context(|| format!("Failed to write last city file: {}", self.path.display()))
    }

    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(city) if city.is_empty() => Ok(None),
            Ok(city) => Ok(Some(city)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read last city file: {}", self.path.display())),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryLastCityStore {
    city: Mutex<Option<String>>,
}

impl LastCityStore for MemoryLastCityStore {
    fn save(&self, city: &str) -> Result<()> {
        *self.city.lock().unwrap_or_else(PoisonError::into_inner) = Some(city.to_string());
        Ok(())
    }

    fn load(&self) -> Result<Option<String>> {
        Ok(self.city.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }
}
