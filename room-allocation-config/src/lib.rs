use core::fmt::{Debug, Display};
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use room_allocation_engine::{CatalogError, DeskPool, ResourceCatalog, Room};
use serde::Deserialize;
use tracing::{debug, warn};

pub const CONFIG_FILE: &str = "room-allocation.toml";
pub const ENV_PREFIX: &str = "RA_";

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DeskPoolConfig {
    #[serde(default = "default_pool_name")]
    pub name: String,
    #[serde(default = "default_pool_capacity")]
    pub capacity: u32,
}

fn default_pool_name() -> String {
    DeskPool::DEFAULT_NAME.to_owned()
}

const fn default_pool_capacity() -> u32 {
    DeskPool::DEFAULT_CAPACITY
}

impl Default for DeskPoolConfig {
    fn default() -> Self {
        Self {
            name: default_pool_name(),
            capacity: default_pool_capacity(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub database_url: String,
    /// Fixes the random source of every run, otherwise each run draws a seed.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub desk_pool: DeskPoolConfig,
    /// A `rooms.json` style list of `{ "name", "capacity" }` entries. An entry
    /// named like the desk pool sets the pool's capacity.
    #[serde(default)]
    pub rooms_file: Option<PathBuf>,
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] Box<figment::Error>),
    #[error("could not read rooms file {path}: {source}")]
    RoomsFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse rooms file {path}: {source}")]
    RoomsFileFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid resource catalog: {0}")]
    Catalog(#[from] CatalogError),
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl From<figment::Error> for ConfigError {
    fn from(value: figment::Error) -> Self {
        Self::Figment(Box::new(value))
    }
}

#[derive(Deserialize)]
struct RoomsFileEntry {
    name: Option<String>,
    capacity: Option<u32>,
}

#[must_use]
pub fn figment() -> Figment {
    Figment::new()
        .merge(Toml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

pub fn get_config() -> Result<Config, ConfigError> {
    Ok(figment().extract()?)
}

impl Config {
    /// Builds the validated catalog from the inline rooms and the rooms file.
    pub fn catalog(&self) -> Result<ResourceCatalog, ConfigError> {
        let mut rooms = self.rooms.clone();
        let mut desk_pool = DeskPool {
            name: self.desk_pool.name.clone(),
            capacity: self.desk_pool.capacity,
        };
        if let Some(path) = &self.rooms_file {
            for entry in read_rooms_file(path)? {
                if entry.name == desk_pool.name {
                    desk_pool.capacity = entry.capacity;
                } else {
                    rooms.push(entry);
                }
            }
        }
        debug!(rooms = rooms.len(), desk_pool = %desk_pool.name, "loaded resource catalog");
        Ok(ResourceCatalog::new(rooms, desk_pool)?)
    }
}

fn read_rooms_file(path: &Path) -> Result<Vec<Room>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::RoomsFile {
        path: path.to_owned(),
        source,
    })?;
    let entries: Vec<RoomsFileEntry> =
        serde_json::from_str(&content).map_err(|source| ConfigError::RoomsFileFormat {
            path: path.to_owned(),
            source,
        })?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            RoomsFileEntry {
                name: Some(name),
                capacity: Some(capacity),
            } => Some(Room { name, capacity }),
            RoomsFileEntry { name, .. } => {
                warn!(?name, path = %path.display(), "ignoring incomplete rooms file entry");
                None
            }
        })
        .collect())
}
