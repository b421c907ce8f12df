use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A dedicated room. It holds exactly one team per day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub capacity: u32,
}

/// A shared pool of hot-desks, booked per person and day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskPool {
    pub name: String,
    pub capacity: u32,
}

impl DeskPool {
    pub const DEFAULT_CAPACITY: u32 = 15;
    pub const DEFAULT_NAME: &'static str = "Oasis";
}

impl Default for DeskPool {
    fn default() -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_owned(),
            capacity: Self::DEFAULT_CAPACITY,
        }
    }
}

/// The static set of bookable resources of an office.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceCatalog {
    rooms: Vec<Room>,
    desk_pool: DeskPool,
}

impl ResourceCatalog {
    pub fn new(rooms: Vec<Room>, desk_pool: DeskPool) -> Result<Self, CatalogError> {
        let mut names = HashSet::new();
        let entries = rooms
            .iter()
            .map(|room| (&room.name, room.capacity))
            .chain([(&desk_pool.name, desk_pool.capacity)]);
        for (name, capacity) in entries {
            if name.trim().is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if capacity == 0 {
                return Err(CatalogError::ZeroCapacity(name.clone()));
            }
            if !names.insert(name.as_str()) {
                return Err(CatalogError::DuplicateName(name.clone()));
            }
        }
        Ok(Self { rooms, desk_pool })
    }

    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    #[must_use]
    pub const fn desk_pool(&self) -> &DeskPool {
        &self.desk_pool
    }
}
