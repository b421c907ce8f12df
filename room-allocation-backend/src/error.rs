use core::fmt::{Debug, Display};

use room_allocation_config::ConfigError;
use room_allocation_database::DatabaseError;
use room_allocation_engine::WeekError;

#[derive(thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("invalid week: {0}")]
    Week(#[from] WeekError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
