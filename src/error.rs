//! Error types for loading tile-set metadata and world settings.
//!
//! Generation itself is infallible; only the startup inputs can fail.

use std::path::PathBuf;

/// Errors raised while reading or validating tile-set metadata.
#[derive(Debug, thiserror::Error)]
pub enum TilesetError {
    #[error("failed to read tileset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tileset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("tile {atlas} uses terrain id {id}, limit is {max}")]
    TerrainOutOfRange { atlas: glam::UVec2, id: u8, max: u8 },

    #[error("tile {atlas} has invalid probability {weight}")]
    InvalidWeight { atlas: glam::UVec2, weight: f32 },
}

/// Errors raised while loading or validating [`crate::config::WorldSettings`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
