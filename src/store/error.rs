//! Inventory error definitions.

use thiserror::Error;

/// Errors raised by inventory operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Map '{0}' not found")]
    MapNotFound(String),

    #[error("Observer '{observer}' not found on map '{map}'")]
    ObserverNotFound { map: String, observer: String },

    #[error("A map named '{0}' already exists")]
    DuplicateMap(String),

    #[error("An observer named '{0}' already exists")]
    DuplicateObserver(String),

    /// The name produces an empty slug and could never be addressed.
    #[error("Name '{0}' does not contain any letters or digits")]
    UnaddressableName(String),

    /// A placement fell outside the map; `kind` is "Observer" or "Obstacle".
    #[error("{kind} is outside map")]
    OutOfBounds { kind: &'static str },

    /// A resize would leave observers or obstacles outside the map.
    #[error("Map contents do not fit in {width} x {height}")]
    ContentsOutOfBounds { width: u32, height: u32 },

    #[error("Snapshot IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot format error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
