//! Domain model for the grid map inventory.
//!
//! # Data Flow
//! ```text
//! request body (serde_json::Value)
//!     → schema.rs (JSON schema the body must satisfy)
//!     → *Payload (typed, validated input)
//!     → store (GridMap / Observer / Obstacle records)
//!     → plain JSON via Serialize, Mason via hypermedia
//! ```
//!
//! # Design Decisions
//! - Records own their children: a map holds its observers and obstacles
//! - Slugs are derived from names, never accepted from clients
//! - Schemas are hand-declared `serde_json::Value`s so they can be served
//!   verbatim inside hypermedia controls

pub mod map;
pub mod observer;
pub mod obstacle;
pub mod schema;
pub mod slug;

pub use map::{GridMap, MapPayload, MapSummary};
pub use observer::{Observer, ObserverDetail, ObserverPayload};
pub use obstacle::{Obstacle, ObstaclePayload};
pub use slug::slugify;

/// Maximum length of map and observer names, in characters.
pub const MAX_NAME_LENGTH: usize = 32;
