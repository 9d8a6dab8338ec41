//! Mason hypermedia support.
//!
//! # Data Flow
//! ```text
//! record (GridMap / Observer / Obstacle)
//!     → builder.rs (gridmap-specific controls: create, edit, delete)
//!     → mason.rs (generic @controls / @namespaces / @error document)
//!     → serde_json::Value with insertion-ordered keys
//! ```
//!
//! The link relation namespace and profile URIs are fixed for the API.

pub mod builder;
pub mod mason;

pub use builder::MapBuilder;
pub use mason::MasonBuilder;

/// Media type of plain JSON bodies.
pub const JSON: &str = "application/json";
/// Media type of Mason hypermedia bodies.
pub const MASON: &str = "application/vnd.mason+json";

/// Prefix of the custom link relation namespace.
pub const NAMESPACE: &str = "pwp-map";
/// Where the custom link relations are documented.
pub const LINK_RELATIONS: &str = "/gridmap/link-relations/";
pub const MAP_PROFILE: &str = "/profiles/map/";
pub const OBSERVER_PROFILE: &str = "/profiles/observer/";
pub const ERROR_PROFILE: &str = "/profiles/error/";
