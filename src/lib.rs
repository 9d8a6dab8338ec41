//! Grid map inventory service with a Mason hypermedia API.

pub mod api;
pub mod cache;
pub mod config;
pub mod http;
pub mod hypermedia;
pub mod lifecycle;
pub mod management;
pub mod model;
pub mod observability;
pub mod store;
pub mod validation;

pub use config::schema::GridmapConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use store::MapStore;
