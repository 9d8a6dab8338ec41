//! Map inventory storage.
//!
//! # Data Flow
//! ```text
//! startup:   snapshot file → inventory.rs (load_from_file)
//! requests:  handlers → MapStore (RwLock<Inventory>) → cloned records
//! shutdown:  MapStore → snapshot file (save_to_file)
//! ```
//!
//! # Design Decisions
//! - Every operation is one short critical section; no await while locked
//! - Uniqueness and bounds are enforced here, not in the handlers
//! - Reads hand out clones so handlers never hold the lock while rendering

pub mod error;
pub mod inventory;

pub use error::{StoreError, StoreResult};
pub use inventory::{MapStore, PlacedObserver};
