//! The Project Store: local, atomic JSON persistence for project
//! documents, with default-filling migration and bounded history lists.

pub mod error;
pub mod fs_atomic;
pub mod history;
pub mod migration;
pub mod store;

pub use error::{StorageError, StorageResult};
pub use migration::ensure_project_defaults;
pub use store::ProjectStore;
