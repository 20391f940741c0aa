pub mod reference_store;
pub mod refresher;
pub mod storage;

// Re-export cache types
pub use reference_store::{ReferenceDataStore, TableState};
pub use refresher::{CacheRefresher, RefresherHandle};
pub use storage::{CacheStorage, FileCacheStorage, ReferenceKind};
