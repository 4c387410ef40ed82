pub mod backend;
pub mod mapping;
pub mod models;

pub use backend::{BlobStorage, FileBlobStorage, MemoryBlobStorage, StorageFactory};
pub use mapping::{MAPPINGS_KEY, MappingStore};
pub use models::{Click, DIRECT_SOURCE, Entry, EntryStatus, MS_PER_MINUTE, Mapping};
