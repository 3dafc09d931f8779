//! Record persistence and brute-force similarity search.

pub mod backend;
pub mod error;
pub mod file;
pub mod memory;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;
pub mod similarity;
pub mod store;


pub use backend::{RecordBackend, ScannedRecord};
pub use error::{StoreError, StoreResult};
pub use file::FileBackend;
pub use memory::MemoryBackend;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockRecordBackend;
pub use model::{CacheRecord, SimilarityMatch};
pub use similarity::cosine_similarity;
pub use store::{VectorIndex, VectorStore, rank_matches};
