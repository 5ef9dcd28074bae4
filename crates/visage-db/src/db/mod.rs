//! Database repositories for data access layer
//
// Analysis recorder: trait plus Postgres and in-memory implementations
pub mod analysis;
//
// In-memory store for development and tests
pub mod memory;

pub use analysis::{ensure_matching_keys, AnalysisStore, PostgresAnalysisRepository};
pub use memory::MemoryAnalysisStore;
