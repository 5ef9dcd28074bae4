//! Visage persistence
//!
//! Durable association between an object key and its face analysis.

pub mod db;

pub use db::{AnalysisStore, MemoryAnalysisStore, PostgresAnalysisRepository};
