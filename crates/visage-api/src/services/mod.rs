//! Upload pipeline and gallery services

pub mod gallery;
pub mod pipeline;

pub use gallery::GalleryService;
pub use pipeline::{PhotoPipeline, PipelineOutcome};
