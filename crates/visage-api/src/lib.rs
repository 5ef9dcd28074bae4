//! Visage API Library
//!
//! HTTP surface of the photo pipeline: the upload endpoint, the gallery pages,
//! analysis lookups, health checks and application setup.

mod api_doc;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use error::{ErrorResponse, HttpAppError};
pub use services::{GalleryService, PhotoPipeline, PipelineOutcome};
pub use state::AppState;
