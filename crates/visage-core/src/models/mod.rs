//! Data models for the application
//!
//! Organised by pipeline stage: the photo being uploaded and stored, the face
//! analysis produced for it, and the gallery projection used by the read path.

mod analysis;
mod gallery;
mod photo;

pub use analysis::*;
pub use gallery::*;
pub use photo::*;
