pub mod analysis;
pub mod gallery;
pub mod health;
pub mod media;
pub mod photo_upload;
