use serde::Serialize;
use utoipa::ToSchema;

use super::Likelihood;

/// One photo as shown by the gallery.
///
/// `joy` is filled from the recorded analysis when one exists for the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GalleryEntry {
    pub key: String,
    pub public_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joy: Option<Likelihood>,
}

impl GalleryEntry {
    pub fn new(key: impl Into<String>, public_url: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            public_url: public_url.into(),
            joy: None,
        }
    }

    pub fn with_joy(mut self, joy: Option<Likelihood>) -> Self {
        self.joy = joy;
        self
    }
}
