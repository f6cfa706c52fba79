//! Image metadata shared by the provisioner, the page renderer and the CLI.
//!
//! Descriptors arrive from the page global (`window.Gallo.IMAGES`) or from a
//! JSON file on the command line. Both use the same shape:
//!
//! ```json
//! { "previews": [ { "url": "a-800.jpg", "width": 800, "height": 533 }, ... ] }
//! ```

use serde::{Deserialize, Serialize};

/// One resolution of an image, used as a `srcset` candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

/// An image to present, as an ordered list of preview variants.
///
/// The last preview is treated as the canonical (largest) one: aspect ratio
/// decisions and width estimates are derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    pub previews: Vec<Preview>,
}

impl ImageDescriptor {
    pub fn new(previews: Vec<Preview>) -> Self {
        Self { previews }
    }

    /// Build a descriptor from the raw preview list of a hosted attachment.
    ///
    /// The provider's final preview is sometimes delivered rotated onto its
    /// side, so it is dropped. The remainder is sorted by ascending width so
    /// the canonical preview ends up last.
    pub fn from_attachment_previews(mut previews: Vec<Preview>) -> Self {
        previews.pop();
        previews.sort_by_key(|p| p.width);
        Self { previews }
    }

    /// The canonical preview (last entry), if any.
    pub fn canonical(&self) -> Option<&Preview> {
        self.previews.last()
    }

    /// Width divided by height of the canonical preview.
    pub fn aspect_ratio(&self) -> Option<f64> {
        self.canonical()
            .filter(|p| p.height > 0)
            .map(|p| p.width as f64 / p.height as f64)
    }

    /// Whether the canonical preview is taller than it is wide.
    pub fn is_portrait(&self) -> bool {
        self.canonical().is_some_and(|p| p.width < p.height)
    }
}

/// Rendering area the card is laid out in, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

#[cfg(test)]
pub(crate) fn preview(url: &str, width: u32, height: u32) -> Preview {
    Preview {
        url: url.to_string(),
        width,
        height,
    }
}
