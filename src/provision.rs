//! Image Provisioner.
//!
//! Turns the shuffled descriptors into image elements on a [`Stage`]. Each
//! image is rendered at full viewport height, so its on-screen width is the
//! viewport height times its aspect ratio. Insertion stops at the first image
//! that would push the summed width past the configured limit: some WebKit
//! builds crash when a single layer grows wider than roughly 22500px.
//!
//! Planning is pure ([`plan_images`]); [`provision`] applies a plan to a
//! stage.

use crate::responsive;
use crate::stage::Stage;
use crate::types::{ImageDescriptor, Viewport};
use tracing::{info, warn};

/// Everything needed to create one image element.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlan {
    /// Index of the descriptor this plan was built from.
    pub source: usize,
    pub srcset: String,
    pub sizes: String,
    /// Element height in px (the viewport height).
    pub height: f64,
    /// Rendered width at `height`.
    pub estimated_width: f64,
}

/// Result of provisioning.
#[derive(Debug, Clone, PartialEq)]
pub struct Provisioned {
    /// Number of image elements appended.
    pub count: usize,
    /// Summed estimated width of the appended images.
    pub total_width: f64,
    /// Descriptors left out because the width budget ran out.
    pub dropped: usize,
    /// Descriptors skipped for having no usable preview.
    pub skipped: usize,
}

/// Plan image elements in order until the width budget is exhausted.
///
/// The summed `estimated_width` of the result never exceeds `width_limit`.
pub fn plan_images(
    images: &[ImageDescriptor],
    viewport: Viewport,
    width_limit: f64,
) -> Vec<ImagePlan> {
    let mut plans = Vec::with_capacity(images.len());
    let mut total = 0.0;

    for (source, image) in images.iter().enumerate() {
        if image.aspect_ratio().is_none() {
            warn!(source, "skipping image without a usable preview");
            continue;
        }
        let width = responsive::rendered_width(image, viewport);
        if total + width > width_limit {
            break;
        }
        total += width;
        plans.push(ImagePlan {
            source,
            srcset: responsive::srcset(image),
            sizes: responsive::sizes(image, viewport),
            height: viewport.height,
            estimated_width: width,
        });
    }

    plans
}

/// Plan against the stage's viewport and append the resulting elements.
pub fn provision<S: Stage>(
    stage: &mut S,
    images: &[ImageDescriptor],
    width_limit: f64,
) -> Provisioned {
    let plans = plan_images(images, stage.viewport(), width_limit);
    for plan in &plans {
        stage.append_image(plan);
    }

    let skipped = images
        .iter()
        .filter(|image| image.aspect_ratio().is_none())
        .count();
    let provisioned = Provisioned {
        count: plans.len(),
        total_width: plans.iter().map(|p| p.estimated_width).sum(),
        dropped: images.len() - plans.len() - skipped,
        skipped,
    };
    info!(
        count = provisioned.count,
        total_width = provisioned.total_width,
        dropped = provisioned.dropped,
        skipped = provisioned.skipped,
        "provisioned images"
    );
    provisioned
}
