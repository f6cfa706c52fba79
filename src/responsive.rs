//! `srcset` and `sizes` attribute values.
//!
//! Pure functions: the viewport is passed in, nothing touches the DOM.

use crate::types::{ImageDescriptor, Viewport};

/// `srcset` candidate list: one `url Ww` entry per preview, in preview order.
///
/// ```
/// # use gallo_card::types::{ImageDescriptor, Preview};
/// # use gallo_card::responsive::srcset;
/// let image = ImageDescriptor::new(vec![
///     Preview { url: "a-400.jpg".into(), width: 400, height: 300 },
///     Preview { url: "a-800.jpg".into(), width: 800, height: 600 },
/// ]);
/// assert_eq!(srcset(&image), "a-400.jpg 400w, a-800.jpg 800w");
/// ```
pub fn srcset(image: &ImageDescriptor) -> String {
    image
        .previews
        .iter()
        .map(|p| format!("{} {}w", p.url, p.width))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `sizes` value: the fraction of viewport width the image will occupy.
///
/// Images are laid out at full viewport height. A landscape or square image
/// then spans at least the full width, so it asks for `100vw`. A portrait
/// image leaves space on both sides; its share of the width is its aspect
/// ratio relative to the viewport's, as a rounded percentage.
pub fn sizes(image: &ImageDescriptor, viewport: Viewport) -> String {
    match image.canonical() {
        Some(p) if p.width < p.height => {
            let image_ratio = p.width as f64 / p.height as f64;
            let percent = (image_ratio / viewport.aspect_ratio() * 100.0).round();
            format!("{}vw", percent as i64)
        }
        _ => "100vw".to_string(),
    }
}

/// Width the image renders at when scaled to the viewport height.
pub fn rendered_width(image: &ImageDescriptor, viewport: Viewport) -> f64 {
    image
        .aspect_ratio()
        .map(|ratio| viewport.height * ratio)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::preview;

    fn image(previews: &[(u32, u32)]) -> ImageDescriptor {
        ImageDescriptor::new(
            previews
                .iter()
                .enumerate()
                .map(|(i, &(w, h))| preview(&format!("img-{i}.jpg"), w, h))
                .collect(),
        )
    }

    #[test]
    fn srcset_lists_every_preview() {
        let img = image(&[(300, 200), (600, 400), (1200, 800)]);
        assert_eq!(
            srcset(&img),
            "img-0.jpg 300w, img-1.jpg 600w, img-2.jpg 1200w"
        );
    }

    #[test]
    fn srcset_empty_for_no_previews() {
        assert_eq!(srcset(&image(&[])), "");
    }

    #[test]
    fn landscape_is_full_width() {
        let img = image(&[(1000, 600)]);
        assert_eq!(sizes(&img, Viewport::new(1280.0, 800.0)), "100vw");
    }

    #[test]
    fn square_is_full_width() {
        let img = image(&[(800, 800)]);
        assert_eq!(sizes(&img, Viewport::new(1280.0, 800.0)), "100vw");
    }

    #[test]
    fn portrait_share_of_viewport() {
        // (500/1000) / (1000/600) = 0.3
        let img = image(&[(500, 1000)]);
        assert_eq!(sizes(&img, Viewport::new(1000.0, 600.0)), "30vw");
    }

    #[test]
    fn portrait_uses_last_preview() {
        // the small landscape preview is ignored; (2/3) / (4/3) = 0.5
        let img = image(&[(300, 200), (800, 1200)]);
        assert_eq!(sizes(&img, Viewport::new(1200.0, 900.0)), "50vw");
    }

    #[test]
    fn portrait_in_portrait_viewport_can_exceed_full_width() {
        // (3/4) / (1/2) = 1.5
        let img = image(&[(600, 800)]);
        assert_eq!(sizes(&img, Viewport::new(400.0, 800.0)), "150vw");
    }

    #[test]
    fn rendered_width_scales_to_viewport_height() {
        let img = image(&[(1500, 1000)]);
        assert_eq!(rendered_width(&img, Viewport::new(1280.0, 800.0)), 1200.0);
    }
}
