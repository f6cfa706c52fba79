//! Perpetual image cycling.
//!
//! Each tick slides the images strip so the current image is in view and
//! moves the cursor on, wrapping around forever. The first image is aligned
//! to the left edge of the viewport, the last to the right edge, and every
//! other image is centred.

use crate::stage::ImageLayout;

/// Strip translation (px) that brings image `index` of `count` into view.
pub fn strip_offset(
    index: usize,
    count: usize,
    layout: ImageLayout,
    presentation_width: f64,
) -> f64 {
    if index == 0 {
        0.0
    } else if index + 1 == count {
        -layout.offset_left + (presentation_width - layout.width)
    } else {
        -layout.offset_left + (presentation_width - layout.width) / 2.0
    }
}

/// `cssText` for the images container at offset `x`.
pub fn translate_css(transform_property: &str, x: f64) -> String {
    format!("{transform_property}: translate3d({x}px, 0, 0)")
}

/// Cursor over the provisioned images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    index: usize,
    count: usize,
}

impl Cycle {
    /// `count` must be non-zero.
    pub fn new(count: usize) -> Self {
        debug_assert!(count > 0, "cycle over no images");
        Self { index: 0, count }
    }

    pub fn current(&self) -> usize {
        self.index
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Return the image to show now and move the cursor to the next one.
    pub fn advance(&mut self) -> usize {
        let shown = self.index;
        self.index = (self.index + 1) % self.count;
        shown
    }
}
