//! The surface the presentation draws on.
//!
//! The [`Stage`] trait is the seam between the presentation logic and the
//! page: it owns the cover element, the images container and the image
//! elements appended to it. The browser implementation lives in the `web`
//! module; [`RecordingStage`] records operations without a DOM and backs the
//! `simulate` command and the tests.

use crate::provision::ImagePlan;
use crate::types::Viewport;

/// Element a visual flag is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Cover,
    Images,
    /// Image element by insertion index.
    Image(usize),
}

/// Visual flags, rendered as CSS classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Transparent,
    Hidden,
    Focus,
}

impl Flag {
    pub fn class_name(self) -> &'static str {
        match self {
            Flag::Transparent => "transparent",
            Flag::Hidden => "hidden",
            Flag::Focus => "focus",
        }
    }
}

/// Horizontal placement of an inserted image inside the strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageLayout {
    pub offset_left: f64,
    pub width: f64,
}

pub trait Stage {
    /// Size of the area the card fills.
    fn viewport(&self) -> Viewport;

    /// Create an image element for `plan` and append it to the images
    /// container. Returns the insertion index.
    fn append_image(&mut self, plan: &ImagePlan) -> usize;

    fn add_flag(&mut self, target: Target, flag: Flag);

    fn remove_flag(&mut self, target: Target, flag: Flag);

    /// Current layout of the image at `index`.
    fn image_layout(&self, index: usize) -> ImageLayout;

    /// Move the images strip horizontally to `x` pixels.
    fn translate_images(&mut self, x: f64);
}

/// An operation performed on a [`RecordingStage`].
#[derive(Debug, Clone, PartialEq)]
pub enum StageOp {
    Append { index: usize, sizes: String },
    AddFlag(Target, Flag),
    RemoveFlag(Target, Flag),
    Translate(f64),
}

/// Stage that records operations and lays images out side by side at their
/// estimated widths.
#[derive(Debug, Clone)]
pub struct RecordingStage {
    viewport: Viewport,
    layouts: Vec<ImageLayout>,
    ops: Vec<StageOp>,
}

impl RecordingStage {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layouts: Vec::new(),
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[StageOp] {
        &self.ops
    }

    /// Drain recorded operations, keeping the layout.
    pub fn take_ops(&mut self) -> Vec<StageOp> {
        std::mem::take(&mut self.ops)
    }

    pub fn image_count(&self) -> usize {
        self.layouts.len()
    }

    /// Whether `flag` is currently set on `target`, judged from the recorded
    /// history.
    pub fn has_flag(&self, target: Target, flag: Flag) -> bool {
        self.ops.iter().fold(false, |on, op| match op {
            StageOp::AddFlag(t, f) if *t == target && *f == flag => true,
            StageOp::RemoveFlag(t, f) if *t == target && *f == flag => false,
            _ => on,
        })
    }

    /// Last translation applied to the strip.
    pub fn last_translate(&self) -> Option<f64> {
        self.ops.iter().rev().find_map(|op| match op {
            StageOp::Translate(x) => Some(*x),
            _ => None,
        })
    }
}

impl Stage for RecordingStage {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn append_image(&mut self, plan: &ImagePlan) -> usize {
        let offset_left = self
            .layouts
            .last()
            .map(|l| l.offset_left + l.width)
            .unwrap_or(0.0);
        self.layouts.push(ImageLayout {
            offset_left,
            width: plan.estimated_width,
        });
        let index = self.layouts.len() - 1;
        self.ops.push(StageOp::Append {
            index,
            sizes: plan.sizes.clone(),
        });
        index
    }

    fn add_flag(&mut self, target: Target, flag: Flag) {
        self.ops.push(StageOp::AddFlag(target, flag));
    }

    fn remove_flag(&mut self, target: Target, flag: Flag) {
        self.ops.push(StageOp::RemoveFlag(target, flag));
    }

    fn image_layout(&self, index: usize) -> ImageLayout {
        self.layouts.get(index).copied().unwrap_or(ImageLayout {
            offset_left: 0.0,
            width: 0.0,
        })
    }

    fn translate_images(&mut self, x: f64) {
        self.ops.push(StageOp::Translate(x));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(width: f64) -> ImagePlan {
        ImagePlan {
            source: 0,
            srcset: String::new(),
            sizes: "100vw".into(),
            height: 800.0,
            estimated_width: width,
        }
    }

    #[test]
    fn images_are_laid_out_side_by_side() {
        let mut stage = RecordingStage::new(Viewport::new(1000.0, 800.0));
        assert_eq!(stage.append_image(&plan(300.0)), 0);
        assert_eq!(stage.append_image(&plan(500.0)), 1);
        assert_eq!(
            stage.image_layout(1),
            ImageLayout {
                offset_left: 300.0,
                width: 500.0
            }
        );
    }

    #[test]
    fn flag_history() {
        let mut stage = RecordingStage::new(Viewport::new(1000.0, 800.0));
        assert!(!stage.has_flag(Target::Cover, Flag::Transparent));
        stage.add_flag(Target::Cover, Flag::Transparent);
        assert!(stage.has_flag(Target::Cover, Flag::Transparent));
        stage.remove_flag(Target::Cover, Flag::Transparent);
        assert!(!stage.has_flag(Target::Cover, Flag::Transparent));
    }

    #[test]
    fn class_names() {
        assert_eq!(Flag::Transparent.class_name(), "transparent");
        assert_eq!(Flag::Hidden.class_name(), "hidden");
        assert_eq!(Flag::Focus.class_name(), "focus");
    }
}
