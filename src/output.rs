//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! ## Plan
//!
//! ```text
//! Viewport 1280x800, width budget 22500px
//! 001 landscape 1200px (100vw)
//!     Source: #3 a-2048.jpg
//!     srcset: a-640.jpg 640w, a-2048.jpg 2048w
//! 002 portrait 533px (52vw)
//!     Source: #0 b-1600.jpg
//!
//! Provisioned 2 images, 1733px of 22500px (1 left out)
//! ```
//!
//! ## Simulate
//!
//! ```text
//! 001 image-load      none → none
//! 002 cover-timeout   none → coverTimedOut
//! 003 image-load      coverTimedOut → fadingOutCover
//!     effect: await cover fade
//!     stage: add transparent to cover
//! ```

use crate::config::CardConfig;
use crate::presentation::Effect;
use crate::provision::ImagePlan;
use crate::simulate::Step;
use crate::stage::{Flag, StageOp, Target};
use crate::types::{ImageDescriptor, Viewport};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn orientation(image: &ImageDescriptor) -> &'static str {
    match image.aspect_ratio() {
        Some(r) if r < 1.0 => "portrait",
        Some(r) if r == 1.0 => "square",
        _ => "landscape",
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check(config: &CardConfig) -> Vec<String> {
    let p = &config.presentation;
    let mut lines = vec![format!("{} images", config.images.len())];
    for (i, image) in config.images.iter().enumerate() {
        let canonical = image
            .canonical()
            .map(|c| format!("{} ({}x{})", c.url, c.width, c.height))
            .unwrap_or_default();
        lines.push(format!(
            "{} {} {} previews, {}",
            format_index(i + 1),
            orientation(image),
            image.previews.len(),
            canonical
        ));
    }
    lines.push(String::new());
    lines.push("Presentation".to_string());
    lines.push(format!("{}show: {}ms", indent(1), p.show_duration));
    lines.push(format!("{}fade: {}ms", indent(1), p.fade_duration));
    lines.push(format!("{}cover timeout: {}ms", indent(1), p.cover_timeout));
    lines.push(format!("{}load wait count: {}", indent(1), p.load_wait_count));
    lines.push(format!("{}width limit: {}px", indent(1), p.width_limit));
    lines.push(match p.auto_reload {
        Some(ms) => format!("{}auto reload: {}ms", indent(1), ms),
        None => format!("{}auto reload: off", indent(1)),
    });
    lines
}

pub fn print_check(config: &CardConfig) {
    for line in format_check(config) {
        println!("{}", line);
    }
}

// ============================================================================
// Plan
// ============================================================================

pub fn format_plan(
    images: &[ImageDescriptor],
    plans: &[ImagePlan],
    viewport: Viewport,
    width_limit: f64,
) -> Vec<String> {
    let mut lines = vec![format!(
        "Viewport {}x{}, width budget {}px",
        viewport.width, viewport.height, width_limit
    )];

    for (i, plan) in plans.iter().enumerate() {
        let image = &images[plan.source];
        lines.push(format!(
            "{} {} {}px ({})",
            format_index(i + 1),
            orientation(image),
            plan.estimated_width.round(),
            plan.sizes
        ));
        if let Some(canonical) = image.canonical() {
            lines.push(format!(
                "{}Source: #{} {}",
                indent(1),
                plan.source,
                canonical.url
            ));
        }
        if image.previews.len() > 1 {
            lines.push(format!("{}srcset: {}", indent(1), plan.srcset));
        }
    }

    let total: f64 = plans.iter().map(|p| p.estimated_width).sum();
    let left_out = images.len() - plans.len();
    lines.push(String::new());
    let mut summary = format!(
        "Provisioned {} images, {}px of {}px",
        plans.len(),
        total.round(),
        width_limit
    );
    if left_out > 0 {
        summary.push_str(&format!(" ({} left out)", left_out));
    }
    lines.push(summary);
    lines
}

pub fn print_plan(
    images: &[ImageDescriptor],
    plans: &[ImagePlan],
    viewport: Viewport,
    width_limit: f64,
) {
    for line in format_plan(images, plans, viewport, width_limit) {
        println!("{}", line);
    }
}

// ============================================================================
// Simulate
// ============================================================================

fn target_name(target: Target) -> String {
    match target {
        Target::Cover => "cover".to_string(),
        Target::Images => "images".to_string(),
        Target::Image(i) => format!("image {}", i),
    }
}

fn flag_name(flag: Flag) -> &'static str {
    flag.class_name()
}

fn effect_line(effect: &Effect) -> String {
    match effect {
        Effect::ScheduleCoverTimeout { after } => format!("cover timeout in {}ms", after),
        Effect::ScheduleReload { after } => format!("reload in {}ms", after),
        Effect::AwaitCoverFade => "await cover fade".to_string(),
        Effect::AwaitImagesFade => "await images fade".to_string(),
        Effect::StartCycling { interval } => format!("cycle every {}ms", interval),
        Effect::ReleaseFocus { index, after } => {
            format!("unfocus image {} in {}ms", index, after)
        }
    }
}

fn op_line(op: &StageOp) -> String {
    match op {
        StageOp::Append { index, sizes } => format!("append image {} ({})", index, sizes),
        StageOp::AddFlag(target, flag) => {
            format!("add {} to {}", flag_name(*flag), target_name(*target))
        }
        StageOp::RemoveFlag(target, flag) => {
            format!("remove {} from {}", flag_name(*flag), target_name(*target))
        }
        StageOp::Translate(x) => format!("translate strip to {}px", x),
    }
}

pub fn format_start(effects: &[Effect]) -> Vec<String> {
    let mut lines = vec!["start".to_string()];
    lines.extend(
        effects
            .iter()
            .map(|e| format!("{}effect: {}", indent(1), effect_line(e))),
    );
    lines
}

pub fn format_steps(steps: &[Step]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, step) in steps.iter().enumerate() {
        lines.push(format!(
            "{} {:<15} {} → {}",
            format_index(i + 1),
            step.event.name(),
            step.from,
            step.to
        ));
        match &step.outcome {
            Ok(effects) => lines.extend(
                effects
                    .iter()
                    .map(|e| format!("{}effect: {}", indent(1), effect_line(e))),
            ),
            Err(err) => lines.push(format!("{}rejected: {}", indent(1), err)),
        }
        lines.extend(
            step.ops
                .iter()
                .map(|op| format!("{}stage: {}", indent(1), op_line(op))),
        );
    }
    lines
}

pub fn print_simulation(start: &[Effect], steps: &[Step]) {
    for line in format_start(start).into_iter().chain(format_steps(steps)) {
        println!("{}", line);
    }
}
