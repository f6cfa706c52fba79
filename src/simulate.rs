//! Replaying host events against a presentation without a browser.
//!
//! Backs the `simulate` command: each named event is delivered to a
//! [`Presentation`] over a [`RecordingStage`], and the resulting state
//! change, effects and stage operations are captured per step.

use crate::presentation::{Effect, Presentation};
use crate::stage::{RecordingStage, StageOp};
use crate::state::{State, TransitionError};
use std::str::FromStr;
use thiserror::Error;

/// A host-side occurrence the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    CoverTimeout,
    ImageLoad,
    ImageError,
    CoverFaded,
    ImagesFaded,
    Tick,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown event '{0}' (expected cover-timeout, image-load, image-error, cover-faded, images-faded or tick)")]
pub struct UnknownEvent(pub String);

impl FromStr for HostEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cover-timeout" => Ok(HostEvent::CoverTimeout),
            "image-load" => Ok(HostEvent::ImageLoad),
            "image-error" => Ok(HostEvent::ImageError),
            "cover-faded" => Ok(HostEvent::CoverFaded),
            "images-faded" => Ok(HostEvent::ImagesFaded),
            "tick" => Ok(HostEvent::Tick),
            other => Err(UnknownEvent(other.to_string())),
        }
    }
}

impl HostEvent {
    pub fn name(self) -> &'static str {
        match self {
            HostEvent::CoverTimeout => "cover-timeout",
            HostEvent::ImageLoad => "image-load",
            HostEvent::ImageError => "image-error",
            HostEvent::CoverFaded => "cover-faded",
            HostEvent::ImagesFaded => "images-faded",
            HostEvent::Tick => "tick",
        }
    }
}

/// Parse a comma separated event list such as `cover-timeout,image-load`.
pub fn parse_events(list: &str) -> Result<Vec<HostEvent>, UnknownEvent> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .collect()
}

/// What one event did.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub event: HostEvent,
    pub from: State,
    pub to: State,
    pub outcome: Result<Vec<Effect>, TransitionError>,
    pub ops: Vec<StageOp>,
}

/// Deliver `events` in order. Image errors are attributed to the image after
/// the ones already accounted for.
pub fn replay(presentation: &mut Presentation<RecordingStage>, events: &[HostEvent]) -> Vec<Step> {
    presentation.stage_mut().take_ops();
    events
        .iter()
        .map(|&event| {
            let from = presentation.state();
            let outcome = match event {
                HostEvent::CoverTimeout => presentation.on_cover_timeout(),
                HostEvent::ImageLoad => presentation.on_image_loaded(),
                HostEvent::ImageError => {
                    let index = presentation.loaded() + presentation.failed();
                    presentation.on_image_failed(index);
                    Ok(Vec::new())
                }
                HostEvent::CoverFaded => presentation.on_cover_faded(),
                HostEvent::ImagesFaded => presentation.on_images_faded(),
                HostEvent::Tick => Ok(presentation.tick()),
            };
            Step {
                event,
                from,
                to: presentation.state(),
                outcome,
                ops: presentation.stage_mut().take_ops(),
            }
        })
        .collect()
}
