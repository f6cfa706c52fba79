//! Presentation controller.
//!
//! Ties the provisioner, the state machine and the cycling cursor to a
//! [`Stage`]. The controller never schedules anything itself: each handler
//! returns the [`Effect`]s the host must arrange (listeners, timers), and the
//! host calls back into the matching handler when they fire. This keeps the
//! whole sequence drivable from tests and from the `simulate` command.
//!
//! ```text
//! start()             → ScheduleCoverTimeout, ScheduleReload?
//! on_image_loaded()   → (after min(load_wait_count, images) loads) imagesLoad
//! on_cover_timeout()  → coverTimeout
//! entering fadingOutCover  → cover gets `transparent`, AwaitCoverFade
//! on_cover_faded()    → doneFadingOutCover
//! entering fadingInImages  → images lose `transparent`/`hidden`,
//!                            AwaitImagesFade, StartCycling, first tick
//! tick()              → translate strip, focus image, ReleaseFocus
//! ```

use crate::config::{CardConfig, ConfigError, PresentationConfig};
use crate::cycle::{self, Cycle};
use crate::provision::{self, Provisioned};
use crate::stage::{Flag, Stage, Target};
use crate::state::{Event, Machine, State, TransitionError};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum PresentationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no image fits within the width limit of {0}px")]
    NoImages(f64),
}

/// Work the host has to schedule on the controller's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Call [`Presentation::on_cover_timeout`] once after `after` ms.
    ScheduleCoverTimeout { after: u64 },
    /// Reload the page after `after` ms.
    ScheduleReload { after: u64 },
    /// Call [`Presentation::on_cover_faded`] on the cover's next
    /// transition end, once.
    AwaitCoverFade,
    /// Call [`Presentation::on_images_faded`] on the images container's
    /// next transition end, once.
    AwaitImagesFade,
    /// Call [`Presentation::tick`] every `interval` ms for the rest of the
    /// page's lifetime.
    StartCycling { interval: u64 },
    /// Call [`Presentation::release_focus`] for `index` after `after` ms.
    ReleaseFocus { index: usize, after: u64 },
}

pub struct Presentation<S: Stage> {
    stage: S,
    config: PresentationConfig,
    machine: Machine,
    cycle: Cycle,
    provisioned: Provisioned,
    loaded: usize,
    failed: usize,
    threshold: usize,
}

impl<S: Stage> Presentation<S> {
    /// Validate `config`, provision its images (already in presentation
    /// order) onto `stage` and return a controller in state `none`.
    pub fn new(mut stage: S, config: CardConfig) -> Result<Self, PresentationError> {
        config.validate()?;
        let CardConfig {
            presentation,
            images,
        } = config;

        let provisioned = provision::provision(&mut stage, &images, presentation.width_limit);
        if provisioned.count == 0 {
            return Err(PresentationError::NoImages(presentation.width_limit));
        }
        let threshold = presentation.load_wait_count.min(provisioned.count);

        Ok(Self {
            stage,
            cycle: Cycle::new(provisioned.count),
            config: presentation,
            machine: Machine::new(),
            provisioned,
            loaded: 0,
            failed: 0,
            threshold,
        })
    }

    /// Timers to arm when the presentation starts.
    pub fn start(&self) -> Vec<Effect> {
        let mut effects = vec![Effect::ScheduleCoverTimeout {
            after: self.config.cover_timeout,
        }];
        if let Some(after) = self.config.auto_reload {
            effects.push(Effect::ScheduleReload { after });
        }
        effects
    }

    pub fn state(&self) -> State {
        self.machine.state()
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    pub fn config(&self) -> &PresentationConfig {
        &self.config
    }

    pub fn provisioned(&self) -> &Provisioned {
        &self.provisioned
    }

    pub fn image_count(&self) -> usize {
        self.provisioned.count
    }

    /// Loads required before `imagesLoad` fires.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// An image element finished loading.
    ///
    /// Fires `imagesLoad` once the load count reaches the threshold, and on
    /// every load after that; late loads are absorbed by `imagesLoaded` and
    /// rejected in later states.
    pub fn on_image_loaded(&mut self) -> Result<Vec<Effect>, TransitionError> {
        self.loaded += 1;
        if self.loaded < self.threshold {
            debug!(loaded = self.loaded, threshold = self.threshold, "image loaded");
            return Ok(Vec::new());
        }
        self.fire(Event::ImagesLoad)
    }

    /// An image element failed to load. Logged, never retried.
    pub fn on_image_failed(&mut self, index: usize) {
        self.failed += 1;
        warn!(index, failed = self.failed, "image failed to load");
    }

    pub fn on_cover_timeout(&mut self) -> Result<Vec<Effect>, TransitionError> {
        self.fire(Event::CoverTimeout)
    }

    pub fn on_cover_faded(&mut self) -> Result<Vec<Effect>, TransitionError> {
        self.fire(Event::DoneFadingOutCover)
    }

    pub fn on_images_faded(&mut self) -> Result<Vec<Effect>, TransitionError> {
        self.fire(Event::DoneFadingInImages)
    }

    /// Bring the next image into view and focus it.
    ///
    /// Does nothing until the images have started fading in.
    pub fn tick(&mut self) -> Vec<Effect> {
        if !matches!(self.state(), State::FadingInImages | State::ImagesShowing) {
            return Vec::new();
        }
        let index = self.cycle.advance();
        let layout = self.stage.image_layout(index);
        let x = cycle::strip_offset(index, self.cycle.count(), layout, self.stage.viewport().width);
        self.stage.translate_images(x);
        self.stage.add_flag(Target::Image(index), Flag::Focus);
        vec![Effect::ReleaseFocus {
            index,
            after: self.config.show_duration,
        }]
    }

    pub fn release_focus(&mut self, index: usize) {
        self.stage.remove_flag(Target::Image(index), Flag::Focus);
    }

    fn fire(&mut self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        let (from, to) = self.machine.fire(event).inspect_err(|err| {
            debug!(%err, "rejected transition");
        })?;
        debug!(%event, %from, %to, "transition");
        if from == to {
            return Ok(Vec::new());
        }
        self.enter(to)
    }

    fn enter(&mut self, state: State) -> Result<Vec<Effect>, TransitionError> {
        match state {
            State::FadingOutCover => {
                self.stage.add_flag(Target::Cover, Flag::Transparent);
                if self.config.fade_duration == 0 {
                    // no transition runs, so no transition end will arrive
                    return self.fire(Event::DoneFadingOutCover);
                }
                Ok(vec![Effect::AwaitCoverFade])
            }
            State::FadingInImages => {
                info!(images = self.image_count(), loaded = self.loaded, "revealing images");
                self.stage.remove_flag(Target::Images, Flag::Transparent);
                self.stage.remove_flag(Target::Images, Flag::Hidden);
                let mut effects = vec![Effect::StartCycling {
                    interval: self.config.show_duration,
                }];
                effects.extend(self.tick());
                if self.config.fade_duration == 0 {
                    effects.extend(self.fire(Event::DoneFadingInImages)?);
                } else {
                    effects.push(Effect::AwaitImagesFade);
                }
                Ok(effects)
            }
            State::ImagesShowing => {
                info!("images showing");
                Ok(Vec::new())
            }
            State::None | State::CoverTimedOut | State::ImagesLoaded => Ok(Vec::new()),
        }
    }
}
