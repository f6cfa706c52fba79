//! Presentation state machine.
//!
//! ```text
//!            coverTimeout                  imagesLoad
//!   none ──────────────────► coverTimedOut ───────────┐
//!     │                                               ▼
//!     │ imagesLoad           coverTimeout       fadingOutCover
//!     └────────► imagesLoaded ───────────────────►    │
//!                  ▲    │                             │ doneFadingOutCover
//!                  └────┘ imagesLoad (late loads)     ▼
//!                                               fadingInImages
//!                                                     │ doneFadingInImages
//!                                                     ▼
//!                                               imagesShowing
//! ```
//!
//! [`transition`] is the whole table. Any pair not listed is rejected with a
//! [`TransitionError`]; the caller's state stays as it was.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    None,
    CoverTimedOut,
    ImagesLoaded,
    FadingOutCover,
    FadingInImages,
    ImagesShowing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    CoverTimeout,
    ImagesLoad,
    DoneFadingOutCover,
    DoneFadingInImages,
}

impl State {
    pub fn name(self) -> &'static str {
        match self {
            State::None => "none",
            State::CoverTimedOut => "coverTimedOut",
            State::ImagesLoaded => "imagesLoaded",
            State::FadingOutCover => "fadingOutCover",
            State::FadingInImages => "fadingInImages",
            State::ImagesShowing => "imagesShowing",
        }
    }
}

impl Event {
    pub fn name(self) -> &'static str {
        match self {
            Event::CoverTimeout => "coverTimeout",
            Event::ImagesLoad => "imagesLoad",
            Event::DoneFadingOutCover => "doneFadingOutCover",
            Event::DoneFadingInImages => "doneFadingInImages",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid transition: {event} from {state}")]
pub struct TransitionError {
    pub event: Event,
    pub state: State,
}

/// Target state for `event` fired in `state`.
pub fn transition(state: State, event: Event) -> Result<State, TransitionError> {
    use Event::*;
    use State::*;

    match (state, event) {
        (None, CoverTimeout) => Ok(CoverTimedOut),
        (None, ImagesLoad) => Ok(ImagesLoaded),
        (ImagesLoaded, ImagesLoad) => Ok(ImagesLoaded),
        (ImagesLoaded, CoverTimeout) => Ok(FadingOutCover),
        (CoverTimedOut, ImagesLoad) => Ok(FadingOutCover),
        (FadingOutCover, DoneFadingOutCover) => Ok(FadingInImages),
        (FadingInImages, DoneFadingInImages) => Ok(ImagesShowing),
        _ => Err(TransitionError { event, state }),
    }
}

/// Current state plus the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Machine {
    state: State,
}

impl Default for Machine {
    fn default() -> Self {
        Self { state: State::None }
    }
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Whether `event` is accepted in the current state.
    pub fn can(&self, event: Event) -> bool {
        transition(self.state, event).is_ok()
    }

    /// Apply `event`. Returns the previous and the new state.
    pub fn fire(&mut self, event: Event) -> Result<(State, State), TransitionError> {
        let from = self.state;
        let to = transition(from, event)?;
        self.state = to;
        Ok((from, to))
    }
}
