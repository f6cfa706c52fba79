//! # Gallo Card
//!
//! A full-screen slideshow card for the browser. The page shows a cover,
//! loads a shuffled set of responsive images off-screen into one horizontal
//! strip, fades the cover out once enough of them are in, and then slides
//! the strip from image to image forever.
//!
//! # Architecture: Controller + Stage
//!
//! ```text
//! window.Gallo ─► config ─► shuffle ─► provision ─► Stage (DOM)
//!                                          │
//!        load / transitionend / timers ─► Presentation ─► state machine
//!                                          │
//!                                          └─► Effects (host schedules them)
//! ```
//!
//! All sequencing logic lives in [`presentation::Presentation`], which only
//! talks to the page through the [`stage::Stage`] trait and answers every
//! callback with a list of [`presentation::Effect`]s for the host to arm.
//! The browser host is the `web` module (wasm32 only); natively the same
//! controller runs over [`stage::RecordingStage`] for tests and the
//! `simulate` command.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Preview variants, image descriptors, viewport |
//! | [`config`] | Presentation options: defaults, `card.toml` layering, the `window.Gallo` global |
//! | [`shuffle`] | Fisher–Yates shuffle over any `Rng` |
//! | [`capability`] | Prefixed transition-end event and transform property probing |
//! | [`responsive`] | `srcset` / `sizes` values and rendered width |
//! | [`stage`] | The DOM seam, plus a recording implementation |
//! | [`provision`] | Width-budgeted image insertion |
//! | [`state`] | The presentation state machine |
//! | [`cycle`] | Strip offsets and the wrap-around cursor |
//! | [`presentation`] | The controller tying it all together |
//! | [`simulate`] | Event replay for the `simulate` command |
//! | [`standalone`] | Link handling in home-screen mode |
//! | [`auth`] | Token hand-off from the URL fragment |
//! | [`css`] | PostCSS pipeline configuration |
//! | [`page`] | Host page rendering |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Partial Load Gate
//!
//! The cover waits for `min(load_wait_count, images)` loads, not for all of
//! them. Most images sit off-screen until the strip reaches them, so the
//! reveal need not block on them. Failed loads are logged and simply never
//! count.
//!
//! ## Width Budget
//!
//! Images render at full viewport height, so the strip's width is the sum of
//! their aspect ratios times that height. Older WebKit stops painting (or
//! crashes) on very wide layers, so insertion stops before the strip would
//! exceed `width_limit` (22500px by default).
//!
//! ## Rejected Transitions
//!
//! Illegal `(state, event)` pairs return a
//! [`state::TransitionError`] and leave the state alone. Late image loads
//! after the cover started fading are the common case and are dropped at
//! debug level.

pub mod auth;
pub mod capability;
pub mod config;
pub mod css;
pub mod cycle;
pub mod output;
pub mod page;
pub mod presentation;
pub mod provision;
pub mod responsive;
pub mod shuffle;
pub mod simulate;
pub mod stage;
pub mod standalone;
pub mod state;
pub mod types;

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{install_standalone, present, redeem_auth_token};
