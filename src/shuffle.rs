//! Randomised image order.
//!
//! Every page load presents the images in a fresh order. The shuffle is a
//! Fisher–Yates pass driven by any [`rand::Rng`], so tests and the `plan`
//! command can replay an order from a seed while the browser seeds from
//! `Math.random()`.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Shuffle `items` in place and hand them back.
pub fn shuffle<T, R: Rng + ?Sized>(mut items: Vec<T>, rng: &mut R) -> Vec<T> {
    items.shuffle(rng);
    items
}

/// Deterministic generator for a given seed.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
