//! Roll sources threaded through every generation and resolution call.
//!
//! All randomness in the engine is expressed as unit rolls in `[0, 1)`.
//! Integer draws over inclusive bounds, probability checks, and list picks
//! are derived from those rolls, so a scripted source can force any outcome.

use hmac::{Hmac, Mac};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sha2::Sha256;
use std::collections::VecDeque;

use crate::numbers::{scale_unit, usize_to_u64};

const LARGEST_UNIT: f64 = 1.0 - f64::EPSILON;

/// A source of uniform unit rolls.
pub trait Dice {
    /// Uniform draw in `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform integer over the inclusive range `min..=max`.
    fn range(&mut self, min: u64, max: u64) -> u64 {
        if max <= min {
            return min;
        }
        let span = (max - min).saturating_add(1);
        min + scale_unit(self.unit(), span)
    }

    /// Returns `true` with the given probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.unit() < probability
    }

    /// Uniform index into a collection of `len` items (0 when empty).
    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        let picked = scale_unit(self.unit(), usize_to_u64(len));
        usize::try_from(picked).unwrap_or(len - 1)
    }
}

/// Pick one item uniformly.
pub fn pick<'a, T>(dice: &mut impl Dice, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(dice.index(items.len()))
}

/// Draw `count` distinct items from `pool` (Fisher-Yates over a copy).
pub fn sample<T: Clone>(dice: &mut impl Dice, pool: &[T], count: usize) -> Vec<T> {
    let mut items = pool.to_vec();
    for i in (1..items.len()).rev() {
        let j = dice.index(i + 1);
        items.swap(i, j);
    }
    items.truncate(count);
    items
}

/// Seeded roll source with draw instrumentation.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: SmallRng,
    seed: u64,
    draws: u64,
}

impl SeededDice {
    /// Construct from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(derive_stream_seed(seed, b"starhaul")),
            seed,
            draws: 0,
        }
    }

    /// Construct from OS entropy; the drawn seed stays inspectable.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::from_user_seed(rand::random::<u64>())
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of rolls drawn so far.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl Dice for SeededDice {
    fn unit(&mut self) -> f64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.gen_range(0.0..1.0)
    }
}

/// Replays a fixed queue of unit rolls, then repeats a fallback roll.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<f64>,
    fallback: f64,
    draws: u64,
}

impl ScriptedDice {
    #[must_use]
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback: 0.0,
            draws: 0,
        }
    }

    /// Roll returned once the script is exhausted.
    #[must_use]
    pub const fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = fallback;
        self
    }

    /// Queue more rolls behind the current script.
    pub fn extend(&mut self, rolls: impl IntoIterator<Item = f64>) {
        self.rolls.extend(rolls);
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }

    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl Dice for ScriptedDice {
    fn unit(&mut self) -> f64 {
        self.draws = self.draws.saturating_add(1);
        let roll = self.rolls.pop_front().unwrap_or(self.fallback);
        if roll.is_finite() {
            roll.clamp(0.0, LARGEST_UNIT)
        } else {
            0.0
        }
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let Ok(mut mac) = Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()) else {
        return user_seed;
    };
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
