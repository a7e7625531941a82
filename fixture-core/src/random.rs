//! Random value sources.

use crate::data::Seed;
use chrono::{Days, NaiveDate, NaiveDateTime};

/// Characters random text is drawn from.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of every synthesized string.
pub const TEXT_LEN: usize = 12;

/// First day of the synthesized date window.
pub const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1995, 1, 1) {
    Some(date) => date,
    None => panic!("invalid epoch"),
};

/// The random primitives the synthesizer consumes.
///
/// A single source is owned by a [`crate::Fixture`] and reused for every
/// draw, so repeated calls never share a seed.
pub trait RandomSource {
    /// A uniform integer in `[0, bound)`. Returns 0 when `bound` is 0.
    fn next_int(&mut self, bound: u64) -> u64;

    /// A uniform float in `[0, 1)`.
    fn next_float(&mut self) -> f64;

    /// A uniform boolean.
    fn next_bool(&mut self) -> bool;
}

impl<S: RandomSource + ?Sized> RandomSource for &mut S {
    fn next_int(&mut self, bound: u64) -> u64 {
        (**self).next_int(bound)
    }

    fn next_float(&mut self) -> f64 {
        (**self).next_float()
    }

    fn next_bool(&mut self) -> bool {
        (**self).next_bool()
    }
}

/// Default source: a SplitMix64 [`Seed`] advanced on every draw.
#[derive(Debug, Clone)]
pub struct SplitMix {
    seed: Seed,
}

impl SplitMix {
    /// Start from the given seed.
    pub fn new(seed: Seed) -> Self {
        SplitMix { seed }
    }

    /// Start from a fixed integer seed.
    pub fn from_u64(seed: u64) -> Self {
        Self::new(Seed::from_u64(seed))
    }
}

impl RandomSource for SplitMix {
    fn next_int(&mut self, bound: u64) -> u64 {
        let (value, seed) = self.seed.next_bounded(bound);
        self.seed = seed;
        value
    }

    fn next_float(&mut self) -> f64 {
        let (value, seed) = self.seed.next_f64();
        self.seed = seed;
        value
    }

    fn next_bool(&mut self) -> bool {
        let (value, seed) = self.seed.next_bool();
        self.seed = seed;
        value
    }
}

/// Adapts any [`rand::RngCore`] into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: rand::RngCore> RandomSource for RngSource<R> {
    fn next_int(&mut self, bound: u64) -> u64 {
        use rand::Rng;
        if bound == 0 {
            return 0;
        }
        self.0.gen_range(0..bound)
    }

    fn next_float(&mut self) -> f64 {
        use rand::Rng;
        self.0.gen::<f64>()
    }

    fn next_bool(&mut self) -> bool {
        use rand::Rng;
        self.0.gen::<bool>()
    }
}

/// A [`TEXT_LEN`]-character string drawn from [`ALPHABET`].
pub fn random_text<R: RandomSource + ?Sized>(random: &mut R) -> String {
    (0..TEXT_LEN)
        .map(|_| {
            let index = random.next_int(ALPHABET.len() as u64) as usize % ALPHABET.len();
            ALPHABET[index] as char
        })
        .collect()
}

/// Midnight of a day in `[EPOCH, today]`.
///
/// A `today` before the epoch collapses the window to the epoch itself.
pub fn random_date<R: RandomSource + ?Sized>(random: &mut R, today: NaiveDate) -> NaiveDateTime {
    let span = (today - EPOCH).num_days().max(0) as u64;
    let offset = random.next_int(span + 1) % (span + 1);
    EPOCH
        .checked_add_days(Days::new(offset))
        .unwrap_or(EPOCH)
        .and_time(chrono::NaiveTime::MIN)
}
