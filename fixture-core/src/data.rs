//! Seeds and configuration for fixture synthesis.

use chrono::NaiveDate;

/// Splittable random seed driving the default random source.
///
/// Seeds are plain values: every draw returns the drawn value together
/// with the advanced seed, so a fixture built from the same seed replays
/// the same data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed(pub u64, pub u64);

impl Seed {
    /// Create a new seed from a single value.
    pub fn from_u64(value: u64) -> Self {
        let state = splitmix64_mix(value);
        let gamma = mix_gamma(state);
        Seed(state, gamma)
    }

    /// Generate the next random value and advance the seed.
    pub fn next_u64(self) -> (u64, Self) {
        let Seed(state, gamma) = self;
        let new_state = state.wrapping_add(gamma);
        let output = splitmix64_mix(new_state);
        (output, Seed(new_state, gamma))
    }

    /// Generate a bounded random value [0, bound).
    pub fn next_bounded(self, bound: u64) -> (u64, Self) {
        let (value, new_seed) = self.next_u64();
        ((value as u128 * bound as u128 >> 64) as u64, new_seed)
    }

    /// Generate a random bool.
    pub fn next_bool(self) -> (bool, Self) {
        let (value, new_seed) = self.next_u64();
        (value & 1 == 1, new_seed)
    }

    /// Generate a float in [0, 1) from the top 53 bits of the next value.
    pub fn next_f64(self) -> (f64, Self) {
        let (value, new_seed) = self.next_u64();
        ((value >> 11) as f64 * (1.0 / (1u64 << 53) as f64), new_seed)
    }

    /// Generate a random seed.
    pub fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        Seed(rng.gen(), rng.gen::<u64>() | 1)
    }
}

/// Configuration for a [`crate::Fixture`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Fixed seed for reproducible fixtures. Drawn from the thread RNG when unset.
    pub seed: Option<u64>,

    /// Upper bound of the synthesized date window. The current UTC date when unset.
    pub today: Option<NaiveDate>,
}

impl Config {
    /// Use a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Pin the date treated as "today" by date synthesis.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// The seed this configuration starts from.
    pub fn initial_seed(&self) -> Seed {
        match self.seed {
            Some(seed) => Seed::from_u64(seed),
            None => Seed::random(),
        }
    }

    /// The effective upper bound of the date window.
    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Utc::now().date_naive())
    }
}

/// SplitMix64 mixing function for high-quality output.
fn splitmix64_mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

/// Odd increment for a SplitMix64 stream.
fn mix_gamma(mut z: u64) -> u64 {
    z = splitmix64_mix(z);
    // Gamma must be odd for a full period
    (z | 1).wrapping_mul(0x9e3779b97f4a7c15)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let a = Seed::from_u64(7);
        let b = Seed::from_u64(7);
        assert_eq!(a.next_u64().0, b.next_u64().0);
    }

    #[test]
    fn test_bounded_stays_in_bounds() {
        let mut seed = Seed::from_u64(42);
        for _ in 0..1000 {
            let (value, next) = seed.next_bounded(10);
            assert!(value < 10);
            seed = next;
        }
    }

    #[test]
    fn test_unit_float_range() {
        let mut seed = Seed::from_u64(3);
        for _ in 0..1000 {
            let (value, next) = seed.next_f64();
            assert!((0.0..1.0).contains(&value));
            seed = next;
        }
    }

    #[test]
    fn test_config_builders() {
        let today = NaiveDate::from_ymd_opt(2020, 2, 29).unwrap();
        let config = Config::default().with_seed(9).with_today(today);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.today(), today);
        assert_eq!(config.initial_seed(), Seed::from_u64(9));
    }
}
