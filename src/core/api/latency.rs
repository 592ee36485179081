//! Artificial network latency

use crate::config::ApiConfig;
use rand::Rng;
use std::time::Duration;

/// Uniform random delay applied before every simulated call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latency {
    min: Duration,
    max: Duration,
}

impl Default for Latency {
    fn default() -> Self {
        Self::from_config(&ApiConfig::default())
    }
}

impl Latency {
    /// Delay drawn from `[min, max]`; reversed bounds are swapped
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Always the same delay
    pub fn fixed(delay: Duration) -> Self {
        Self::new(delay, delay)
    }

    /// No delay at all
    pub fn none() -> Self {
        Self::fixed(Duration::ZERO)
    }

    /// Bounds from `[api]` configuration
    pub fn from_config(config: &ApiConfig) -> Self {
        let (min, max) = config.latency_bounds();
        Self::new(min, max)
    }

    /// Lower bound
    pub fn min(&self) -> Duration {
        self.min
    }

    /// Upper bound
    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draws one delay
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_within_bounds() {
        let latency = Latency::new(Duration::from_millis(100), Duration::from_millis(800));
        for _ in 0..200 {
            let delay = latency.sample();
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(800));
        }
    }

    #[test]
    fn test_reversed_bounds_are_swapped() {
        let latency = Latency::new(Duration::from_millis(9), Duration::from_millis(3));
        assert_eq!(latency.min(), Duration::from_millis(3));
        assert_eq!(latency.max(), Duration::from_millis(9));
    }

    #[test]
    fn test_none_is_zero() {
        assert_eq!(Latency::none().sample(), Duration::ZERO);
    }

    #[test]
    fn test_default_matches_config_defaults() {
        let latency = Latency::default();
        assert_eq!(latency.min(), Duration::from_millis(100));
        assert_eq!(latency.max(), Duration::from_millis(800));
    }
}
