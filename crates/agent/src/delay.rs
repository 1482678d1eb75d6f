//! Simulated typing delay

use std::time::Duration;

use rand::Rng;

use vendchat_config::ChatbotConfig;

/// Uniform random delay in `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingDelay {
    min: Duration,
    max: Duration,
}

impl Default for TypingDelay {
    fn default() -> Self {
        Self::new(Duration::from_millis(800), Duration::from_millis(2000))
    }
}

impl TypingDelay {
    /// An empty or inverted range always yields `min`
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub fn from_config(config: &ChatbotConfig) -> Self {
        Self::new(config.typing_delay_min(), config.typing_delay_max())
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn sample(&self) -> Duration {
        let low = self.min.as_micros() as u64;
        let high = self.max.as_micros() as u64;
        if low >= high {
            return self.min;
        }
        let mut rng = rand::thread_rng();
        Duration::from_micros(rng.gen_range(low..high))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_within_range() {
        let delay = TypingDelay::default();
        for _ in 0..1000 {
            let sample = delay.sample();
            assert!(sample >= Duration::from_millis(800));
            assert!(sample < Duration::from_millis(2000));
        }
    }

    #[test]
    fn test_degenerate_range() {
        let delay = TypingDelay::new(Duration::from_millis(50), Duration::from_millis(50));
        assert_eq!(delay.sample(), Duration::from_millis(50));
    }

    #[test]
    fn test_sub_millisecond_range() {
        let delay = TypingDelay::new(Duration::from_micros(900), Duration::from_micros(1500));
        for _ in 0..100 {
            let sample = delay.sample();
            assert!(sample >= Duration::from_micros(900));
            assert!(sample < Duration::from_micros(1500));
        }

        let delay = TypingDelay::new(Duration::from_nanos(100), Duration::from_nanos(900));
        assert_eq!(delay.sample(), Duration::from_nanos(100));
    }

    #[test]
    fn test_from_config() {
        let config = ChatbotConfig {
            typing_delay_min_ms: 10,
            typing_delay_max_ms: 20,
            ..Default::default()
        };
        let delay = TypingDelay::from_config(&config);
        assert_eq!(delay.min(), Duration::from_millis(10));
        assert_eq!(delay.max(), Duration::from_millis(20));
    }
}
