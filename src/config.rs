//! Configuration for how a `check` run drives generation and shrinking.

use std::fmt;
use std::time::Duration;

use crate::rng::Size;

/// A malformed [`TestConfig`] or [`GeneratorConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidIterations(usize),
    InvalidShrinkIterations(usize),
    InvalidMaxDepth(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidIterations(n) => {
                write!(f, "iterations must be positive, got {}", n)
            }
            ConfigError::InvalidShrinkIterations(n) => {
                write!(f, "max_shrink_iterations must be positive, got {}", n)
            }
            ConfigError::InvalidMaxDepth(n) => {
                write!(f, "max_depth must be positive, got {}", n)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Controls how many times a property is driven and how its seed may be
/// pinned for reproduction.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub iterations: usize,
    pub max_shrink_iterations: usize,
    pub shrink_timeout: Duration,
    pub seed: Option<u64>,
    pub label: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        TestConfig {
            iterations: 100,
            max_shrink_iterations: 1000,
            shrink_timeout: Duration::from_secs(10),
            seed: None,
            label: None,
        }
    }
}

impl TestConfig {
    pub fn new(iterations: usize) -> Result<Self, ConfigError> {
        if iterations == 0 {
            return Err(ConfigError::InvalidIterations(iterations));
        }
        Ok(TestConfig {
            iterations,
            ..TestConfig::default()
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Controls the size budget and recursion bound used while sampling.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub size_hint: usize,
    pub max_depth: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            size_hint: 10,
            max_depth: 5,
        }
    }
}

impl GeneratorConfig {
    pub fn new(size_hint: usize, max_depth: usize) -> Result<Self, ConfigError> {
        if max_depth == 0 {
            return Err(ConfigError::InvalidMaxDepth(max_depth));
        }
        Ok(GeneratorConfig { size_hint, max_depth })
    }

    pub fn size(&self) -> Size {
        Size::with_depth(self.size_hint, self.max_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = TestConfig::default();
        assert_eq!(config.iterations, 100);
        assert_eq!(config.max_shrink_iterations, 1000);
        assert_eq!(config.shrink_timeout, Duration::from_secs(10));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_config_rejects_zero_iterations() {
        assert_eq!(TestConfig::new(0).unwrap_err(), ConfigError::InvalidIterations(0));
    }

    #[test]
    fn generator_config_default() {
        let config = GeneratorConfig::default();
        assert_eq!(config.size_hint, 10);
        assert_eq!(config.max_depth, 5);
    }

    #[test]
    fn generator_config_rejects_zero_depth() {
        assert_eq!(
            GeneratorConfig::new(10, 0).unwrap_err(),
            ConfigError::InvalidMaxDepth(0)
        );
    }
}
