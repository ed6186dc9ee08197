//! # shrinkcheck - a property-based testing engine
//!
//! A generator algebra (`Gen<T>`), a type-directed arbitrary registry, a
//! property monad (`Prop<T>`) and a phase-aware driver that shrinks a
//! falsifying draw to a smaller counterexample before reporting it.
//!
//! ## Quick start
//!
//! ```rust
//! use shrinkcheck::{check, for_all, primitives::arbitrary_vec, primitives::arbitrary_signed};
//!
//! let ints = arbitrary_signed::<i64>();
//! let lists = arbitrary_vec(ints);
//!
//! let result = check("reverse_twice_is_identity", for_all(lists), |xs: &Vec<i64>| {
//!     let mut reversed = xs.clone();
//!     reversed.reverse();
//!     reversed.reverse();
//!     *xs == reversed
//! });
//! assert!(result.is_ok());
//! ```

pub mod arbitrary;
pub mod config;
pub mod driver;
pub mod error;
pub mod generate;
pub mod primitives;
pub mod property;
pub mod registry;
pub mod report;
pub mod rng;
pub mod shrink;
pub mod statistics;

pub use arbitrary::{Arbitrary, ShrinkFn};
pub use config::{ConfigError, GeneratorConfig, TestConfig};
pub use driver::{check, check_with_config};
pub use error::CheckError;
pub use generate::{choice, frequency, one_of, Gen, GeneratorExhausted};
pub use property::{any, for_all, for_all_registered, Outcome, Phase, Prop, TestState};
pub use registry::{global as global_registry, Registry};
pub use rng::{Prng, Size};
pub use shrink::ShrinkIter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TestConfig::default();
        assert_eq!(config.iterations, 100);
        assert_eq!(config.max_shrink_iterations, 1000);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_generator_config_defaults() {
        let config = GeneratorConfig::default();
        assert_eq!(config.size_hint, 10);
        assert_eq!(config.max_depth, 5);
    }

    #[test]
    fn public_api_checks_a_passing_property() {
        let ints = primitives::arbitrary_signed::<i64>();
        let result = check("double_is_even", for_all(ints), |x: &i64| (x * 2) % 2 == 0);
        assert!(result.is_ok());
    }

    #[test]
    fn public_api_surfaces_a_minimized_counterexample() {
        let ints = primitives::arbitrary_signed::<i64>();
        let wide = GeneratorConfig::new(1000, 5).unwrap();
        let config = TestConfig {
            seed: Some(123),
            ..TestConfig::default()
        };
        let result = check_with_config("x_lt_5", &config, &wide, for_all(ints), |x: &i64| *x < 5);
        assert!(matches!(result, Err(CheckError::PropertyFailed { .. })));
    }

    #[test]
    fn global_registry_resolves_builtin_types() {
        let prop: Prop<i32> = for_all_registered().unwrap();
        let result = check("registered_i32_roundtrips", prop, |_: &i32| true);
        assert!(result.is_ok());
    }

    #[test]
    fn unregistered_type_surfaces_not_registered_error() {
        #[derive(Debug, Clone)]
        struct Unregistered;
        let result: Result<Prop<Unregistered>, CheckError> = for_all_registered();
        assert!(matches!(result, Err(CheckError::NotRegistered { .. })));
    }
}
