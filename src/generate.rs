//! The generator algebra: `Gen<T>`, a pure function of `(Prng, Size)`,
//! closed under map, bind, filter, product, choice, and frequency-weighted
//! choice.

use crate::error::CheckError;
use crate::rng::{Prng, Size};
use std::sync::Arc;

/// A pure computation from `(Prng, Size)` to `T`. Two calls to the same
/// generator with the same PRNG state and size must produce equal results —
/// generators must not retain state between calls.
pub struct Gen<T>(Arc<dyn Fn(&mut Prng, Size) -> T + Send + Sync>);

impl<T> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Gen(Arc::clone(&self.0))
    }
}

/// Raised when `Gen::filter`'s predicate could not be satisfied within the
/// bounded retry budget. Panics rather than threading a `Result` through the
/// whole algebra — see DESIGN.md.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorExhausted;

impl std::fmt::Display for GeneratorExhausted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "generator exhausted: filter could not satisfy its predicate in 100 attempts")
    }
}
impl std::error::Error for GeneratorExhausted {}

const FILTER_ATTEMPTS: usize = 100;

impl<T: 'static> Gen<T> {
    pub fn new(f: impl Fn(&mut Prng, Size) -> T + Send + Sync + 'static) -> Self {
        Gen(Arc::new(f))
    }

    /// Sample a value. Pure with respect to `(prng, size)`.
    pub fn sample(&self, prng: &mut Prng, size: Size) -> T {
        (self.0)(prng, size)
    }

    /// `pure(v)`: ignore the inputs, always yield `v`.
    pub fn pure(v: T) -> Self
    where
        T: Clone + Send + Sync,
    {
        Gen::new(move |_, _| v.clone())
    }

    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + Send + Sync + 'static) -> Gen<U> {
        Gen::new(move |rng, size| f(self.sample(rng, size)))
    }

    /// Sample `self`, then sample `k(value)` using the same PRNG state
    /// advanced sequentially.
    pub fn bind<U: 'static>(self, k: impl Fn(T) -> Gen<U> + Send + Sync + 'static) -> Gen<U> {
        Gen::new(move |rng, size| {
            let value = self.sample(rng, size);
            k(value).sample(rng, size)
        })
    }

    /// Resample up to 100 times until `pred` holds; panics with
    /// [`GeneratorExhausted`] on exhaustion.
    pub fn filter(self, pred: impl Fn(&T) -> bool + Send + Sync + 'static) -> Gen<T> {
        Gen::new(move |rng, size| {
            for _ in 0..FILTER_ATTEMPTS {
                let v = self.sample(rng, size);
                if pred(&v) {
                    return v;
                }
            }
            panic!("{}", GeneratorExhausted);
        })
    }

    pub fn pair<U: 'static>(self, other: Gen<U>) -> Gen<(T, U)> {
        Gen::new(move |rng, size| {
            let a = self.sample(rng, size);
            let b = other.sample(rng, size);
            (a, b)
        })
    }

    pub fn triple<U: 'static, V: 'static>(self, b: Gen<U>, c: Gen<V>) -> Gen<(T, U, V)> {
        Gen::new(move |rng, size| {
            let x = self.sample(rng, size);
            let y = b.sample(rng, size);
            let z = c.sample(rng, size);
            (x, y, z)
        })
    }

    /// Random-length `Vec<T>` whose length is drawn uniformly from
    /// `[0, size)`. Once `size.depth` is exhausted, degenerates to the
    /// empty vector rather than sampling `T` at all — this is what keeps a
    /// deliberately-nested `Vec<Vec<Vec<...>>>>` composition terminating
    /// under `GeneratorConfig::max_depth` (see `rng::Size::descend`).
    pub fn vec_of(self) -> Gen<Vec<T>> {
        Gen::new(move |rng, size| {
            if size.depth == 0 {
                return Vec::new();
            }
            let len = rng.u64_below(size.get() as u64) as usize;
            let child = size.descend();
            (0..len).map(|_| self.sample(rng, child)).collect()
        })
    }

    /// Fixed-length `Vec<T>`.
    pub fn fixed_vec(self, n: usize) -> Gen<Vec<T>> {
        Gen::new(move |rng, size| {
            if size.depth == 0 {
                return Vec::new();
            }
            let child = size.descend();
            (0..n).map(|_| self.sample(rng, child)).collect()
        })
    }

    /// Fixed `rows x cols` 2D array.
    pub fn array2d(self, rows: usize, cols: usize) -> Gen<Vec<Vec<T>>>
    where
        T: 'static,
    {
        Gen::new(move |rng, size| {
            if size.depth == 0 {
                return Vec::new();
            }
            let child = size.descend();
            (0..rows)
                .map(|_| (0..cols).map(|_| self.sample(rng, child)).collect())
                .collect()
        })
    }
}

/// Uniform choice from a finite, nonempty slice of values.
pub fn choice<T: Clone + Send + Sync + 'static>(values: Vec<T>) -> Gen<T> {
    assert!(!values.is_empty(), "choice requires a nonempty candidate list");
    Gen::new(move |rng, _size| {
        let idx = rng.u64_below(values.len() as u64) as usize;
        values[idx].clone()
    })
}

/// Uniform choice among generators.
pub fn one_of<T: 'static>(gens: Vec<Gen<T>>) -> Gen<T> {
    assert!(!gens.is_empty(), "one_of requires at least one generator");
    Gen::new(move |rng, size| {
        let idx = rng.u64_below(gens.len() as u64) as usize;
        gens[idx].sample(rng, size)
    })
}

/// Weighted choice among generators. Weights must be positive; an empty
/// input fails with [`CheckError::InvalidArgument`]. The running-sum table
/// is computed once per call; selection draws an integer in
/// `[1, sum_total]` and linear-searches for the first prefix-sum that is
/// `>=` the draw.
pub fn frequency<T: 'static>(weighted: Vec<(u32, Gen<T>)>) -> Result<Gen<T>, CheckError> {
    if weighted.is_empty() {
        return Err(CheckError::InvalidArgument(
            "frequency requires at least one weighted generator".to_string(),
        ));
    }
    if weighted.iter().any(|(w, _)| *w == 0) {
        return Err(CheckError::InvalidArgument(
            "frequency weights must be positive".to_string(),
        ));
    }
    Ok(Gen::new(move |rng, size| {
        let total: u64 = weighted.iter().map(|(w, _)| *w as u64).sum();
        let draw = rng.u64_below(total) + 1;
        let mut running = 0u64;
        for (weight, gen) in &weighted {
            running += *weight as u64;
            if running >= draw {
                return gen.sample(rng, size);
            }
        }
        // unreachable given draw <= total, but fall back to the last entry
        weighted.last().unwrap().1.sample(rng, size)
    }))
}

/// Unrestricted signed integer: bounded by size, range `[-size/2, size/2)`.
pub fn int_unrestricted() -> Gen<i64> {
    Gen::new(|rng, size| {
        let half = (size.get() as i64 / 2).max(1);
        rng.int_in_range(-half, half)
    })
}

/// Signed integer with minimum `m` and width `size`: `[m, m+size)`.
pub fn int_with_min(m: i64) -> Gen<i64> {
    Gen::new(move |rng, size| {
        let width = (size.get() as i64).max(1);
        rng.int_in_range(m, m + width)
    })
}

/// Signed integer in the explicit range `[min, max)`.
pub fn int_range(min: i64, max: i64) -> Gen<i64> {
    Gen::new(move |rng, _size| rng.int_in_range(min, max))
}

/// Unrestricted float: around zero, scaled by size.
pub fn float_unrestricted() -> Gen<f64> {
    Gen::new(|rng, size| {
        let scale = (size.get() as f64).max(1.0);
        rng.float_in_range(-scale, scale)
    })
}

/// Float with minimum `m`, scaled by size.
pub fn float_with_min(m: f64) -> Gen<f64> {
    Gen::new(move |rng, size| {
        let width = (size.get() as f64).max(1.0);
        rng.float_in_range(m, m + width)
    })
}

/// Float in the explicit range `[min, max)`.
pub fn float_range(min: f64, max: f64) -> Gen<f64> {
    Gen::new(move |rng, _size| rng.float_in_range(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn determinism_invariant() {
        let g = int_unrestricted().bind(|x| float_with_min(x as f64).map(move |y| (x, y)));
        let mut a = Prng::from_seed(99);
        let mut b = Prng::from_seed(99);
        let size = Size::new(20);
        assert_eq!(
            format!("{:?}", g.sample(&mut a, size)),
            format!("{:?}", g.sample(&mut b, size))
        );
    }

    #[test]
    fn pure_ignores_inputs() {
        let g = Gen::pure(42);
        let mut rng = Prng::from_seed(1);
        assert_eq!(g.sample(&mut rng, Size::new(10)), 42);
    }

    #[test]
    fn filter_finds_satisfying_value() {
        let g = int_range(0, 1000).filter(|x| x % 7 == 0);
        let mut rng = Prng::from_seed(3);
        for _ in 0..20 {
            let v = g.sample(&mut rng, Size::new(10));
            assert_eq!(v % 7, 0);
        }
    }

    #[test]
    #[should_panic]
    fn filter_exhausts_on_impossible_predicate() {
        let g = int_range(0, 2).filter(|x| *x > 1000);
        let mut rng = Prng::from_seed(4);
        g.sample(&mut rng, Size::new(10));
    }

    #[test]
    fn frequency_rejects_empty() {
        let result: Result<Gen<i64>, _> = frequency(Vec::new());
        assert!(matches!(result, Err(CheckError::InvalidArgument(_))));
    }

    #[test]
    fn frequency_rejects_zero_weight() {
        let result = frequency(vec![(0, Gen::pure(1))]);
        assert!(matches!(result, Err(CheckError::InvalidArgument(_))));
    }

    #[test]
    fn frequency_honors_weights_not_just_first_entry() {
        // Regression for the source's "reads freqGens[0] instead of freqGens[i]"
        // accumulation bug (spec.md section 9): with an all-weight-on-the-last-entry
        // distribution, every draw must select the last generator.
        let g = frequency(vec![(1, Gen::pure("rare")), (1000, Gen::pure("common"))]).unwrap();
        let mut rng = Prng::from_seed(5);
        let mut common_count = 0;
        for _ in 0..200 {
            if g.sample(&mut rng, Size::new(10)) == "common" {
                common_count += 1;
            }
        }
        assert!(common_count > 150);
    }

    #[test]
    fn vec_of_respects_size_bound() {
        let g = int_range(0, 10).vec_of();
        let mut rng = Prng::from_seed(6);
        for _ in 0..50 {
            let v = g.sample(&mut rng, Size::new(5));
            assert!(v.len() < 5);
        }
    }

    #[test]
    fn one_of_only_returns_provided_values() {
        let g = one_of(vec![Gen::pure(1), Gen::pure(2), Gen::pure(3)]);
        let mut rng = Prng::from_seed(7);
        for _ in 0..30 {
            assert!([1, 2, 3].contains(&g.sample(&mut rng, Size::new(10))));
        }
    }

    #[test]
    fn max_depth_bounds_nested_vec_recursion() {
        // Vec<Vec<Vec<i64>>> composed three levels deep: with a depth budget
        // of 1, only the outermost level may produce anything, so every
        // element it contains (itself a nested Vec) is empty.
        let innermost = int_range(0, 10).vec_of();
        let middle = innermost.vec_of();
        let outer = middle.vec_of();
        let mut rng = Prng::from_seed(8);
        let size = Size::with_depth(10, 1);
        for _ in 0..20 {
            let v = outer.sample(&mut rng, size);
            for row in &v {
                assert!(row.is_empty(), "depth budget should stop recursion past the first level");
            }
        }
    }

    #[test]
    fn zero_depth_yields_empty_collection() {
        let g = int_range(0, 10).vec_of();
        let mut rng = Prng::from_seed(9);
        let v = g.sample(&mut rng, Size::with_depth(10, 0));
        assert!(v.is_empty());
    }

    #[test]
    fn gen_left_identity_law() {
        let k = |x: i64| Gen::pure(x * 2);
        let mut a = Prng::from_seed(1);
        let mut b = Prng::from_seed(1);
        let size = Size::new(10);
        let lhs = Gen::pure(5i64).bind(k).sample(&mut a, size);
        let rhs = k(5).sample(&mut b, size);
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn gen_right_identity_law() {
        let mut a = Prng::from_seed(2);
        let mut b = Prng::from_seed(2);
        let size = Size::new(10);
        let g = int_range(0, 100);
        let lhs = g.clone().bind(Gen::pure).sample(&mut a, size);
        let rhs = g.sample(&mut b, size);
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn gen_associativity_law() {
        let f = |x: i64| int_range(0, x.max(1));
        let g = |y: i64| Gen::pure(y * 3);
        let mut a = Prng::from_seed(3);
        let mut b = Prng::from_seed(3);
        let size = Size::new(10);

        let lhs = int_range(1, 100).bind(f).bind(g).sample(&mut a, size);
        let rhs = int_range(1, 100).bind(move |x| f(x).bind(g)).sample(&mut b, size);
        assert_eq!(lhs, rhs);
    }
}
