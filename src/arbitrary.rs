//! `Arbitrary<T>`: the pair `(Gen<T>, Shrink<T>)` for a type.

use std::sync::Arc;

use crate::generate::Gen;
use crate::shrink::ShrinkIter;

/// A shrinker: a function from a value to a finite, simpler-first sequence
/// of candidates that never includes the original value.
pub type ShrinkFn<T> = Arc<dyn Fn(&T) -> ShrinkIter<T> + Send + Sync>;

/// The bundled generator and shrinker for a type.
pub struct Arbitrary<T> {
    pub gen: Gen<T>,
    pub shrink: ShrinkFn<T>,
}

impl<T> Clone for Arbitrary<T> {
    fn clone(&self) -> Self {
        Arbitrary {
            gen: self.gen.clone(),
            shrink: Arc::clone(&self.shrink),
        }
    }
}

impl<T: 'static> Arbitrary<T> {
    pub fn new(gen: Gen<T>, shrink: impl Fn(&T) -> ShrinkIter<T> + Send + Sync + 'static) -> Self {
        Arbitrary {
            gen,
            shrink: Arc::new(shrink),
        }
    }

    /// An arbitrary with no shrinker — `shrink` always yields nothing.
    pub fn unshrinkable(gen: Gen<T>) -> Self {
        Arbitrary::new(gen, |_| Box::new(std::iter::empty()))
    }
}
