//! The arbitrary registry: type-directed lookup and lazy instantiation of
//! `(Gen<T>, Shrink<T>)` pairs (spec.md section 4.2).
//!
//! Rust has no runtime reflection over a type's "generic head", so the
//! container factories spec.md describes (collection-of-X, pair-of-X-Y, ...)
//! are realized as ordinary generic functions that resolve their element
//! arbitrary through `get::<T>()` and build the container arbitrary on the
//! spot, rather than as instantiate-once-and-cache runtime factories. Each
//! draw's type is fixed at the `for_all` call site, so this costs nothing a
//! caller would notice (see DESIGN.md).

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use crate::arbitrary::Arbitrary;
use crate::error::CheckError;
use crate::primitives;

/// Process-wide, type-indexed store of singleton arbitraries. Registration
/// is expected to happen at library initialization or before test execution
/// starts; lookups are safe under concurrent readers (`RwLock`).
pub struct Registry {
    entries: RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

fn type_name<T: 'static>() -> &'static str {
    std::any::type_name::<T>()
}

impl Registry {
    fn empty() -> Self {
        Registry {
            entries: RwLock::new(HashMap::new()),
        }
    }

    fn with_builtins() -> Self {
        let registry = Registry::empty();
        registry.insert(primitives::arbitrary_bool());
        registry.insert(primitives::arbitrary_signed::<i8>());
        registry.insert(primitives::arbitrary_signed::<i16>());
        registry.insert(primitives::arbitrary_signed::<i32>());
        registry.insert(primitives::arbitrary_signed::<i64>());
        registry.insert(primitives::arbitrary_signed::<isize>());
        registry.insert(primitives::arbitrary_unsigned::<u8>());
        registry.insert(primitives::arbitrary_unsigned::<u16>());
        registry.insert(primitives::arbitrary_unsigned::<u32>());
        registry.insert(primitives::arbitrary_unsigned::<u64>());
        registry.insert(primitives::arbitrary_unsigned::<usize>());
        registry.insert(primitives::arbitrary_float::<f32>());
        registry.insert(primitives::arbitrary_float::<f64>());
        registry.insert(primitives::arbitrary_char());
        registry.insert(primitives::arbitrary_string());
        registry
    }

    fn insert<T: 'static>(&self, arbitrary: Arbitrary<T>) {
        self.entries
            .write()
            .unwrap()
            .insert(TypeId::of::<T>(), Box::new(arbitrary));
    }

    /// Store a singleton arbitrary keyed by `T`. Fails with
    /// [`CheckError::AlreadyRegistered`] if one is already present.
    pub fn register<T: 'static>(&self, arbitrary: Arbitrary<T>) -> Result<(), CheckError> {
        if self.contains::<T>() {
            return Err(CheckError::AlreadyRegistered {
                type_name: type_name::<T>(),
            });
        }
        self.insert(arbitrary);
        Ok(())
    }

    /// Return the cached singleton arbitrary for `T`, or
    /// [`CheckError::NotRegistered`] if none was installed.
    pub fn get<T: 'static>(&self) -> Result<Arbitrary<T>, CheckError> {
        self.entries
            .read()
            .unwrap()
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<Arbitrary<T>>())
            .cloned()
            .ok_or(CheckError::NotRegistered {
                type_name: type_name::<T>(),
            })
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.read().unwrap().contains_key(&TypeId::of::<T>())
    }

    pub fn remove<T: 'static>(&self) -> bool {
        self.entries
            .write()
            .unwrap()
            .remove(&TypeId::of::<T>())
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// The "collection of T" factory: resolves `T`'s registered arbitrary
    /// and builds a `Vec<T>` arbitrary over it.
    pub fn get_vec<T>(&self) -> Result<Arbitrary<Vec<T>>, CheckError>
    where
        T: Clone + Send + Sync + 'static,
    {
        Ok(primitives::arbitrary_vec(self.get::<T>()?))
    }

    /// The "option of T" factory.
    pub fn get_option<T>(&self) -> Result<Arbitrary<Option<T>>, CheckError>
    where
        T: Clone + Send + Sync + 'static,
    {
        Ok(primitives::arbitrary_option(self.get::<T>()?))
    }

    /// The "pair of A, B" factory.
    pub fn get_pair<A, B>(&self) -> Result<Arbitrary<(A, B)>, CheckError>
    where
        A: Clone + Send + Sync + 'static,
        B: Clone + Send + Sync + 'static,
    {
        Ok(primitives::arbitrary_pair(self.get::<A>()?, self.get::<B>()?))
    }

    /// The "triple of A, B, C" factory.
    pub fn get_triple<A, B, C>(&self) -> Result<Arbitrary<(A, B, C)>, CheckError>
    where
        A: Clone + Send + Sync + 'static,
        B: Clone + Send + Sync + 'static,
        C: Clone + Send + Sync + 'static,
    {
        Ok(primitives::arbitrary_triple(
            self.get::<A>()?,
            self.get::<B>()?,
            self.get::<C>()?,
        ))
    }
}

/// The process-wide registry, initialized with built-ins on first use and
/// never torn down.
pub fn global() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::with_builtins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::Gen;

    #[test]
    fn builtins_are_preinstalled() {
        let registry = Registry::with_builtins();
        assert!(registry.contains::<i32>());
        assert!(registry.contains::<bool>());
        assert!(registry.contains::<String>());
        assert!(registry.contains::<char>());
        assert!(!registry.contains::<Vec<i32>>());
    }

    #[test]
    fn register_then_get_round_trips() {
        #[derive(Debug, Clone, PartialEq)]
        struct Widget(u8);

        let registry = Registry::empty();
        let arb = Arbitrary::new(Gen::pure(Widget(1)), |_: &Widget| {
            Box::new(std::iter::empty()) as crate::shrink::ShrinkIter<Widget>
        });
        registry.register(arb).unwrap();
        assert!(registry.contains::<Widget>());
    }

    #[test]
    fn duplicate_registration_fails() {
        let registry = Registry::empty();
        registry.register(primitives::arbitrary_bool()).unwrap();
        let err = registry.register(primitives::arbitrary_bool()).unwrap_err();
        assert!(matches!(err, CheckError::AlreadyRegistered { .. }));
    }

    #[test]
    fn missing_lookup_fails() {
        let registry = Registry::empty();
        let err = registry.get::<Vec<i32>>().unwrap_err();
        assert!(matches!(err, CheckError::NotRegistered { .. }));
    }

    #[test]
    fn vec_factory_resolves_element_arbitrary() {
        let registry = Registry::with_builtins();
        let arb = registry.get_vec::<i32>().unwrap();
        let mut rng = crate::rng::Prng::from_seed(1);
        let v = arb.gen.sample(&mut rng, crate::rng::Size::new(10));
        assert!(v.len() < 10);
    }

    #[test]
    fn global_registry_has_builtins() {
        assert!(global().contains::<i64>());
    }

    #[test]
    fn triple_factory_resolves_each_element_arbitrary() {
        let registry = Registry::with_builtins();
        let arb = registry.get_triple::<i32, bool, char>().unwrap();
        let mut rng = crate::rng::Prng::from_seed(2);
        let _ = arb.gen.sample(&mut rng, crate::rng::Size::new(10));
    }
}
