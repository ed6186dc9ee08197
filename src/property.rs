//! The property algebra: `Prop<T>`, a function `TestState -> (Outcome, T)`
//! composable through map/bind/filter/order-by, with primitives for
//! universal quantification (`for_all`), dependent sampling (`any`), size
//! restriction, discard, and explicit failure (spec.md section 4.4).

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use crate::arbitrary::Arbitrary;
use crate::generate::Gen;
use crate::registry;
use crate::rng::{Prng, Size};

/// The driver phase a [`TestState`] is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Generate,
    StartShrink,
    Shrink,
}

/// The outcome of one property evaluation, distinct from failure (which is
/// signaled out-of-band via `Err(PropFailure)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Discard,
}

trait AnyValue: Any + Send {
    fn as_any(&self) -> &dyn Any;
    fn render(&self) -> String;
    fn clone_boxed(&self) -> Box<dyn AnyValue>;
}

impl<T: Any + Send + Debug + Clone> AnyValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn render(&self) -> String {
        format!("{:?}", self)
    }
    fn clone_boxed(&self) -> Box<dyn AnyValue> {
        Box::new(self.clone())
    }
}

/// A type-erased recorded draw value, tagged with its concrete type at
/// construction (design note (c) in spec.md section 9) so it can be
/// downcast during replay and rendered for failure reports.
pub struct DynValue(Box<dyn AnyValue>);

impl DynValue {
    pub fn new<T: Any + Send + Debug + Clone + 'static>(value: T) -> Self {
        DynValue(Box::new(value))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    pub fn render(&self) -> String {
        self.0.render()
    }
}

impl Clone for DynValue {
    fn clone(&self) -> Self {
        DynValue(self.0.clone_boxed())
    }
}

/// The mutable envelope threaded through `Prop<T>` execution (spec.md
/// section 3's TestState table).
pub struct TestState {
    pub phase: Phase,
    pub prng: Prng,
    pub seed: u64,
    pub size: Size,
    pub label: String,
    pub success_count: usize,
    pub discard_count: usize,
    pub classes: Vec<(String, usize)>,
    pub values: Vec<DynValue>,
    pub cursor: usize,
    pub shrink_sequences: Vec<Vec<DynValue>>,
}

impl TestState {
    pub fn new(seed: u64, size: Size, label: impl Into<String>) -> Self {
        TestState {
            phase: Phase::Generate,
            prng: Prng::from_seed(seed),
            seed,
            size,
            label: label.into(),
            success_count: 0,
            discard_count: 0,
            classes: Vec::new(),
            values: Vec::new(),
            cursor: 0,
            shrink_sequences: Vec::new(),
        }
    }

    /// Clear recorded draws and rewind the replay cursor; called between
    /// Generate iterations.
    pub fn reset_for_iteration(&mut self) {
        self.values.clear();
        self.cursor = 0;
    }

    pub fn bump_class(&mut self, key: String) {
        match self.classes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, count)) => *count += 1,
            None => self.classes.push((key, 1)),
        }
    }
}

/// A user-assertion failure: the tagged `PropertyFailed(label, value)`
/// condition of spec.md section 4.4, carried as a `Result::Err` rather than
/// a language-level exception.
#[derive(Debug, Clone)]
pub struct PropFailure {
    pub label: String,
    pub value: String,
}

pub type PropOutput<T> = Result<(Outcome, T), PropFailure>;

/// A pure(ish) function `TestState -> (Outcome, T)`, or a `PropFailure`.
/// `Prop<T>` values are reusable across iterations: each run reads and
/// mutates only the `TestState` it is given.
pub struct Prop<T>(Arc<dyn Fn(&mut TestState) -> PropOutput<T> + Send + Sync>);

impl<T> Clone for Prop<T> {
    fn clone(&self) -> Self {
        Prop(Arc::clone(&self.0))
    }
}

impl<T: 'static> Prop<T> {
    pub fn new(f: impl Fn(&mut TestState) -> PropOutput<T> + Send + Sync + 'static) -> Self {
        Prop(Arc::new(f))
    }

    pub fn run(&self, state: &mut TestState) -> PropOutput<T> {
        (self.0)(state)
    }

    /// `pure(v)`: succeed with `v`.
    pub fn pure(v: T) -> Self
    where
        T: Clone + Send + Sync,
    {
        Prop::new(move |_| Ok((Outcome::Success, v.clone())))
    }

    /// `failed(v)`: raise `PropertyFailed(state.label, v)`.
    pub fn failed(v: T) -> Self
    where
        T: Debug,
    {
        Prop::new(move |state| {
            Err(PropFailure {
                label: state.label.clone(),
                value: format!("{:?}", v),
            })
        })
    }

    /// `discarded(v)`: succeed with the `Discard` outcome.
    pub fn discarded(v: T) -> Self
    where
        T: Clone + Send + Sync,
    {
        Prop::new(move |_| Ok((Outcome::Discard, v.clone())))
    }

    /// Run `self`; on `Success` continue with `k(value)` against the same
    /// state; on `Discard`, short-circuit with `Discard` and `U::default()`.
    pub fn bind<U: 'static + Default>(
        self,
        k: impl Fn(T) -> Prop<U> + Send + Sync + 'static,
    ) -> Prop<U> {
        Prop::new(move |state| match self.run(state)? {
            (Outcome::Discard, _) => Ok((Outcome::Discard, U::default())),
            (Outcome::Success, value) => k(value).run(state),
        })
    }

    pub fn map<U: 'static + Clone + Send + Sync + Default>(
        self,
        f: impl Fn(T) -> U + Send + Sync + 'static,
    ) -> Prop<U> {
        self.bind(move |v| Prop::pure(f(v)))
    }

    /// `where(p, pred)`: continue as `pure(v)` if `pred(v)`, else
    /// `discarded(v)`.
    pub fn where_(self, pred: impl Fn(&T) -> bool + Send + Sync + 'static) -> Prop<T>
    where
        T: Clone + Send + Sync + Default,
    {
        self.bind(move |v| {
            if pred(&v) {
                Prop::pure(v)
            } else {
                Prop::discarded(v)
            }
        })
    }

    /// `failIf(p, pred)`: continue as `pure(v)` if `pred(v)`, else
    /// `failed(v)`. Used internally by the driver's `check`.
    pub fn fail_if(self, pred: impl Fn(&T) -> bool + Send + Sync + 'static) -> Prop<T>
    where
        T: Clone + Send + Sync + Debug + Default,
    {
        self.bind(move |v| if pred(&v) { Prop::pure(v) } else { Prop::failed(v) })
    }

    /// Temporarily set `state.size` for the duration of `self`, restoring it
    /// on exit regardless of outcome.
    pub fn restrict(self, size: Size) -> Prop<T> {
        Prop::new(move |state| {
            let previous = state.size;
            state.size = size;
            let result = self.run(state);
            state.size = previous;
            result
        })
    }

    /// `orderBy(p, classify)`: run `p`, stringify `classify(value)`, bump
    /// the matching bucket in `state.classes`. Outcome and value unchanged.
    ///
    /// `classify`'s result is stringified via `ToString`/`Display`, not
    /// `Debug` — a `Debug`-based key would wrap `&str`/`String` buckets in
    /// literal escaped quotes (`"even"` instead of `even`), corrupting the
    /// `<bucket-key>: <percentage>` console report line (spec.md section 6).
    pub fn order_by<K: ToString>(self, classify: impl Fn(&T) -> K + Send + Sync + 'static) -> Prop<T> {
        Prop::new(move |state| {
            let (outcome, value) = self.run(state)?;
            let key = classify(&value).to_string();
            state.bump_class(key);
            Ok((outcome, value))
        })
    }
}

/// `forAll(arb) -> Prop<T>`: phase-aware draw/replay against an explicit
/// arbitrary.
pub fn for_all<T>(arb: Arbitrary<T>) -> Prop<T>
where
    T: Any + Send + Sync + Debug + Clone + 'static,
{
    Prop::new(move |state| {
        match state.phase {
            Phase::Generate => {
                let value = arb.gen.sample(&mut state.prng, state.size);
                state.values.push(DynValue::new(value.clone()));
                Ok((Outcome::Success, value))
            }
            Phase::StartShrink => {
                let idx = state.cursor;
                state.cursor += 1;
                let current = state
                    .values
                    .get(idx)
                    .and_then(|v| v.downcast_ref::<T>())
                    .expect("StartShrink replay requires a value recorded in Generate")
                    .clone();
                let mut sequence: Vec<DynValue> = (arb.shrink)(&current).map(DynValue::new).collect();
                sequence.push(DynValue::new(current.clone()));
                state.shrink_sequences.push(sequence);
                Ok((Outcome::Success, current))
            }
            Phase::Shrink => {
                let idx = state.cursor;
                state.cursor += 1;
                let current = state
                    .values
                    .get(idx)
                    .and_then(|v| v.downcast_ref::<T>())
                    .expect("Shrink replay requires a candidate value set by the driver")
                    .clone();
                Ok((Outcome::Success, current))
            }
        }
    })
}

/// `forAll<T>() -> Prop<T>`: same as [`for_all`] but resolving the
/// arbitrary through the global registry. The lookup happens at
/// construction time (not inside a hot sampling closure), so a missing
/// registration is a genuine `Result` rather than a panic — propagate it
/// with `?` rather than unwrapping.
pub fn for_all_registered<T>() -> Result<Prop<T>, crate::error::CheckError>
where
    T: Any + Send + Sync + Debug + Clone + 'static,
{
    let arb = registry::global().get::<T>()?;
    Ok(for_all(arb))
}

/// `any(gen) -> Prop<T>`: yields `gen.sample(Prng::from_seed(state.seed),
/// state.size)`. Not recorded, not shrunk — the freshly-reseeded clone
/// guarantees the same value is produced again during shrinking replay.
pub fn any<T>(gen: Gen<T>) -> Prop<T>
where
    T: Send + Sync + 'static,
{
    Prop::new(move |state| {
        let mut fresh = Prng::from_seed(state.seed);
        Ok((Outcome::Success, gen.sample(&mut fresh, state.size)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::Arbitrary;

    fn int_arb() -> Arbitrary<i64> {
        crate::primitives::arbitrary_signed::<i64>()
    }

    #[test]
    fn for_all_generate_records_value() {
        let prop = for_all(int_arb());
        let mut state = TestState::new(1, Size::new(10), "t");
        let (outcome, value) = prop.run(&mut state).unwrap();
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(state.values.len(), 1);
        assert_eq!(state.values[0].downcast_ref::<i64>(), Some(&value));
    }

    #[test]
    fn start_shrink_appends_original_as_final_candidate() {
        let prop = for_all(int_arb());
        let mut state = TestState::new(2, Size::new(10), "t");
        prop.run(&mut state).unwrap();
        let original = state.values[0].downcast_ref::<i64>().copied().unwrap();

        state.phase = Phase::StartShrink;
        state.cursor = 0;
        prop.run(&mut state).unwrap();
        assert_eq!(state.shrink_sequences.len(), 1);
        let sequence = &state.shrink_sequences[0];
        assert_eq!(sequence.last().unwrap().downcast_ref::<i64>(), Some(&original));
    }

    #[test]
    fn bind_short_circuits_on_discard() {
        let prop = Prop::<i64>::discarded(5).bind(|_| Prop::<i64>::failed(999));
        let mut state = TestState::new(3, Size::new(10), "t");
        let (outcome, value) = prop.run(&mut state).unwrap();
        assert_eq!(outcome, Outcome::Discard);
        assert_eq!(value, 0);
    }

    #[test]
    fn where_discards_when_predicate_fails() {
        let prop = Prop::pure(4i64).where_(|v| *v > 10);
        let mut state = TestState::new(4, Size::new(10), "t");
        let (outcome, _) = prop.run(&mut state).unwrap();
        assert_eq!(outcome, Outcome::Discard);
    }

    #[test]
    fn fail_if_raises_property_failed() {
        let prop = Prop::pure(4i64).fail_if(|v| *v > 10);
        let mut state = TestState::new(5, Size::new(10), "my_check");
        let err = prop.run(&mut state).unwrap_err();
        assert_eq!(err.label, "my_check");
        assert_eq!(err.value, "4");
    }

    #[test]
    fn order_by_bumps_classification_bucket() {
        let prop = Prop::pure(4i64).order_by(|v| if *v % 2 == 0 { "even" } else { "odd" });
        let mut state = TestState::new(6, Size::new(10), "t");
        prop.run(&mut state).unwrap();
        assert_eq!(state.classes, vec![("even".to_string(), 1)]);
    }

    #[test]
    fn restrict_overrides_size_and_restores_it() {
        let prop = Prop::new(|state: &mut TestState| Ok((Outcome::Success, state.size.get())))
            .restrict(Size::new(999));
        let mut state = TestState::new(7, Size::new(10), "t");
        let (_, observed) = prop.run(&mut state).unwrap();
        assert_eq!(observed, 999);
        assert_eq!(state.size.get(), 10);
    }

    #[test]
    fn any_is_deterministic_across_replays() {
        let gen = int_arb().gen;
        let prop = any(gen);
        let mut state = TestState::new(42, Size::new(10), "t");
        let (_, first) = prop.run(&mut state).unwrap();
        let (_, second) = prop.run(&mut state).unwrap();
        assert_eq!(first, second);
        assert!(state.values.is_empty());
    }

    #[test]
    fn left_identity_law() {
        let k = |x: i64| Prop::pure(x * 2);
        let mut state_a = TestState::new(1, Size::new(10), "t");
        let mut state_b = TestState::new(1, Size::new(10), "t");
        let lhs = Prop::pure(5i64).bind(k).run(&mut state_a).unwrap();
        let rhs = k(5).run(&mut state_b).unwrap();
        assert_eq!(lhs.1, rhs.1);
    }

    #[test]
    fn right_identity_law() {
        let mut state_a = TestState::new(1, Size::new(10), "t");
        let mut state_b = TestState::new(1, Size::new(10), "t");
        let m = Prop::pure(7i64);
        let lhs = m.clone().bind(Prop::pure).run(&mut state_a).unwrap();
        let rhs = m.run(&mut state_b).unwrap();
        assert_eq!(lhs.1, rhs.1);
    }

    #[test]
    fn associativity_law() {
        let f = |x: i64| Prop::pure(x + 1);
        let g = |y: i64| Prop::pure(y * 2);
        let mut state_a = TestState::new(1, Size::new(10), "t");
        let mut state_b = TestState::new(1, Size::new(10), "t");

        let lhs = Prop::pure(3i64).bind(f).bind(g).run(&mut state_a).unwrap();
        let rhs = Prop::pure(3i64).bind(move |x| f(x).bind(g)).run(&mut state_b).unwrap();
        assert_eq!(lhs.1, rhs.1);
    }
}
