//! Built-in `Arbitrary` implementations for primitives and basic
//! collections — the generator/shrinker pairs the registry installs
//! eagerly at initialization (spec.md section 4.2/4.3).

use crate::arbitrary::Arbitrary;
use crate::generate::{self, choice, Gen};
use crate::rng::Size;
use crate::shrink::{self, ShrinkIter};

/// A primitive integer type narrow enough to round-trip through `i64`
/// without surprises for the size-bounded magnitudes this engine generates.
pub trait IntPrimitive: Copy + Send + Sync + 'static {
    fn to_i64(self) -> i64;
    fn from_i64(v: i64) -> Self;
}

macro_rules! impl_int_primitive {
    ($($t:ty),*) => {
        $(
            impl IntPrimitive for $t {
                fn to_i64(self) -> i64 {
                    self as i64
                }
                fn from_i64(v: i64) -> Self {
                    v as $t
                }
            }
        )*
    };
}

impl_int_primitive!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// A primitive floating-point type.
pub trait FloatPrimitive: Copy + Send + Sync + 'static {
    fn to_f64(self) -> f64;
    fn from_f64(v: f64) -> Self;
}

impl FloatPrimitive for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}
impl FloatPrimitive for f64 {
    fn to_f64(self) -> f64 {
        self
    }
    fn from_f64(v: f64) -> Self {
        v
    }
}

pub fn arbitrary_bool() -> Arbitrary<bool> {
    let gen = Gen::new(|rng, _size| rng.u64_below(2) == 1);
    Arbitrary::new(gen, |v: &bool| {
        if *v {
            Box::new(std::iter::once(false)) as ShrinkIter<bool>
        } else {
            Box::new(std::iter::empty())
        }
    })
}

/// Signed integer: unrestricted range, bounded by size around zero.
pub fn arbitrary_signed<T: IntPrimitive>() -> Arbitrary<T> {
    let gen = generate::int_unrestricted().map(T::from_i64);
    Arbitrary::new(gen, |v: &T| {
        let x = v.to_i64();
        Box::new(shrink::shrink_signed(x).into_iter().map(T::from_i64)) as ShrinkIter<T>
    })
}

/// Unsigned integer: `[0, size)`, shrinking towards zero.
pub fn arbitrary_unsigned<T: IntPrimitive>() -> Arbitrary<T> {
    let gen = Gen::new(|rng, size| {
        let width = (size.get() as i64).max(1);
        T::from_i64(rng.int_in_range(0, width))
    });
    Arbitrary::new(gen, |v: &T| {
        let x = v.to_i64().max(0) as u64;
        Box::new(
            shrink::shrink_unsigned(x)
                .into_iter()
                .map(|c| T::from_i64(c as i64)),
        ) as ShrinkIter<T>
    })
}

pub fn arbitrary_float<T: FloatPrimitive>() -> Arbitrary<T> {
    let gen = generate::float_unrestricted().map(T::from_f64);
    Arbitrary::new(gen, |v: &T| {
        let x = v.to_f64();
        Box::new(shrink::shrink_float(x).into_iter().map(T::from_f64)) as ShrinkIter<T>
    })
}

const PUNCTUATION: &[char] = &[
    '!', '"', '#', '$', '%', '&', '\'', '(', ')', '*', '+', ',', '-', '.', '/', ':', ';', '<', '=',
    '>', '?', '@', '[', '\\', ']', '^', '_', '`', '{', '|', '}', '~',
];

fn char_candidates() -> Vec<char> {
    let mut cs: Vec<char> = Vec::new();
    cs.extend('A'..='Z');
    cs.extend('a'..='z');
    cs.extend('0'..='9');
    cs.extend(PUNCTUATION.iter().copied());
    cs.push(' ');
    cs.push('\t');
    cs.push('\n');
    cs
}

/// Character: uniformly chosen from the fixed candidate set (letters,
/// digits, punctuation, space, tab, newline).
pub fn arbitrary_char() -> Arbitrary<char> {
    let gen = choice(char_candidates());
    Arbitrary::new(gen, |c: &char| {
        Box::new(shrink::shrink_char(*c).into_iter()) as ShrinkIter<char>
    })
}

/// String: a character array generated then packed, shrunk as a collection
/// of characters and repacked.
pub fn arbitrary_string() -> Arbitrary<String> {
    let char_gen = choice(char_candidates());
    let gen = char_gen.vec_of().map(|cs| cs.into_iter().collect::<String>());
    Arbitrary::new(gen, |s: &String| {
        Box::new(shrink::shrink_string(s).into_iter()) as ShrinkIter<String>
    })
}

/// `Vec<T>` built from an inner arbitrary — the "random-length array whose
/// length is drawn uniformly from `[0, size)`" generator, paired with the
/// shared collection shrinker.
pub fn arbitrary_vec<T: Clone + Send + Sync + 'static>(elem: Arbitrary<T>) -> Arbitrary<Vec<T>> {
    let gen = elem.gen.clone().vec_of();
    let elem_shrink = elem.shrink.clone();
    Arbitrary::new(gen, move |v: &Vec<T>| {
        let elem_shrink = elem_shrink.clone();
        let candidates = shrink::shrink_vec(v, move |x| elem_shrink(x).collect());
        Box::new(candidates.into_iter()) as ShrinkIter<Vec<T>>
    })
}

/// Fixed `rows x cols` two-dimensional array.
pub fn arbitrary_array2d<T: Clone + Send + Sync + 'static>(
    elem: Arbitrary<T>,
    rows: usize,
    cols: usize,
) -> Arbitrary<Vec<Vec<T>>> {
    let gen = elem.gen.clone().array2d(rows, cols);
    let elem_shrink = elem.shrink.clone();
    Arbitrary::new(gen, move |rows_v: &Vec<Vec<T>>| {
        let elem_shrink_outer = elem_shrink.clone();
        let candidates = shrink::shrink_vec(rows_v, move |row: &Vec<T>| {
            let elem_shrink = elem_shrink_outer.clone();
            shrink::shrink_vec(row, move |x| elem_shrink(x).collect())
        });
        Box::new(candidates.into_iter()) as ShrinkIter<Vec<Vec<T>>>
    })
}

/// `Option<T>`: roughly one draw in four is `None`.
pub fn arbitrary_option<T: Clone + Send + Sync + 'static>(elem: Arbitrary<T>) -> Arbitrary<Option<T>> {
    let elem_gen = elem.gen.clone();
    let gen = Gen::new(move |rng, size: Size| {
        if rng.u64_below(4) == 0 {
            None
        } else {
            Some(elem_gen.sample(rng, size))
        }
    });
    let elem_shrink = elem.shrink.clone();
    Arbitrary::new(gen, move |v: &Option<T>| match v {
        None => Box::new(std::iter::empty()) as ShrinkIter<Option<T>>,
        Some(x) => {
            let mut out: Vec<Option<T>> = vec![None];
            out.extend(elem_shrink(x).map(Some));
            Box::new(out.into_iter())
        }
    })
}

/// `(A, B)`: each position shrinks independently, left before right,
/// keeping the other position fixed — the same discipline spec.md's
/// collection shrinker uses for length vs. element, generalized to a fixed
/// product arity.
pub fn arbitrary_pair<A, B>(a: Arbitrary<A>, b: Arbitrary<B>) -> Arbitrary<(A, B)>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
{
    let gen = a.gen.clone().pair(b.gen.clone());
    let a_shrink = a.shrink.clone();
    let b_shrink = b.shrink.clone();
    Arbitrary::new(gen, move |(x, y): &(A, B)| {
        let mut out = Vec::new();
        for x2 in a_shrink(x) {
            out.push((x2, y.clone()));
        }
        for y2 in b_shrink(y) {
            out.push((x.clone(), y2));
        }
        Box::new(out.into_iter()) as ShrinkIter<(A, B)>
    })
}

/// `(A, B, C)`: each position shrinks independently, left to right, keeping
/// the other two positions fixed.
pub fn arbitrary_triple<A, B, C>(a: Arbitrary<A>, b: Arbitrary<B>, c: Arbitrary<C>) -> Arbitrary<(A, B, C)>
where
    A: Clone + Send + Sync + 'static,
    B: Clone + Send + Sync + 'static,
    C: Clone + Send + Sync + 'static,
{
    let gen = a.gen.clone().triple(b.gen.clone(), c.gen.clone());
    let a_shrink = a.shrink.clone();
    let b_shrink = b.shrink.clone();
    let c_shrink = c.shrink.clone();
    Arbitrary::new(gen, move |(x, y, z): &(A, B, C)| {
        let mut out = Vec::new();
        for x2 in a_shrink(x) {
            out.push((x2, y.clone(), z.clone()));
        }
        for y2 in b_shrink(y) {
            out.push((x.clone(), y2, z.clone()));
        }
        for z2 in c_shrink(z) {
            out.push((x.clone(), y.clone(), z2));
        }
        Box::new(out.into_iter()) as ShrinkIter<(A, B, C)>
    })
}
