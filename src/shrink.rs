//! Built-in shrinkers: per-type "simpler-first" candidate sequences.
//!
//! Every function here returns candidates ordered from simplest to
//! closest-to-original and never includes the original value itself — the
//! driver is responsible for appending the original as the final fallback
//! (see `property::for_all`).

/// A finite, simpler-first sequence of shrink candidates for a value.
pub type ShrinkIter<T> = Box<dyn Iterator<Item = T> + Send>;

pub fn empty_shrink<T: 'static>() -> ShrinkIter<T> {
    Box::new(std::iter::empty())
}

fn dedup_preserve_order<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Character shrinker: a small fixed candidate set, filtered to those
/// strictly simpler than `c`.
pub fn shrink_char(c: char) -> Vec<char> {
    fn simpler_than(x: char, c: char) -> bool {
        let x_lower = x.is_ascii_lowercase();
        let c_lower = c.is_ascii_lowercase();
        let x_upper = x.is_ascii_uppercase();
        let c_upper = c.is_ascii_uppercase();
        let x_digit = x.is_ascii_digit();
        let c_digit = c.is_ascii_digit();
        let x_space = x == ' ';
        let c_space = c == ' ';
        let x_ws = x.is_whitespace();
        let c_ws = c.is_whitespace();
        (x_lower && !c_lower)
            || (x_upper && !c_upper)
            || (x_digit && !c_digit)
            || (x_space && !c_space)
            || (x_ws && !c_ws)
            || ((x as u32) < (c as u32))
    }

    let candidates = ['a', 'b', 'A', 'B', '1', '2', c.to_ascii_lowercase(), ' '];
    let mut out = Vec::new();
    for x in candidates {
        if x != c && simpler_than(x, c) && !out.contains(&x) {
            out.push(x);
        }
    }
    out
}

/// Shrinks a signed integer towards zero: `0`, `-x` (if negative), then
/// `x - x/2, x - x/4, ...` halving the remaining distance until the
/// candidate is no longer closer to zero than `x`.
pub fn shrink_signed(x: i64) -> Vec<i64> {
    if x == 0 {
        return Vec::new();
    }
    let mut out = vec![0i64];
    if x < 0 {
        out.push(-x);
    }
    let mut k: u32 = 1;
    loop {
        if k >= 63 {
            break;
        }
        let step = x / (1i64 << k);
        if step == 0 {
            break;
        }
        let candidate = x - step;
        if candidate.unsigned_abs() < x.unsigned_abs() {
            out.push(candidate);
        } else {
            break;
        }
        k += 1;
    }
    dedup_preserve_order(out)
        .into_iter()
        .filter(|c| *c != x)
        .collect()
}

/// Unsigned counterpart of [`shrink_signed`] — same halving-toward-zero
/// sequence without the negation step.
pub fn shrink_unsigned(x: u64) -> Vec<u64> {
    if x == 0 {
        return Vec::new();
    }
    let mut out = vec![0u64];
    let mut k: u32 = 1;
    loop {
        if k >= 63 {
            break;
        }
        let step = x / (1u64 << k);
        if step == 0 {
            break;
        }
        let candidate = x - step;
        if candidate < x {
            out.push(candidate);
        } else {
            break;
        }
        k += 1;
    }
    dedup_preserve_order(out)
        .into_iter()
        .filter(|c| *c != x)
        .collect()
}

/// Floating-point shrinker: `0.0`, `floor(x)`, `ceil(x)`, `-x` when `x < 0`.
/// NaN and infinities are unshrinkable.
pub fn shrink_float(x: f64) -> Vec<f64> {
    if !x.is_finite() || x == 0.0 {
        return Vec::new();
    }
    let mut out = Vec::new();
    out.push(0.0);
    let floor = x.floor();
    out.push(floor);
    let ceil = x.ceil();
    out.push(ceil);
    if x < 0.0 {
        out.push(-x);
    }
    dedup_preserve_order(out)
        .into_iter()
        .filter(|c| *c != x)
        .collect()
}

/// The shared collection shrinker used for `Vec<T>` and (after packing) for
/// `String`. Implements spec's fixed ordering: all length-reduction
/// candidates (with recursive element shrinks of each shorter candidate)
/// before any same-length single-element shrink.
pub fn shrink_vec<T: Clone>(values: &[T], elem_shrink: impl Fn(&T) -> Vec<T>) -> Vec<Vec<T>> {
    let len = values.len();
    let mut out: Vec<Vec<T>> = Vec::new();
    if len == 0 {
        return out;
    }

    // Step 1: the empty collection, first.
    out.push(Vec::new());

    // Step 2: shorter collections by removing contiguous windows of
    // decreasing width k = len-1, len-2, ..., 1, then shrinking each
    // element of every shorter candidate before moving to a smaller k.
    for k in (1..len).rev() {
        let mut shorter_at_k: Vec<Vec<T>> = Vec::new();
        let mut pos = 0;
        while pos < len {
            let end = (pos + k).min(len);
            let mut candidate = Vec::with_capacity(len - (end - pos));
            candidate.extend_from_slice(&values[..pos]);
            candidate.extend_from_slice(&values[end..]);
            shorter_at_k.push(candidate);
            pos += k;
        }

        for candidate in &shorter_at_k {
            out.push(candidate.clone());
        }
        for candidate in &shorter_at_k {
            for i in 0..candidate.len() {
                for shrunk_elem in elem_shrink(&candidate[i]) {
                    let mut variant = candidate.clone();
                    variant[i] = shrunk_elem;
                    out.push(variant);
                }
            }
        }
    }

    // Step 3: same length, one element shrunk at a time.
    for i in 0..len {
        for shrunk_elem in elem_shrink(&values[i]) {
            let mut variant = values.to_vec();
            variant[i] = shrunk_elem;
            out.push(variant);
        }
    }

    out
}

/// `String` is generated as a character array then packed; shrink it the
/// same way, then repack.
pub fn shrink_string(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    shrink_vec(&chars, |c| shrink_char(*c))
        .into_iter()
        .map(|cs| cs.into_iter().collect())
        .collect()
}
