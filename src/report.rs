//! Console report formatting (spec.md section 6) — the stable,
//! human-readable output shapes for a successful and a falsifying `check`
//! run. Plain formatted strings assembled and printed directly, following
//! the teacher's convention; color applied via `colored`.

use colored::Colorize;

/// `'<label>' passed <success-count> tests. Discarded: <discard-count>`
pub fn format_success(label: &str, success_count: usize, discard_count: usize) -> String {
    format!(
        "'{}' passed {} tests. Discarded: {}",
        label, success_count, discard_count
    )
}

/// `<bucket-key>: <percentage>` lines, ordered by key, preceded by a
/// `Test case distribution:` header. Empty when no buckets were populated.
pub fn format_distribution(classes: &[(String, usize)], total: usize) -> Option<String> {
    if classes.is_empty() || total == 0 {
        return None;
    }
    let mut sorted = classes.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));
    let mut lines = vec!["Test case distribution:".to_string()];
    for (key, count) in sorted {
        let pct = (count as f64 / total as f64) * 100.0;
        lines.push(format!("{}: {:.2}%", key, pct));
    }
    Some(lines.join("\n"))
}

/// `Falsifiable after <N> tests. Shrinking input.`, rendered in red.
pub fn format_failure_start(tries: usize) -> String {
    format!("Falsifiable after {} tests. Shrinking input.", tries)
        .red()
        .to_string()
}

/// One progress dot per shrinking improvement.
pub fn shrink_progress_dot() -> &'static str {
    "."
}

/// `Property '<label>' failed for input:\n<value>`
pub fn format_failure_final(label: &str, value: &str) -> String {
    format!("Property '{}' failed for input:\n{}", label, value)
}

/// `Seed: <seed> (use this to reproduce the failure)` — printed alongside a
/// falsifying run so the seed can be pinned via `TestConfig::with_seed` to
/// replay the same minimization without re-searching from scratch.
pub fn format_seed_line(seed: u64) -> String {
    format!("Seed: {} (use this to reproduce the failure)", seed)
}
