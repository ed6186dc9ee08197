//! A minimal generation-timing collector, supplementary to the core driver
//! (SPEC_FULL.md section B) — tracks how long the Generate phase of a
//! `check` run spent sampling, for an optional `--stats`-style hook. Not
//! required by any `check` call.

use std::time::{Duration, Instant};

/// Per-run timing collected during the Generate phase.
#[derive(Debug, Clone, Default)]
pub struct GenerationStats {
    pub iterations: usize,
    pub discards: usize,
    pub total_generate_time: Duration,
}

impl GenerationStats {
    pub fn average_generate_time(&self) -> Duration {
        if self.iterations == 0 {
            Duration::ZERO
        } else {
            self.total_generate_time / self.iterations as u32
        }
    }
}

/// Accumulates [`GenerationStats`] across a `check` run. Disabled by
/// default; a driver only pays the `Instant::now()` cost when a collector is
/// attached.
pub struct StatisticsCollector {
    enabled: bool,
    stats: GenerationStats,
}

impl StatisticsCollector {
    pub fn new() -> Self {
        StatisticsCollector {
            enabled: true,
            stats: GenerationStats::default(),
        }
    }

    pub fn disabled() -> Self {
        StatisticsCollector {
            enabled: false,
            stats: GenerationStats::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Time a single Generate-phase iteration, recording its duration if
    /// enabled.
    pub fn record_iteration<T>(&mut self, discarded: bool, f: impl FnOnce() -> T) -> T {
        if !self.enabled {
            return f();
        }
        let start = Instant::now();
        let result = f();
        self.stats.total_generate_time += start.elapsed();
        self.stats.iterations += 1;
        if discarded {
            self.stats.discards += 1;
        }
        result
    }

    /// Record an already-measured duration (used when the discard/failure
    /// outcome is only known after the call completes).
    pub fn record(&mut self, discarded: bool, duration: Duration) {
        if !self.enabled {
            return;
        }
        self.stats.iterations += 1;
        self.stats.total_generate_time += duration;
        if discarded {
            self.stats.discards += 1;
        }
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }
}

impl Default for StatisticsCollector {
    fn default() -> Self {
        StatisticsCollector::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn disabled_collector_skips_timing() {
        let mut collector = StatisticsCollector::disabled();
        collector.record_iteration(false, || 1 + 1);
        assert_eq!(collector.stats().iterations, 0);
    }

    #[test]
    fn enabled_collector_counts_iterations_and_discards() {
        let mut collector = StatisticsCollector::new();
        collector.record_iteration(false, || sleep(Duration::from_micros(10)));
        collector.record_iteration(true, || ());
        assert_eq!(collector.stats().iterations, 2);
        assert_eq!(collector.stats().discards, 1);
        assert!(collector.stats().total_generate_time > Duration::ZERO);
    }

    #[test]
    fn average_generate_time_is_zero_with_no_iterations() {
        let collector = StatisticsCollector::new();
        assert_eq!(collector.stats().average_generate_time(), Duration::ZERO);
    }
}
