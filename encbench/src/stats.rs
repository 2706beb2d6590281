
use std::time::Duration;
use itertools::*;

/// Convert a [Duration] into (fractional) milliseconds.
pub fn as_millis_f64(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

/// Elapsed times observed for one backend across repeated runs.
#[derive(Clone, Debug)]
pub struct BenchResult {
    /// Name of the backend
    pub name: &'static str,
    /// Number of encode iterations in each run
    pub iters: usize,
    /// Elapsed wall-clock time for each run
    pub runs: Vec<Duration>,
}
impl BenchResult {
    pub fn new(name: &'static str, iters: usize) -> Self {
        Self { name, iters, runs: Vec::new() }
    }

    pub fn push(&mut self, elapsed: Duration) {
        self.runs.push(elapsed);
    }

    /// Summarize all runs. Returns [None] if nothing was recorded.
    pub fn stats(&self) -> Option<RunStats> {
        RunStats::from_durations(&self.runs)
    }

    /// The value reported on the result line: the single run, or the median
    /// over repeated runs.
    pub fn reported_ms(&self) -> Option<f64> {
        self.stats().map(|s| s.median_ms)
    }

    /// Format the result line, ie. `<name> <elapsed> ms`.
    pub fn line(&self) -> Option<String> {
        self.reported_ms().map(|ms| format!("{} {:.4} ms", self.name, ms))
    }
}

/// Summary over a set of elapsed times (all in milliseconds).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunStats {
    pub count: usize,
    pub min_ms: f64,
    pub max_ms: f64,
    pub mean_ms: f64,
    pub median_ms: f64,
}
impl RunStats {
    pub fn from_durations(data: &[Duration]) -> Option<Self> {
        if data.is_empty() {
            return None;
        }
        let (min, max) = match data.iter().minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(x) => (*x, *x),
            MinMaxResult::MinMax(x, y) => (*x, *y),
        };
        let sorted: Vec<Duration> = data.iter().copied().sorted().collect();
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (as_millis_f64(sorted[mid - 1]) + as_millis_f64(sorted[mid])) / 2.0
        } else {
            as_millis_f64(sorted[mid])
        };
        let total: Duration = data.iter().sum();

        Some(Self {
            count: data.len(),
            min_ms: as_millis_f64(min),
            max_ms: as_millis_f64(max),
            mean_ms: as_millis_f64(total) / data.len() as f64,
            median_ms: median,
        })
    }
}

/// Render a summary table for a set of results.
pub fn summary_table(results: &[BenchResult]) -> Vec<String> {
    let mut lines = vec![format!("  {:<16} {:>6} {:>12} {:>12} {:>12} {:>12}",
        "backend", "runs", "min", "median", "mean", "max")];
    for res in results.iter() {
        if let Some(s) = res.stats() {
            lines.push(format!(
                "  {:<16} {:>6} {:>12.4} {:>12.4} {:>12.4} {:>12.4}",
                res.name, s.count, s.min_ms, s.median_ms, s.mean_ms, s.max_ms
            ));
        }
    }
    lines
}
