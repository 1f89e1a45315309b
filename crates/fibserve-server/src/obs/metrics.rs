//! Minimal metrics registry for the service.
//!
//! Counter and histogram types with dynamic labels backed by `DashMap`.
//! Label sets are flattened into sorted key vectors and rows are sorted on
//! render, so the exposition output is deterministic. Histogram buckets are
//! fixed in microseconds to keep the hot path integer-only; they are rendered
//! in seconds.

use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

type LabelKey = Vec<(String, String)>;

/// Helper to escape label values.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> LabelKey {
    let mut key: LabelKey = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

fn label_str(key: &LabelKey) -> String {
    key.iter()
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

/// `name` or `name{labels}`.
fn series(name: &str, labels: &str) -> String {
    if labels.is_empty() {
        name.to_string()
    } else {
        format!("{name}{{{labels}}}")
    }
}

fn header(out: &mut String, name: &str, help: &str, kind: &str) {
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} {kind}");
}

fn micros_as_secs(micros: u64) -> f64 {
    micros as f64 / 1_000_000.0
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<LabelKey, AtomicU64>,
}

impl CounterVec {
    /// Increment by 1.
    pub fn inc(&self, labels: &[(&str, &str)]) {
        self.add(labels, 1);
    }

    /// Increment by an arbitrary value. Adding 0 registers the series.
    pub fn add(&self, labels: &[(&str, &str)], v: u64) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value for a label set (0 if never touched).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format.
    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "counter");
        let mut rows: Vec<(LabelKey, u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort();
        for (key, val) in rows {
            let _ = writeln!(out, "{} {}", series(name, &label_str(&key)), val);
        }
    }
}

// Fixed buckets in microseconds:
// 100us, 500us, 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s
const BUCKETS_MICROS: [u64; 9] = [100, 500, 1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000];

struct AtomicHistogram {
    count: AtomicU64,
    sum_micros: AtomicU64,
    buckets: [AtomicU64; BUCKETS_MICROS.len()],
}

impl Default for AtomicHistogram {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_micros: AtomicU64::new(0),
            buckets: std::array::from_fn(|_| AtomicU64::new(0)),
        }
    }
}

#[derive(Default)]
pub struct HistogramVec {
    map: DashMap<LabelKey, AtomicHistogram>,
}

impl HistogramVec {
    /// Observe a duration and increment cumulative buckets.
    pub fn observe(&self, labels: &[(&str, &str)], duration: Duration) {
        let hist = self
            .map
            .entry(label_key(labels))
            .or_insert_with(AtomicHistogram::default);
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        hist.count.fetch_add(1, Ordering::Relaxed);
        hist.sum_micros.fetch_add(micros, Ordering::Relaxed);

        // cumulative: every bucket at or above the value
        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                hist.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Number of observations for a label set.
    pub fn count(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|h| h.count.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Render in Prometheus text exposition format (unit: seconds).
    fn render(&self, name: &str, help: &str, out: &mut String) {
        header(out, name, help, "histogram");
        let mut keys: Vec<LabelKey> = self.map.iter().map(|r| r.key().clone()).collect();
        keys.sort();

        for key in keys {
            let Some(hist) = self.map.get(&key) else { continue };
            let labels = label_str(&key);
            let prefix = if labels.is_empty() { String::new() } else { format!("{labels},") };

            for (i, &le) in BUCKETS_MICROS.iter().enumerate() {
                let count = hist.buckets[i].load(Ordering::Relaxed);
                let _ = writeln!(out, "{name}_bucket{{{prefix}le=\"{}\"}} {count}", micros_as_secs(le));
            }
            let count = hist.count.load(Ordering::Relaxed);
            let _ = writeln!(out, "{name}_bucket{{{prefix}le=\"+Inf\"}} {count}");

            let sum = micros_as_secs(hist.sum_micros.load(Ordering::Relaxed));
            let _ = writeln!(out, "{} {}", series(&format!("{name}_sum"), &labels), sum);
            let _ = writeln!(out, "{} {}", series(&format!("{name}_count"), &labels), count);
        }
    }
}

/// Process metrics, owned by `AppState`.
pub struct ServiceMetrics {
    pub requests: CounterVec,
    pub request_errors: CounterVec,
    pub request_latency: HistogramVec,
    draining: AtomicBool,
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    pub fn new() -> Self {
        let m = Self {
            requests: CounterVec::default(),
            request_errors: CounterVec::default(),
            request_latency: HistogramVec::default(),
            draining: AtomicBool::new(false),
        };
        // scrapers see the unlabelled total from the first scrape
        m.requests.add(&[], 0);
        m
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.draining.store(true, Ordering::Relaxed);
    }
    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Relaxed)
    }

    /// Render all registered metrics plus any extra gauges provided by callers.
    pub fn render(&self, extra: &[(&str, u64)]) -> String {
        let mut out = String::new();
        self.requests.render("fibonacci_requests_total", "Total Fibonacci requests", &mut out);
        self.request_errors.render(
            "fibonacci_request_errors_total",
            "Total Fibonacci request errors",
            &mut out,
        );
        self.request_latency.render(
            "fibonacci_request_latency_seconds",
            "Fibonacci request latency in seconds",
            &mut out,
        );

        header(&mut out, "fibserve_draining", "1 while the server is shutting down", "gauge");
        let _ = writeln!(out, "fibserve_draining {}", u8::from(self.is_draining()));
        for (k, v) in extra {
            let _ = writeln!(out, "# TYPE {k} gauge");
            let _ = writeln!(out, "{k} {v}");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_registry_exposes_zero_total() {
        let out = ServiceMetrics::new().render(&[]);
        assert!(out.contains("# TYPE fibonacci_requests_total counter\n"));
        assert!(out.contains("\nfibonacci_requests_total 0\n"));
        assert!(out.contains("fibserve_draining 0\n"));
    }

    #[test]
    fn counters_render_sorted_labelled_rows() {
        let m = ServiceMetrics::new();
        m.requests.inc(&[]);
        m.requests.inc(&[]);
        m.request_errors.inc(&[("reason", "missing_parameter")]);
        m.request_errors.inc(&[("reason", "invalid_argument")]);
        m.request_errors.inc(&[("reason", "invalid_argument")]);

        assert_eq!(m.requests.get(&[]), 2);
        assert_eq!(m.request_errors.get(&[("reason", "invalid_argument")]), 2);
        assert_eq!(m.request_errors.get(&[("reason", "internal")]), 0);

        let out = m.render(&[]);
        let a = out
            .find("fibonacci_request_errors_total{reason=\"invalid_argument\"} 2")
            .unwrap();
        let b = out
            .find("fibonacci_request_errors_total{reason=\"missing_parameter\"} 1")
            .unwrap();
        assert!(a < b);
        assert!(out.contains("\nfibonacci_requests_total 2\n"));
    }

    #[test]
    fn histogram_buckets_are_cumulative_and_in_seconds() {
        let h = HistogramVec::default();
        h.observe(&[("status", "200")], Duration::from_micros(50));
        h.observe(&[("status", "200")], Duration::from_millis(3));
        h.observe(&[("status", "200")], Duration::from_secs(2));
        assert_eq!(h.count(&[("status", "200")]), 3);

        let mut out = String::new();
        h.render("lat_seconds", "latency", &mut out);
        assert!(out.contains("lat_seconds_bucket{status=\"200\",le=\"0.0001\"} 1\n"));
        assert!(out.contains("lat_seconds_bucket{status=\"200\",le=\"0.005\"} 2\n"));
        assert!(out.contains("lat_seconds_bucket{status=\"200\",le=\"1\"} 2\n"));
        assert!(out.contains("lat_seconds_bucket{status=\"200\",le=\"+Inf\"} 3\n"));
        assert!(out.contains("lat_seconds_count{status=\"200\"} 3\n"));
        assert!(out.contains("lat_seconds_sum{status=\"200\"} 2.00305\n"));
    }

    #[test]
    fn label_values_are_escaped() {
        let c = CounterVec::default();
        c.inc(&[("path", "a\"b\\c")]);
        let mut out = String::new();
        c.render("x_total", "x", &mut out);
        assert!(out.contains("x_total{path=\"a\\\"b\\\\c\"} 1\n"));
    }

    #[test]
    fn draining_flag_and_extra_gauges() {
        let m = ServiceMetrics::new();
        m.set_draining();
        assert!(m.is_draining());
        let out = m.render(&[("fibserve_uptime_seconds", 42)]);
        assert!(out.contains("fibserve_draining 1\n"));
        assert!(out.contains("fibserve_uptime_seconds 42\n"));
    }
}
