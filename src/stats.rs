use crate::probe::round2;
use crate::types::{Endpoint, EndpointSummary, Measurement, SummaryStatus};

/// Linearly interpolated order statistic for `p` in `[0, 1]`.
///
/// Sorts a copy ascending, takes the fractional rank `(n - 1) * p` and
/// interpolates between the bracketing values; when the upper bracket falls
/// off the end the lower value is returned directly. Empty input yields 0 by
/// definition rather than an error.
pub fn percentile(samples: &[f64], p: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let pos = (sorted.len() - 1) as f64 * p;
    let base = pos.floor() as usize;
    let rest = pos - base as f64;
    match sorted.get(base + 1) {
        Some(upper) => sorted[base] + rest * (upper - sorted[base]),
        None => sorted[base],
    }
}

/// Aggregate one endpoint's measurements.
///
/// With zero successful samples this produces a FAIL summary carrying the
/// first error detail seen for the endpoint, so a dead endpoint still shows
/// up in the report instead of aborting the run.
pub fn summarize(endpoint: Endpoint, all: &[Measurement]) -> EndpointSummary {
    let durations: Vec<f64> = all
        .iter()
        .filter(|m| m.endpoint == endpoint && m.success)
        .map(|m| m.duration_ms)
        .collect();

    if durations.is_empty() {
        let error = all
            .iter()
            .find(|m| m.endpoint == endpoint)
            .map(|m| m.error_details.clone())
            .unwrap_or_else(|| "Unknown".into());
        return EndpointSummary::Fail {
            endpoint,
            status: SummaryStatus::Fail,
            error,
        };
    }

    let min = durations.iter().copied().fold(f64::INFINITY, f64::min);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;
    EndpointSummary::Ok {
        endpoint,
        samples: durations.len(),
        min: round2(min),
        mean: round2(mean),
        p95: round2(percentile(&durations, 0.95)),
        status: SummaryStatus::Ok,
    }
}
