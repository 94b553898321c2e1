use crate::time_series::TimeSeriesPoint;

/// Compute X (seconds) and Y (WPM) bounds for the results chart
pub fn compute_chart_params(samples: &[TimeSeriesPoint], elapsed_secs: f64) -> (f64, f64) {
    let highest_wpm = samples.iter().map(|p| p.wpm).fold(0.0, f64::max);

    let mut overall_duration = match samples.last() {
        Some(p) => p.t.max(elapsed_secs),
        None => elapsed_secs,
    };
    if overall_duration < 1.0 {
        overall_duration = 1.0;
    }

    (overall_duration, highest_wpm.round())
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
