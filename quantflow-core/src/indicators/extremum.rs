//! Rolling extremum and bars-since-extremum over a trailing window.
//!
//! Both scan the `window + 1` values ending at each position `i >= window`.
//! Positions before `window`, and windows containing NaN, are NaN.
//! Ties resolve to the earliest occurrence of the extremum.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extremum {
    Max,
    Min,
}

/// Offset (from window start) of the earliest extremum, `None` if any NaN.
fn extremum_offset(window: &[f64], which: Extremum) -> Option<usize> {
    let mut best_offset = 0;
    let mut best = *window.first()?;
    if best.is_nan() {
        return None;
    }
    for (j, &v) in window.iter().enumerate().skip(1) {
        if v.is_nan() {
            return None;
        }
        let better = match which {
            Extremum::Max => v > best,
            Extremum::Min => v < best,
        };
        if better {
            best = v;
            best_offset = j;
        }
    }
    Some(best_offset)
}

fn bars_since(values: &[f64], window: usize, which: Extremum) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    for i in window..n {
        if let Some(offset) = extremum_offset(&values[i - window..=i], which) {
            result[i] = (window - offset) as f64;
        }
    }

    result
}

fn rolling(values: &[f64], window: usize, which: Extremum) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    for i in window..n {
        let slice = &values[i - window..=i];
        if let Some(offset) = extremum_offset(slice, which) {
            result[i] = slice[offset];
        }
    }

    result
}

/// Bars since the highest value in the trailing `window + 1` values, in `[0, window]`.
pub fn bars_since_highest(values: &[f64], window: usize) -> Vec<f64> {
    bars_since(values, window, Extremum::Max)
}

/// Bars since the lowest value in the trailing `window + 1` values, in `[0, window]`.
pub fn bars_since_lowest(values: &[f64], window: usize) -> Vec<f64> {
    bars_since(values, window, Extremum::Min)
}

/// Highest value in the trailing `window + 1` values.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, Extremum::Max)
}

/// Lowest value in the trailing `window + 1` values.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling(values, window, Extremum::Min)
}
