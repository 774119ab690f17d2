//! Exponential smoothing: EMA and Wilder's RMA.
//!
//! Recursive: out[t] = alpha * x[t] + (1 - alpha) * out[t-1],
//! evaluated as out[t-1] + alpha * (x[t] - out[t-1]) so a constant input
//! reproduces itself exactly.
//! Seed: out[s] = x[s] at the first defined input `s` (no SMA warm-up gap).
//! Leading NaN inputs, e.g. the first element of a difference series, are
//! skipped so the recurrence starts at the first real value.
//!
//! EMA: alpha = 2 / (span + 1). RMA: alpha = 1 / length.

/// Exponentially smooth `values` with an explicit smoothing factor.
///
/// A NaN after the seed taints every later output.
pub fn exponential_smooth(values: &[f64], alpha: f64) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    let start = match values.iter().position(|v| !v.is_nan()) {
        Some(idx) => idx,
        None => return result,
    };

    let mut prev = values[start];
    result[start] = prev;

    for i in (start + 1)..n {
        if values[i].is_nan() {
            return result;
        }
        prev += alpha * (values[i] - prev);
        result[i] = prev;
    }

    result
}

/// EMA with span-based smoothing factor `2 / (span + 1)`.
pub fn ema_of_series(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return vec![f64::NAN; values.len()];
    }
    exponential_smooth(values, 2.0 / (span as f64 + 1.0))
}

/// Wilder's smoothing (RMA): EMA with smoothing factor `1 / length`.
pub fn rma(values: &[f64], length: usize) -> Vec<f64> {
    if length == 0 {
        return vec![f64::NAN; values.len()];
    }
    exponential_smooth(values, 1.0 / length as f64)
}
