//! Simple Moving Average (SMA).
//!
//! Rolling mean over a trailing window of `period` values.
//! Undefined (NaN) for the first `period - 1` positions and for any window
//! containing a NaN.

/// Compute the SMA of an arbitrary series.
pub fn sma_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let mut sum = 0.0;
    let mut nan_count = 0usize;
    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            nan_count += 1;
        } else {
            sum += v;
        }

        if i >= period {
            let leaving = values[i - period];
            if leaving.is_nan() {
                nan_count -= 1;
            } else {
                sum -= leaving;
            }
        }

        if i + 1 >= period && nan_count == 0 {
            result[i] = sum / period as f64;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn sma_3_known_values() {
        let result = sma_of_series(&[10.0, 11.0, 12.0, 13.0, 14.0], 3);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 11.0, DEFAULT_EPSILON);
        assert_approx(result[3], 12.0, DEFAULT_EPSILON);
        assert_approx(result[4], 13.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_period_1_is_identity() {
        let result = sma_of_series(&[3.0, 1.0, 4.0], 1);
        assert_eq!(result, vec![3.0, 1.0, 4.0]);
    }

    #[test]
    fn sma_skips_windows_with_nan() {
        let result = sma_of_series(&[f64::NAN, 2.0, 4.0, 6.0], 2);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 3.0, DEFAULT_EPSILON);
        assert_approx(result[3], 5.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_too_short() {
        assert!(sma_of_series(&[1.0, 2.0], 3).iter().all(|v| v.is_nan()));
        assert!(sma_of_series(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
    }
}
