//! Sliding-window reshaping of a price series.
//!
//! A window of `lookback` consecutive values is the input; the value right
//! after it is the target.

/// Training pairs built from a series.
#[derive(Debug, Clone, PartialEq)]
pub struct Windows {
    pub inputs: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl Windows {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// `(values[i - lookback..i], values[i])` for every `i` in `lookback..len`.
///
/// Empty when `lookback` is zero or the series is too short.
pub fn sliding_windows(values: &[f64], lookback: usize) -> Windows {
    let inputs = input_windows(values, lookback);
    let targets = if inputs.is_empty() {
        Vec::new()
    } else {
        values[lookback..].to_vec()
    };
    Windows { inputs, targets }
}

/// Inputs only: one window per value after the first `lookback`.
pub fn input_windows(values: &[f64], lookback: usize) -> Vec<Vec<f64>> {
    if lookback == 0 || values.len() <= lookback {
        return Vec::new();
    }
    (lookback..values.len())
        .map(|i| values[i - lookback..i].to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_pair_history_with_next_value() {
        let w = sliding_windows(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(w.len(), 2);
        assert_eq!(w.inputs[0], vec![1.0, 2.0, 3.0]);
        assert_eq!(w.targets[0], 4.0);
        assert_eq!(w.inputs[1], vec![2.0, 3.0, 4.0]);
        assert_eq!(w.targets[1], 5.0);
    }

    #[test]
    fn zero_lookback_has_no_targets_either() {
        let w = sliding_windows(&[1.0, 2.0, 3.0], 0);
        assert!(w.inputs.is_empty());
        assert!(w.targets.is_empty());
        assert!(w.is_empty());
    }

    #[test]
    fn too_short_series_has_no_windows() {
        assert!(sliding_windows(&[1.0, 2.0, 3.0], 3).is_empty());
        assert!(input_windows(&[1.0, 2.0], 0).is_empty());
    }
}
