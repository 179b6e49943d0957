//! Min-max scaling to `[0, 1]`.

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScaler {
    min: f64,
    range: f64,
}

impl MinMaxScaler {
    /// Learn the scaling from `values`.
    ///
    /// A flat series maps every value to `0.0` (range treated as 1).
    pub fn fit(values: &[f64]) -> Result<Self, AppError> {
        if values.is_empty() {
            return Err(AppError::validation("Cannot scale an empty series."));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(AppError::internal("Non-finite value in series to scale."));
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = if max > min { max - min } else { 1.0 };
        Ok(Self { min, range })
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.min) / self.range
    }

    pub fn inverse_transform(&self, scaled: f64) -> f64 {
        scaled * self.range + self.min
    }

    pub fn transform_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.transform(v)).collect()
    }
}
