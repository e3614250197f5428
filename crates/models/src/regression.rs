//! Regression Primitives
//!
//! Small single-feature estimators refit wholesale from a batch of samples.
//!
//! - [`LinearRegression`]: ordinary least squares with R²
//! - [`QuantileRegression`]: two-point interpolation around a sample quantile
//! - [`LogisticRegression`]: binary classifier, fixed-budget gradient descent
//!
//! `fit` replaces every fitted parameter; nothing is updated incrementally.

use costscope_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Gradient descent iterations for [`LogisticRegression::fit`]
pub const LOGISTIC_ITERATIONS: usize = 1000;

/// Gradient descent step size for [`LogisticRegression::fit`]
pub const LOGISTIC_LEARNING_RATE: f64 = 0.01;

/// One observation: `x` is the order size, `y` the outcome
/// (realized slippage, or a 0/1 maker label)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for DataPoint {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

// ============================================================================
// Linear Regression
// ============================================================================

/// Ordinary least squares `y = slope·x + intercept`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    slope: f64,
    intercept: f64,
    r_squared: f64,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit via the covariance / variance ratio over centered data.
    ///
    /// Fails with `EmptyDataset` on no samples and `DegenerateFit` when every
    /// x is identical. If every y is identical the total sum of squares is
    /// zero; R² is then 1 for a perfect fit and 0 otherwise.
    pub fn fit(&mut self, data: &[DataPoint]) -> Result<()> {
        if data.is_empty() {
            return Err(Error::EmptyDataset("linear regression".to_string()));
        }

        let n = data.len() as f64;
        let mean_x = data.iter().map(|p| p.x).sum::<f64>() / n;
        let mean_y = data.iter().map(|p| p.y).sum::<f64>() / n;

        let mut covariance = 0.0;
        let mut variance = 0.0;
        for point in data {
            let dx = point.x - mean_x;
            covariance += dx * (point.y - mean_y);
            variance += dx * dx;
        }

        if variance == 0.0 {
            return Err(Error::DegenerateFit(
                "linear regression: zero variance in x".to_string(),
            ));
        }

        let slope = covariance / variance;
        let intercept = mean_y - slope * mean_x;

        let mut ss_total = 0.0;
        let mut ss_residual = 0.0;
        for point in data {
            let predicted = slope * point.x + intercept;
            ss_total += (point.y - mean_y).powi(2);
            ss_residual += (point.y - predicted).powi(2);
        }

        self.slope = slope;
        self.intercept = intercept;
        self.r_squared = r_squared(ss_residual, ss_total);
        Ok(())
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }
}

fn r_squared(ss_residual: f64, ss_total: f64) -> f64 {
    if ss_total > 0.0 {
        1.0 - ss_residual / ss_total
    } else if ss_residual == 0.0 {
        1.0
    } else {
        0.0
    }
}

// ============================================================================
// Quantile Regression
// ============================================================================

/// Local line through the sample at the requested quantile of x and its successor.
///
/// This is not a pinball-loss minimiser. After sorting by x it picks index
/// `⌊q·(n−1)⌋` and fits the line through that point and the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantileRegression {
    quantile: f64,
    slope: f64,
    intercept: f64,
}

impl QuantileRegression {
    /// `quantile` must lie strictly between 0 and 1
    pub fn new(quantile: f64) -> Result<Self> {
        if !(quantile > 0.0 && quantile < 1.0) {
            return Err(Error::invalid_configuration(format!(
                "quantile must be in (0, 1), got {quantile}"
            )));
        }
        Ok(Self {
            quantile,
            slope: 0.0,
            intercept: 0.0,
        })
    }

    /// Median line
    pub fn median() -> Self {
        Self {
            quantile: 0.5,
            slope: 0.0,
            intercept: 0.0,
        }
    }

    pub fn fit(&mut self, data: &[DataPoint]) -> Result<()> {
        if data.is_empty() {
            return Err(Error::EmptyDataset("quantile regression".to_string()));
        }
        if data.len() < 2 {
            return Err(Error::invalid_input(
                "quantile regression needs at least two samples",
            ));
        }

        let mut sorted = data.to_vec();
        sorted.sort_by(|a, b| a.x.total_cmp(&b.x));

        // q < 1 keeps the index strictly below n-1, so a successor always exists
        let index = (self.quantile * (sorted.len() - 1) as f64).floor() as usize;
        let lo = sorted[index];
        let hi = sorted[index + 1];

        let run = hi.x - lo.x;
        if run == 0.0 {
            return Err(Error::DegenerateFit(format!(
                "quantile regression: samples {index} and {} share x = {}",
                index + 1,
                lo.x
            )));
        }

        self.slope = (hi.y - lo.y) / run;
        self.intercept = lo.y - self.slope * lo.x;
        Ok(())
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    pub fn quantile(&self) -> f64 {
        self.quantile
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Default for QuantileRegression {
    fn default() -> Self {
        Self::median()
    }
}

// ============================================================================
// Logistic Regression
// ============================================================================

/// Binary classifier `P(label) = σ(slope·x + intercept)`
///
/// Trained by batch gradient descent on log-loss for exactly
/// [`LOGISTIC_ITERATIONS`] steps at [`LOGISTIC_LEARNING_RATE`], starting from
/// zero weights. There is no convergence check, so outputs are a deterministic
/// function of the samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    slope: f64,
    intercept: f64,
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit on `data[i].x` against `labels[i]`; `data[i].y` is ignored
    pub fn fit(&mut self, data: &[DataPoint], labels: &[bool]) -> Result<()> {
        if data.len() != labels.len() {
            return Err(Error::MismatchedLengths {
                left: data.len(),
                right: labels.len(),
            });
        }
        if data.is_empty() {
            return Err(Error::EmptyDataset("logistic regression".to_string()));
        }

        let n = data.len() as f64;
        self.slope = 0.0;
        self.intercept = 0.0;

        for _ in 0..LOGISTIC_ITERATIONS {
            let mut slope_grad = 0.0;
            let mut intercept_grad = 0.0;

            for (point, &label) in data.iter().zip(labels) {
                let error = self.predict_probability(point.x) - if label { 1.0 } else { 0.0 };
                slope_grad += error * point.x;
                intercept_grad += error;
            }

            self.slope -= LOGISTIC_LEARNING_RATE * slope_grad / n;
            self.intercept -= LOGISTIC_LEARNING_RATE * intercept_grad / n;
        }
        Ok(())
    }

    pub fn predict_probability(&self, x: f64) -> f64 {
        sigmoid(self.slope * x + self.intercept)
    }

    /// Class prediction, thresholded at 0.5
    pub fn predict(&self, x: f64) -> bool {
        self.predict_probability(x) >= 0.5
    }

    pub fn slope(&self) -> f64 {
        self.slope
    }

    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

#[inline]
fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn line(slope: f64, intercept: f64, xs: &[f64]) -> Vec<DataPoint> {
        xs.iter()
            .map(|&x| DataPoint::new(x, slope * x + intercept))
            .collect()
    }

    #[test]
    fn test_linear_exact_line() {
        let data = line(2.0, 3.0, &[1.0, 2.0, 3.0, 4.0, 5.0]);
        let mut model = LinearRegression::new();
        model.fit(&data).unwrap();

        assert!((model.slope() - 2.0).abs() < EPS);
        assert!((model.intercept() - 3.0).abs() < EPS);
        assert!((model.r_squared() - 1.0).abs() < EPS);
        assert!((model.predict(10.0) - 23.0).abs() < EPS);
    }

    #[test]
    fn test_linear_noisy_r_squared_below_one() {
        let data = vec![
            DataPoint::new(1.0, 1.0),
            DataPoint::new(2.0, 3.0),
            DataPoint::new(3.0, 2.0),
            DataPoint::new(4.0, 5.0),
        ];
        let mut model = LinearRegression::new();
        model.fit(&data).unwrap();

        // slope = cov/var = 5.5 / 5
        assert!((model.slope() - 1.1).abs() < EPS);
        assert!(model.r_squared() > 0.0 && model.r_squared() < 1.0);
    }

    #[test]
    fn test_linear_errors() {
        let mut model = LinearRegression::new();
        assert!(matches!(model.fit(&[]), Err(Error::EmptyDataset(_))));

        let same_x = vec![DataPoint::new(2.0, 1.0), DataPoint::new(2.0, 5.0)];
        assert!(matches!(model.fit(&same_x), Err(Error::DegenerateFit(_))));

        // A single sample has zero x-variance too
        assert!(matches!(
            model.fit(&[DataPoint::new(1.0, 1.0)]),
            Err(Error::DegenerateFit(_))
        ));
    }

    #[test]
    fn test_linear_constant_y() {
        let data = line(0.0, 4.0, &[1.0, 2.0, 3.0]);
        let mut model = LinearRegression::new();
        model.fit(&data).unwrap();

        assert!(model.slope().abs() < EPS);
        assert!((model.intercept() - 4.0).abs() < EPS);
        assert_eq!(model.r_squared(), 1.0);
    }

    #[test]
    fn test_r_squared_zero_total_variance() {
        assert_eq!(r_squared(0.0, 0.0), 1.0);
        assert_eq!(r_squared(0.5, 0.0), 0.0);
        assert!((r_squared(1.0, 4.0) - 0.75).abs() < EPS);
    }

    #[test]
    fn test_quantile_construction() {
        assert!(QuantileRegression::new(0.5).is_ok());
        assert!(matches!(
            QuantileRegression::new(0.0),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(matches!(
            QuantileRegression::new(1.0),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(QuantileRegression::new(f64::NAN).is_err());
        assert_eq!(QuantileRegression::default().quantile(), 0.5);
    }

    #[test]
    fn test_quantile_two_point_interpolation() {
        // Unsorted on purpose; sorted xs are 1, 2, 4, 8, 16
        let data = vec![
            DataPoint::new(8.0, 80.0),
            DataPoint::new(1.0, 10.0),
            DataPoint::new(16.0, 100.0),
            DataPoint::new(4.0, 20.0),
            DataPoint::new(2.0, 12.0),
        ];
        // index = floor(0.5 * 4) = 2 -> (4, 20) and (8, 80)
        let mut model = QuantileRegression::median();
        model.fit(&data).unwrap();
        assert!((model.slope() - 15.0).abs() < EPS);
        assert!((model.intercept() + 40.0).abs() < EPS);

        // index = floor(0.9 * 4) = 3 -> (8, 80) and (16, 100)
        let mut upper = QuantileRegression::new(0.9).unwrap();
        upper.fit(&data).unwrap();
        assert!((upper.slope() - 2.5).abs() < EPS);
        assert!((upper.predict(12.0) - 90.0).abs() < EPS);
    }

    #[test]
    fn test_quantile_errors() {
        let mut model = QuantileRegression::median();
        assert!(matches!(model.fit(&[]), Err(Error::EmptyDataset(_))));
        assert!(matches!(
            model.fit(&[DataPoint::new(1.0, 1.0)]),
            Err(Error::InvalidInput(_))
        ));
        let tied = vec![DataPoint::new(3.0, 1.0), DataPoint::new(3.0, 2.0)];
        assert!(matches!(model.fit(&tied), Err(Error::DegenerateFit(_))));
    }

    #[test]
    fn test_logistic_separates_classes() {
        let data: Vec<DataPoint> = (0..20).map(|i| DataPoint::new(i as f64, 0.0)).collect();
        let labels: Vec<bool> = (0..20).map(|i| i >= 10).collect();

        let mut model = LogisticRegression::new();
        model.fit(&data, &labels).unwrap();

        assert!(model.slope() > 0.0);
        assert!(model.predict_probability(19.0) > model.predict_probability(0.0));
        assert!(model.predict(19.0));
    }

    #[test]
    fn test_logistic_is_deterministic() {
        let data: Vec<DataPoint> = (0..10).map(|i| DataPoint::new(i as f64 * 0.5, 0.0)).collect();
        let labels: Vec<bool> = (0..10).map(|i| i % 3 == 0).collect();

        let mut a = LogisticRegression::new();
        let mut b = LogisticRegression::new();
        a.fit(&data, &labels).unwrap();
        b.fit(&data, &labels).unwrap();
        assert_eq!(a, b);

        // Refitting starts from zero weights again
        a.fit(&data, &labels).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_logistic_single_step_gradient() {
        // One sample, label true, x = 0: only the intercept moves.
        // Each step adds 0.01 * (1 - σ(b)), so after 1000 steps b is positive
        // and well below 10.
        let mut model = LogisticRegression::new();
        model.fit(&[DataPoint::new(0.0, 0.0)], &[true]).unwrap();
        assert_eq!(model.slope(), 0.0);
        assert!(model.intercept() > 0.0 && model.intercept() < 10.0);
        assert!(model.predict(0.0));
    }

    #[test]
    fn test_logistic_errors() {
        let mut model = LogisticRegression::new();
        let data = vec![DataPoint::new(1.0, 0.0), DataPoint::new(2.0, 0.0)];
        assert_eq!(
            model.fit(&data, &[true]),
            Err(Error::MismatchedLengths { left: 2, right: 1 })
        );
        assert!(matches!(model.fit(&[], &[]), Err(Error::EmptyDataset(_))));
    }

    #[test]
    fn test_unfitted_predictions() {
        assert_eq!(LinearRegression::new().predict(5.0), 0.0);
        assert_eq!(QuantileRegression::median().predict(5.0), 0.0);
        assert_eq!(LogisticRegression::new().predict_probability(5.0), 0.5);
        assert!(LogisticRegression::new().predict(5.0));
    }
}
