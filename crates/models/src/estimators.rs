//! Composite Estimators
//!
//! Each estimator owns a bounded sample buffer plus its regression models and
//! refits them wholesale on every `update`. Neither type is synchronised;
//! refits take `&mut self`, so concurrent callers must serialise access.
//!
//! An oversized batch is truncated to its first [`MAX_HISTORY_SIZE`] samples,
//! which keeps the oldest data of the batch rather than the newest.
//!
//! `update` is all-or-nothing: if any fit fails the buffer and the previous
//! models are left untouched and the error is returned.

use costscope_core::{BoundedHistory, Error, HISTORY_SIZE, Result};
use log::debug;

use crate::regression::{DataPoint, LinearRegression, LogisticRegression, QuantileRegression};

/// Sample capacity of each estimator
pub const MAX_HISTORY_SIZE: usize = HISTORY_SIZE;

/// Slippage as a function of order size, blended from a least-squares line and
/// a median line
#[derive(Debug, Clone)]
pub struct SlippageEstimator {
    history: BoundedHistory<DataPoint>,
    linear: LinearRegression,
    quantile: QuantileRegression,
}

impl SlippageEstimator {
    pub fn new() -> Self {
        Self {
            history: BoundedHistory::new(MAX_HISTORY_SIZE),
            linear: LinearRegression::new(),
            quantile: QuantileRegression::median(),
        }
    }

    /// Replace the sample buffer with `(order_size, realized_slippage)` points
    /// and refit both models
    pub fn update(&mut self, history: &[DataPoint]) -> Result<()> {
        let mut buffer = BoundedHistory::new(MAX_HISTORY_SIZE);
        buffer.replace_keep_front(history.iter().copied());
        let samples = buffer.to_vec();

        let mut linear = LinearRegression::new();
        linear.fit(&samples)?;
        let mut quantile = self.quantile.clone();
        quantile.fit(&samples)?;

        debug!(
            "Slippage estimator refit on {} samples (dropped {}): slope={:.6} r2={:.4}",
            samples.len(),
            history.len() - samples.len(),
            linear.slope(),
            linear.r_squared()
        );

        self.history = buffer;
        self.linear = linear;
        self.quantile = quantile;
        Ok(())
    }

    /// Average of the linear and median-line predictions
    pub fn estimate_slippage(&self, order_size: f64) -> f64 {
        (self.linear.predict(order_size) + self.quantile.predict(order_size)) / 2.0
    }

    /// R² of the linear fit
    pub fn confidence(&self) -> f64 {
        self.linear.r_squared()
    }

    pub fn linear_model(&self) -> &LinearRegression {
        &self.linear
    }

    pub fn quantile_model(&self) -> &QuantileRegression {
        &self.quantile
    }

    pub fn history(&self) -> &BoundedHistory<DataPoint> {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for SlippageEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Probability that an order of a given size fills as maker
#[derive(Debug, Clone)]
pub struct MakerTakerPredictor {
    history: BoundedHistory<DataPoint>,
    labels: BoundedHistory<bool>,
    model: LogisticRegression,
}

impl MakerTakerPredictor {
    pub fn new() -> Self {
        Self {
            history: BoundedHistory::new(MAX_HISTORY_SIZE),
            labels: BoundedHistory::new(MAX_HISTORY_SIZE),
            model: LogisticRegression::new(),
        }
    }

    /// Replace samples and maker labels, then refit.
    ///
    /// Both sequences are truncated to capacity first; they must have equal
    /// length afterwards.
    pub fn update(&mut self, history: &[DataPoint], maker_labels: &[bool]) -> Result<()> {
        let mut samples = BoundedHistory::new(MAX_HISTORY_SIZE);
        samples.replace_keep_front(history.iter().copied());
        let mut labels = BoundedHistory::new(MAX_HISTORY_SIZE);
        labels.replace_keep_front(maker_labels.iter().copied());

        if samples.len() != labels.len() {
            return Err(Error::MismatchedLengths {
                left: samples.len(),
                right: labels.len(),
            });
        }

        let mut model = LogisticRegression::new();
        model.fit(&samples.to_vec(), &labels.to_vec())?;

        debug!(
            "Maker/taker predictor refit on {} samples: slope={:.6} intercept={:.6}",
            samples.len(),
            model.slope(),
            model.intercept()
        );

        self.history = samples;
        self.labels = labels;
        self.model = model;
        Ok(())
    }

    /// Fitted probability of a maker fill at `order_size`
    pub fn predict_maker_proportion(&self, order_size: f64) -> f64 {
        self.model.predict_probability(order_size)
    }

    pub fn model(&self) -> &LogisticRegression {
        &self.model
    }

    pub fn history(&self) -> &BoundedHistory<DataPoint> {
        &self.history
    }

    pub fn labels(&self) -> &BoundedHistory<bool> {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for MakerTakerPredictor {
    fn default() -> Self {
        Self::new()
    }
}
