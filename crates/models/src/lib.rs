//! costscope Models
//!
//! Quantitative models for trade cost estimation. None of them read the live
//! book; callers feed them parameters or samples.
//!
//! - [`almgren_chriss`]: closed-form optimal liquidation schedule and impact cost
//! - [`regression`]: linear, quantile and logistic regression primitives
//! - [`estimators`]: slippage and maker/taker estimators refit from bounded history
//!
//! ## Usage
//!
//! ```rust,ignore
//! use costscope_models::{AlmgrenChriss, DataPoint, ExecutionParameters, SlippageEstimator};
//!
//! let scheduler = AlmgrenChriss::new(ExecutionParameters {
//!     volatility: 0.3,
//!     permanent_impact: 0.1,
//!     temporary_impact: 0.05,
//!     risk_aversion: 0.5,
//!     time_horizon: 1.0,
//! })?;
//! let schedule = scheduler.optimal_trajectory(100.0, 0.0, 10)?;
//!
//! let mut slippage = SlippageEstimator::new();
//! slippage.update(&samples)?;
//! let expected = slippage.estimate_slippage(2.5);
//! ```

pub mod almgren_chriss;
pub mod estimators;
pub mod regression;

// Re-export main types
pub use almgren_chriss::{AlmgrenChriss, ExecutionParameters};
pub use estimators::{MAX_HISTORY_SIZE, MakerTakerPredictor, SlippageEstimator};
pub use regression::{DataPoint, LinearRegression, LogisticRegression, QuantileRegression};
