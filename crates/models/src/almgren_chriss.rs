//! Almgren-Chriss (2000) Optimal Execution
//!
//! Closed-form liquidation schedule under linear temporary impact and a
//! quadratic risk penalty:
//!
//! ```text
//! κ    = sqrt(λ σ² / (2 η))
//! x(t) = (X₀ − X_target) · exp(−κ t)
//! ```
//!
//! Where λ is risk aversion, σ volatility and η the temporary impact
//! coefficient. Volatility and impact coefficients are assumed stationary over
//! the horizon. Every method is a pure function of its inputs and the
//! parameters fixed at construction.

use costscope_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Model parameters, all strictly positive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExecutionParameters {
    /// Volatility σ
    pub volatility: f64,
    /// Permanent impact coefficient γ
    pub permanent_impact: f64,
    /// Temporary impact coefficient η
    pub temporary_impact: f64,
    /// Risk aversion λ
    pub risk_aversion: f64,
    /// Trading horizon T
    pub time_horizon: f64,
}

impl ExecutionParameters {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("volatility", self.volatility),
            ("permanent_impact", self.permanent_impact),
            ("temporary_impact", self.temporary_impact),
            ("risk_aversion", self.risk_aversion),
            ("time_horizon", self.time_horizon),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::invalid_configuration(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Optimal execution scheduler
#[derive(Debug, Clone)]
pub struct AlmgrenChriss {
    params: ExecutionParameters,
    kappa: f64,
}

impl AlmgrenChriss {
    pub fn new(params: ExecutionParameters) -> Result<Self> {
        params.validate()?;
        let kappa = (params.risk_aversion * params.volatility * params.volatility
            / (2.0 * params.temporary_impact))
            .sqrt();
        Ok(Self { params, kappa })
    }

    pub fn parameters(&self) -> &ExecutionParameters {
        &self.params
    }

    /// Risk-adjusted decay constant κ
    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    /// Remaining position at `num_steps` equally spaced times over `[0, T)`.
    ///
    /// Element `i` is `(initial − target) · exp(−κ · i·T/num_steps)`, so the
    /// first element is always the full distance to target.
    pub fn optimal_trajectory(
        &self,
        initial_position: f64,
        target_position: f64,
        num_steps: i64,
    ) -> Result<Vec<f64>> {
        if num_steps <= 0 {
            return Err(Error::invalid_input(format!(
                "number of steps must be positive, got {num_steps}"
            )));
        }

        let total = initial_position - target_position;
        let dt = self.params.time_horizon / num_steps as f64;

        Ok((0..num_steps)
            .map(|i| total * (-self.kappa * i as f64 * dt).exp())
            .collect())
    }

    /// Quantity to trade in each step of [`Self::optimal_trajectory`].
    ///
    /// Step `i` trades the drop to the next trajectory point; the last step
    /// trades whatever remains, so the slices sum to `initial − target`.
    pub fn trade_list(
        &self,
        initial_position: f64,
        target_position: f64,
        num_steps: i64,
    ) -> Result<Vec<f64>> {
        let trajectory = self.optimal_trajectory(initial_position, target_position, num_steps)?;
        let mut trades: Vec<f64> = trajectory.windows(2).map(|w| w[0] - w[1]).collect();
        if let Some(&last) = trajectory.last() {
            trades.push(last);
        }
        Ok(trades)
    }

    /// Expected impact cost in price units: permanent (`γ·√|q|`), temporary
    /// (`η·|q|`) and risk (`λ·σ²·|q|·T`) components, scaled by `price`
    pub fn market_impact(&self, quantity: f64, price: f64, time_horizon: f64) -> f64 {
        let permanent = self.permanent_impact(quantity);
        let temporary = self.temporary_impact(quantity);
        let risk = self.risk_cost(quantity, time_horizon);
        price * (permanent + temporary + risk)
    }

    /// Impact cost plus notional
    pub fn total_cost(&self, quantity: f64, price: f64, time_horizon: f64) -> f64 {
        self.market_impact(quantity, price, time_horizon) + quantity * price
    }

    fn permanent_impact(&self, quantity: f64) -> f64 {
        self.params.permanent_impact * quantity.abs().sqrt()
    }

    fn temporary_impact(&self, quantity: f64) -> f64 {
        self.params.temporary_impact * quantity.abs()
    }

    fn risk_cost(&self, quantity: f64, time_horizon: f64) -> f64 {
        self.params.risk_aversion
            * self.params.volatility
            * self.params.volatility
            * quantity.abs()
            * time_horizon
    }
}

impl fmt::Display for AlmgrenChriss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AlmgrenChriss(σ={}, γ={}, η={}, λ={}, T={})",
            self.params.volatility,
            self.params.permanent_impact,
            self.params.temporary_impact,
            self.params.risk_aversion,
            self.params.time_horizon
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn params() -> ExecutionParameters {
        ExecutionParameters {
            volatility: 0.3,
            permanent_impact: 0.1,
            temporary_impact: 0.05,
            risk_aversion: 0.5,
            time_horizon: 1.0,
        }
    }

    #[test]
    fn test_rejects_non_positive_parameters() {
        let cases = [
            ExecutionParameters { volatility: 0.0, ..params() },
            ExecutionParameters { permanent_impact: -0.1, ..params() },
            ExecutionParameters { temporary_impact: 0.0, ..params() },
            ExecutionParameters { risk_aversion: -1.0, ..params() },
            ExecutionParameters { time_horizon: 0.0, ..params() },
            ExecutionParameters { volatility: f64::NAN, ..params() },
        ];
        for case in cases {
            assert!(matches!(
                AlmgrenChriss::new(case),
                Err(Error::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn test_kappa() {
        let model = AlmgrenChriss::new(params()).unwrap();
        // sqrt(0.5 * 0.09 / 0.1) = sqrt(0.45)
        assert!((model.kappa() - 0.45_f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_single_step_trajectory() {
        let model = AlmgrenChriss::new(params()).unwrap();
        let trajectory = model.optimal_trajectory(100.0, 0.0, 1).unwrap();
        assert_eq!(trajectory, vec![100.0]);
    }

    #[test]
    fn test_trajectory_decays() {
        let model = AlmgrenChriss::new(params()).unwrap();
        let trajectory = model.optimal_trajectory(1000.0, 200.0, 10).unwrap();

        assert_eq!(trajectory.len(), 10);
        assert_eq!(trajectory[0], 800.0);
        for pair in trajectory.windows(2) {
            assert!(pair[1] < pair[0]);
        }
        // t = 9 * 0.1
        let expected_last = 800.0 * (-model.kappa() * 0.9).exp();
        assert!((trajectory[9] - expected_last).abs() < EPS);
    }

    #[test]
    fn test_trajectory_rejects_non_positive_steps() {
        let model = AlmgrenChriss::new(params()).unwrap();
        assert!(matches!(
            model.optimal_trajectory(100.0, 0.0, 0),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            model.optimal_trajectory(100.0, 0.0, -3),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_trade_list_sums_to_distance() {
        let model = AlmgrenChriss::new(params()).unwrap();
        let trades = model.trade_list(500.0, 0.0, 8).unwrap();

        assert_eq!(trades.len(), 8);
        let total: f64 = trades.iter().sum();
        assert!((total - 500.0).abs() < 1e-6);
        assert!(trades.iter().all(|q| *q > 0.0));
    }

    #[test]
    fn test_market_impact_components() {
        let model = AlmgrenChriss::new(params()).unwrap();
        // permanent 0.1*2 + temporary 0.05*4 + risk 0.5*0.09*4*2
        let expected = 10.0 * (0.2 + 0.2 + 0.36);
        assert!((model.market_impact(4.0, 10.0, 2.0) - expected).abs() < EPS);

        // Sign of quantity does not change impact
        assert!((model.market_impact(-4.0, 10.0, 2.0) - expected).abs() < EPS);
    }

    #[test]
    fn test_total_cost_adds_notional() {
        let model = AlmgrenChriss::new(params()).unwrap();
        let impact = model.market_impact(4.0, 10.0, 2.0);
        assert!((model.total_cost(4.0, 10.0, 2.0) - (impact + 40.0)).abs() < EPS);
    }

    #[test]
    fn test_display() {
        let model = AlmgrenChriss::new(params()).unwrap();
        assert!(model.to_string().starts_with("AlmgrenChriss("));
    }
}
