//! Small retrain-from-scratch signal models.
//!
//! These are deterministic toys: the exact numeric behaviour (iteration cap,
//! rescaling windows, summation order) is what callers depend on, so none of it
//! is "improved".

pub mod bull_bear;
pub mod linreg;
pub mod logistic;

pub use bull_bear::{compute_bull_bear, BullBearParams, DirectionColor};
pub use linreg::{compute_regression, RegressionParams};
pub use logistic::{compute_logistic, LogisticParams, SignalOutput, SignalState};
