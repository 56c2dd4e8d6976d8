//! Constants shared by the trainer and its checkers.

/// Tolerance for `Σ weight = 1` after a round.
pub const SIMPLEX_TOLERANCE: f64 = 1e-6;

/// Default smoothing added to the weighted sums of the coefficient formulas.
/// `0.0` keeps the exact closed-form minimizer.
pub const DEFAULT_SMOOTHING: f64 = 0.0;
