//! Error types for the cost-accounting core.
//!
//! The numerical routines return [`CostResult`] so that callers can tell a bad parameter apart
//! from a gap in the supplied tables. The input and command-line layers wrap these in
//! [`anyhow::Error`] with extra context.
use thiserror::Error;

/// An error raised while computing annualised or system costs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CostError {
    /// A parameter is out of range, or two paired inputs do not line up
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A requested technology, node, asset or link is absent from the supplied data
    #[error("Missing data: {0}")]
    MissingData(String),
}

/// Convenience type alias for results using [`CostError`].
pub type CostResult<T> = Result<T, CostError>;

/// Return early with [`CostError::InvalidParameter`] if the condition does not hold
macro_rules! ensure_param {
    ($cond:expr, $($arg:tt)+) => {
        if !$cond {
            return Err($crate::error::CostError::InvalidParameter(format!($($arg)+)));
        }
    };
}
pub(crate) use ensure_param;

/// Return early with [`CostError::InvalidParameter`] unless the quantity is finite and `>= 0`
macro_rules! ensure_non_negative {
    ($value:expr, $what:expr) => {
        $crate::error::ensure_param!(
            $value.is_finite() && $value.value() >= 0.0,
            "{} must be a finite, non-negative number (got {})",
            $what,
            $value
        );
    };
}
pub(crate) use ensure_non_negative;
