use thiserror::Error;

pub type BhResult<T> = Result<T, BhError>;

#[derive(Error, Debug)]
pub enum BhError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Value for {what} must be positive, got {value}")]
    NotPositive { what: &'static str, value: f64 },

    #[error("Value for {what} must be non-negative, got {value}")]
    Negative { what: &'static str, value: f64 },

    #[error("Length mismatch: {what} (expected={expected}, got={got})")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
}
