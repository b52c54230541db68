use thiserror::Error;

/// Input-validation and numeric failures raised by the core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DescentError {
    #[error("Curve must contain at least one sample.")]
    EmptyCurve,
    #[error("Time profile length ({profile}) does not match curve length ({curve}).")]
    LengthMismatch { curve: usize, profile: usize },
    #[error("Segment ending at sample {index} has positive length but zero mean speed.")]
    ZeroSpeedSegment { index: usize },
    #[error("Invalid parameter `{name}`: {reason}.")]
    InvalidParameter { name: &'static str, reason: String },
}

pub type DescentResult<T> = Result<T, DescentError>;

impl DescentError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        DescentError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

pub(crate) fn ensure_positive(name: &'static str, value: f64) -> DescentResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(DescentError::invalid(
            name,
            format!("must be positive and finite, got {value}"),
        ));
    }
    Ok(())
}
