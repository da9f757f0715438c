//! The error taxonomy shared by every algorithm in this crate.
//!
//! The variants split along the classic logic/runtime line: the three
//! `*Violation` kinds mark contract breaches that a code change has to fix,
//! while [`PsfError::Starvation`] is the one recoverable signal, raised when
//! the input data are too few or too poor to finish a calculation. A caller
//! seeing `Starvation` may retry with more spectrum, a lower minimal peak
//! height, or a different fraction.
//!
//! Failures are raised at the point of detection and never suppressed
//! internally. The single re-classification point is in
//! [`crate::fwhm::PeakParameterFwhm::learn_from`], where a numerical
//! regression failure surfaces as `Starvation` because the caller-visible
//! symptom is the same: not enough good data.

use thiserror::Error;

pub type PsfResult<T> = Result<T, PsfError>;

/// All the ways the peak measurement and calibration algorithms can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PsfError {
    /// The caller passed an argument outside the documented contract
    #[error("precondition violated: {0}")]
    PreconditionViolation(&'static str),
    /// An internal computation produced a result violating its own output
    /// contract, e.g. a model yielding a non-positive width
    #[error("postcondition violated: {0}")]
    PostconditionViolation(&'static str),
    /// An assumption about the shape of the input data did not hold,
    /// pointing at a defect upstream of the failing call
    #[error("invariant violated: {0}")]
    InvariantViolation(&'static str),
    /// Too few or too poor data to complete the calculation
    #[error("insufficient data: {0}")]
    Starvation(&'static str),
}

pub(crate) fn precondition(predicate: bool, message: &'static str) -> PsfResult<()> {
    if predicate {
        Ok(())
    } else {
        Err(PsfError::PreconditionViolation(message))
    }
}

pub(crate) fn postcondition(predicate: bool, message: &'static str) -> PsfResult<()> {
    if predicate {
        Ok(())
    } else {
        Err(PsfError::PostconditionViolation(message))
    }
}

pub(crate) fn invariant(predicate: bool, message: &'static str) -> PsfResult<()> {
    if predicate {
        Ok(())
    } else {
        Err(PsfError::InvariantViolation(message))
    }
}
