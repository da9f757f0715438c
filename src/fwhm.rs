//! The "full width at half maximum" peak shape parameter and its
//! autocalibration engine.
//!
//! [`PeakParameterFwhm`] wraps a [`WidthModel`] and can calibrate it for a
//! specific mass spectrum: it samples `(mz, fwhm)` pairs from every pure
//! peak with [`measure_full_widths`] and fits the model to them with a
//! non-negative least squares regression.
//!
//! There is no internal quality threshold for the calibration, it is
//! performed as long as it is possible in any way. For a good result,
//! filter out noise beforehand or raise the minimal peak height.

use log::{info, warn};

use nalgebra::{DMatrix, DVector};

use mzpeaks::{CoordinateLike, IntensityMeasurement, MZ};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{invariant, postcondition, precondition, PsfError, PsfResult};
use crate::linalg::nonnegative_least_squares;
use crate::models::{
    ConstantModel, LinearParameterModel, LinearSqrtModel, LinearSqrtOriginModel, QuadraticModel,
    SqrtModel, WidthModel,
};
use crate::width_sampler::{measure_full_widths, WidthSample};

/// Calibration always measures the width at half maximum
const FRACTION_OF_MAXIMUM: f64 = 0.5;

/// A full-width-at-half-maximum peak parameter following a [`WidthModel`]
/// over the m/z axis.
///
/// The model should yield non-negative widths for non-negative m/z values;
/// [`PeakParameterFwhm::learn_from`] guarantees this by fitting under a
/// non-negativity constraint, while hand-set parameters are the caller's
/// responsibility. There is no such thing as a negative FWHM.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeakParameterFwhm<M: WidthModel> {
    model: M,
    minimal_peak_height_to_learn_from: f32,
}

impl<M: WidthModel> PeakParameterFwhm<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            minimal_peak_height_to_learn_from: 0.0,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Only peaks at least this intense are used for calibration
    pub fn minimal_peak_height_to_learn_from(&self) -> f32 {
        self.minimal_peak_height_to_learn_from
    }

    /// Restrict calibration to peaks with a minimal absolute intensity.
    /// Negative values are allowed, albeit not meaningful.
    pub fn set_minimal_peak_height_to_learn_from(&mut self, minimal_height: f32) {
        self.minimal_peak_height_to_learn_from = minimal_height;
    }

    /// The FWHM at a specific mass channel.
    ///
    /// Fails with [`PsfError::PreconditionViolation`] when `mz` is not
    /// positive and with [`PsfError::PostconditionViolation`] when the
    /// model yields a non-positive width, which points at an invalid or
    /// miscalibrated model.
    pub fn at(&self, mz: f64) -> PsfResult<f64> {
        precondition(mz > 0.0, "PeakParameterFwhm::at(): mz has to be positive")?;
        let fwhm = self.model.width_at(mz)?;
        postcondition(
            fwhm > 0.0,
            "PeakParameterFwhm::at(): the model returned a negative or zero fwhm",
        )?;
        Ok(fwhm)
    }
}

impl<M: LinearParameterModel> PeakParameterFwhm<M> {
    /// Calibrate the internal model against a mass spectrum.
    ///
    /// The elements must be in ascending m/z order. Small inputs do not
    /// violate any precondition but raise the chance of starving.
    ///
    /// Fails with [`PsfError::Starvation`] when no `(mz | fwhm)` pair can
    /// be measured in the input, or when the regression itself fails
    /// numerically; from the caller's perspective both mean the same
    /// thing, too few or too poor data, and both may be retried with a
    /// better spectrum or a lower minimal peak height.
    pub fn learn_from<T>(&mut self, elements: &[T]) -> PsfResult<()>
    where
        T: CoordinateLike<MZ> + IntensityMeasurement,
    {
        let pairs = measure_full_widths(
            elements,
            FRACTION_OF_MAXIMUM,
            self.minimal_peak_height_to_learn_from,
        )?;

        if pairs.is_empty() {
            return Err(PsfError::Starvation(
                "PeakParameterFwhm::learn_from(): no (mz | fwhm) pairs could be measured in the input spectrum",
            ));
        }

        self.fit_to(&pairs)?;

        if let Ok(reference) = self.at(400.0) {
            info!(
                "learned peak parameter fwhm from spectrum, {reference} Th at 400 Th, corresponding to a resolution of {}",
                400.0 / reference
            );
        }
        Ok(())
    }

    /// Fit the parameter model to measured `(mz, width)` pairs.
    ///
    /// Minimizes the residual `|A*x - b|^2` where `b` holds the measured
    /// widths, `x` the model parameters, and every row of `A` is the
    /// model's generalized slope at the corresponding m/z position, with
    /// the trailing bias entry dropped since it cannot be optimized. The
    /// solve runs under a non-negativity constraint on `x`: a negative
    /// scale or offset could make the model, and with it the predicted
    /// width, negative for plausible masses.
    fn fit_to(&mut self, pairs: &[WidthSample]) -> PsfResult<()> {
        precondition(
            !pairs.is_empty(),
            "PeakParameterFwhm::fit_to(): called with an empty sample list",
        )?;

        let mut design = DMatrix::zeros(pairs.len(), M::PARAMETER_COUNT);
        let mut observed = DVector::zeros(pairs.len());
        for (row, sample) in pairs.iter().enumerate() {
            let slope = self.model.slope_in_parameter_space(sample.mz);
            invariant(
                slope.len() == M::PARAMETER_COUNT + 1,
                "PeakParameterFwhm::fit_to(): generalized slope dimension does not match the parameter space",
            )?;
            for (column, value) in slope[..M::PARAMETER_COUNT].iter().enumerate() {
                design[(row, column)] = *value;
            }
            observed[row] = sample.width;
        }

        let solution = match nonnegative_least_squares(&design, &observed) {
            Ok(solution) => solution,
            Err(err) => {
                warn!("PeakParameterFwhm::learn_from(): numerical regression failed: {err}");
                return Err(PsfError::Starvation(
                    "PeakParameterFwhm::learn_from(): regression of the parameter model against the measured (mz | fwhm) pairs failed",
                ));
            }
        };

        for index in 0..M::PARAMETER_COUNT {
            self.model.set_parameter(index, solution[index])?;
        }
        Ok(())
    }
}

/// FWHM as it occurs in an Orbitrap mass spectrum
pub type OrbitrapFwhm = PeakParameterFwhm<LinearSqrtModel>;
/// FWHM as it occurs in an Orbitrap mass spectrum, zero at zero Dalton
pub type OrbitrapWithOriginFwhm = PeakParameterFwhm<LinearSqrtOriginModel>;
/// FWHM as it occurs in an FT-ICR mass spectrum
pub type FtIcrFwhm = PeakParameterFwhm<QuadraticModel>;
/// FWHM as it occurs in a TOF mass spectrum, for analyzers measuring time
/// internally
pub type TofFwhm = PeakParameterFwhm<SqrtModel>;
/// A FWHM independent of the mass channel
pub type ConstantFwhm = PeakParameterFwhm<ConstantModel>;
