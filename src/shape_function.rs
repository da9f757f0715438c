//! Composition of a spatial [`PeakShape`] with a width model into a
//! peak shape function over the m/z axis.
//!
//! A peak shape function answers: given a true peak centered at a
//! reference mass, what intensity does its shape contribute at an observed
//! mass? Outside a support window around the reference mass the answer is
//! exactly zero, which downstream scoring code uses to skip work.

use std::fmt;

use mzpeaks::{CoordinateLike, IntensityMeasurement, MZ};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::PsfResult;
use crate::fwhm::PeakParameterFwhm;
use crate::models::{ConstantModel, LinearParameterModel, LinearSqrtOriginModel, WidthModel};
use crate::shapes::{BoxPeakShape, GaussianPeakShape, PeakShape};

/// The implemented kinds of peak shape function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PeakShapeFunctionType {
    /// A box window, used for centroided data
    Box,
    /// A Gaussian with a constant width everywhere in the spectrum
    Gaussian,
    /// A Gaussian with the width growth of an Orbitrap analyzer
    Orbitrap,
    /// A box window with the width growth of an Orbitrap analyzer
    OrbitrapBox,
    /// A Gaussian with the width growth of a time-of-flight analyzer
    Tof,
}

impl fmt::Display for PeakShapeFunctionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Box => "box",
            Self::Gaussian => "gaussian",
            Self::Orbitrap => "orbi",
            Self::OrbitrapBox => "orbiBox",
            Self::Tof => "time-of-flight",
        };
        f.write_str(name)
    }
}

/// A peak shape function built from a spatial shape and a width model.
///
/// Evaluation is a two-step configure-then-evaluate: the width model
/// predicts the FWHM at the reference mass, a local copy of the shape is
/// configured with it, and the shape is read at the mass difference. No
/// shared state is mutated, so a calibrated function can be evaluated from
/// multiple threads.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PeakShapeFunction<S: PeakShape + Copy, M: WidthModel> {
    shape: S,
    parameter: PeakParameterFwhm<M>,
    kind: PeakShapeFunctionType,
}

impl<S: PeakShape + Copy, M: WidthModel> PeakShapeFunction<S, M> {
    pub fn new(shape: S, parameter: PeakParameterFwhm<M>, kind: PeakShapeFunctionType) -> Self {
        Self {
            shape,
            parameter,
            kind,
        }
    }

    /// The actual implementation type of this function
    pub fn kind(&self) -> PeakShapeFunctionType {
        self.kind
    }

    pub fn parameter(&self) -> &PeakParameterFwhm<M> {
        &self.parameter
    }

    pub fn parameter_mut(&mut self) -> &mut PeakParameterFwhm<M> {
        &mut self.parameter
    }

    pub fn shape(&self) -> &S {
        &self.shape
    }

    /// The value of the function at `observed_mass` for a true peak
    /// centered at `reference_mass`.
    ///
    /// Returns 0.0 outside the support window around the reference mass.
    pub fn evaluate(&self, reference_mass: f64, observed_mass: f64) -> PsfResult<f64> {
        let shape = self.shape_at(reference_mass)?;
        let mass_difference = observed_mass - reference_mass;
        let threshold = shape.support_threshold();
        if (-threshold..=threshold).contains(&mass_difference) {
            Ok(shape.at(mass_difference))
        } else {
            Ok(0.0)
        }
    }

    /// The half-width of the function's support around a peak centered at
    /// `mz`; beyond it the function is exactly zero
    pub fn support_threshold_at(&self, mz: f64) -> PsfResult<f64> {
        Ok(self.shape_at(mz)?.support_threshold())
    }

    /// Only peaks at least this intense are used for autocalibration
    pub fn minimal_peak_height_for_calibration(&self) -> f32 {
        self.parameter.minimal_peak_height_to_learn_from()
    }

    /// Restrict autocalibration to peaks with a minimal absolute
    /// intensity. Negative values are allowed, albeit not meaningful.
    pub fn set_minimal_peak_height_for_calibration(&mut self, minimal_height: f32) {
        self.parameter
            .set_minimal_peak_height_to_learn_from(minimal_height);
    }

    /// A copy of the shape configured for the width at `mz`
    fn shape_at(&self, mz: f64) -> PsfResult<S> {
        let mut shape = self.shape;
        shape.set_fwhm(self.parameter.at(mz)?)?;
        Ok(shape)
    }
}

impl<S: PeakShape + Copy, M: LinearParameterModel> PeakShapeFunction<S, M> {
    /// Autocalibrate the width model parameters against a mass spectrum
    /// using regression.
    ///
    /// The elements must be in ascending m/z order without duplicate m/z
    /// values. There is no internal quality threshold; the calibration is
    /// performed as long as it is possible in any way.
    ///
    /// Fails with [`crate::PsfError::Starvation`] when too few or too poor
    /// data can be extracted from the spectrum.
    pub fn calibrate_for<T>(&mut self, elements: &[T]) -> PsfResult<()>
    where
        T: CoordinateLike<MZ> + IntensityMeasurement,
    {
        self.parameter.learn_from(elements)
    }

    /// Set the width model parameter at `index`
    pub fn set_parameter(&mut self, index: usize, value: f64) -> PsfResult<()> {
        self.parameter.model_mut().set_parameter(index, value)
    }

    /// The width model parameter at `index`
    pub fn parameter_value(&self, index: usize) -> PsfResult<f64> {
        self.parameter.model().parameter(index)
    }
}

/// A peak shape function as it occurs in Orbitrap mass spectra.
///
/// Parameterized by a linear sqrt width model through the origin, which
/// makes it robust under autocalibration: no fitted parameter can make the
/// width negative in any m/z range.
pub type OrbitrapPeakShapeFunction = PeakShapeFunction<GaussianPeakShape, LinearSqrtOriginModel>;

/// A peak shape function as it occurs in centroided Orbitrap mass spectra,
/// identical to [`OrbitrapPeakShapeFunction`] except that the window shape
/// is a box
pub type OrbitrapBoxPeakShapeFunction = PeakShapeFunction<BoxPeakShape, LinearSqrtOriginModel>;

/// A peak shape function with a Gaussian shape of constant width
/// everywhere in the mass spectrum
pub type GaussianPeakShapeFunction = PeakShapeFunction<GaussianPeakShape, ConstantModel>;

impl Default for OrbitrapPeakShapeFunction {
    fn default() -> Self {
        Self::new(
            GaussianPeakShape::default(),
            PeakParameterFwhm::new(LinearSqrtOriginModel::default()),
            PeakShapeFunctionType::Orbitrap,
        )
    }
}

impl Default for OrbitrapBoxPeakShapeFunction {
    fn default() -> Self {
        Self::new(
            BoxPeakShape::default(),
            PeakParameterFwhm::new(LinearSqrtOriginModel::default()),
            PeakShapeFunctionType::OrbitrapBox,
        )
    }
}

impl Default for GaussianPeakShapeFunction {
    fn default() -> Self {
        Self::new(
            GaussianPeakShape::default(),
            PeakParameterFwhm::new(ConstantModel::default()),
            PeakShapeFunctionType::Gaussian,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::PsfError;
    use crate::peak_statistics::isclose;
    use mzpeaks::peak::MZPoint;

    #[test]
    fn test_type_display_strings() {
        assert_eq!(PeakShapeFunctionType::Box.to_string(), "box");
        assert_eq!(PeakShapeFunctionType::Gaussian.to_string(), "gaussian");
        assert_eq!(PeakShapeFunctionType::Orbitrap.to_string(), "orbi");
        assert_eq!(PeakShapeFunctionType::OrbitrapBox.to_string(), "orbiBox");
        assert_eq!(PeakShapeFunctionType::Tof.to_string(), "time-of-flight");
    }

    #[test]
    fn test_alias_kinds() {
        assert_eq!(
            OrbitrapPeakShapeFunction::default().kind(),
            PeakShapeFunctionType::Orbitrap
        );
        assert_eq!(
            OrbitrapBoxPeakShapeFunction::default().kind(),
            PeakShapeFunctionType::OrbitrapBox
        );
        assert_eq!(
            GaussianPeakShapeFunction::default().kind(),
            PeakShapeFunctionType::Gaussian
        );
    }

    #[test]
    fn test_evaluate_is_maximal_at_the_reference_mass() {
        let mut psf = GaussianPeakShapeFunction::default();
        psf.set_parameter(0, 0.1).unwrap();

        let center = psf.evaluate(400.0, 400.0).unwrap();
        assert_eq!(center, 1.0);
        let off = psf.evaluate(400.0, 400.02).unwrap();
        assert!(0.0 < off && off < center);
        // symmetric around the reference mass
        assert!(isclose(psf.evaluate(400.0, 399.98).unwrap(), off));
    }

    #[test]
    fn test_evaluate_is_zero_outside_the_support() {
        let mut psf = GaussianPeakShapeFunction::default();
        psf.set_parameter(0, 0.1).unwrap();

        let threshold = psf.support_threshold_at(400.0).unwrap();
        assert!(psf.evaluate(400.0, 400.0 + threshold * 1.01).unwrap() == 0.0);
        assert!(psf.evaluate(400.0, 400.0 - threshold * 1.01).unwrap() == 0.0);
        assert!(psf.evaluate(400.0, 400.0 + threshold * 0.99).unwrap() > 0.0);
    }

    #[test]
    fn test_box_function_is_flat_inside_the_support() {
        let mut psf = OrbitrapBoxPeakShapeFunction::default();
        psf.set_parameter(0, 1e-6).unwrap();

        let threshold = psf.support_threshold_at(400.0).unwrap();
        assert_eq!(psf.evaluate(400.0, 400.0).unwrap(), 1.0);
        assert_eq!(
            psf.evaluate(400.0, 400.0 + threshold * 0.9).unwrap(),
            1.0
        );
        assert_eq!(
            psf.evaluate(400.0, 400.0 + threshold * 1.1).unwrap(),
            0.0
        );
    }

    #[test]
    fn test_orbitrap_support_grows_with_mass() {
        let mut psf = OrbitrapPeakShapeFunction::default();
        psf.set_parameter(0, 1e-6).unwrap();
        let low = psf.support_threshold_at(200.0).unwrap();
        let high = psf.support_threshold_at(800.0).unwrap();
        assert!(low < high);
    }

    #[test]
    fn test_evaluate_requires_a_positive_reference_mass() {
        let psf = GaussianPeakShapeFunction::default();
        assert!(matches!(
            psf.evaluate(-400.0, 400.0),
            Err(PsfError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn test_calibration_round_trip() {
        let a = 2.5e-5;
        let mut elements = Vec::new();
        let mut mz: f64 = 200.0;
        while mz < 1200.0 {
            let fwhm = a * mz * mz.sqrt();
            elements.push(MZPoint::new(mz - fwhm, 0.0));
            elements.push(MZPoint::new(mz, 50.0));
            elements.push(MZPoint::new(mz + fwhm, 0.0));
            mz += 100.0;
        }

        let mut psf = OrbitrapPeakShapeFunction::default();
        psf.set_parameter(0, 0.0).unwrap();
        psf.calibrate_for(&elements).unwrap();
        let fitted = psf.parameter_value(0).unwrap();
        assert!((fitted - a).abs() < 1e-9, "observed {fitted}");
    }

    #[test]
    fn test_calibration_starves_on_a_barren_spectrum() {
        let mut psf = OrbitrapPeakShapeFunction::default();
        let elements: Vec<MZPoint> = (0..4)
            .map(|i| MZPoint::new(100.0 + i as f64, 1.0))
            .collect();
        assert!(matches!(
            psf.calibrate_for(&elements),
            Err(PsfError::Starvation(_))
        ));
    }
}
