//! `mzpsf` is a library for measuring the geometry of peaks in sparse mass
//! spectra and calibrating parametric peak shape functions against them.
//!
//! The pipeline starts from an ordered sequence of (m/z, intensity)
//! elements. [`measure_full_widths`] walks it bump by bump, measuring the
//! full width at a fraction of the maximum of every sufficiently pure peak
//! with the geometry routines in [`crate::peak_statistics`]. The resulting
//! `(mz, width)` samples feed [`PeakParameterFwhm::learn_from`], which fits
//! a width model from [`crate::models`] to them using a non-negative least
//! squares regression. The calibrated model combines with one of the
//! spatial shapes in [`crate::shapes`] into a [`PeakShapeFunction`] that
//! scores observed masses against a reference mass.
//!
//! All algorithms are generic over the element type: anything implementing
//! [`mzpeaks::CoordinateLike`] over m/z and [`mzpeaks::IntensityMeasurement`]
//! can be measured, and the elements have to be in ascending m/z order.
//!
//! # Usage
//! ```
//! use mzpeaks::peak::MZPoint;
//! use mzpsf::{OrbitrapPeakShapeFunction, measure_full_widths};
//!
//! // three well separated triangular peaks
//! let mut spectrum = Vec::new();
//! for (mz, width) in [(200.0, 0.02), (400.0, 0.06), (800.0, 0.17)] {
//!     spectrum.push(MZPoint::new(mz - width, 0.0));
//!     spectrum.push(MZPoint::new(mz, 100.0));
//!     spectrum.push(MZPoint::new(mz + width, 0.0));
//! }
//!
//! let samples = measure_full_widths(&spectrum, 0.5, 0.0).unwrap();
//! assert_eq!(samples.len(), 3);
//!
//! let mut psf = OrbitrapPeakShapeFunction::default();
//! psf.calibrate_for(&spectrum).unwrap();
//! let height = psf.evaluate(400.0, 400.01).unwrap();
//! assert!(0.0 < height && height < 1.0);
//! ```

pub mod bump;
pub mod error;
pub mod fwhm;
pub mod linalg;
pub mod models;
pub mod peak_statistics;
pub mod prelude;
pub mod shape_function;
pub mod shapes;
pub mod text;
pub mod width_sampler;

pub use crate::bump::find_bump;
pub use crate::error::{PsfError, PsfResult};
pub use crate::fwhm::{
    ConstantFwhm, FtIcrFwhm, OrbitrapFwhm, OrbitrapWithOriginFwhm, PeakParameterFwhm, TofFwhm,
};
pub use crate::models::{
    ConstantModel, LinearSqrtModel, LinearSqrtOriginModel, QuadraticModel, SqrtModel,
};
pub use crate::peak_statistics::{full_width_at_fraction_of_maximum, height, lowness};
pub use crate::shape_function::{
    GaussianPeakShapeFunction, OrbitrapBoxPeakShapeFunction, OrbitrapPeakShapeFunction,
    PeakShapeFunction, PeakShapeFunctionType,
};
pub use crate::shapes::{BoxPeakShape, GaussianPeakShape, LorentzianPeakShape};
pub use crate::width_sampler::{measure_full_widths, WidthSample};
