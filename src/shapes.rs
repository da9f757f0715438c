//! The spatial shapes of a spectral peak.
//!
//! In a perfect world ions of one mass-to-charge ratio would appear as a
//! sharp stick in a mass spectrum, its intensity proportional to the number
//! of ions. Under physical conditions the stick blurs out, and the concrete
//! shape of the blur depends on the type of mass spectrometer used. Each
//! type here implements one theoretical description of that blur, centered
//! around zero and with no particular normalization of its area, which
//! keeps evaluation cheap.

use std::f64::consts::LN_2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{precondition, PsfResult};

/// `2*sqrt(2*ln 2)`, the ratio between a Gaussian's FWHM and its sigma
fn sigma_to_fwhm_factor() -> f64 {
    2.0 * (2.0 * LN_2).sqrt()
}

/// The shape of a spectral peak, evaluated relative to its center.
///
/// The shapes are small `Copy` values so an evaluation site can configure
/// a local copy for a given width instead of mutating shared state.
pub trait PeakShape {
    /// The height of the shape at offset `x` from the peak center.
    ///
    /// The absolute height is arbitrary; only the height relative to other
    /// offsets matters, i.e. the shape is not normalized.
    fn at(&self, x: f64) -> f64;

    /// The symmetric distance from the center beyond which the shape is so
    /// low it can be treated as exactly zero for every practical purpose
    fn support_threshold(&self) -> f64;

    /// The full width at half maximum of the shape
    fn fwhm(&self) -> f64;

    /// Reparameterize the shape to a full width at half maximum.
    ///
    /// Fails with [`crate::PsfError::PreconditionViolation`] when `fwhm`
    /// is not positive.
    fn set_fwhm(&mut self, fwhm: f64) -> PsfResult<()>;
}

/// A Gaussian peak shape, `exp(-x^2 / 2*sigma^2)`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GaussianPeakShape {
    sigma: f64,
    sigma_factor_for_support_threshold: f64,
}

impl GaussianPeakShape {
    /// Fails with [`crate::PsfError::PreconditionViolation`] unless both
    /// arguments are positive
    pub fn new(sigma: f64, sigma_factor_for_support_threshold: f64) -> PsfResult<Self> {
        precondition(
            sigma > 0.0,
            "GaussianPeakShape::new(): sigma has to be positive",
        )?;
        precondition(
            sigma_factor_for_support_threshold > 0.0,
            "GaussianPeakShape::new(): sigma_factor_for_support_threshold has to be positive",
        )?;
        Ok(Self {
            sigma,
            sigma_factor_for_support_threshold,
        })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn set_sigma(&mut self, sigma: f64) -> PsfResult<()> {
        precondition(
            sigma > 0.0,
            "GaussianPeakShape::set_sigma(): sigma has to be positive",
        )?;
        self.sigma = sigma;
        Ok(())
    }

    pub fn sigma_factor_for_support_threshold(&self) -> f64 {
        self.sigma_factor_for_support_threshold
    }

    pub fn set_sigma_factor_for_support_threshold(&mut self, factor: f64) -> PsfResult<()> {
        precondition(
            factor > 0.0,
            "GaussianPeakShape::set_sigma_factor_for_support_threshold(): factor has to be positive",
        )?;
        self.sigma_factor_for_support_threshold = factor;
        Ok(())
    }
}

impl Default for GaussianPeakShape {
    fn default() -> Self {
        Self {
            sigma: 0.1,
            sigma_factor_for_support_threshold: 3.0,
        }
    }
}

impl PeakShape for GaussianPeakShape {
    fn at(&self, x: f64) -> f64 {
        (-(x * x) / (2.0 * self.sigma * self.sigma)).exp()
    }

    fn support_threshold(&self) -> f64 {
        self.sigma * self.sigma_factor_for_support_threshold
    }

    fn fwhm(&self) -> f64 {
        self.sigma * sigma_to_fwhm_factor()
    }

    fn set_fwhm(&mut self, fwhm: f64) -> PsfResult<()> {
        precondition(
            fwhm > 0.0,
            "GaussianPeakShape::set_fwhm(): fwhm has to be positive",
        )?;
        self.sigma = fwhm / sigma_to_fwhm_factor();
        Ok(())
    }
}

/// A Gaussian-based box peak shape.
///
/// Centroided data can be matched more accurately by a box than by the
/// original profile shape: the instrument has already integrated the
/// profile into the centroid intensity, and the vendor's centroiding may
/// shift the reported m/z slightly back and forth. Weighting an
/// observation by its deviation from the expected center is then not
/// meaningful, it is all or nothing. The width of the box still has to be
/// adapted properly, which is why it keeps the bookkeeping of the Gaussian
/// that would be used for profile data.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxPeakShape {
    sigma: f64,
    sigma_factor_for_support_threshold: f64,
}

impl BoxPeakShape {
    /// Fails with [`crate::PsfError::PreconditionViolation`] unless both
    /// arguments are positive
    pub fn new(sigma: f64, sigma_factor_for_support_threshold: f64) -> PsfResult<Self> {
        precondition(sigma > 0.0, "BoxPeakShape::new(): sigma has to be positive")?;
        precondition(
            sigma_factor_for_support_threshold > 0.0,
            "BoxPeakShape::new(): sigma_factor_for_support_threshold has to be positive",
        )?;
        Ok(Self {
            sigma,
            sigma_factor_for_support_threshold,
        })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn set_sigma(&mut self, sigma: f64) -> PsfResult<()> {
        precondition(
            sigma > 0.0,
            "BoxPeakShape::set_sigma(): sigma has to be positive",
        )?;
        self.sigma = sigma;
        Ok(())
    }

    pub fn sigma_factor_for_support_threshold(&self) -> f64 {
        self.sigma_factor_for_support_threshold
    }

    pub fn set_sigma_factor_for_support_threshold(&mut self, factor: f64) -> PsfResult<()> {
        precondition(
            factor > 0.0,
            "BoxPeakShape::set_sigma_factor_for_support_threshold(): factor has to be positive",
        )?;
        self.sigma_factor_for_support_threshold = factor;
        Ok(())
    }
}

impl Default for BoxPeakShape {
    fn default() -> Self {
        Self {
            sigma: 0.1,
            sigma_factor_for_support_threshold: 3.0,
        }
    }
}

impl PeakShape for BoxPeakShape {
    // this is the only difference between the box and the Gaussian
    fn at(&self, _x: f64) -> f64 {
        1.0
    }

    fn support_threshold(&self) -> f64 {
        self.sigma * self.sigma_factor_for_support_threshold
    }

    fn fwhm(&self) -> f64 {
        self.sigma * sigma_to_fwhm_factor()
    }

    fn set_fwhm(&mut self, fwhm: f64) -> PsfResult<()> {
        precondition(
            fwhm > 0.0,
            "BoxPeakShape::set_fwhm(): fwhm has to be positive",
        )?;
        self.sigma = fwhm / sigma_to_fwhm_factor();
        Ok(())
    }
}

/// A Lorentzian peak shape, `fwhm / (x^2 + fwhm^2)`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LorentzianPeakShape {
    fwhm: f64,
    fwhm_factor_for_support_threshold: f64,
}

impl LorentzianPeakShape {
    /// Fails with [`crate::PsfError::PreconditionViolation`] unless both
    /// arguments are positive
    pub fn new(fwhm: f64, fwhm_factor_for_support_threshold: f64) -> PsfResult<Self> {
        precondition(
            fwhm > 0.0,
            "LorentzianPeakShape::new(): fwhm has to be positive",
        )?;
        precondition(
            fwhm_factor_for_support_threshold > 0.0,
            "LorentzianPeakShape::new(): fwhm_factor_for_support_threshold has to be positive",
        )?;
        Ok(Self {
            fwhm,
            fwhm_factor_for_support_threshold,
        })
    }

    pub fn fwhm_factor_for_support_threshold(&self) -> f64 {
        self.fwhm_factor_for_support_threshold
    }

    pub fn set_fwhm_factor_for_support_threshold(&mut self, factor: f64) -> PsfResult<()> {
        precondition(
            factor > 0.0,
            "LorentzianPeakShape::set_fwhm_factor_for_support_threshold(): factor has to be positive",
        )?;
        self.fwhm_factor_for_support_threshold = factor;
        Ok(())
    }
}

impl Default for LorentzianPeakShape {
    fn default() -> Self {
        Self {
            fwhm: 0.1,
            fwhm_factor_for_support_threshold: 5.0,
        }
    }
}

impl PeakShape for LorentzianPeakShape {
    fn at(&self, x: f64) -> f64 {
        self.fwhm / (x * x + self.fwhm * self.fwhm)
    }

    fn support_threshold(&self) -> f64 {
        self.fwhm * self.fwhm_factor_for_support_threshold
    }

    fn fwhm(&self) -> f64 {
        self.fwhm
    }

    fn set_fwhm(&mut self, fwhm: f64) -> PsfResult<()> {
        precondition(
            fwhm > 0.0,
            "LorentzianPeakShape::set_fwhm(): fwhm has to be positive",
        )?;
        self.fwhm = fwhm;
        Ok(())
    }
}
