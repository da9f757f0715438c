//! Sampling peak widths across a whole spectrum.
//!
//! [`measure_full_widths`] walks an ordered spectrum bump by bump and turns
//! every sufficiently pure peak into one `(mz, width)` calibration sample.
//! The resulting list feeds the regression engine in [`crate::fwhm`].

use std::fmt;

use log::debug;

use mzpeaks::{CoordinateLike, IntensityMeasurement, MZ};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bump::find_bump;
use crate::error::{precondition, PsfResult};
use crate::peak_statistics::{argmax_intensity, full_width_at_fraction_of_maximum, lowness};

/// One measured `(mz, width)` observation from a single spectral peak
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WidthSample {
    /// m/z position of the peak's most intense element
    pub mz: f64,
    /// Full width of the peak at the sampled fraction of its maximum
    pub width: f64,
}

impl WidthSample {
    pub fn new(mz: f64, width: f64) -> Self {
        Self { mz, width }
    }
}

impl fmt::Display for WidthSample {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "WidthSample({}, {})", self.mz, self.width)
    }
}

/// Sample the full width at `fraction` of the maximum over every pure peak
/// in the spectrum.
///
/// The spectrum is scanned bump by bump, each scan starting on the right
/// edge of the previous bump, so that edge may double as the next bump's
/// left edge. A bump is accepted as a calibration sample iff its lowness is
/// at least `1 - fraction`, meaning it descends at least to the target
/// level on both sides, and its height reaches `minimal_peak_height`.
///
/// Returns the accepted `(mz, width)` samples in ascending m/z order,
/// empty when the spectrum holds no qualifying bump. The elements must be
/// in ascending m/z order.
///
/// This is a measurement in the physical sense: even for an exactly
/// calculable width the returned value may differ slightly due to rounding.
///
/// Fails with [`crate::PsfError::PreconditionViolation`] when `fraction`
/// lies outside `[0, 1]`.
pub fn measure_full_widths<T>(
    items: &[T],
    fraction: f64,
    minimal_peak_height: f32,
) -> PsfResult<Vec<WidthSample>>
where
    T: CoordinateLike<MZ> + IntensityMeasurement,
{
    precondition(
        (0.0..=1.0).contains(&fraction),
        "measure_full_widths(): fraction out of the required range",
    )?;

    let mut widths = Vec::new();
    if items.len() < 2 {
        return Ok(widths);
    }

    let required_lowness = 1.0 - fraction;

    let mut first = 0;
    while first + 1 < items.len() {
        let Some((left, right)) =
            find_bump(&items[first..], |a, b| a.intensity() < b.intensity())
        else {
            break;
        };

        let bump = &items[first + left..=first + right];
        let apex = first + left + argmax_intensity(bump);
        let bump_height = items[apex].intensity();

        if lowness(bump) >= required_lowness && bump_height >= minimal_peak_height {
            // a qualifying bump satisfies the width measurement's
            // preconditions, so this cannot starve
            let width = full_width_at_fraction_of_maximum(bump, fraction)?;
            let mz = items[apex].coordinate();
            debug!("measure_full_widths(): measured peak (mz | width): ({mz} | {width})");
            widths.push(WidthSample::new(mz, width));
        }

        // the last element of the bump may be the first of the next one
        first += right;
    }

    Ok(widths)
}
