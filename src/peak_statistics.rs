//! Measurements over a single spectral peak.
//!
//! A spectral peak is represented here as a slice of elements in ascending
//! m/z order, each exposing its m/z through [`CoordinateLike`] and its
//! intensity through [`IntensityMeasurement`]. There are no further
//! requirements for a slice to count as a peak; even an equiabundant run of
//! elements can be measured.

use log::trace;
use num_traits::{Float, FromPrimitive};

use mzpeaks::{CoordinateLike, IntensityMeasurement, MZ};

use crate::error::{invariant, precondition, PsfError, PsfResult};

pub fn _isclose<T>(x: T, y: T, rtol: T, atol: T) -> bool
where
    T: Float,
{
    (x - y).abs() <= (atol + rtol * y.abs())
}

pub fn isclose<T>(x: T, y: T) -> bool
where
    T: Float + FromPrimitive,
{
    _isclose(x, y, T::from_f64(1e-5).unwrap(), T::from_f64(1e-8).unwrap())
}

pub fn aboutzero<T>(x: T) -> bool
where
    T: Float + FromPrimitive,
{
    isclose(x, T::zero())
}

/// Index of the most intense element, taking the first one on ties
pub(crate) fn argmax_intensity<T: IntensityMeasurement>(items: &[T]) -> usize {
    let mut best = 0;
    for (index, item) in items.iter().enumerate().skip(1) {
        if item.intensity() > items[best].intensity() {
            best = index;
        }
    }
    best
}

/// The height of a spectral peak, the largest intensity over `items`.
///
/// Fails with [`PsfError::PreconditionViolation`] when `items` is empty.
pub fn height<T: IntensityMeasurement>(items: &[T]) -> PsfResult<f32> {
    precondition(
        !items.is_empty(),
        "height(): at least one element is required",
    )?;
    Ok(items[argmax_intensity(items)].intensity())
}

/// The lowness of a spectral peak.
///
/// The least intense element on each side of the maximum is located, with
/// the maximum itself eligible on both sides, and the more intense of the
/// two is taken as the peak's shoulder. Lowness is one minus the ratio of
/// the shoulder to the maximum, always in `[0, 1]`.
///
/// An equiabundant sequence has a lowness of 0.0, as does a single element;
/// a maximum flanked by near-zero elements approaches 1.0.
pub fn lowness<T: IntensityMeasurement>(items: &[T]) -> f64 {
    if items.len() < 2 {
        return 0.0;
    }

    let maximum = argmax_intensity(items);
    let apex = items[maximum].intensity() as f64;
    if apex <= 0.0 {
        return 0.0;
    }

    let flank_minimum = |flank: &[T]| {
        flank
            .iter()
            .map(|e| e.intensity() as f64)
            .fold(f64::INFINITY, f64::min)
    };
    let left_minimum = flank_minimum(&items[..=maximum]);
    let right_minimum = flank_minimum(&items[maximum..]);

    let shoulder = left_minimum.max(right_minimum);
    1.0 - (shoulder / apex)
}

/// The full width of a spectral peak at `fraction` of its maximum.
///
/// The most intense element is located (ties take the first occurrence) and
/// the target intensity `maximum * fraction` is derived from it. On each
/// flank, the element nearest the target from above is paired with its
/// neighbor just below the target, and the pair is linearly interpolated in
/// the m/z dimension to the exact crossing point. The distance between the
/// two crossing points is the full width. A fraction of 0.5 yields the full
/// width at half maximum.
///
/// Fails with [`PsfError::PreconditionViolation`] when `fraction` lies
/// outside `[0, 1]`, and with [`PsfError::Starvation`] when a flank holds
/// no element below the target, so no crossing point exists there.
pub fn full_width_at_fraction_of_maximum<T>(items: &[T], fraction: f64) -> PsfResult<f64>
where
    T: CoordinateLike<MZ> + IntensityMeasurement,
{
    precondition(
        (0.0..=1.0).contains(&fraction),
        "full_width_at_fraction_of_maximum(): fraction out of the required range",
    )?;
    precondition(
        !items.is_empty(),
        "full_width_at_fraction_of_maximum(): at least one element is required",
    )?;

    let maximum = argmax_intensity(items);
    let target = items[maximum].intensity() as f64 * fraction;
    trace!(
        "full_width_at_fraction_of_maximum(): maximum at (mz, intensity) ({}, {}), target intensity {target}",
        items[maximum].coordinate(),
        items[maximum].intensity()
    );

    // leftmost element on or above the target, scanning up to the maximum
    let above_left = items[..=maximum]
        .iter()
        .position(|e| e.intensity() as f64 >= target)
        .ok_or(PsfError::Starvation(
            "full_width_at_fraction_of_maximum(): no element on or above the target intensity on the left flank",
        ))?;
    let below_left = if above_left == 0 {
        if target < items[0].intensity() as f64 {
            return Err(PsfError::Starvation(
                "full_width_at_fraction_of_maximum(): no element below the target intensity on the left flank",
            ));
        }
        // the edge element sits exactly on the target
        above_left
    } else {
        above_left - 1
    };

    // rightmost element on or above the target, scanning down to the maximum
    let last = items.len() - 1;
    let above_right = (maximum..=last)
        .rev()
        .find(|&i| items[i].intensity() as f64 >= target)
        .ok_or(PsfError::Starvation(
            "full_width_at_fraction_of_maximum(): no element on or above the target intensity on the right flank",
        ))?;
    let below_right = if above_right == last {
        if target < items[last].intensity() as f64 {
            return Err(PsfError::Starvation(
                "full_width_at_fraction_of_maximum(): no element below the target intensity on the right flank",
            ));
        }
        above_right
    } else {
        above_right + 1
    };

    let left = interpolate_to_target(&items[below_left], &items[above_left], target)?;
    let right = interpolate_to_target(&items[below_right], &items[above_right], target)?;

    Ok(right - left)
}

/// Blend two elements linearly in the m/z dimension to the m/z value at
/// which the connecting line reaches the target intensity. If the elements
/// share one m/z value, that value is returned without interpolation.
fn interpolate_to_target<T>(element1: &T, element2: &T, target: f64) -> PsfResult<f64>
where
    T: CoordinateLike<MZ> + IntensityMeasurement,
{
    let (x1, x2) = (element1.coordinate(), element2.coordinate());
    if x1 == x2 {
        return Ok(x2);
    }

    let (y1, y2) = (element1.intensity() as f64, element2.intensity() as f64);
    invariant(
        y1 != y2,
        "interpolate_to_target(): elements differ in m/z but not in intensity",
    )?;

    // intensity = slope * mz + shift, solved for mz at the target intensity
    let slope = (y2 - y1) / (x2 - x1);
    let shift = y1 - slope * x1;
    Ok((target - shift) / slope)
}

#[cfg(test)]
mod test {
    use super::*;
    use mzpeaks::peak::MZPoint;

    fn peak(points: &[(f64, f32)]) -> Vec<MZPoint> {
        points
            .iter()
            .map(|&(mz, intensity)| MZPoint::new(mz, intensity))
            .collect()
    }

    fn normal_peak() -> Vec<MZPoint> {
        peak(&[
            (1.1, 1.1),
            (1.2, 1.9),
            (1.4, 3.1),
            (1.5, 2.2),
            (1.69, 1.14),
            (1.76, 0.98),
        ])
    }

    #[test]
    fn test_height() {
        assert_eq!(height(&normal_peak()).unwrap(), 3.1);

        let empty: Vec<MZPoint> = Vec::new();
        assert!(matches!(
            height(&empty),
            Err(PsfError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn test_lowness_of_a_normal_peak() {
        // lowest intensity on the left is 1.1, on the right 0.98; the left
        // one is the shoulder
        let observed = lowness(&normal_peak());
        assert!((observed - (1.0 - 1.1 / 3.1)).abs() < 1e-6);
    }

    #[test]
    fn test_lowness_of_a_one_flanked_peak_is_zero() {
        let s = peak(&[(1.1, 1.1), (1.2, 1.9), (1.4, 3.1), (1.5, 5.2)]);
        assert_eq!(lowness(&s), 0.0);
    }

    #[test]
    fn test_lowness_of_an_equiabundant_sequence_is_zero() {
        let s = peak(&[(1.1, 1.1), (1.2, 1.1), (1.4, 1.1), (1.5, 1.1)]);
        assert_eq!(lowness(&s), 0.0);
    }

    #[test]
    fn test_lowness_with_zero_abundance_flanks_is_one() {
        let s = peak(&[
            (1.1, 0.1),
            (1.2, 0.0),
            (1.4, 1.1),
            (1.5, 1.2),
            (1.7, 0.0),
            (1.9, 1.1),
            (2.12, 0.9),
        ]);
        assert_eq!(lowness(&s), 1.0);
    }

    #[test]
    fn test_lowness_of_a_single_element_is_zero() {
        let s = peak(&[(123.32, 89.1)]);
        assert_eq!(lowness(&s), 0.0);
    }

    fn twisted_peak() -> Vec<MZPoint> {
        // note the intensity twist in the last two elements
        peak(&[
            (0.4, 0.12),
            (1.1, 1.1),
            (1.2, 1.9),
            (1.4, 3.1),
            (1.5, 2.2),
            (1.6, 0.98),
            (1.69, 1.14),
        ])
    }

    #[rstest::rstest]
    #[case(0.7, 0.257459)]
    #[case(0.5, 0.397029)]
    fn test_full_width_interpolation(#[case] fraction: f64, #[case] expected: f64) {
        let s = twisted_peak();
        let observed = full_width_at_fraction_of_maximum(&s, fraction).unwrap();
        assert!((observed - expected).abs() < 1e-6, "observed {observed}");
    }

    #[test]
    fn test_full_width_starves_on_a_shallow_flank() {
        // at a fraction of 0.3 the right flank never descends below the
        // target before the range ends
        let s = twisted_peak();
        assert!(matches!(
            full_width_at_fraction_of_maximum(&s, 0.3),
            Err(PsfError::Starvation(_))
        ));
    }

    #[test]
    fn test_full_width_rejects_out_of_range_fractions() {
        let s = twisted_peak();
        assert!(matches!(
            full_width_at_fraction_of_maximum(&s, 1.1),
            Err(PsfError::PreconditionViolation(_))
        ));
        assert!(matches!(
            full_width_at_fraction_of_maximum(&s, -0.3),
            Err(PsfError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn test_full_width_accepts_border_fractions() {
        let s = twisted_peak();
        // 1.0 measures the width of the maximum itself
        full_width_at_fraction_of_maximum(&s, 1.0).unwrap();
        // 0.0 may or may not starve depending on the flanks; it must not
        // report a precondition violation
        match full_width_at_fraction_of_maximum(&s, 0.0) {
            Ok(_) | Err(PsfError::Starvation(_)) => {}
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    #[test]
    fn test_full_width_with_elements_exactly_on_target() {
        let s = peak(&[(3.0, 7.0), (4.0, 10.0), (5.0, 7.0)]);
        let observed = full_width_at_fraction_of_maximum(&s, 0.71).unwrap();
        assert!((observed - 2.0).abs() < 0.1, "observed {observed}");
    }

    #[test]
    fn test_isclose() {
        assert!(isclose(1.0, 1.0 + 1e-9));
        assert!(!isclose(1.0, 1.1));
        assert!(aboutzero(0.0));
    }
}
