//! Algorithm for locating a "bump" in a 1D sequence in a single pass.
//!
//! A bump is a contiguous run of elements holding exactly one local maximum,
//! with strictly monotonic slopes on both sides of it. The smallest possible
//! bump spans three elements: `.'.`

/// Find the first bump in `items`, comparing adjacent elements with
/// `less_than`.
///
/// Returns the inclusive index range `(left, right)` of the first bump
/// found, or `None` if the sequence contains no bump. Sequences shorter
/// than three elements can never contain one.
///
/// A left edge only forms on a strictly rising step; a tie between adjacent
/// elements restarts the search beyond it. A tie or rising step encountered
/// after the maximum ends the bump at the element before it, so a plateau
/// directly after the top truncates the bump there rather than following
/// the signal further down.
pub fn find_bump<T, F>(items: &[T], less_than: F) -> Option<(usize, usize)>
where
    F: Fn(&T, &T) -> bool,
{
    let mut left_edge = 0;
    let mut current = 0;

    let mut on_increasing_slope = false;
    let mut found_bump_top = false;

    while current + 1 < items.len() {
        let next = current + 1;

        if less_than(&items[current], &items[next]) {
            // rising: either the far side of a finished bump, or the
            // start of a new slope
            if found_bump_top {
                break;
            }
            if !on_increasing_slope {
                on_increasing_slope = true;
                left_edge = current;
            }
        } else if less_than(&items[next], &items[current]) {
            // falling: crossing the top if we were rising
            if on_increasing_slope {
                found_bump_top = true;
            }
        } else {
            // tie: closes a finished bump, otherwise the search restarts
            // past it since the rise to a maximum must be strict
            if found_bump_top {
                break;
            }
            left_edge = next;
            on_increasing_slope = false;
        }

        current = next;
    }

    found_bump_top.then_some((left_edge, current))
}

#[cfg(test)]
mod test {
    use super::*;

    fn bump_of(values: &[f64]) -> Option<(usize, usize)> {
        find_bump(values, |a, b| a < b)
    }

    #[test]
    fn test_unimodal_sequence_is_one_bump() {
        assert_eq!(bump_of(&[1.0, 3.0, 2.0]), Some((0, 2)));
        assert_eq!(bump_of(&[0.5, 1.0, 2.5, 7.0, 4.0, 2.0, 0.1]), Some((0, 6)));
    }

    #[test]
    fn test_monotonic_sequences_have_no_bump() {
        assert_eq!(bump_of(&[1.0, 2.0, 3.0, 4.0]), None);
        assert_eq!(bump_of(&[4.0, 3.0, 2.0, 1.0]), None);
        assert_eq!(bump_of(&[2.0, 2.0, 2.0]), None);
    }

    #[test]
    fn test_short_sequences_have_no_bump() {
        assert_eq!(bump_of(&[]), None);
        assert_eq!(bump_of(&[1.0]), None);
        assert_eq!(bump_of(&[1.0, 2.0]), None);
    }

    #[test]
    fn test_only_the_first_bump_is_reported() {
        let values = [1.0, 5.0, 2.0, 6.0, 3.0];
        assert_eq!(bump_of(&values), Some((0, 2)));
        // the right edge of the first doubles as the left edge of the next
        assert_eq!(bump_of(&values[2..]), Some((0, 2)));
    }

    #[test]
    fn test_tie_blocks_a_left_edge() {
        // the flat start cannot begin a bump; the strict rise after it can
        assert_eq!(bump_of(&[2.0, 2.0, 3.0, 1.0]), Some((1, 3)));
        // flat top between rise and fall is not a single maximum
        assert_eq!(bump_of(&[1.0, 3.0, 3.0, 1.0]), None);
    }

    #[test]
    fn test_plateau_after_top_truncates_the_bump() {
        // the tie right after the maximum ends the bump at the tied-from
        // element even though the signal keeps falling afterwards
        assert_eq!(bump_of(&[1.0, 2.0, 3.0, 2.0, 2.0, 1.0]), Some((0, 3)));
    }

    #[test]
    fn test_bump_running_into_the_end_of_the_sequence() {
        assert_eq!(bump_of(&[0.0, 0.0, 1.0, 4.0, 2.0]), Some((1, 4)));
    }
}
