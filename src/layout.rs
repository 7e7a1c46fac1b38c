// Layout arithmetic: wraparound indices, track offset, style values.
// Pure functions over config + geometry; the engine owns the state they read.
// See DESIGN.md: Navigation / Layout

use crate::config::Animation;
use crate::types::{SlideSize, Styles};

/// Wrap a candidate index into the slide range.
///
/// Forward overflow always returns to the start. Going back lands on the last
/// slide only when the step crossed a full `per_slide` below zero; a smaller
/// overshoot settles at 0.
pub fn compute_index(candidate: i64, slide_count: usize, per_slide: usize) -> i64 {
    if slide_count == 0 {
        return 0;
    }
    let count = i64::try_from(slide_count).unwrap_or(i64::MAX);
    let step = i64::try_from(per_slide).unwrap_or(i64::MAX);
    if candidate >= count {
        0
    } else if candidate <= -step {
        count - 1
    } else if candidate < 0 {
        0
    } else {
        candidate
    }
}

/// Reference index for the margin pass, and whether the layout is centered.
///
/// Centering only applies to odd `displayed` counts.
pub fn loop_until(index: i64, displayed: usize, center_active: bool) -> (i64, bool) {
    if center_active && displayed % 2 == 1 {
        let half = i64::try_from(displayed / 2).unwrap_or(i64::MAX);
        (index.saturating_sub(half), true)
    } else {
        (index, false)
    }
}

/// Total width of slides scrolled off to the left.
///
/// Slide `j` counts when it sits before `reference` and the tail of
/// `displayed` slides is never scrolled past.
pub fn margin(sizes: &[SlideSize], slide_count: usize, reference: i64, displayed: usize) -> f64 {
    let scrollable = i64::try_from(slide_count)
        .unwrap_or(i64::MAX)
        .saturating_sub(i64::try_from(displayed).unwrap_or(i64::MAX));
    (0..slide_count)
        .filter(|&j| (j as i64) < reference && (j as i64) < scrollable)
        .map(|j| sizes.get(j).map_or(0.0, |s| s.width))
        .sum()
}

/// Styles for the slider track.
///
/// Slide mode offsets the track; other modes size it to the active slide once ready.
pub fn styles(
    animation: &Animation,
    slider_margin: f64,
    is_ready: bool,
    sizes: &[SlideSize],
    active_index: i64,
) -> Styles {
    if animation.is_slide() {
        return Styles {
            offset_x: Some(slider_margin),
            height: None,
        };
    }
    if !is_ready || active_index < 0 {
        return Styles::default();
    }
    Styles {
        offset_x: None,
        height: sizes.get(active_index as usize).map(|s| s.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn widths(ws: &[f64]) -> Vec<SlideSize> {
        ws.iter().map(|w| SlideSize::new(*w, 50.0)).collect()
    }

    #[test]
    fn partial_backstep_clamps_to_start() {
        assert_eq!(compute_index(-1, 5, 2), 0);
        assert_eq!(compute_index(-2, 5, 2), 4);
        assert_eq!(compute_index(-5, 5, 2), 4);
    }

    #[test]
    fn empty_carousel_stays_at_zero() {
        assert_eq!(compute_index(3, 0, 1), 0);
        assert_eq!(compute_index(-1, 0, 1), 0);
        assert_eq!(margin(&[], 0, 4, 3), 0.0);
    }

    #[test]
    fn margin_skips_visible_tail() {
        let sizes = widths(&[100.0, 110.0, 120.0, 130.0, 140.0]);
        assert_eq!(margin(&sizes, 5, 0, 3), 0.0);
        assert_eq!(margin(&sizes, 5, 1, 3), 100.0);
        // Index 3 would skip three slides, but only two may scroll off.
        assert_eq!(margin(&sizes, 5, 3, 3), 210.0);
        assert_eq!(margin(&sizes, 5, 4, 3), 210.0);
    }

    #[test]
    fn oversized_displayed_scrolls_nothing() {
        let sizes = widths(&[100.0, 110.0, 120.0, 130.0, 140.0]);
        assert_eq!(margin(&sizes, 5, 3, usize::MAX), 0.0);
        assert!(loop_until(0, usize::MAX, true).1);
    }

    #[test]
    fn extreme_indices_do_not_overflow() {
        assert_eq!(compute_index(i64::MIN, 5, 1), 4);
        assert_eq!(compute_index(i64::MAX, 5, usize::MAX), 0);
        assert_eq!(loop_until(i64::MIN, 3, true), (i64::MIN, true));
    }

    #[test]
    fn margin_tolerates_stale_size_cache() {
        let sizes = widths(&[100.0]);
        assert_eq!(margin(&sizes, 5, 3, 1), 100.0);
    }

    #[test]
    fn centering_needs_odd_displayed() {
        assert_eq!(loop_until(4, 3, true), (3, true));
        assert_eq!(loop_until(4, 5, true), (2, true));
        assert_eq!(loop_until(4, 4, true), (4, false));
        assert_eq!(loop_until(4, 3, false), (4, false));
    }

    #[test]
    fn styles_per_animation() {
        let sizes = vec![SlideSize::new(100.0, 40.0), SlideSize::new(100.0, 60.0)];

        let slide = styles(&Animation::Slide, -100.0, false, &sizes, 1);
        assert_eq!(slide.offset_x, Some(-100.0));

        let not_ready = styles(&Animation::Fade, -100.0, false, &sizes, 1);
        assert!(not_ready.is_empty());

        let ready = styles(&Animation::Fade, -100.0, true, &sizes, 1);
        assert_eq!(ready.height, Some(60.0));
        assert_eq!(ready.offset_x, None);
    }

    proptest! {
        #[test]
        fn forward_overflow_wraps_to_start(count in 1usize..50, step in 1usize..50) {
            let per_slide = step.min(count);
            prop_assert_eq!(compute_index(count as i64, count, per_slide), 0);
        }

        #[test]
        fn wrap_boundary_sits_at_a_full_step(count in 1usize..50, step in 1usize..50) {
            let per_slide = step.min(count) as i64;
            prop_assert_eq!(compute_index(-per_slide, count, per_slide as usize), count as i64 - 1);
            prop_assert_eq!(compute_index(-per_slide + 1, count, per_slide as usize), 0);
        }

        #[test]
        fn result_is_always_in_range(candidate in -100i64..100, count in 1usize..50, step in 1usize..10) {
            let index = compute_index(candidate, count, step);
            prop_assert!(index >= 0 && index < count as i64);
        }
    }
}
