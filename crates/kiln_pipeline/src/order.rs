//! The ordering shared by every priority-ordered plug-in set.

use std::cmp::Ordering;

/// Sorts `items` by descending priority.
///
/// The sort is stable: items with equal priority keep their relative order.
/// Priorities compare as real numbers, so `-0.0` ties with `0.0`; callers
/// reject NaN before ordering.
pub fn order_by_priority<T, F>(items: &mut [T], priority: F)
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| priority(b).partial_cmp(&priority(a)).unwrap_or(Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descending_and_stable() {
        let mut items = vec![("step1", 1.0), ("step2", 5.0), ("step3", 3.0), ("step4", 5.0)];
        order_by_priority(&mut items, |(_, p)| *p);
        let names: Vec<_> = items.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["step2", "step4", "step3", "step1"]);
    }

    #[test]
    fn equal_priorities_keep_registration_order() {
        let mut items: Vec<(usize, f64)> = (0..50).map(|i| (i, 7.5)).collect();
        order_by_priority(&mut items, |(_, p)| *p);
        assert!(items.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn signed_zeros_tie() {
        let mut items = vec![("first", -0.0), ("second", 0.0), ("third", -0.0)];
        order_by_priority(&mut items, |(_, p)| *p);
        let names: Vec<_> = items.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn negative_and_fractional_priorities() {
        let mut items = vec![("a", -1.0), ("b", 0.5), ("c", f64::INFINITY), ("d", 0.25)];
        order_by_priority(&mut items, |(_, p)| *p);
        let names: Vec<_> = items.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, ["c", "b", "d", "a"]);
    }
}
