//! Reading order for positioned fragments.

use std::cmp::Ordering;

use crate::model::Fragment;

/// Compare two fragments in reading order.
///
/// Tie-break rules:
/// 1. If the baselines differ by more than `tolerance`, the fragment higher
///    on the page (larger `y`) comes first.
/// 2. Otherwise the two fragments are on the same line and only `x`
///    matters: the leftmost comes first. The small `y` difference is ignored.
///
/// Values that cannot be compared (NaN) compare as equal.
///
/// Because rule 2 buckets by tolerance, this is not transitive: a chain of
/// baselines each within `tolerance` of the next can order `a < b < c < a`.
/// Typical PDF layouts keep lines far enough apart that this does not
/// happen; when it does, the resulting order is stable but unspecified.
pub fn reading_order(a: &Fragment, b: &Fragment, tolerance: f32) -> Ordering {
    if (a.y - b.y).abs() > tolerance {
        b.y.partial_cmp(&a.y).unwrap_or(Ordering::Equal)
    } else {
        a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal)
    }
}

/// Return the fragments of a page sorted into reading order.
///
/// `slice::sort_by` may panic when the comparator is not a total order, and
/// [`reading_order`] is not one. This uses a stable merge sort that accepts
/// any comparator.
pub fn sort_reading_order(fragments: &[Fragment], tolerance: f32) -> Vec<&Fragment> {
    let mut ordered: Vec<&Fragment> = fragments.iter().collect();
    merge_sort(&mut ordered, &|a: &&Fragment, b: &&Fragment| {
        reading_order(a, b, tolerance)
    });
    ordered
}

fn merge_sort<T, F>(items: &mut [T], compare: &F)
where
    T: Copy,
    F: Fn(&T, &T) -> Ordering,
{
    let len = items.len();
    if len <= 1 {
        return;
    }

    let mid = len / 2;
    merge_sort(&mut items[..mid], compare);
    merge_sort(&mut items[mid..], compare);

    let mut merged = Vec::with_capacity(len);
    let (mut left, mut right) = (0, mid);
    while left < mid && right < len {
        // Take from the right run only when strictly less, keeping the sort stable
        if compare(&items[right], &items[left]) == Ordering::Less {
            merged.push(items[right]);
            right += 1;
        } else {
            merged.push(items[left]);
            left += 1;
        }
    }
    merged.extend_from_slice(&items[left..mid]);
    merged.extend_from_slice(&items[right..]);
    items.copy_from_slice(&merged);
}
