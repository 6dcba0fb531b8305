use std::cmp::Ordering;

/// Quicksort with a middle pivot and three-way partition.
///
/// Returns a new sorted vector; the input is left untouched. Partitions are
/// kept on an explicit work stack, so hostile pivot sequences cost time, not
/// call depth. A range that keeps partitioning badly past `2 * log2(n)`
/// levels is finished with the standard library's sort.
pub fn quicksort<T: Ord + Clone>(items: &[T]) -> Vec<T> {
    let mut sorted = items.to_vec();
    if sorted.len() <= 1 {
        return sorted;
    }

    let depth_limit = 2 * (usize::BITS - sorted.len().leading_zeros());
    let mut pending = vec![(0, sorted.len(), depth_limit)];

    while let Some((lo, hi, depth)) = pending.pop() {
        if hi - lo <= 1 {
            continue;
        }
        if depth == 0 {
            sorted[lo..hi].sort_unstable();
            continue;
        }

        let (lt, gt) = partition(&mut sorted, lo, hi);
        pending.push((lo, lt, depth - 1));
        pending.push((gt, hi, depth - 1));
    }

    sorted
}

/// Dutch-flag partition of `items[lo..hi]` around its middle element.
/// Afterwards `[lo, lt)` is less, `[lt, gt)` equal and `[gt, hi)` greater.
fn partition<T: Ord + Clone>(items: &mut [T], lo: usize, hi: usize) -> (usize, usize) {
    let pivot = items[lo + (hi - lo) / 2].clone();
    let (mut lt, mut i, mut gt) = (lo, lo, hi);
    while i < gt {
        match items[i].cmp(&pivot) {
            Ordering::Less => {
                items.swap(lt, i);
                lt += 1;
                i += 1;
            }
            Ordering::Greater => {
                gt -= 1;
                items.swap(i, gt);
            }
            Ordering::Equal => i += 1,
        }
    }
    (lt, gt)
}
