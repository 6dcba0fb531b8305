use serde::{Deserialize, Serialize};

/// Outcome of looking up one target value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub value: i64,
    /// Index of the first occurrence, `-1` when absent.
    pub position: i64,
    pub found: bool,
}

/// Index of the first element equal to `target`.
pub fn linear_search(items: &[i64], target: i64) -> Option<usize> {
    items.iter().position(|v| *v == target)
}

pub fn search_all(items: &[i64], targets: &[i64]) -> Vec<SearchHit> {
    targets
        .iter()
        .map(|&value| match linear_search(items, value) {
            Some(idx) => SearchHit {
                value,
                position: idx as i64,
                found: true,
            },
            None => SearchHit {
                value,
                position: -1,
                found: false,
            },
        })
        .collect()
}
