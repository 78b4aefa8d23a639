use std::collections::HashMap;
use std::hash::Hash;

use crate::dataset::Dataset;
use crate::error::{BikeshareError, Result};

/// Counts occurrences of each value, most frequent first.
///
/// Values with equal counts keep the order in which they first appeared.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut slots: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();

    for value in values {
        match slots.get(&value) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                slots.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    // stable sort keeps first-seen order among ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Most frequent value; ties go to the value seen first. `None` for empty input.
pub fn mode<T, I>(values: I) -> Option<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    value_counts(values).into_iter().next().map(|(value, _)| value)
}

/// [`mode`] for a named report, failing with [`BikeshareError::EmptyDataset`]
/// when there are no values.
pub fn popular<T, I>(values: I, report: &'static str) -> Result<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    mode(values).ok_or(BikeshareError::EmptyDataset(report))
}

/// Arithmetic mean of `count` values summing to `total`. `None` when `count` is zero.
pub fn mean(total: u128, count: usize) -> Option<f64> {
    if count == 0 {
        return None;
    }
    Some(total as f64 / count as f64)
}

/// Fails with [`BikeshareError::EmptyDataset`] when there is nothing to summarize.
pub fn require_rows(dataset: &Dataset, report: &'static str) -> Result<()> {
    if dataset.is_empty() {
        return Err(BikeshareError::EmptyDataset(report));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_counts_orders_by_count_then_first_seen() {
        let counts = value_counts(["b", "a", "c", "a", "c", "d"]);
        assert_eq!(counts, vec![("a", 2), ("c", 2), ("b", 1), ("d", 1)]);
    }

    #[test]
    fn test_mode_tie_goes_to_first_seen() {
        assert_eq!(mode(["B", "A", "A", "B"]), Some("B"));
        assert_eq!(mode(["A", "B", "B", "A"]), Some("A"));
        assert_eq!(mode([3, 1, 1]), Some(1));
    }

    #[test]
    fn test_mode_is_deterministic() {
        let values = ["x", "y", "z", "y", "x", "z"];
        let first = mode(values);
        for _ in 0..20 {
            assert_eq!(mode(values), first);
        }
        assert_eq!(first, Some("x"));
    }

    #[test]
    fn test_mode_empty() {
        assert_eq!(mode(Vec::<u32>::new()), None);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(600, 2), Some(300.0));
        assert_eq!(mean(10, 4), Some(2.5));
        assert_eq!(mean(0, 0), None);
    }
}
