mod models;
mod pub_date;

pub use models::*;
pub use pub_date::PubDate;

use std::collections::BTreeMap;

/// Canonical label → number of articles carrying it.
pub type LabelCounts = BTreeMap<String, i64>;

/// Adds every count in `other` into `into`, keyed by label.
pub fn merge_counts(into: &mut LabelCounts, other: &LabelCounts) {
    for (label, count) in other {
        *into.entry(label.clone()).or_insert(0) += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, i64)]) -> LabelCounts {
        pairs.iter().map(|(l, c)| (l.to_string(), *c)).collect()
    }

    #[test]
    fn test_merge_counts_sums_by_label() {
        let mut total = counts(&[("Article", 3), ("Advertisement", 1)]);
        merge_counts(&mut total, &counts(&[("Article", 2), ("Obituary", 4)]));

        assert_eq!(
            total,
            counts(&[("Advertisement", 1), ("Article", 5), ("Obituary", 4)])
        );
    }

    #[test]
    fn test_merge_counts_is_order_independent() {
        let archives = [
            counts(&[("Article", 3), ("Advertisement", 1)]),
            counts(&[("Article", 2), ("Obituary", 4)]),
            counts(&[("Advertisement", 7), ("Editorial|Letter", 1)]),
        ];

        let mut forward = LabelCounts::new();
        for archive in &archives {
            merge_counts(&mut forward, archive);
        }

        let mut backward = LabelCounts::new();
        for archive in archives.iter().rev() {
            merge_counts(&mut backward, archive);
        }

        let mut rotated = LabelCounts::new();
        for i in [1, 2, 0] {
            merge_counts(&mut rotated, &archives[i]);
        }

        assert_eq!(forward, backward);
        assert_eq!(forward, rotated);
        assert_eq!(forward.get("Advertisement"), Some(&8));
    }
}
