//! Diff calculation between the scraped listings and the stored snapshot.
//!
//! Listings are matched by id. A listing present on both sides is reported as
//! updated only when one of its fields changed; comparison is exact, with no
//! normalization beyond what the extractor already applied.

use std::collections::HashMap;

use crate::models::{Diff, Listing, ListingPair};

/// Calculate the diff between the current listings and the previous snapshot.
///
/// Returns `None` when nothing was added, updated or removed.
///
/// `added` and `updated` follow the order of `current`; `removed` follows the
/// order of `previous`. When `previous` contains duplicate ids the last one
/// wins.
pub fn compute_diff(current: &[Listing], previous: &[Listing]) -> Option<Diff> {
    let mut lookup: HashMap<&str, (usize, &Listing)> = previous
        .iter()
        .enumerate()
        .map(|(index, listing)| (listing.id.as_str(), (index, listing)))
        .collect();

    let mut diff = Diff::default();

    for listing in current {
        match lookup.remove(listing.id.as_str()) {
            Some((_, old)) => {
                let pair = ListingPair {
                    new: listing.clone(),
                    old: old.clone(),
                };
                if pair.has_diff() {
                    diff.updated.push(pair);
                }
            }
            None => diff.added.push(listing.clone()),
        }
    }

    let mut remaining: Vec<(usize, &Listing)> = lookup.into_values().collect();
    remaining.sort_by_key(|(index, _)| *index);
    diff.removed = remaining
        .into_iter()
        .map(|(_, listing)| listing.clone())
        .collect();

    if diff.is_empty() { None } else { Some(diff) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_listing(id: &str, title: &str, price: &str) -> Listing {
        Listing {
            id: id.to_string(),
            title: title.to_string(),
            price: price.to_string(),
            layout: "1K".to_string(),
            size: "20".to_string(),
        }
    }

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_no_changes() {
        let prev = vec![make_listing("1", "A", "100"), make_listing("2", "B", "200")];
        let curr = prev.clone();

        assert!(compute_diff(&curr, &prev).is_none());
    }

    #[test]
    fn test_empty_sets() {
        assert!(compute_diff(&[], &[]).is_none());
    }

    #[test]
    fn test_additions() {
        let prev = vec![make_listing("1", "A", "100")];
        let curr = vec![
            make_listing("1", "A", "100"),
            make_listing("2", "B", "200"),
            make_listing("3", "C", "300"),
        ];

        let diff = compute_diff(&curr, &prev).unwrap();
        assert_eq!(ids(&diff.added), vec!["2", "3"]);
        assert!(diff.updated.is_empty());
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn test_removals() {
        let prev = vec![make_listing("1", "A", "100"), make_listing("2", "B", "200")];
        let curr = vec![make_listing("1", "A", "100")];

        let diff = compute_diff(&curr, &prev).unwrap();
        assert!(diff.added.is_empty());
        assert!(diff.updated.is_empty());
        assert_eq!(ids(&diff.removed), vec!["2"]);
    }

    #[test]
    fn test_disjoint_sets() {
        let prev = vec![make_listing("1", "A", "100"), make_listing("2", "B", "200")];
        let curr = vec![make_listing("3", "C", "300"), make_listing("4", "D", "400")];

        let diff = compute_diff(&curr, &prev).unwrap();
        assert_eq!(diff.added, curr);
        assert!(diff.updated.is_empty());
        assert_eq!(diff.removed, prev);
    }

    #[test]
    fn test_each_field_change_is_an_update() {
        let base = make_listing("7", "Title", "100");
        let variants: Vec<Listing> = vec![
            Listing { title: "Other".into(), ..base.clone() },
            Listing { price: "101".into(), ..base.clone() },
            Listing { layout: "2LDK".into(), ..base.clone() },
            Listing { size: "21".into(), ..base.clone() },
        ];

        for changed in variants {
            let diff = compute_diff(std::slice::from_ref(&changed), std::slice::from_ref(&base))
                .unwrap();
            assert!(diff.added.is_empty());
            assert!(diff.removed.is_empty());
            assert_eq!(
                diff.updated,
                vec![ListingPair { new: changed, old: base.clone() }]
            );
        }
    }

    #[test]
    fn test_comparison_is_exact() {
        let prev = vec![make_listing("1", "Maison", "100")];
        let curr = vec![make_listing("1", "Maison ", "100")];

        let diff = compute_diff(&curr, &prev).unwrap();
        assert_eq!(diff.updated.len(), 1);
    }

    #[test]
    fn test_mixed_changes() {
        let prev = vec![
            make_listing("001", "Keep", "100"),
            make_listing("002", "Update Me", "100"),
            make_listing("003", "Remove Me", "100"),
        ];
        let curr = vec![
            make_listing("001", "Keep", "100"),
            make_listing("002", "Update Me", "120"),
            make_listing("004", "New Room", "100"),
        ];

        let diff = compute_diff(&curr, &prev).unwrap();
        assert_eq!(ids(&diff.added), vec!["004"]);
        assert_eq!(diff.updated.len(), 1);
        assert_eq!(diff.updated[0].new.price, "120");
        assert_eq!(diff.updated[0].old.price, "100");
        assert_eq!(ids(&diff.removed), vec!["003"]);
        assert_eq!(diff.change_count(), 3);
    }

    #[test]
    fn test_previous_order_does_not_change_membership() {
        let prev = vec![
            make_listing("1", "A", "100"),
            make_listing("2", "B", "200"),
            make_listing("3", "C", "300"),
            make_listing("4", "D", "400"),
        ];
        let curr = vec![make_listing("2", "B", "250"), make_listing("5", "E", "500")];

        let forward = compute_diff(&curr, &prev).unwrap();

        let mut reversed = prev.clone();
        reversed.reverse();
        let backward = compute_diff(&curr, &reversed).unwrap();

        assert_eq!(forward.added, backward.added);
        assert_eq!(forward.updated, backward.updated);

        let mut forward_removed = ids(&forward.removed);
        let mut backward_removed = ids(&backward.removed);
        forward_removed.sort();
        backward_removed.sort();
        assert_eq!(forward_removed, backward_removed);
        assert_eq!(forward_removed, vec!["1", "3", "4"]);
    }

    #[test]
    fn test_duplicate_previous_ids_last_wins() {
        let prev = vec![make_listing("1", "First", "100"), make_listing("1", "Second", "100")];
        let curr = vec![make_listing("1", "Second", "100")];

        assert!(compute_diff(&curr, &prev).is_none());
    }

    #[test]
    fn scenario_first_run_adds_everything() {
        let curr = vec![make_listing("1", "A", "100")];

        let diff = compute_diff(&curr, &[]).unwrap();
        assert_eq!(diff.added, curr);
        assert!(diff.updated.is_empty());
        assert!(diff.removed.is_empty());
    }

    #[test]
    fn scenario_price_change_is_update() {
        let curr = vec![make_listing("1", "A", "100")];
        let prev = vec![make_listing("1", "A", "90")];

        let diff = compute_diff(&curr, &prev).unwrap();
        assert!(diff.added.is_empty());
        assert!(diff.removed.is_empty());
        assert_eq!(
            diff.updated,
            vec![ListingPair {
                new: curr[0].clone(),
                old: prev[0].clone(),
            }]
        );
    }

    #[test]
    fn scenario_everything_removed() {
        let prev = vec![make_listing("2", "B", "200")];

        let diff = compute_diff(&[], &prev).unwrap();
        assert!(diff.added.is_empty());
        assert!(diff.updated.is_empty());
        assert_eq!(diff.removed, prev);
    }

    #[test]
    fn scenario_reordered_identical_sets() {
        let prev = vec![make_listing("1", "A", "100"), make_listing("2", "B", "200")];
        let curr = vec![make_listing("2", "B", "200"), make_listing("1", "A", "100")];

        assert!(compute_diff(&curr, &prev).is_none());
    }
}
