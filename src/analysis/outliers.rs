// src/analysis/outliers.rs
use crate::types::Listing;
use crate::utils::stats::{mean, sample_stdev};
use std::collections::HashMap;

/// Listings grouped by size, groups in first-seen order.
pub fn group_by_size(listings: &[Listing]) -> Vec<(&str, Vec<&Listing>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&Listing>)> = Vec::new();

    for listing in listings {
        let slot = *index.entry(listing.size.as_str()).or_insert_with(|| {
            groups.push((listing.size.as_str(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(listing);
    }
    groups
}

/// `mean - k * stdev` for one size group, `None` below two members.
pub fn threshold(prices: &[f64], k: f64) -> Option<f64> {
    let avg = mean(prices)?;
    let stdev = sample_stdev(prices)?;
    Some(avg - k * stdev)
}

/// Listings priced at or below their size group's dynamic threshold.
///
/// Output follows group first-seen order, then encounter order inside a group.
pub fn significant(listings: &[Listing], k: f64) -> Vec<Listing> {
    let mut out = Vec::new();

    for (_, group) in group_by_size(listings) {
        let prices: Vec<f64> = group.iter().map(|l| l.price).collect();
        let Some(limit) = threshold(&prices, k) else {
            continue;
        };
        out.extend(
            group
                .into_iter()
                .filter(|l| l.price <= limit)
                .cloned(),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Condition;

    fn listing(price: f64, size: &str, link: &str) -> Listing {
        Listing::new(price, size, Condition::Good, link)
    }

    #[test]
    fn threshold_tie_is_significant() {
        let batch = vec![
            Listing::new(700.0, "256GB", Condition::New, "L1"),
            Listing::new(650.0, "256GB", Condition::Good, "L2"),
            Listing::new(600.0, "256GB", Condition::Fair, "L3"),
        ];
        let hits = significant(&batch, 1.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].link, "L3");
    }

    #[test]
    fn single_member_groups_never_qualify() {
        let batch = vec![
            listing(100.0, "128GB", "A"),
            listing(900.0, "1TB", "B"),
            listing(50.0, "Unknown", "C"),
        ];
        assert!(significant(&batch, 0.0).is_empty());
    }

    #[test]
    fn zero_multiplier_flags_everything_at_or_below_mean() {
        let batch = vec![
            listing(10.0, "256GB", "A"),
            listing(20.0, "256GB", "B"),
            listing(30.0, "256GB", "C"),
        ];
        let links: Vec<_> = significant(&batch, 0.0)
            .into_iter()
            .map(|l| l.link)
            .collect();
        assert_eq!(links, vec!["A", "B"]);
    }

    #[test]
    fn groups_are_visited_in_first_seen_order() {
        let batch = vec![
            listing(500.0, "512GB", "X1"),
            listing(100.0, "256GB", "Y1"),
            listing(300.0, "512GB", "X2"),
            listing(200.0, "256GB", "Y2"),
        ];
        let links: Vec<_> = significant(&batch, 0.0)
            .into_iter()
            .map(|l| l.link)
            .collect();
        assert_eq!(links, vec!["X2", "Y1"]);
    }

    #[test]
    fn identical_prices_are_all_ties() {
        let batch = vec![listing(400.0, "256GB", "A"), listing(400.0, "256GB", "B")];
        assert_eq!(significant(&batch, 1.5).len(), 2);
    }

    #[test]
    fn identical_cent_prices_are_all_ties() {
        for price in [0.1, 19.99, 649.99, 699.95] {
            for n in [2, 3, 5, 7, 10, 25] {
                let batch: Vec<_> = (0..n)
                    .map(|i| listing(price, "256GB", &format!("L{i}")))
                    .collect();
                assert_eq!(
                    significant(&batch, 1.5).len(),
                    n,
                    "price {price} with {n} listings"
                );
            }
        }
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(significant(&[], 1.0).is_empty());
        assert!(group_by_size(&[]).is_empty());
    }
}
