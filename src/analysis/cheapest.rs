// src/analysis/cheapest.rs
use crate::types::{CheapestOffer, Listing};
use std::collections::HashMap;

/// Cheapest listing per (size, condition), sorted by ascending price.
/// Equal prices keep the order in which their keys first appeared.
pub fn cheapest_by_group(listings: &[Listing]) -> Vec<CheapestOffer> {
    let mut index = HashMap::new();
    let mut offers: Vec<CheapestOffer> = Vec::new();

    for listing in listings {
        match index.get(&(listing.size.as_str(), listing.condition)) {
            Some(&slot) => {
                let best: &mut CheapestOffer = &mut offers[slot];
                if listing.price < best.price {
                    best.price = listing.price;
                    best.link = listing.link.clone();
                }
            }
            None => {
                index.insert((listing.size.as_str(), listing.condition), offers.len());
                offers.push(CheapestOffer {
                    size: listing.size.clone(),
                    condition: listing.condition,
                    price: listing.price,
                    link: listing.link.clone(),
                });
            }
        }
    }

    // sort_by is stable: equal prices keep first-seen key order
    offers.sort_by(|a, b| a.price.total_cmp(&b.price));
    offers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Condition;

    #[test]
    fn one_entry_per_key_sorted_by_price() {
        let batch = vec![
            Listing::new(700.0, "256GB", Condition::New, "L1"),
            Listing::new(650.0, "256GB", Condition::Good, "L2"),
            Listing::new(600.0, "256GB", Condition::Fair, "L3"),
        ];
        let out = cheapest_by_group(&batch);
        let links: Vec<_> = out.iter().map(|o| o.link.as_str()).collect();
        assert_eq!(links, vec!["L3", "L2", "L1"]);
        assert_eq!(out[0].condition, Condition::Fair);
        assert_eq!(out[0].price, 600.0);
    }

    #[test]
    fn keeps_minimum_and_first_link_on_equal_price() {
        let batch = vec![
            Listing::new(500.0, "256GB", Condition::Mint, "A"),
            Listing::new(450.0, "256GB", Condition::Mint, "B"),
            Listing::new(450.0, "256GB", Condition::Mint, "C"),
            Listing::new(480.0, "256GB", Condition::Mint, "D"),
        ];
        let out = cheapest_by_group(&batch);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].price, 450.0);
        assert_eq!(out[0].link, "B");
    }

    #[test]
    fn every_entry_is_its_group_minimum() {
        let batch = vec![
            Listing::new(320.0, "128GB", Condition::Good, "a"),
            Listing::new(900.0, "1TB", Condition::New, "b"),
            Listing::new(300.0, "128GB", Condition::Good, "c"),
            Listing::new(310.0, "128GB", Condition::Fair, "d"),
            Listing::new(850.0, "1TB", Condition::New, "e"),
            Listing::new(290.0, "Unknown", Condition::Unknown, "f"),
        ];
        let out = cheapest_by_group(&batch);
        assert_eq!(out.len(), 4);
        assert!(out.windows(2).all(|w| w[0].price <= w[1].price));
        for offer in &out {
            let min = batch
                .iter()
                .filter(|l| l.size == offer.size && l.condition == offer.condition)
                .map(|l| l.price)
                .fold(f64::INFINITY, f64::min);
            assert_eq!(offer.price, min);
        }
    }

    #[test]
    fn price_ties_across_groups_keep_first_seen_order() {
        let batch = vec![
            Listing::new(400.0, "512GB", Condition::Good, "first"),
            Listing::new(400.0, "256GB", Condition::Good, "second"),
        ];
        let out = cheapest_by_group(&batch);
        assert_eq!(out[0].link, "first");
        assert_eq!(out[1].link, "second");
    }
}
