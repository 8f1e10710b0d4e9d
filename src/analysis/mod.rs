// src/analysis/mod.rs
pub mod cheapest;
pub mod outliers;

use crate::types::{CategorizedView, Listing};

pub use cheapest::cheapest_by_group;
pub use outliers::significant;

/// Builds the presentation view for one poll.
pub fn categorize(listings: &[Listing], max_price: f64, k: f64) -> CategorizedView {
    CategorizedView {
        under_budget: listings
            .iter()
            .filter(|l| l.price <= max_price)
            .cloned()
            .collect(),
        significant: significant(listings, k),
        cheapest: cheapest_by_group(listings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Condition;

    #[test]
    fn empty_batch_gives_empty_view() {
        assert!(categorize(&[], 725.0, 1.0).is_empty());
    }

    #[test]
    fn under_budget_is_inclusive_and_ordered() {
        let batch = vec![
            Listing::new(800.0, "256GB", Condition::New, "L0"),
            Listing::new(725.0, "256GB", Condition::New, "L1"),
            Listing::new(650.0, "256GB", Condition::Good, "L2"),
        ];
        let view = categorize(&batch, 725.0, 1.0);
        let links: Vec<_> = view.under_budget.iter().map(|l| l.link.as_str()).collect();
        assert_eq!(links, vec!["L1", "L2"]);
        assert_eq!(view.cheapest.len(), 2);
    }
}
