use std::collections::HashMap;

use crate::aggregate::palette::{self, Swatch};
use crate::model::EquipmentItem;

/// Item count per equipment type, labels in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDistribution {
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
}

impl TypeDistribution {
    /// Groups items by type. An empty item list has no distribution at all,
    /// so callers must render an explicit empty state.
    pub fn from_items(items: &[EquipmentItem]) -> Option<Self> {
        if items.is_empty() {
            return None;
        }

        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut labels = Vec::new();
        let mut counts = Vec::new();
        for item in items {
            match positions.get(item.kind.as_str()) {
                Some(&idx) => counts[idx] += 1,
                None => {
                    positions.insert(item.kind.as_str(), labels.len());
                    labels.push(item.kind.clone());
                    counts.push(1);
                }
            }
        }

        Some(Self { labels, counts })
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Percentage of the total held by the group at `index`.
    pub fn share(&self, index: usize) -> f64 {
        let total = self.total();
        match self.counts.get(index) {
            Some(&count) if total > 0 => count as f64 * 100.0 / total as f64,
            _ => 0.0,
        }
    }

    pub fn slices(&self) -> impl Iterator<Item = DistributionSlice<'_>> {
        self.labels
            .iter()
            .zip(&self.counts)
            .enumerate()
            .map(move |(idx, (label, &count))| DistributionSlice {
                label,
                count,
                share: self.share(idx),
                swatch: palette::swatch(idx),
            })
    }
}

/// One wedge of a proportion chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionSlice<'a> {
    pub label: &'a str,
    pub count: usize,
    pub share: f64,
    pub swatch: Swatch,
}

impl DistributionSlice<'_> {
    pub fn caption(&self) -> String {
        format!("{}: {} ({:.1}%)", self.label, self.count, self.share)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: &str, flowrate: f64, pressure: f64, temperature: f64) -> EquipmentItem {
        EquipmentItem::new(0, format!("{kind}-x"), kind, flowrate, pressure, temperature)
    }

    #[test]
    fn distribution_groups_in_first_seen_order() {
        let items = vec![
            item("Pump", 10.0, 2.0, 25.0),
            item("Pump", 20.0, 3.0, 30.0),
            item("Valve", 5.0, 1.0, 20.0),
        ];
        let distribution = TypeDistribution::from_items(&items).unwrap();
        assert_eq!(distribution.labels, vec!["Pump", "Valve"]);
        assert_eq!(distribution.counts, vec![2, 1]);
    }

    #[test]
    fn distribution_counts_sum_to_item_count() {
        let kinds = ["Valve", "Pump", "Reactor", "Pump", "Valve", "Condenser", "Pump"];
        let items: Vec<_> = kinds.iter().map(|k| item(k, 1.0, 1.0, 1.0)).collect();
        let distribution = TypeDistribution::from_items(&items).unwrap();
        assert_eq!(distribution.total(), items.len());
        assert_eq!(distribution.labels[0], "Valve");
        assert_eq!(distribution.counts[1], 3);
    }

    #[test]
    fn empty_items_have_no_distribution() {
        assert!(TypeDistribution::from_items(&[]).is_none());
    }

    #[test]
    fn slices_carry_share_and_colour() {
        let items = vec![item("Pump", 1.0, 1.0, 1.0), item("Valve", 1.0, 1.0, 1.0)];
        let distribution = TypeDistribution::from_items(&items).unwrap();
        let slices: Vec<_> = distribution.slices().collect();
        assert_eq!(slices[1].caption(), "Valve: 1 (50.0%)");
        assert_eq!(slices[1].swatch, palette::GREEN);
    }
}
