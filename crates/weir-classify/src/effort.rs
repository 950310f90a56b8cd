//! Weighted effort estimation.
//!
//! A coarse planning signal, not the classification contract: type gives a
//! base load, priority and domain scale it. Distinct from the suggested
//! cognitive-load score, which is fixed per domain.

use weir_core::model::item::{ItemType, Priority, WorkItem};
use weir_core::model::taxonomy::CynefinDomain;

const fn base_load(item_type: ItemType) -> u32 {
    match item_type {
        ItemType::Task => 5,
        ItemType::Bug => 8,
        ItemType::Chore => 13,
        ItemType::Feature => 20,
        ItemType::Epic => 40,
        ItemType::Goal => 50,
    }
}

const fn priority_factor(priority: Priority) -> f64 {
    match priority {
        Priority::Low => 0.8,
        Priority::Medium => 1.0,
        Priority::High => 1.5,
        Priority::Critical => 2.0,
    }
}

const fn domain_factor(domain: CynefinDomain) -> f64 {
    match domain {
        CynefinDomain::Obvious => 1.0,
        CynefinDomain::Complicated => 1.5,
        CynefinDomain::Disorder => 1.75,
        CynefinDomain::Complex => 2.0,
        CynefinDomain::Chaotic => 3.0,
    }
}

/// Weighted load of one item.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn weighted_load(item: &WorkItem) -> u32 {
    let weighted = f64::from(base_load(item.item_type))
        * priority_factor(item.priority)
        * domain_factor(item.domain);
    weighted.round() as u32
}

/// Sum of weighted loads over a set of items.
pub fn total_load<'a>(items: impl IntoIterator<Item = &'a WorkItem>) -> u32 {
    items.into_iter().map(weighted_load).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use weir_core::model::item::ItemId;

    fn item(item_type: ItemType, priority: Priority, domain: CynefinDomain) -> WorkItem {
        WorkItem {
            id: ItemId::new_unchecked("wk-effort"),
            item_type,
            priority,
            domain,
            ..WorkItem::default()
        }
    }

    #[test]
    fn baseline_task_is_its_base_load() {
        let it = item(ItemType::Task, Priority::Medium, CynefinDomain::Obvious);
        assert_eq!(weighted_load(&it), 5);
    }

    #[test]
    fn priority_scales_load() {
        let low = item(ItemType::Bug, Priority::Low, CynefinDomain::Obvious);
        let critical = item(ItemType::Bug, Priority::Critical, CynefinDomain::Obvious);
        assert_eq!(weighted_load(&low), 6); // 8 * 0.8
        assert_eq!(weighted_load(&critical), 16); // 8 * 2.0
    }

    #[test]
    fn domain_scales_load() {
        let obvious = item(ItemType::Feature, Priority::Medium, CynefinDomain::Obvious);
        let chaotic = item(ItemType::Feature, Priority::Medium, CynefinDomain::Chaotic);
        assert_eq!(weighted_load(&obvious), 20);
        assert_eq!(weighted_load(&chaotic), 60);
    }

    #[test]
    fn load_is_monotonic_in_type_base() {
        let types = [
            ItemType::Task,
            ItemType::Bug,
            ItemType::Chore,
            ItemType::Feature,
            ItemType::Epic,
            ItemType::Goal,
        ];
        let loads: Vec<u32> = types
            .iter()
            .map(|t| weighted_load(&item(*t, Priority::Medium, CynefinDomain::Obvious)))
            .collect();
        assert!(loads.windows(2).all(|w| w[0] < w[1]), "{loads:?}");
    }

    #[test]
    fn total_load_sums() {
        let items = [
            item(ItemType::Task, Priority::Medium, CynefinDomain::Obvious),
            item(ItemType::Bug, Priority::Critical, CynefinDomain::Obvious),
        ];
        assert_eq!(total_load(&items), 5 + 16);
    }
}
