use std::cmp::Ordering;

use proptest::prelude::*;
use sv_core::{LabelKey, SortDirection};
use sv_grouping::{Dimension, GroupOrder, GroupingEngine, Record};

fn record_strategy() -> impl Strategy<Value = (String, String)> {
    let category = prop_oneof![
        (0u8..8).prop_map(|v| v.to_string()),
        (0u8..8).prop_map(|v| format!("{v}.0 m")),
        Just("surface".to_string()),
    ];
    let phenomenon = prop_oneof![
        Just("air".to_string()),
        Just("salinity".to_string()),
        Just("temperature".to_string()),
        Just("wind".to_string()),
    ];
    (category, phenomenon)
}

fn build(order: GroupOrder, specs: &[(String, String)]) -> GroupingEngine {
    let mut engine = GroupingEngine::new(order);
    for (i, (category, phenomenon)) in specs.iter().enumerate() {
        engine
            .insert(Record::new(format!("ts{i}"), category.as_str(), phenomenon.as_str()))
            .unwrap();
    }
    engine
}

/// Group labels with each group's members reduced to their secondary labels.
fn shape(engine: &GroupingEngine, dimension: Dimension) -> Vec<(f64, Vec<String>)> {
    engine
        .groups(dimension)
        .iter()
        .map(|group| {
            let value = group.sort_key().as_number().unwrap_or(f64::NAN);
            let members = group
                .members()
                .iter()
                .map(|&k| {
                    engine
                        .record(k)
                        .unwrap()
                        .label(dimension.secondary())
                        .to_string()
                })
                .collect();
            (value, members)
        })
        .collect()
}

proptest! {
    #[test]
    fn sorted_groups_follow_direction(
        specs in prop::collection::vec(record_strategy(), 0..40),
        ascending in any::<bool>(),
    ) {
        let direction = SortDirection::from_ascending(ascending);
        let engine = build(GroupOrder::Sorted(direction), &specs);
        let groups: Vec<_> = engine.groups(Dimension::Category).iter().collect();

        for pair in groups.windows(2) {
            let ord = pair[0].sort_key().rank(pair[1].sort_key(), direction);
            prop_assert_eq!(ord, Ordering::Less);

            if let (Some(a), Some(b)) = (pair[0].sort_key().as_number(), pair[1].sort_key().as_number()) {
                if ascending {
                    prop_assert!(a <= b);
                } else {
                    prop_assert!(a >= b);
                }
            }
        }
    }

    #[test]
    fn sorted_members_ascend_by_secondary_label(
        specs in prop::collection::vec(record_strategy(), 0..40),
        ascending in any::<bool>(),
    ) {
        let direction = SortDirection::from_ascending(ascending);
        let engine = build(GroupOrder::Sorted(direction), &specs);

        for dimension in Dimension::ALL {
            for (_, members) in shape(&engine, dimension) {
                for pair in members.windows(2) {
                    prop_assert!(pair[0] <= pair[1]);
                }
            }
        }
    }

    #[test]
    fn sorted_shape_ignores_arrival_order(
        specs in prop::collection::vec(record_strategy(), 0..30),
        ascending in any::<bool>(),
    ) {
        let direction = SortDirection::from_ascending(ascending);
        let forward = build(GroupOrder::Sorted(direction), &specs);
        let reversed_specs: Vec<_> = specs.iter().rev().cloned().collect();
        let reversed = build(GroupOrder::Sorted(direction), &reversed_specs);

        for dimension in Dimension::ALL {
            let a = shape(&forward, dimension);
            let b = shape(&reversed, dimension);
            prop_assert_eq!(a.len(), b.len());
            for ((va, ma), (vb, mb)) in a.iter().zip(b.iter()) {
                prop_assert!(va == vb || (va.is_nan() && vb.is_nan()));
                prop_assert_eq!(ma, mb);
            }
        }
    }

    #[test]
    fn equal_values_never_split(
        specs in prop::collection::vec(record_strategy(), 0..40),
        ascending in any::<bool>(),
    ) {
        let direction = SortDirection::from_ascending(ascending);
        let engine = build(GroupOrder::Sorted(direction), &specs);
        let keys: Vec<LabelKey> = engine
            .groups(Dimension::Category)
            .iter()
            .map(|g| g.sort_key().clone())
            .collect();

        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                prop_assert_ne!(a.rank(b, direction), Ordering::Equal);
            }
        }
    }

    #[test]
    fn first_seen_groups_by_exact_label(specs in prop::collection::vec(record_strategy(), 0..40)) {
        let engine = build(GroupOrder::FirstSeen, &specs);
        let total: usize = engine.groups(Dimension::Category).iter().map(|g| g.len()).sum();
        prop_assert_eq!(total, specs.len());

        for (key, record) in engine.records() {
            let group = engine.group_of(key, Dimension::Category).unwrap();
            prop_assert_eq!(group.label(), record.category.label.as_str());
            prop_assert!(group.contains(key));
        }
    }
}
