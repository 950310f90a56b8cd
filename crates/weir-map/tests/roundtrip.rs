//! Boundary round-trip properties: whatever tooling sends in, projecting the
//! canonical result back out yields the original value or its declared
//! default, never an unmapped value.

use proptest::prelude::*;
use std::str::FromStr;

use weir_map::external::{ExternalItem, ExternalPriority, ExternalState, ExternalType};
use weir_map::mapper::{map_in, map_out};

/// Known vocabulary values mixed with garbage, absent values, and case noise.
fn arb_enum_input(known: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        3 => proptest::sample::select(known).prop_map(|s| Some(s.to_string())),
        1 => proptest::sample::select(known).prop_map(|s| Some(s.to_ascii_uppercase())),
        1 => "[a-z]{1,12}".prop_map(Some),
        1 => Just(None),
    ]
}

const STATE_VOCAB: &[&str] = &["created", "triaged", "ready", "in_progress", "testing", "done"];
const PRIORITY_VOCAB: &[&str] = &["trivial", "low", "medium", "high", "critical"];
const TYPE_VOCAB: &[&str] = &["task", "bug", "feature", "epic"];

proptest! {
    // For every input (known value, shouty case, garbage, or absent) the
    // round trip lands on a declared external value, and on exactly the
    // original (modulo case and the trivial→low collapse) when the input was
    // recognized.
    #[test]
    fn roundtrip_never_produces_unmapped_values(
        status in arb_enum_input(STATE_VOCAB),
        priority in arb_enum_input(PRIORITY_VOCAB),
        item_type in arb_enum_input(TYPE_VOCAB),
    ) {
        let external = ExternalItem {
            id: Some("wk-prop".to_string()),
            status: status.clone(),
            priority: priority.clone(),
            item_type: item_type.clone(),
            ..ExternalItem::default()
        };

        let (item, warnings) = map_in(&external).expect("identity present");
        let (back, _) = map_out(&item);

        // Output always parses back into the external vocabulary.
        let out_status = ExternalState::from_str(back.status.as_deref().unwrap_or(""))
            .expect("status must be a declared external value");
        let out_priority = ExternalPriority::from_str(back.priority.as_deref().unwrap_or(""))
            .expect("priority must be a declared external value");
        let out_type = ExternalType::from_str(back.item_type.as_deref().unwrap_or(""))
            .expect("item_type must be a declared external value");

        // Recognized inputs survive; unrecognized ones land on the default.
        match status.as_deref().map(ExternalState::from_str) {
            Some(Ok(given)) => prop_assert_eq!(out_status, given),
            _ => prop_assert_eq!(out_status, ExternalState::Created),
        }
        match priority.as_deref().map(ExternalPriority::from_str) {
            Some(Ok(ExternalPriority::Trivial)) => {
                prop_assert_eq!(out_priority, ExternalPriority::Low);
            }
            Some(Ok(given)) => prop_assert_eq!(out_priority, given),
            _ => prop_assert_eq!(out_priority, ExternalPriority::Medium),
        }
        match item_type.as_deref().map(ExternalType::from_str) {
            Some(Ok(given)) => prop_assert_eq!(out_type, given),
            _ => prop_assert_eq!(out_type, ExternalType::Task),
        }

        // Every defaulting was reported.
        let unrecognized = [
            status.as_deref().is_none_or(|s| ExternalState::from_str(s).is_err()),
            priority.as_deref().is_none_or(|s| ExternalPriority::from_str(s).is_err()),
            item_type.as_deref().is_none_or(|s| ExternalType::from_str(s).is_err()),
        ]
        .iter()
        .filter(|b| **b)
        .count();
        prop_assert_eq!(warnings.len(), unrecognized);
    }

    // Well-formed items round-trip as the identity on every field without a
    // declared lossy mapping.
    #[test]
    fn wellformed_roundtrip_is_identity(
        id in "wk-[a-z0-9]{4,10}",
        title in ".{0,40}",
        status in proptest::sample::select(STATE_VOCAB),
        priority in proptest::sample::select(&PRIORITY_VOCAB[1..]), // skip trivial
        item_type in proptest::sample::select(TYPE_VOCAB),
        assignee in proptest::option::of("[a-z]{1,10}"),
        reporter in proptest::option::of("[a-z]{1,10}"),
        version in proptest::option::of("[0-9]\\.[0-9]\\.[0-9]"),
    ) {
        let original = ExternalItem {
            id: Some(id),
            title: Some(title),
            description: Some("desc".to_string()),
            status: Some(status.to_string()),
            priority: Some(priority.to_string()),
            item_type: Some(item_type.to_string()),
            assignee,
            reporter,
            version,
            created: Some(chrono::Utc::now()),
            updated: Some(chrono::Utc::now()),
            ..ExternalItem::default()
        };

        let (item, warnings) = map_in(&original).expect("identity present");
        prop_assert!(warnings.is_empty());

        let (back, out_warnings) = map_out(&item);
        prop_assert!(out_warnings.is_empty());

        prop_assert_eq!(back.id, original.id);
        prop_assert_eq!(back.title, original.title);
        prop_assert_eq!(back.description, original.description);
        prop_assert_eq!(back.status, original.status);
        prop_assert_eq!(back.priority, original.priority);
        prop_assert_eq!(back.item_type, original.item_type);
        prop_assert_eq!(back.assignee, original.assignee);
        prop_assert_eq!(back.reporter, original.reporter);
        prop_assert_eq!(back.version, original.version);
        prop_assert_eq!(back.created, original.created);
        prop_assert_eq!(back.updated, original.updated);
    }
}
