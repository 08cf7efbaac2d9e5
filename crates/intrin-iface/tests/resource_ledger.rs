use std::collections::BTreeMap;
use std::sync::Arc;

use intrin_core::codes;
use intrin_iface::{
    Artifact, FnProducer, Interface, NullBackend, RegisterOptions, ResourceLedger, ResourceSeed,
};
use serde_json::{json, Value};

fn unit() -> (Artifact, Artifact) {
    (Artifact::new(()), Artifact::new(()))
}

#[test]
fn bulk_seeding_drops_malformed_entries() {
    let mut ledger = ResourceLedger::new();
    let kept = ledger.set_capacities_from_mapping([
        (json!("A"), json!(5)),
        (json!("B"), json!("x")),
        (json!(7), json!(2)),
    ]);
    assert_eq!(kept, 1);
    let expected: BTreeMap<String, u64> = [("A".to_string(), 5)].into_iter().collect();
    assert_eq!(ledger.capacities(), &expected);
}

#[test]
fn negative_and_fractional_counts_are_dropped() {
    let mut ledger = ResourceLedger::new();
    let kept = ledger.set_capacities_from_mapping([
        (json!("neg"), json!(-1)),
        (json!("frac"), json!(1.5)),
        (json!("ok"), json!(0)),
    ]);
    assert_eq!(kept, 1);
    assert_eq!(ledger.capacity("ok"), Some(0));
    assert_eq!(ledger.capacity("neg"), None);
}

#[test]
fn interface_accepts_mapping_and_pair_seeds() {
    let mapping = ResourceSeed::from_value(&json!({"resource_A": 5, "resource_B": 1}))
        .expect("mapping seed");
    let iface = Interface::with_resources("TestInterface", &mapping, Arc::new(NullBackend));
    assert_eq!(iface.capacity("resource_A"), Some(5));
    assert_eq!(iface.capacity("resource_B"), Some(1));

    let pairs = ResourceSeed::from_value(&json!([["resource_A", 3], ["bad", "x"]]))
        .expect("pair seed");
    let iface = Interface::with_resources("TestInterface", &pairs, Arc::new(NullBackend));
    assert_eq!(iface.capacities().len(), 1);
    assert_eq!(iface.capacity("resource_A"), Some(3));
}

#[test]
fn later_entries_overwrite_earlier_ones() {
    let seed = ResourceSeed::from_pairs([("resource_A", 1), ("resource_A", 4)]);
    let iface = Interface::with_resources("TestInterface", &seed, Arc::new(NullBackend));
    assert_eq!(iface.capacity("resource_A"), Some(4));
    iface.set_capacity("resource_A", 9);
    assert_eq!(iface.capacity("resource_A"), Some(9));
}

#[test]
fn non_collection_seed_is_malformed() {
    for bad in [json!(5), json!("resource_A"), Value::Null, json!([1, 2])] {
        let err = ResourceSeed::from_value(&bad).expect_err("malformed seed");
        assert!(err.is(codes::MALFORMED_RESOURCE_SHAPE), "{bad}");
    }
}

#[test]
fn consumption_accumulates_without_enforcement() {
    let seed = ResourceSeed::from_map([("resource_A", 2)]);
    let iface = Interface::with_resources("TestInterface", &seed, Arc::new(NullBackend));
    let heavy = FnProducer::new("heavy", unit)
        .consumes("resource_A", 2)
        .consumes("resource_A", 1)
        .consumes_one("resource_B");
    let decl = iface
        .register(&heavy, RegisterOptions::new())
        .expect("over-capacity registration still succeeds");
    assert_eq!(decl.consumes().len(), 3);
    assert_eq!(decl.consumed("resource_A"), 3);

    let usage = iface.resource_usage();
    assert_eq!(usage.len(), 2);
    assert_eq!(usage[0].name, "resource_A");
    assert_eq!(usage[0].capacity, Some(2));
    assert_eq!(usage[0].consumed, 3);
    assert!(usage[0].over_capacity);
    assert_eq!(usage[1].name, "resource_B");
    assert_eq!(usage[1].capacity, None);
    assert_eq!(iface.capacity("resource_A"), Some(2));
}
