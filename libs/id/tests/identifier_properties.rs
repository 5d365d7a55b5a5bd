//! Cross-module properties of the identifier subsystem: encoding
//! round-trips, ordering laws, concurrent generation, and path assembly.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use proptest::prelude::*;

use arkiv_id::{
    path, Identifier, IdentifierFactory, NodeIdentity, DOMAIN_ID_MAX, PLATFORM_ID_MAX,
    PROCESS_ID_MAX,
};

fn test_factory(domain: u32) -> IdentifierFactory {
    let node = NodeIdentity::from_parts([0x08, 0x00, 0x27, 0xa3], 1234);
    IdentifierFactory::with_node(domain, &node).expect("valid domain")
}

proptest! {
    #[test]
    fn prop_raw_bytes_roundtrip_direct_encodings(bytes in proptest::array::uniform22(any::<u8>())) {
        let id = Identifier::from_bytes(&bytes).unwrap();
        prop_assert_eq!(Identifier::parse(&id.to_hex()).unwrap(), id);
        prop_assert_eq!(Identifier::parse(&id.to_base32()).unwrap(), id);
        prop_assert_eq!(Identifier::parse(&id.to_base64()).unwrap(), id);
    }

    #[test]
    fn prop_generated_roundtrip_all_forms(
        object_type in any::<u8>(),
        domain in 0..=DOMAIN_ID_MAX,
        platform in 0..=PLATFORM_ID_MAX,
        process in 0..=PROCESS_ID_MAX,
        worm in any::<bool>(),
    ) {
        let id = Identifier::generate(object_type, domain, platform, process, worm).unwrap();
        prop_assert_eq!(id.object_type_code(), object_type);
        prop_assert_eq!(id.domain_id(), domain);
        prop_assert_eq!(id.platform_id(), platform);
        prop_assert_eq!(id.process_id(), process);
        prop_assert_eq!(id.is_worm(), worm);

        prop_assert_eq!(Identifier::parse(&id.to_hex()).unwrap(), id);
        prop_assert_eq!(Identifier::parse(&id.to_base32()).unwrap(), id);
        prop_assert_eq!(Identifier::parse(&id.to_base64()).unwrap(), id);
        prop_assert_eq!(Identifier::parse(&id.to_ark()).unwrap(), id);
    }

    #[test]
    fn prop_ordering_is_strict_total_order(
        a in proptest::array::uniform22(any::<u8>()),
        b in proptest::array::uniform22(any::<u8>()),
        c in proptest::array::uniform22(any::<u8>()),
    ) {
        let a = Identifier::from_bytes(&a).unwrap();
        let b = Identifier::from_bytes(&b).unwrap();
        let c = Identifier::from_bytes(&c).unwrap();

        // Consistency with equality.
        prop_assert_eq!(a.cmp(&b) == std::cmp::Ordering::Equal, a == b);

        // Antisymmetry.
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());

        // Transitivity.
        if a <= b && b <= c {
            prop_assert!(a <= c);
        }
    }

    #[test]
    fn prop_child_preserves_scope(
        object_type in any::<u8>(),
        domain in 0..=DOMAIN_ID_MAX,
        platform in 0..=PLATFORM_ID_MAX,
        worm in any::<bool>(),
    ) {
        let factory = test_factory(0);
        let parent = factory.new_identifier_with(object_type, domain, platform, worm).unwrap();
        let child = factory.new_child_identifier(&parent).unwrap();
        prop_assert_eq!(child.domain_id(), parent.domain_id());
        prop_assert_eq!(child.platform_id(), parent.platform_id());
        prop_assert_eq!(child.is_worm(), parent.is_worm());
        prop_assert_eq!(child.object_type_code(), arkiv_id::child_type_of(parent.object_type_code()));
    }

    #[test]
    fn prop_path_roundtrip(length in 1usize..8) {
        let factory = test_factory(2);
        let ids: Vec<Identifier> = (0..length)
            .map(|_| factory.new_unit().unwrap())
            .collect();

        let text = path::join(&ids);
        prop_assert_eq!(path::split(&text).unwrap(), ids.clone());
        prop_assert_eq!(path::count(&text).unwrap(), ids.len());
        prop_assert_eq!(path::first(&text).unwrap(), ids[0]);
        prop_assert_eq!(path::last(&text).unwrap(), ids[ids.len() - 1]);

        let delimited = path::join_with_separator(&ids, '/');
        prop_assert_eq!(path::split_with_separator(&delimited, '/').unwrap(), ids);
    }
}

#[test]
fn concurrent_generation_yields_distinct_ticks() {
    let factory = Arc::new(test_factory(1));
    let mut handles = Vec::new();
    for _ in 0..8 {
        let factory = Arc::clone(&factory);
        handles.push(thread::spawn(move || {
            (0..500)
                .map(|_| factory.new_operation().expect("generation"))
                .collect::<Vec<_>>()
        }));
    }

    let mut ticks = HashSet::new();
    let mut total = 0usize;
    for handle in handles {
        for id in handle.join().expect("thread") {
            ticks.insert((id.timestamp_millis(), id.counter()));
            total += 1;
        }
    }
    // Every generation consumed a distinct (timestamp, counter) tick, so
    // all 4000 identifiers are unique even within one millisecond.
    assert_eq!(ticks.len(), total);
}

#[test]
fn sorting_generated_identifiers_follows_generation_order() {
    let factory = test_factory(4);
    let ids: Vec<Identifier> = (0..256)
        .map(|_| factory.new_manifest().expect("generation"))
        .collect();
    let mut sorted = ids.clone();
    sorted.sort();
    // Same domain and type throughout, so (timestamp, counter) decides
    // and generation order is already sorted order.
    assert_eq!(sorted, ids);
}
