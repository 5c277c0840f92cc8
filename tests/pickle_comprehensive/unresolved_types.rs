//! Unresolved Types
//!
//! Entities whose model has no type key are left in place or rejected,
//! depending on the configured policy.

use crate::common::*;
use refpack::{Error, Format, PickleConfig, UnresolvedPolicy, Value};
use std::sync::Arc;

#[test]
fn pass_through_leaves_entity_in_place() {
    let world = TestWorld::new();
    let stray = world.stray(9);
    let pickler = world.pickler();
    assert_eq!(pickler.config().on_unresolved, UnresolvedPolicy::PassThrough);

    let original = Value::list([Value::Entity(stray.clone()), Value::Int(1)]);
    let encoded = pickler.encoder().encode(&original).unwrap();
    assert_eq!(encoded, original);
    assert!(Arc::ptr_eq(encoded.as_list().unwrap()[0].as_entity().unwrap(), &stray));

    // Decoding an unserialized pickle leaves it alone as well
    let decoded = pickler.decoder().decode(encoded).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn pass_through_packs_known_neighbours() {
    let world = TestWorld::new();
    let stray = world.stray(9);
    let sword = world.spawn_object("sword");
    let pickler = world.pickler();

    let original = Value::tuple([Value::Entity(stray), Value::Entity(sword)]);
    let encoded = pickler.encoder().encode(&original).unwrap();
    let items = encoded.as_tuple().unwrap();
    assert!(items[0].as_entity().is_some());
    assert!(items[1].as_packed().is_some());
}

#[test]
fn pass_through_entity_cannot_become_bytes() {
    let world = TestWorld::new();
    let pickler = world.pickler();

    for format in [Format::MessagePack, Format::Bincode] {
        let pickler = world.pickler_with(PickleConfig {
            format,
            ..PickleConfig::default()
        });
        let err = pickler
            .dumps(&Value::map([("ghost", Value::Entity(world.stray(1)))]))
            .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)), "{format}: {err}");
    }

    // Unserialized pickles are fine
    let packed = pickler
        .to_pickle(&Value::Entity(world.stray(1)), false, true)
        .unwrap();
    assert!(packed.as_value().unwrap().as_entity().is_some());
}

#[test]
fn error_policy_rejects_unresolved_entity() {
    let world = TestWorld::new();
    let pickler = world.pickler_with(PickleConfig {
        on_unresolved: UnresolvedPolicy::Error,
        ..PickleConfig::default()
    });

    let deep = Value::map([(
        "inventory",
        Value::list([Value::tuple([Value::Entity(world.stray(4))])]),
    )]);
    let err = pickler.to_pickle(&deep, false, true).unwrap_err();
    match err {
        Error::UnresolvedTypeKey { model, id } => {
            assert_eq!(model, "helpentry");
            assert_eq!(id.as_u64(), 4);
        }
        other => panic!("Expected UnresolvedTypeKey, got {:?}", other),
    }
}

#[test]
fn error_policy_accepts_known_entities() {
    let world = TestWorld::new();
    let sword = world.spawn_object("sword");
    let pickler = world.pickler_with(PickleConfig {
        on_unresolved: UnresolvedPolicy::Error,
        ..PickleConfig::default()
    });

    let original = Value::list([Value::Entity(sword)]);
    let restored = pickler.loads(&pickler.dumps(&original).unwrap()).unwrap();
    assert_eq!(restored, original);
}
