//! Reference Invariants
//!
//! Entities survive a pickle round trip as references to the same record,
//! missing ids decode to null and stale references fail loudly.

use crate::common::*;
use refpack::{parse_dbref, Entity, EntityId, Error, PackedRef, Value};
use std::sync::Arc;

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn entity_encodes_to_packed_reference() {
    let world = TestWorld::new();
    let sword = world.spawn_object("sword");

    let encoded = world.pickler().encoder().encode(&Value::Entity(sword.clone())).unwrap();
    assert_eq!(
        encoded,
        Value::Ref(PackedRef::new(key("objects.objectdb"), sword.id()))
    );
}

#[test]
fn entity_round_trips_through_bytes() {
    let world = TestWorld::new();
    let sword = world.spawn_object("sword");
    let pickler = world.pickler();

    let bytes = pickler.dumps(&Value::Entity(sword.clone())).unwrap();
    let restored = pickler.loads(&bytes).unwrap();

    assert_eq!(restored, Value::Entity(sword));
}

#[test]
fn record_without_facade_round_trips_to_same_handle() {
    let world = TestWorld::new();
    let alice = world.spawn_player("alice");
    let pickler = world.pickler();

    let bytes = pickler.dumps(&Value::Entity(alice.clone())).unwrap();
    let restored = pickler.loads(&bytes).unwrap();

    assert!(Arc::ptr_eq(restored.as_entity().unwrap(), &alice));
}

#[test]
fn nested_structure_preserved() {
    let world = TestWorld::new();
    let e = world.spawn_object("lamp");
    let pickler = world.pickler();

    let original = Value::map([(
        "a",
        Value::list([
            Value::Int(1),
            Value::tuple([Value::Entity(e.clone()), Value::from("x")]),
            Value::map([(2, Value::Entity(e.clone()))]),
        ]),
    )]);

    let encoded = pickler.encoder().encode(&original).unwrap();
    let packed = Value::Ref(PackedRef::new(key("objects.objectdb"), e.id()));
    assert_eq!(
        encoded,
        Value::map([(
            "a",
            Value::list([
                Value::Int(1),
                Value::tuple([packed.clone(), Value::from("x")]),
                Value::map([(2, packed)]),
            ]),
        )])
    );
    assert!(!encoded.contains_entities());

    let restored = pickler.loads(&pickler.dumps(&original).unwrap()).unwrap();
    assert_eq!(restored, original);

    // Tuple stays a tuple, list stays a list
    let outer = restored.as_map().unwrap().values().next().unwrap();
    let items = outer.as_list().unwrap();
    assert!(items[1].as_tuple().is_some());
}

#[test]
fn mixed_models_round_trip() {
    let world = TestWorld::new();
    let sword = world.spawn_object("sword");
    let alice = world.spawn_player("alice");
    let pickler = world.pickler();

    let original = Value::map([
        ("owner", Value::Entity(alice)),
        ("item", Value::Entity(sword)),
        ("count", Value::Int(2)),
    ]);
    let restored = pickler.loads(&pickler.dumps(&original).unwrap()).unwrap();
    assert_eq!(restored, original);
}

// ============================================================================
// Proxies and facades
// ============================================================================

#[test]
fn proxy_is_packed_as_its_record() {
    let world = TestWorld::new();
    let sword = world.spawn_object("sword");
    assert_eq!(sword.model(), "typeclass");

    let encoded = world.pickler().encoder().encode(&Value::Entity(sword.clone())).unwrap();
    let packed = encoded.as_packed().unwrap();
    assert_eq!(packed.type_key, key("objects.objectdb"));
    assert_eq!(packed.id, sword.id());
}

#[test]
fn decoded_record_is_unwrapped_to_facade() {
    let world = TestWorld::new();
    let sword = world.spawn_object("sword");
    let pickler = world.pickler();

    let reference = Value::Ref(PackedRef::new(key("objects.objectdb"), sword.id()));
    let decoded = pickler.decoder().decode(reference).unwrap();

    let entity = decoded.as_entity().unwrap();
    let typeclass = entity.as_any().downcast_ref::<Typeclass>().unwrap();
    assert_eq!(typeclass.key(), "sword");
}

// ============================================================================
// Missing and stale references
// ============================================================================

#[test]
fn absent_id_decodes_to_null() {
    let world = TestWorld::new();
    let pickler = world.pickler();

    for type_key in ["objects.objectdb", "players.playerdb", "comms.channeldb"] {
        let reference = Value::Ref(PackedRef::new(key(type_key), EntityId::ABSENT));
        assert_eq!(pickler.decoder().decode(reference).unwrap(), Value::Null);
    }
}

#[test]
fn absent_id_inside_structure() {
    let world = TestWorld::new();
    let pickler = world.pickler();
    let value = Value::list([
        Value::Ref(PackedRef::new(key("objects.objectdb"), EntityId::ABSENT)),
        Value::Int(5),
    ]);
    assert_eq!(
        pickler.decoder().decode(value).unwrap(),
        Value::list([Value::Null, Value::Int(5)])
    );
}

#[test]
fn deleted_entity_fails_with_not_found() {
    let world = TestWorld::new();
    let sword = world.spawn_object("sword");
    let pickler = world.pickler();

    let bytes = pickler
        .dumps(&Value::list([Value::Entity(sword.clone())]))
        .unwrap();
    world.objects.remove(sword.id());

    let err = pickler.loads(&bytes).unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(
        err,
        Error::NotFound { ref key, id } if key.as_str() == "objects.objectdb" && id == sword.id()
    ));
}

#[test]
fn unknown_type_key_fails_decode() {
    let world = TestWorld::new();
    let reference = Value::Ref(PackedRef::new(key("scripts.scriptdb"), EntityId::new(3)));
    let err = world.pickler().decoder().decode(reference).unwrap_err();
    assert!(matches!(err, Error::UnknownTypeKey(_)));
}

// ============================================================================
// Database references
// ============================================================================

#[test]
fn dbref_resolves_through_packed_reference() {
    let world = TestWorld::new();
    let sword = world.spawn_object("sword");

    let id = parse_dbref(&sword.id().to_string(), true).unwrap();
    assert_eq!(id, sword.id());

    let decoded = world
        .pickler()
        .decoder()
        .decode(Value::Ref(PackedRef::new(key("objects.objectdb"), id)))
        .unwrap();
    assert_eq!(decoded, Value::Entity(sword));
}

#[test]
fn dbref_parsing_rules() {
    assert_eq!(parse_dbref("#12", true), Some(EntityId::new(12)));
    assert_eq!(parse_dbref(" #7 ", true), Some(EntityId::new(7)));
    assert_eq!(parse_dbref("12", false), Some(EntityId::new(12)));
    assert_eq!(parse_dbref("12", true), None);
    assert_eq!(parse_dbref("#0", true), None);
    assert_eq!(parse_dbref("#-4", false), None);
    assert_eq!(parse_dbref("#sword", true), None);
    assert_eq!(parse_dbref("", false), None);
}
