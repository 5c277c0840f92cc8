//! Shared fixtures for the pickle test suite
//!
//! `ObjectDb` is a persisted record whose outward facade is a `Typeclass`
//! wrapping it, the shape game code normally hands to the pickler.

#![allow(dead_code)]

use refpack::{
    Entity, EntityHandle, EntityId, MemoryDirectory, MemoryModel, MemoryRecord, PickleConfig,
    Pickler, TypeKey, TypeKeyDirectory,
};
use std::any::Any;
use std::sync::{Arc, Once};

// ============================================================================
// Initialization
// ============================================================================

static INIT_TRACING: Once = Once::new();

/// Route tracing output through the test harness
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
            .try_init();
    });
}

pub fn key(s: &str) -> TypeKey {
    TypeKey::new(s).unwrap()
}

// ============================================================================
// Entities
// ============================================================================

/// Persisted object record
#[derive(Debug, Clone)]
pub struct ObjectDb {
    pub id: EntityId,
    pub key: String,
}

impl Entity for ObjectDb {
    fn id(&self) -> EntityId {
        self.id
    }

    fn model(&self) -> &str {
        "objectdb"
    }

    fn facade(&self) -> Option<EntityHandle> {
        Some(Arc::new(Typeclass {
            db: Arc::new(self.clone()),
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Game-logic wrapper around an `ObjectDb`
#[derive(Debug)]
pub struct Typeclass {
    pub db: Arc<ObjectDb>,
}

impl Typeclass {
    pub fn key(&self) -> &str {
        &self.db.key
    }
}

impl Entity for Typeclass {
    fn id(&self) -> EntityId {
        self.db.id
    }

    fn model(&self) -> &str {
        "typeclass"
    }

    fn record(&self) -> Option<EntityHandle> {
        Some(Arc::clone(&self.db) as EntityHandle)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// TestWorld - directory service with objects and players
// ============================================================================

pub struct TestWorld {
    pub service: Arc<MemoryDirectory>,
    pub objects: Arc<MemoryModel>,
    pub players: Arc<MemoryModel>,
    pub directory: Arc<TypeKeyDirectory>,
}

impl TestWorld {
    pub fn new() -> Self {
        init_tracing();
        let service = Arc::new(MemoryDirectory::new());
        let objects = service.register(MemoryModel::new("objectdb", key("objects.objectdb")));
        let players = service.register(MemoryModel::new("playerdb", key("players.playerdb")));
        let directory = Arc::new(TypeKeyDirectory::new(service.clone()));
        Self {
            service,
            objects,
            players,
            directory,
        }
    }

    pub fn pickler(&self) -> Pickler {
        Pickler::new(Arc::clone(&self.directory))
    }

    pub fn pickler_with(&self, config: PickleConfig) -> Pickler {
        Pickler::with_config(Arc::clone(&self.directory), config)
    }

    /// Store a new object and return its typeclass facade
    pub fn spawn_object(&self, key: &str) -> EntityHandle {
        let db = ObjectDb {
            id: self.objects.allocate_id(),
            key: key.to_string(),
        };
        let facade = db.facade().unwrap();
        self.objects.insert(Arc::new(db)).unwrap();
        facade
    }

    /// Store a new player record (no facade)
    pub fn spawn_player(&self, name: &str) -> EntityHandle {
        let id = self.players.allocate_id();
        let record: EntityHandle = Arc::new(MemoryRecord::new(id, "playerdb", name));
        self.players.insert(Arc::clone(&record)).unwrap();
        record
    }

    /// Entity whose model the directory does not know
    pub fn stray(&self, id: u64) -> EntityHandle {
        Arc::new(MemoryRecord::new(EntityId::new(id), "helpentry", "stray"))
    }
}
