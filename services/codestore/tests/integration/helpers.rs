#![allow(async_fn_in_trait)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use sea_orm_migration::MigratorTrait;

use codestore::domain::repository::CodeGenerator;
use codestore::infra::clock::ManualClock;
use codestore::infra::db::DbExpiringCodeStore;
use codestore::infra::generator::RandomCodeGenerator;
use codestore::infra::memory::InMemoryExpiringCodeStore;
use codestore_domain::id::ZoneId;
use codestore_migration::Migrator;
use codestore_schema::expiring_codes;

// ── Generators ───────────────────────────────────────────────────────────────

/// Always hands out the same code, to force collisions.
#[derive(Clone)]
pub struct FixedCodeGenerator(pub &'static str);

impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> String {
        self.0.to_owned()
    }
}

// ── Store builders ───────────────────────────────────────────────────────────

/// Instant every test clock starts at.
pub fn start() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
}

pub fn test_clock() -> ManualClock {
    ManualClock::at(start())
}

pub fn memory_store<G: CodeGenerator>(
    clock: &ManualClock,
    generator: G,
) -> InMemoryExpiringCodeStore<ManualClock, G> {
    InMemoryExpiringCodeStore::with_parts(clock.clone(), generator)
}

/// Fresh in-memory SQLite database with the real migrations applied.
///
/// A single pooled connection: every SQLite `:memory:` connection is its own database.
pub async fn test_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub async fn db_store<G: CodeGenerator>(
    clock: &ManualClock,
    generator: G,
) -> DbExpiringCodeStore<ManualClock, G> {
    DbExpiringCodeStore::with_parts(test_db().await, clock.clone(), generator)
}

pub fn random() -> RandomCodeGenerator {
    RandomCodeGenerator::default()
}

pub fn zone(id: &str) -> ZoneId {
    ZoneId::new(id).unwrap()
}

pub fn default_zone() -> ZoneId {
    ZoneId::default()
}

pub fn in_a_minute(clock: &ManualClock) -> DateTime<Utc> {
    use codestore::domain::repository::Clock as _;
    clock.now() + Duration::seconds(60)
}

// ── Physical record count ────────────────────────────────────────────────────

/// Number of physically stored records, expired or not.
pub trait CountCodes {
    async fn count_codes(&self) -> u64;
}

impl<C, G> CountCodes for InMemoryExpiringCodeStore<C, G> {
    async fn count_codes(&self) -> u64 {
        self.len() as u64
    }
}

impl<C, G> CountCodes for DbExpiringCodeStore<C, G> {
    async fn count_codes(&self) -> u64 {
        expiring_codes::Entity::find()
            .count(&self.db)
            .await
            .unwrap()
    }
}
