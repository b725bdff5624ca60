use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::debug;

use codestore_domain::id::ZoneId;

use crate::domain::repository::{Clock, CodeGenerator, ExpiringCodeStore};
use crate::domain::types::{ExpiringCode, PendingCode, require_code};
use crate::error::CodeStoreError;
use crate::infra::clock::SystemClock;
use crate::infra::generator::RandomCodeGenerator;

type CodeKey = (ZoneId, String);

/// Process-local store. Every read-modify-write runs under one mutex, so
/// check-expiry-then-delete is a single step. Nothing sweeps in the
/// background: an expired record stays resident until its key is touched.
pub struct InMemoryExpiringCodeStore<C = SystemClock, G = RandomCodeGenerator> {
    store: Mutex<HashMap<CodeKey, ExpiringCode>>,
    clock: C,
    generator: G,
}

impl InMemoryExpiringCodeStore {
    pub fn new() -> Self {
        Self::with_parts(SystemClock, RandomCodeGenerator::default())
    }
}

impl Default for InMemoryExpiringCodeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, G> InMemoryExpiringCodeStore<C, G> {
    pub fn with_parts(clock: C, generator: G) -> Self {
        Self {
            store: Mutex::new(HashMap::new()),
            clock,
            generator,
        }
    }

    pub fn with_clock<C2: Clock>(self, clock: C2) -> InMemoryExpiringCodeStore<C2, G> {
        InMemoryExpiringCodeStore {
            store: self.store,
            clock,
            generator: self.generator,
        }
    }

    pub fn with_generator<G2: CodeGenerator>(
        self,
        generator: G2,
    ) -> InMemoryExpiringCodeStore<C, G2> {
        InMemoryExpiringCodeStore {
            store: self.store,
            clock: self.clock,
            generator,
        }
    }

    /// Number of physically stored records, including expired ones not yet touched.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // No operation panics while holding the guard, so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<CodeKey, ExpiringCode>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock, G: CodeGenerator> InMemoryExpiringCodeStore<C, G> {
    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl<C: Clock, G: CodeGenerator> ExpiringCodeStore for InMemoryExpiringCodeStore<C, G> {
    async fn generate(
        &self,
        data: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
        intent: Option<&str>,
        zone_id: &ZoneId,
    ) -> Result<ExpiringCode, CodeStoreError> {
        let now = self.now();
        let pending = PendingCode::validate(data, expires_at, intent, zone_id, now)?;
        let code = pending.with_code(self.generator.generate());

        let mut store = self.lock();
        match store.entry((zone_id.clone(), code.code.clone())) {
            Entry::Occupied(existing) if !existing.get().is_expired_at(now) => {
                return Err(CodeStoreError::Conflict);
            }
            // An expired record under the same key is logically absent; replace it.
            Entry::Occupied(mut expired) => {
                expired.insert(code.clone());
            }
            Entry::Vacant(slot) => {
                slot.insert(code.clone());
            }
        }
        drop(store);

        debug!(zone_id = %zone_id, intent = ?code.intent, "expiring code generated");
        Ok(code)
    }

    async fn retrieve(
        &self,
        code: Option<&str>,
        zone_id: &ZoneId,
    ) -> Result<Option<ExpiringCode>, CodeStoreError> {
        let code = require_code(code)?;
        let now = self.now();

        let removed = self.lock().remove(&(zone_id.clone(), code.to_owned()));
        match removed {
            Some(record) if record.is_expired_at(now) => {
                debug!(zone_id = %zone_id, "expired code discarded on read");
                Ok(None)
            }
            Some(record) => {
                debug!(zone_id = %zone_id, intent = ?record.intent, "expiring code consumed");
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn expire_by_intent(
        &self,
        intent: &str,
        zone_id: &ZoneId,
    ) -> Result<u64, CodeStoreError> {
        let mut store = self.lock();
        let before = store.len();
        store.retain(|(zone, _), record| {
            zone != zone_id || record.intent.as_deref() != Some(intent)
        });
        let removed = (before - store.len()) as u64;
        drop(store);

        debug!(zone_id = %zone_id, intent, removed, "codes expired by intent");
        Ok(removed)
    }
}
