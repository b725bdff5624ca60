use anyhow::{Context as _, anyhow};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use tracing::debug;

use codestore_core::sea_ext::is_unique_violation;
use codestore_domain::id::ZoneId;
use codestore_schema::expiring_codes;

use crate::domain::repository::{Clock, CodeGenerator, ExpiredCodeCleanup, ExpiringCodeStore};
use crate::domain::types::{ExpiringCode, PendingCode, require_code};
use crate::error::CodeStoreError;
use crate::infra::clock::SystemClock;
use crate::infra::generator::RandomCodeGenerator;

// ── ExpiringCode store ────────────────────────────────────────────────────────

/// Store backed by the `expiring_codes` table.
///
/// `(zone_id, code)` is the primary key, so `generate` is one constrained
/// insert and `retrieve` is one `DELETE … RETURNING`: of any number of
/// concurrent consumers (or a concurrent sweep) exactly one removes the row.
#[derive(Clone)]
pub struct DbExpiringCodeStore<C = SystemClock, G = RandomCodeGenerator> {
    pub db: DatabaseConnection,
    clock: C,
    generator: G,
}

impl DbExpiringCodeStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_parts(db, SystemClock, RandomCodeGenerator::default())
    }
}

impl<C, G> DbExpiringCodeStore<C, G> {
    pub fn with_parts(db: DatabaseConnection, clock: C, generator: G) -> Self {
        Self {
            db,
            clock,
            generator,
        }
    }

    pub fn with_clock<C2: Clock>(self, clock: C2) -> DbExpiringCodeStore<C2, G> {
        DbExpiringCodeStore {
            db: self.db,
            clock,
            generator: self.generator,
        }
    }

    pub fn with_generator<G2: CodeGenerator>(self, generator: G2) -> DbExpiringCodeStore<C, G2> {
        DbExpiringCodeStore {
            db: self.db,
            clock: self.clock,
            generator,
        }
    }
}

impl<C: Clock, G: CodeGenerator> ExpiringCodeStore for DbExpiringCodeStore<C, G> {
    async fn generate(
        &self,
        data: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
        intent: Option<&str>,
        zone_id: &ZoneId,
    ) -> Result<ExpiringCode, CodeStoreError> {
        let pending = PendingCode::validate(data, expires_at, intent, zone_id, self.clock.now())?;
        let code = pending.with_code(self.generator.generate());

        let inserted = expiring_codes::Entity::insert(expiring_codes::ActiveModel {
            zone_id: Set(code.zone_id.as_str().to_owned()),
            code: Set(code.code.clone()),
            expires_at: Set(code.expires_at.timestamp_millis()),
            data: Set(code.data.clone()),
            intent: Set(code.intent.clone()),
        })
        .exec_without_returning(&self.db)
        .await;

        match inserted {
            Ok(_) => {
                debug!(zone_id = %zone_id, intent = ?code.intent, "expiring code generated");
                Ok(code)
            }
            // Includes an expired row the sweep has not reached yet.
            Err(e) if is_unique_violation(&e) => Err(CodeStoreError::Conflict),
            Err(e) => Err(anyhow::Error::new(e).context("insert expiring code").into()),
        }
    }

    async fn retrieve(
        &self,
        code: Option<&str>,
        zone_id: &ZoneId,
    ) -> Result<Option<ExpiringCode>, CodeStoreError> {
        let code = require_code(code)?;

        // Single DELETE ... RETURNING: the read and the delete cannot be split.
        let stmt = {
            let delete = Query::delete()
                .from_table(expiring_codes::Entity)
                .and_where(expiring_codes::Column::ZoneId.eq(zone_id.as_str()))
                .and_where(expiring_codes::Column::Code.eq(code))
                .returning_all()
                .to_owned();
            self.db.get_database_backend().build(&delete)
        };

        let Some(model) = expiring_codes::Entity::find()
            .from_raw_sql(stmt)
            .one(&self.db)
            .await
            .context("consume expiring code")?
        else {
            return Ok(None);
        };

        let record = code_from_model(model)?;
        if record.is_expired_at(self.clock.now()) {
            debug!(zone_id = %zone_id, "expired code discarded on read");
            return Ok(None);
        }
        debug!(zone_id = %zone_id, intent = ?record.intent, "expiring code consumed");
        Ok(Some(record))
    }

    async fn expire_by_intent(
        &self,
        intent: &str,
        zone_id: &ZoneId,
    ) -> Result<u64, CodeStoreError> {
        let result = expiring_codes::Entity::delete_many()
            .filter(expiring_codes::Column::ZoneId.eq(zone_id.as_str()))
            .filter(expiring_codes::Column::Intent.eq(intent))
            .exec(&self.db)
            .await
            .context("expire codes by intent")?;
        debug!(
            zone_id = %zone_id,
            intent,
            removed = result.rows_affected,
            "codes expired by intent"
        );
        Ok(result.rows_affected)
    }
}

impl<C: Clock, G: CodeGenerator> ExpiredCodeCleanup for DbExpiringCodeStore<C, G> {
    async fn clean_expired(&self) -> Result<u64, CodeStoreError> {
        let now = self.clock.now().timestamp_millis();
        let result = expiring_codes::Entity::delete_many()
            .filter(expiring_codes::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .context("delete expired codes")?;
        Ok(result.rows_affected)
    }
}

fn code_from_model(model: expiring_codes::Model) -> anyhow::Result<ExpiringCode> {
    let expires_at = DateTime::from_timestamp_millis(model.expires_at)
        .ok_or_else(|| anyhow!("expires_at out of range: {}", model.expires_at))?;
    let zone_id = ZoneId::new(model.zone_id).context("stored zone id")?;
    Ok(ExpiringCode {
        code: model.code,
        expires_at,
        data: model.data,
        intent: model.intent,
        zone_id,
    })
}
