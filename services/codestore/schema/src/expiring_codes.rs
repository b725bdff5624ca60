use sea_orm::entity::prelude::*;

/// One-time code issued for a zone. Deleted when consumed, invalidated by
/// intent, or swept after `expires_at` (epoch millis) has passed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "expiring_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub zone_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub expires_at: i64,
    #[sea_orm(column_type = "Text")]
    pub data: String,
    pub intent: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
