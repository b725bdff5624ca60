use sea_orm::{DbErr, SqlErr};

/// Whether `err` is a unique/primary-key constraint violation reported by the driver.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
