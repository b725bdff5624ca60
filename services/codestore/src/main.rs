use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use tracing::info;

use codestore::config::CodeStoreConfig;
use codestore::infra::db::DbExpiringCodeStore;
use codestore::infra::generator::RandomCodeGenerator;
use codestore::usecase::cleanup::CleanupScheduler;
use codestore_core::config::Config;
use codestore_core::tracing::init_tracing;
use codestore_migration::Migrator;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = CodeStoreConfig::from_env().expect("failed to load config from environment");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .expect("failed to run migrations");
    }

    if !config.cleanup_enabled {
        info!("expired code cleanup disabled, nothing to run");
        return;
    }

    let store =
        DbExpiringCodeStore::new(db).with_generator(RandomCodeGenerator::new(config.code_length));
    let scheduler = CleanupScheduler {
        cleaner: store,
        interval: config.cleanup_interval(),
    };

    scheduler.run(shutdown_signal()).await;
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
