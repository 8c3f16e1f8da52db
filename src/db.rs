use crate::config::AppConfig;
use crate::errors::ServiceError;
use metrics::{counter, gauge, histogram};
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DbErr, EntityTrait, QuerySelect,
};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::{debug, error, info};

/// Type alias for a database connection pool
pub type DbPool = DatabaseConnection;

/// Configuration for database connection
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections
    pub max_connections: u32,
    /// Minimum number of connections
    pub min_connections: u32,
    /// Connection timeout duration
    pub connect_timeout: Duration,
    /// Idle timeout duration
    pub idle_timeout: Duration,
    /// Acquire connection timeout
    pub acquire_timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 16,
            min_connections: 2,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            acquire_timeout: Duration::from_secs(8),
        }
    }
}

impl From<&AppConfig> for DbConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            url: cfg.database_url.clone(),
            max_connections: cfg.db_max_connections,
            min_connections: cfg.db_min_connections,
            connect_timeout: Duration::from_secs(cfg.db_connect_timeout_secs),
            idle_timeout: Duration::from_secs(cfg.db_idle_timeout_secs),
            acquire_timeout: Duration::from_secs(cfg.db_acquire_timeout_secs),
        }
    }
}

/// Establishes a connection pool to the database with custom configuration
///
/// # Errors
/// Returns the driver error if the pool cannot be opened
pub async fn establish_connection_with_config(config: &DbConfig) -> Result<DbPool, DbErr> {
    debug!(
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "Configuring database connection"
    );

    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(config.connect_timeout)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .sqlx_logging(false);

    gauge!("hotel_db.max_connections", config.max_connections as f64);

    let pool = Database::connect(opt).await.map_err(|e| {
        error!(error = %e, "Database connection establishment failed");
        counter!("hotel_db.connection_failures", 1);
        e
    })?;

    info!(backend = ?pool.get_database_backend(), "Database connection pool established");
    Ok(pool)
}

/// Establish DB pool using AppConfig tuning
pub async fn establish_connection_from_app_config(cfg: &AppConfig) -> Result<DbPool, DbErr> {
    let db_cfg: DbConfig = cfg.into();
    establish_connection_with_config(&db_cfg).await
}

/// Applies every pending schema and seed migration.
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbErr> {
    info!("Running database migrations");
    let start = std::time::Instant::now();

    let result = crate::migrator::Migrator::up(pool, None).await;

    let elapsed = start.elapsed();
    match &result {
        Ok(_) => info!(?elapsed, "Database migrations completed"),
        Err(e) => error!(?elapsed, error = %e, "Database migrations failed"),
    }

    result
}

/// Checks if the database connection is active
pub async fn check_connection(pool: &DbPool) -> Result<(), ServiceError> {
    debug!("Checking database connection");
    let start = std::time::Instant::now();

    let result = pool.ping().await;

    let elapsed = start.elapsed();
    match result {
        Ok(()) => {
            histogram!("hotel_db.ping_seconds", elapsed.as_secs_f64());
            Ok(())
        }
        Err(e) => {
            error!(?elapsed, error = %e, "Database connection check failed");
            counter!("hotel_db.connection_failures", 1);
            Err(ServiceError::ServiceUnavailable(
                "Database is unreachable".to_string(),
            ))
        }
    }
}

/// Next primary key for `E`: `MAX(column) + 1`, or 1 on an empty table.
///
/// Must run on the same transaction as the insert that consumes the id.
/// Two concurrent writers can still compute the same value; the loser's
/// insert then fails on the primary key.
pub async fn next_id<E, C>(conn: &C, column: E::Column) -> Result<i32, DbErr>
where
    E: EntityTrait,
    E::Column: ColumnTrait,
    C: ConnectionTrait,
{
    let max: Option<Option<i32>> = E::find()
        .select_only()
        .column_as(Expr::col(column).max(), "max_id")
        .into_tuple()
        .one(conn)
        .await?;

    Ok(max.flatten().unwrap_or(0) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::room_status;

    async fn memory_pool() -> DbPool {
        let cfg = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };
        let pool = establish_connection_with_config(&cfg).await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn next_id_follows_highest_existing_key() {
        let pool = memory_pool().await;
        // four seeded room statuses
        let id = next_id::<room_status::Entity, _>(&pool, room_status::Column::StatusId)
            .await
            .unwrap();
        assert_eq!(id, 5);
    }

    #[tokio::test]
    async fn next_id_starts_at_one() {
        let pool = memory_pool().await;
        let id = next_id::<crate::entities::room::Entity, _>(
            &pool,
            crate::entities::room::Column::RoomId,
        )
        .await
        .unwrap();
        assert_eq!(id, 1);
    }

    #[tokio::test]
    async fn ping_succeeds_on_open_pool() {
        let pool = memory_pool().await;
        assert!(check_connection(&pool).await.is_ok());
    }

    #[test]
    fn db_config_takes_pool_tuning_from_app_config() {
        let mut app = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            5000,
            "test".to_string(),
        );
        app.db_max_connections = 4;
        app.db_idle_timeout_secs = 5;
        let cfg = DbConfig::from(&app);
        assert_eq!(cfg.max_connections, 4);
        assert_eq!(cfg.idle_timeout, Duration::from_secs(5));
        assert_eq!(cfg.url, "sqlite::memory:");
    }
}
