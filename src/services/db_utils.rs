use std::sync::Arc;
use std::time::Duration;

use actix::{Actor, Addr, SyncContext};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::SqliteConnection;

use crate::services::cache_handling::ResponseCache;
use crate::types::PoolInitializationError;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

pub struct DbActor(pub DbPool);

pub struct AppState {
    pub db: Addr<DbActor>,
    pub cache: Arc<dyn ResponseCache>,
    pub orders_ttl: Duration,
}

impl Actor for DbActor {
    type Context = SyncContext<Self>;
}

#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

pub fn get_db_pool(db_url: &str) -> Result<DbPool, PoolInitializationError> {
    let manager = ConnectionManager::<SqliteConnection>::new(db_url);
    match Pool::builder()
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
    {
        Ok(val) => Ok(val),
        Err(err) => Err(PoolInitializationError(err.to_string())),
    }
}

/// Single-connection pool over a private in-memory database.
#[cfg(test)]
pub fn get_memory_pool() -> Result<DbPool, PoolInitializationError> {
    let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
    Pool::builder()
        .max_size(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)
        .map_err(|err| PoolInitializationError(err.to_string()))
}

/// Creates every table that does not exist yet.
pub fn create_tables(pool: &DbPool) -> Result<(), PoolInitializationError> {
    let mut conn = pool
        .get()
        .map_err(|err| PoolInitializationError(err.to_string()))?;

    conn.batch_execute(include_str!("bootstrap.sql"))
        .map_err(|err| PoolInitializationError(format!("Failed to create tables: {err}")))
}
