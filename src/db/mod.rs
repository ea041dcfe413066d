use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel::result::DatabaseErrorKind;
use tracing::{debug, info};

pub mod catalog;
pub mod favorites;
pub mod users;

pub use catalog::CatalogRepository;
pub use favorites::FavoriteRepository;
pub use users::UserRepository;

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

const MIGRATIONS: &[(&str, &str)] = &[
    ("0001_create_users", include_str!("../../migrations/0001_create_users.sql")),
    ("0002_create_catalog", include_str!("../../migrations/0002_create_catalog.sql")),
    ("0003_create_favorites", include_str!("../../migrations/0003_create_favorites.sql")),
];

/// Per-connection SQLite settings applied when r2d2 opens a connection.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)
    }
}

pub fn establish_connection_pool(database_url: &str, max_size: u32) -> Result<DbPool, anyhow::Error> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)?;

    Ok(pool)
}

/// True when the error chain bottoms out in a unique-constraint violation.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<diesel::result::Error>(),
        Some(diesel::result::Error::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            _
        ))
    )
}

pub fn get_connection(pool: &DbPool) -> Result<DbConnection, anyhow::Error> {
    let conn = pool.get()?;
    Ok(conn)
}

/// Applies the embedded schema. Every statement is `IF NOT EXISTS`, so this
/// is safe to run on each startup.
pub async fn run_migrations(pool: &DbPool) -> Result<(), anyhow::Error> {
    let mut conn = get_connection(pool)?;

    tokio::task::spawn_blocking(move || -> Result<(), anyhow::Error> {
        for (name, sql) in MIGRATIONS {
            debug!(migration = *name, "Applying migration");
            conn.batch_execute(sql)?;
        }
        Ok(())
    })
    .await??;

    info!(count = MIGRATIONS.len(), "Database schema is up to date");
    Ok(())
}
