use crate::schema::orders;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::Error as DieselError;
use order_domain::{DomainError, OrderRepository};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::Arc;
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");
#[cfg(all(feature = "pg", not(test)))]
type DbConn = PgConnection;
#[cfg(any(test, not(feature = "pg")))]
type DbConn = SqliteConnection;
// Tipo Rust de la columna `created_at` en cada backend.
#[cfg(all(feature = "pg", not(test)))]
type StoredAt = DateTime<Utc>;
#[cfg(any(test, not(feature = "pg")))]
type StoredAt = chrono::NaiveDateTime;
#[cfg(all(feature = "pg", not(test)))]
fn stored_now() -> StoredAt {
  Utc::now()
}
#[cfg(any(test, not(feature = "pg")))]
fn stored_now() -> StoredAt {
  Utc::now().naive_utc()
}
#[cfg(all(feature = "pg", not(test)))]
fn to_utc(ts: StoredAt) -> DateTime<Utc> {
  ts
}
#[cfg(any(test, not(feature = "pg")))]
fn to_utc(ts: StoredAt) -> DateTime<Utc> {
  ts.and_utc()
}
type DbPool = Pool<ConnectionManager<DbConn>>;
const POOL_SIZE: u32 = 8;
/// Repo Diesel que implementa `OrderRepository` sobre la tabla `orders`.
pub struct DieselOrderRepository {
  pool: Arc<DbPool>,
}
#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
struct OrderRow {
  pub order_uid: String,
  pub data: String,
  pub created_at: StoredAt,
}
// busy_timeout is per connection, so it is set on every new pooled connection.
#[cfg(any(test, not(feature = "pg")))]
#[derive(Debug)]
struct SqlitePragmas;
#[cfg(any(test, not(feature = "pg")))]
impl diesel::r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
  fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
    diesel::sql_query("PRAGMA busy_timeout = 5000;").execute(conn).map_err(diesel::r2d2::Error::QueryError)?;
    Ok(())
  }
}
fn map_db_err<T>(res: std::result::Result<T, DieselError>) -> Result<T, DomainError> {
  res.map_err(|e| DomainError::Persistence(format!("db: {}", e)))
}
impl DieselOrderRepository {
  /// Crea el pool de conexiones. Falla si no se puede abrir ninguna
  /// conexión; el binario lo trata como error fatal de arranque.
  pub fn new(database_url: &str) -> Result<Self, DomainError> {
    #[cfg(all(feature = "pg", not(test)))]
    {
      let l = database_url.to_lowercase();
      if !(l.starts_with("postgres://") || l.starts_with("postgresql://") || database_url.contains('@')) {
        return Err(DomainError::Persistence("DSN does not look like Postgres URL".into()));
      }
    }
    let manager = ConnectionManager::<DbConn>::new(database_url);
    let builder = Pool::builder().max_size(POOL_SIZE);
    #[cfg(any(test, not(feature = "pg")))]
    let builder = builder.connection_customizer(Box::new(SqlitePragmas));
    let pool = builder.build(manager).map_err(|e| DomainError::Persistence(format!("pool: {}", e)))?;
    let repo = DieselOrderRepository { pool: Arc::new(pool) };
    repo.prepare()?;
    Ok(repo)
  }
  // Crea `orders` si no existe (la migración es idempotente y respeta una
  // tabla ya creada). En SQLite además activa WAL.
  fn prepare(&self) -> Result<(), DomainError> {
    let mut c = self.conn()?;
    #[cfg(any(test, not(feature = "pg")))]
    let _ = diesel::sql_query("PRAGMA journal_mode = WAL;").execute(&mut c);
    c.run_pending_migrations(MIGRATIONS).map_err(|e| DomainError::Persistence(format!("migrations: {}", e)))?;
    Ok(())
  }
  fn conn(&self) -> Result<PooledConnection<ConnectionManager<DbConn>>, DomainError> {
    self.pool.get().map_err(|e| DomainError::Persistence(format!("pool: {}", e)))
  }
  /// Comprueba que la base responde.
  pub fn ping(&self) -> Result<(), DomainError> {
    let mut conn = self.conn()?;
    map_db_err(diesel::sql_query("SELECT 1").execute(&mut conn))?;
    Ok(())
  }
  /// Instante de la última escritura de `order_uid`.
  pub fn last_write_at(&self, order_uid: &str) -> Result<Option<DateTime<Utc>>, DomainError> {
    let mut conn = self.conn()?;
    let ts = map_db_err(orders::table.find(order_uid).select(orders::created_at).first::<StoredAt>(&mut conn).optional())?;
    Ok(ts.map(to_utc))
  }
}
/// Repositorio a partir del entorno (`.env` incluido): `DSN`, o
/// `DATABASE_URL` como respaldo. Sin la feature `pg` y sin variables
/// definidas se usa el archivo SQLite local `orders.db`.
pub fn new_from_env() -> Result<DieselOrderRepository, DomainError> {
  dotenvy::dotenv().ok();
  let url = std::env::var("DSN").ok()
                                .filter(|v| !v.trim().is_empty())
                                .or_else(|| std::env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty()));
  match url {
    Some(url) => DieselOrderRepository::new(&url),
    None if cfg!(all(feature = "pg", not(test))) => {
      Err(DomainError::Persistence("DSN / DATABASE_URL not set".into()))
    }
    None => DieselOrderRepository::new("orders.db"),
  }
}
impl OrderRepository for DieselOrderRepository {
  fn get_order(&self, order_uid: &str) -> Result<Option<Bytes>, DomainError> {
    let mut conn = self.conn()?;
    let data = map_db_err(orders::table.find(order_uid).select(orders::data).first::<String>(&mut conn).optional())?;
    Ok(data.map(Bytes::from))
  }
  fn save_order(&self, order_uid: &str, payload: &Bytes) -> Result<(), DomainError> {
    let data = std::str::from_utf8(payload).map_err(|e| DomainError::Persistence(format!("payload no es UTF-8: {}", e)))?;
    let row = OrderRow { order_uid: order_uid.to_string(),
                         data: data.to_string(),
                         created_at: stored_now() };
    let mut conn = self.conn()?;
    map_db_err(diesel::insert_into(orders::table).values(&row)
                                                 .on_conflict(orders::order_uid)
                                                 .do_update()
                                                 .set((orders::data.eq(&row.data),
                                                       orders::created_at.eq(row.created_at)))
                                                 .execute(&mut conn))?;
    log::debug!("order {} upserted ({} bytes)", order_uid, row.data.len());
    Ok(())
  }
  fn count_orders(&self) -> Result<i64, DomainError> {
    let mut conn = self.conn()?;
    map_db_err(orders::table.count().get_result::<i64>(&mut conn))
  }
  fn list_orders(&self) -> Result<Vec<(String, Bytes)>, DomainError> {
    let mut conn = self.conn()?;
    let rows = map_db_err(orders::table.select((orders::order_uid, orders::data)).load::<(String, String)>(&mut conn))?;
    Ok(rows.into_iter().map(|(order_uid, data)| (order_uid, Bytes::from(data))).collect())
  }
}
