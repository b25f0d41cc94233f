//! Schema version of the todo database.
//!
//! The database holds a single `kv_store` table. Its version lives in
//! `PRAGMA user_version`: `0` is a blank file, [`SCHEMA_VERSION`] is ready.

use super::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Version written by this build once `kv_store` exists.
pub const SCHEMA_VERSION: u32 = 1;

const KV_STORE_V1: &str = include_str!("kv_store_v1.sql");

/// Reads `PRAGMA user_version` of `conn`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings a blank database up to [`SCHEMA_VERSION`] in one transaction.
///
/// A database already at the current version is left alone; one written by
/// a newer build is refused so its blobs are never reinterpreted.
pub(crate) fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    match schema_version(conn)? {
        SCHEMA_VERSION => Ok(()),
        found if found > SCHEMA_VERSION => Err(DbError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        }),
        found => {
            let tx = conn.transaction()?;
            tx.execute_batch(KV_STORE_V1)?;
            tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
            tx.commit()?;
            info!(
                "event=db_schema module=db status=ok from_version={} to_version={}",
                found, SCHEMA_VERSION
            );
            Ok(())
        }
    }
}
