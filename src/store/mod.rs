mod records;
mod snapshots;

pub use records::RaceRecordStore;
pub use snapshots::SnapshotStore;

use anyhow::Result;

use crate::config::StorageSettings;
use crate::database::{self, DbPool};

/// Opens the connection pool and makes sure the schema exists
pub fn open_pool(settings: &StorageSettings) -> Result<DbPool> {
    let pool = database::create_pool(&settings.database_path)?;
    let conn = database::get_connection(&pool)?;
    database::setup::initialize_database(&conn)?;
    Ok(pool)
}
