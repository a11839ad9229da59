//! redb backed cache of the last known state of every account, this is the
//! cached side the reconciliation merges fresh data into

pub mod accounts;
pub mod error;

use std::{path::Path, sync::Arc};

use once_cell::sync::OnceCell;
use tracing::{error, info};

use accounts::AccountsTable;
use opsync_util::ResultExt as _;

use crate::consts::DATABASE_FILE;

pub static DATABASE: OnceCell<Database> = OnceCell::new();

pub type Error = error::DatabaseError;

#[derive(Debug, Clone)]
pub struct Database {
    pub accounts: AccountsTable,
}

impl Database {
    /// Open (or create) the database file at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let db = redb::Database::create(path.as_ref()).map_err_str(Error::DatabaseAccess)?;
        let db = Arc::new(db);

        let write_txn = db.begin_write().map_err_str(Error::DatabaseAccess)?;
        let accounts = AccountsTable::new(db.clone(), &write_txn)?;
        write_txn.commit().map_err_str(Error::DatabaseAccess)?;

        Ok(Self { accounts })
    }

    pub fn global() -> &'static Database {
        DATABASE.get_or_init(|| {
            let location = DATABASE_FILE.as_path();
            match Self::open(location) {
                Ok(db) => db,
                Err(error) => {
                    // the cache can always be rebuilt from a fresh sync
                    error!("failed to open database, error: {error}, creating a new one");
                    let _ = std::fs::remove_file(location);

                    info!("Creating a new database, at {}", location.display());
                    Self::open(location).expect("failed to create database")
                }
            }
        })
    }
}
