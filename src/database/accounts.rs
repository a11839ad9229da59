use std::sync::Arc;

use opsync_types::{AccountId, AccountRaw};
use opsync_util::ResultExt as _;
use redb::{ReadOnlyTable, ReadableTable as _, TableDefinition};
use tracing::debug;

use super::Error;

/// serialized accounts, keyed by account id
const TABLE: TableDefinition<AccountId, &'static [u8]> = TableDefinition::new("accounts.json");

#[derive(Debug, Clone, Hash, Eq, PartialEq, uniffi::Error, thiserror::Error)]
pub enum AccountsTableError {
    #[error("failed to save account: {0}")]
    Save(String),

    #[error("failed to read account: {0}")]
    Read(String),

    #[error("cached account is corrupted: {0}")]
    Corrupted(String),
}

#[derive(Debug, Clone)]
pub struct AccountsTable {
    db: Arc<redb::Database>,
}

impl AccountsTable {
    pub fn new(db: Arc<redb::Database>, write_txn: &redb::WriteTransaction) -> Result<Self, Error> {
        // create table if it doesn't exist
        write_txn.open_table(TABLE).map_err_str(Error::TableAccess)?;

        Ok(Self { db })
    }

    pub fn get(&self, id: &AccountId) -> Result<Option<AccountRaw>, Error> {
        let table = self.read_table()?;

        let Some(value) = table.get(id).map_err_str(AccountsTableError::Read)? else {
            return Ok(None);
        };

        let raw = serde_json::from_slice(value.value()).map_err_str(AccountsTableError::Corrupted)?;
        Ok(Some(raw))
    }

    pub fn save(&self, raw: &AccountRaw) -> Result<(), Error> {
        debug!("saving account {} with {} operations", raw.id, raw.operations.len());
        let bytes = serde_json::to_vec(raw).map_err_str(AccountsTableError::Save)?;

        let write_txn = self.db.begin_write().map_err_str(Error::DatabaseAccess)?;

        {
            let mut table = write_txn.open_table(TABLE).map_err_str(Error::TableAccess)?;
            table.insert(&raw.id, bytes.as_slice()).map_err_str(AccountsTableError::Save)?;
        }

        write_txn.commit().map_err_str(AccountsTableError::Save)?;

        Ok(())
    }

    /// Returns whether an account was removed
    pub fn delete(&self, id: &AccountId) -> Result<bool, Error> {
        let write_txn = self.db.begin_write().map_err_str(Error::DatabaseAccess)?;

        let removed = {
            let mut table = write_txn.open_table(TABLE).map_err_str(Error::TableAccess)?;
            table.remove(id).map_err_str(AccountsTableError::Save)?.is_some()
        };

        write_txn.commit().map_err_str(AccountsTableError::Save)?;

        Ok(removed)
    }

    pub fn all_ids(&self) -> Result<Vec<AccountId>, Error> {
        let table = self.read_table()?;

        let ids = table
            .iter()
            .map_err_str(AccountsTableError::Read)?
            .map(|entry| entry.map(|(key, _)| key.value()))
            .collect::<Result<Vec<_>, _>>()
            .map_err_str(AccountsTableError::Read)?;

        Ok(ids)
    }

    fn read_table(&self) -> Result<ReadOnlyTable<AccountId, &'static [u8]>, Error> {
        let read_txn = self.db.begin_read().map_err_str(Error::DatabaseAccess)?;
        let table = read_txn.open_table(TABLE).map_err_str(Error::TableAccess)?;

        Ok(table)
    }
}
