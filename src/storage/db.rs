use redb::{Database as RedbDatabase, ReadTransaction, ReadableTable, WriteTransaction};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::tables::*;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Commit error: {0}")]
    Commit(Box<redb::CommitError>),
    #[error("Database error: {0}")]
    Redb(Box<redb::Error>),
    #[error("Database error: {0}")]
    RedbDatabase(Box<redb::DatabaseError>),
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),
    #[error("Storage error: {0}")]
    Storage(Box<redb::StorageError>),
    #[error("Table error: {0}")]
    Table(Box<redb::TableError>),
    #[error("Transaction error: {0}")]
    Transaction(Box<redb::TransactionError>),
}

macro_rules! boxed_from {
    ($($source:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$source> for DatabaseError {
                fn from(e: $source) -> Self {
                    DatabaseError::$variant(Box::new(e))
                }
            }
        )*
    };
}

boxed_from! {
    redb::CommitError => Commit,
    redb::DatabaseError => RedbDatabase,
    redb::Error => Redb,
    redb::StorageError => Storage,
    redb::TableError => Table,
    redb::TransactionError => Transaction,
}

/// Draft store. Cloning shares the underlying redb handle.
#[derive(Clone)]
pub struct Database {
    db: Arc<RedbDatabase>,
}

#[derive(Debug, Default)]
pub struct PurgeStats {
    pub drafts: u64,
}

impl Database {
    /// Opens `<data_dir>/listing-drafts.redb`, creating the directory, the
    /// file and the drafts table as needed.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(data_dir.as_ref())?;
        let db_path = data_dir.as_ref().join("listing-drafts.redb");
        let db = Arc::new(RedbDatabase::create(db_path)?);

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(DRAFTS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    pub fn begin_read(&self) -> Result<ReadTransaction, DatabaseError> {
        Ok(self.db.begin_read()?)
    }

    pub fn begin_write(&self) -> Result<WriteTransaction, DatabaseError> {
        Ok(self.db.begin_write()?)
    }

    /// Delete every draft. Only reachable through the test-mode admin route.
    pub fn purge_all(&self) -> Result<PurgeStats, DatabaseError> {
        let write_txn = self.begin_write()?;
        let mut stats = PurgeStats::default();

        {
            let mut table = write_txn.open_table(DRAFTS)?;
            let ids = table
                .iter()?
                .map(|entry| entry.map(|(id, _)| id.value().to_string()))
                .collect::<Result<Vec<_>, _>>()?;
            for id in &ids {
                table.remove(id.as_str())?;
            }
            stats.drafts = ids.len() as u64;
        }

        write_txn.commit()?;
        Ok(stats)
    }
}
