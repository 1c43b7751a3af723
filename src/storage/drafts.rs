use redb::ReadableTable;

use super::db::{Database, DatabaseError};
use super::models::DraftRecord;
use super::tables::*;
use crate::units::PropertyKind;

impl Database {
    // ========================================================================
    // Draft operations
    // ========================================================================

    /// Store a draft record, replacing any previous version
    pub fn put_draft(&self, draft: &DraftRecord) -> Result<(), DatabaseError> {
        debug_assert!(!draft.id.is_empty(), "draft id must not be empty");

        let write_txn = self.begin_write()?;
        {
            let mut table = write_txn.open_table(DRAFTS)?;
            let data = rmp_serde::to_vec_named(draft)?;
            table.insert(draft.id.as_str(), data.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Get a draft by its UUID
    pub fn get_draft(&self, id: &str) -> Result<Option<DraftRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(DRAFTS)?;

        match table.get(id)? {
            Some(data) => {
                let draft: DraftRecord = rmp_serde::from_slice(data.value())?;
                Ok(Some(draft))
            }
            None => Ok(None),
        }
    }

    /// Read-modify-write a draft inside one write transaction.
    /// Returns the updated record, or `None` if the draft does not exist.
    pub fn modify_draft<F>(&self, id: &str, f: F) -> Result<Option<DraftRecord>, DatabaseError>
    where
        F: FnOnce(&mut DraftRecord),
    {
        let write_txn = self.begin_write()?;

        let existing = {
            let table = write_txn.open_table(DRAFTS)?;
            let result = match table.get(id)? {
                Some(data) => Some(rmp_serde::from_slice::<DraftRecord>(data.value())?),
                None => None,
            };
            result
        };

        let updated = match existing {
            Some(mut draft) => {
                f(&mut draft);
                draft.updated_at = chrono::Utc::now();

                let serialized = rmp_serde::to_vec_named(&draft)?;
                let mut table = write_txn.open_table(DRAFTS)?;
                table.insert(id, serialized.as_slice())?;
                Some(draft)
            }
            None => None,
        };

        write_txn.commit()?;
        Ok(updated)
    }

    /// Delete a draft by its UUID
    pub fn delete_draft(&self, id: &str) -> Result<bool, DatabaseError> {
        let write_txn = self.begin_write()?;
        let deleted = {
            let mut table = write_txn.open_table(DRAFTS)?;
            let removed = table.remove(id)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(deleted)
    }

    /// Get all drafts, oldest first
    pub fn get_all_drafts(&self) -> Result<Vec<DraftRecord>, DatabaseError> {
        let read_txn = self.begin_read()?;
        let table = read_txn.open_table(DRAFTS)?;

        let mut drafts = Vec::new();
        for result in table.iter()? {
            let (_, value) = result?;
            let draft: DraftRecord = rmp_serde::from_slice(value.value())?;
            drafts.push(draft);
        }

        drafts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(drafts)
    }

    /// List drafts with optional property kind and state filters
    pub fn list_drafts(
        &self,
        property_kind: Option<PropertyKind>,
        state: Option<&str>,
    ) -> Result<Vec<DraftRecord>, DatabaseError> {
        let all = self.get_all_drafts()?;

        Ok(all
            .into_iter()
            .filter(|d| property_kind.map_or(true, |k| d.property_kind == k))
            .filter(|d| {
                state.map_or(true, |s| {
                    d.state
                        .as_deref()
                        .is_some_and(|own| own.eq_ignore_ascii_case(s))
                })
            })
            .collect())
    }
}
