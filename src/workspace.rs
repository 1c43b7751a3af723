//! In-memory image sets of the drafts being edited.
//!
//! Each draft's [`ImageSetManager`] lives here for the lifetime of the
//! process. Only its ledger is written back to the database; the file bytes
//! are lost on restart and the manager is rebuilt from the stored ledger.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::images::{ImageSetManager, PrimaryPolicy};
use crate::storage::models::DraftRecord;

pub struct Workspace {
    policy: PrimaryPolicy,
    sets: Mutex<HashMap<String, ImageSetManager>>,
}

impl Workspace {
    pub fn new(policy: PrimaryPolicy) -> Self {
        Self {
            policy,
            sets: Mutex::new(HashMap::new()),
        }
    }

    /// Run `f` against the draft's image set, restoring it from the stored
    /// ledger if this process has not seen the draft yet.
    pub async fn with_images<R, F>(&self, draft: &DraftRecord, f: F) -> R
    where
        F: FnOnce(&mut ImageSetManager) -> R,
    {
        let mut sets = self.sets.lock().await;
        let images = sets.entry(draft.id.clone()).or_insert_with(|| {
            if !draft.images.is_empty() {
                tracing::debug!(
                    draft_id = %draft.id,
                    images = draft.images.len(),
                    "Restoring image ledger without file content"
                );
            }
            ImageSetManager::restore(draft.images.clone(), self.policy)
        });
        f(images)
    }

    /// Run `f` against the draft's image set only if this process already
    /// holds one. Never restores a set.
    pub async fn with_existing<R, F>(&self, draft_id: &str, f: F) -> Option<R>
    where
        F: FnOnce(&mut ImageSetManager) -> R,
    {
        self.sets.lock().await.get_mut(draft_id).map(f)
    }

    /// Drop a draft's image set, files included.
    pub async fn discard(&self, draft_id: &str) -> bool {
        self.sets.lock().await.remove(draft_id).is_some()
    }

    pub async fn discard_all(&self) -> usize {
        let mut sets = self.sets.lock().await;
        let count = sets.len();
        sets.clear();
        count
    }
}
