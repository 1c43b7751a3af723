use super::descriptor::{ImageDescriptor, MetadataUpdate, PrimaryPolicy};
use super::file_store::{FileHandle, FileStore};
use super::submission::SubmissionField;
use super::ImageSetError;

/// Keeps a [`FileStore`] and its metadata ledger paired under
/// add/remove/reorder/set-primary operations.
#[derive(Debug, Default)]
pub struct ImageSetManager {
    files: FileStore,
    ledger: Vec<ImageDescriptor>,
    policy: PrimaryPolicy,
}

impl ImageSetManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: PrimaryPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Rebuild a manager from a persisted ledger. The file store starts empty,
    /// so every restored descriptor is an orphan until the set is cleared.
    pub fn restore(ledger: Vec<ImageDescriptor>, policy: PrimaryPolicy) -> Self {
        Self {
            files: FileStore::new(),
            ledger,
            policy,
        }
    }

    pub fn ledger(&self) -> &[ImageDescriptor] {
        &self.ledger
    }

    pub fn len(&self) -> usize {
        self.ledger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    pub fn policy(&self) -> PrimaryPolicy {
        self.policy
    }

    pub fn has_file(&self, id: &str) -> bool {
        self.files.contains(id)
    }

    /// Append one descriptor per file, in call order. Returns the new
    /// descriptors.
    pub fn add_files(&mut self, files: Vec<FileHandle>) -> &[ImageDescriptor] {
        let start = self.ledger.len();
        let was_empty = self.ledger.is_empty();

        for (position, file) in files.into_iter().enumerate() {
            let id = uuid::Uuid::new_v4().to_string();
            let descriptor = ImageDescriptor {
                id: id.clone(),
                original_filename: file.filename.clone(),
                caption: String::new(),
                is_primary: was_empty && position == 0,
                order: (start + position) as u32,
            };
            self.files.insert(id, file);
            self.ledger.push(descriptor);
        }

        &self.ledger[start..]
    }

    /// Remove the descriptor at `index` and its file. Remaining `order` values
    /// are left as they are.
    pub fn remove_at(&mut self, index: usize) -> Result<ImageDescriptor, ImageSetError> {
        self.check_index(index)?;

        let removed = self.ledger.remove(index);
        self.files.remove(&removed.id);

        if removed.is_primary && self.policy == PrimaryPolicy::PromoteFirst {
            if let Some(first) = self.ledger.first_mut() {
                first.is_primary = true;
            }
        }

        Ok(removed)
    }

    pub fn update_metadata(
        &mut self,
        index: usize,
        update: MetadataUpdate,
    ) -> Result<&ImageDescriptor, ImageSetError> {
        self.check_index(index)?;

        let descriptor = &mut self.ledger[index];
        match update {
            MetadataUpdate::Caption(caption) => descriptor.caption = caption,
            MetadataUpdate::Order(order) => descriptor.order = order,
        }
        Ok(descriptor)
    }

    pub fn set_primary(&mut self, index: usize) -> Result<(), ImageSetError> {
        self.check_index(index)?;

        for (i, descriptor) in self.ledger.iter_mut().enumerate() {
            descriptor.is_primary = i == index;
        }
        Ok(())
    }

    pub fn primary_index(&self) -> Option<usize> {
        self.ledger.iter().position(|d| d.is_primary)
    }

    pub fn get_file(&self, id: &str) -> Result<&FileHandle, ImageSetError> {
        self.files
            .get(id)
            .ok_or_else(|| ImageSetError::NotFound(id.to_string()))
    }

    /// Files in ledger order. Descriptors without a stored file are skipped.
    pub fn all_files(&self) -> impl Iterator<Item = &FileHandle> + '_ {
        self.ledger.iter().filter_map(|d| self.files.get(&d.id))
    }

    /// Ledger entries that still have their file, in ledger order.
    pub fn retained(&self) -> impl Iterator<Item = (&ImageDescriptor, &FileHandle)> + '_ {
        self.ledger
            .iter()
            .filter_map(|d| self.files.get(&d.id).map(|f| (d, f)))
    }

    /// Remove every descriptor whose id is in `ids`, with its file. Ids not in
    /// the set are ignored. Returns how many descriptors were removed.
    pub fn discard_ids(&mut self, ids: &[String]) -> usize {
        let before = self.ledger.len();
        let mut primary_removed = false;

        self.ledger.retain(|d| {
            let keep = !ids.contains(&d.id);
            if !keep {
                primary_removed |= d.is_primary;
            }
            keep
        });
        for id in ids {
            self.files.remove(id);
        }

        if primary_removed && self.policy == PrimaryPolicy::PromoteFirst {
            if let Some(first) = self.ledger.first_mut() {
                first.is_primary = true;
            }
        }

        before - self.ledger.len()
    }

    pub fn clear(&mut self) {
        self.files.clear();
        self.ledger.clear();
    }

    /// Descriptors sorted by `order`, ties kept in ledger order.
    pub fn display_order(&self) -> Vec<&ImageDescriptor> {
        let mut sorted: Vec<&ImageDescriptor> = self.ledger.iter().collect();
        sorted.sort_by_key(|d| d.order);
        sorted
    }

    /// Sort the ledger by `order` and renumber it `0..len`.
    pub fn normalize_order(&mut self) {
        self.ledger.sort_by_key(|d| d.order);
        for (position, descriptor) in self.ledger.iter_mut().enumerate() {
            descriptor.order = position as u32;
        }
    }

    /// Flatten the set into multipart fields.
    ///
    /// `imageDetails[i]` is indexed by position among the emitted images, which
    /// is not necessarily the descriptor's `order` value.
    pub fn to_submission_fields(&self) -> Vec<SubmissionField> {
        let mut fields = Vec::new();

        for (i, (descriptor, file)) in self.retained().enumerate() {
            fields.push(SubmissionField::file("images", file.clone()));
            if !descriptor.caption.is_empty() {
                fields.push(SubmissionField::text(
                    format!("imageDetails[{i}][caption]"),
                    descriptor.caption.clone(),
                ));
            }
            fields.push(SubmissionField::text(
                format!("imageDetails[{i}][isPrimary]"),
                descriptor.is_primary.to_string(),
            ));
            fields.push(SubmissionField::text(
                format!("imageDetails[{i}][order]"),
                descriptor.order.to_string(),
            ));
        }

        fields
    }

    fn check_index(&self, index: usize) -> Result<(), ImageSetError> {
        if index >= self.ledger.len() {
            return Err(ImageSetError::IndexOutOfRange {
                index,
                len: self.ledger.len(),
            });
        }
        Ok(())
    }
}
