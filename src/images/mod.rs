//! Staged listing images.
//!
//! Binary uploads and the facts about them live in two separate structures
//! joined by the image id:
//! - [`FileStore`] owns the raw bytes. It is never serialized or persisted.
//! - The ledger is a `Vec<ImageDescriptor>`: caption, order and primary flag.
//!   It is plain serde data and is what gets stored alongside a draft.
//!
//! [`ImageSetManager`] keeps the two in lockstep and flattens them into
//! multipart fields on submission.

mod descriptor;
mod file_store;
mod manager;
mod submission;

pub use descriptor::{ImageDescriptor, MetadataUpdate, PrimaryPolicy};
pub use file_store::{FileHandle, FileStore};
pub use manager::ImageSetManager;
pub use submission::{FieldValue, SubmissionField};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ImageSetError {
    #[error("Index {index} is out of range for {len} images")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Field '{0}' cannot be updated")]
    InvalidField(String),
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("Image not found: {0}")]
    NotFound(String),
}
