use super::file_store::FileHandle;

/// The value of one multipart part.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    File(FileHandle),
}

/// One named multipart part, in emission order.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionField {
    pub name: String,
    pub value: FieldValue,
}

impl SubmissionField {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::Text(value.into()),
        }
    }

    pub fn file(name: impl Into<String>, file: FileHandle) -> Self {
        Self {
            name: name.into(),
            value: FieldValue::File(file),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Text(s) => Some(s),
            FieldValue::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileHandle> {
        match &self.value {
            FieldValue::File(f) => Some(f),
            FieldValue::Text(_) => None,
        }
    }
}
