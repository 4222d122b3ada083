//! KYB submission data value objects.
//!
//! `KybData` is the heterogeneous field map persisted on a company: each key
//! is a requirement name, each value either a text answer or an uploaded
//! file descriptor. The map only ever grows by merge, never by replacement.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Descriptor for an uploaded KYB document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Original file name as submitted
    pub file_name: String,

    /// SHA-256 checksum of the file contents (hex)
    pub checksum: String,

    /// Raw file contents
    pub data: Vec<u8>,
}

impl FileDescriptor {
    /// Build a descriptor from an upload, computing the checksum.
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        let checksum = Sha256::digest(&data)
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect();

        Self {
            file_name: file_name.into(),
            checksum,
            data,
        }
    }

    /// File size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// A single KYB field value: either a text answer or an uploaded file.
///
/// Text and file values share one keyspace. A field submitted as text may
/// later be overwritten by a file under the same key, and vice versa.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum KybValue {
    Text { value: String },
    File(FileDescriptor),
}

impl KybValue {
    /// Construct a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Construct a file value from an upload.
    pub fn file(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self::File(FileDescriptor::new(file_name, data))
    }
}

/// The merged KYB field map stored on a company (JSONB column).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KybData(BTreeMap<String, KybValue>);

impl KybData {
    /// Create an empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a field by name.
    pub fn get(&self, field: &str) -> Option<&KybValue> {
        self.0.get(field)
    }

    /// Whether a field is present.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of stored fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no fields are stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over stored fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &KybValue)> {
        self.0.iter()
    }

    /// Merge a validated submission into the stored map.
    ///
    /// Starts from the stored fields, overlays every text field, then every
    /// file descriptor, overwriting by key. Keys absent from the submission
    /// are preserved untouched (the merge is additive, last write wins per
    /// key).
    pub fn merged_with(
        &self,
        text_fields: &BTreeMap<String, String>,
        file_fields: &BTreeMap<String, FileDescriptor>,
    ) -> KybData {
        let mut merged = self.0.clone();

        for (name, value) in text_fields {
            merged.insert(name.clone(), KybValue::text(value.clone()));
        }

        for (name, descriptor) in file_fields {
            merged.insert(name.clone(), KybValue::File(descriptor.clone()));
        }

        KybData(merged)
    }
}

impl FromIterator<(String, KybValue)> for KybData {
    fn from_iter<I: IntoIterator<Item = (String, KybValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
