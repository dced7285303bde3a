use crate::{
    config::Limits,
    upload::{FileKind, UploadedFile},
};
use std::io::{Read, Seek};
use thiserror::Error;

/// Whole-batch rejection. The display string is the message shown to the
/// uploader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchRejected {
    #[error("You can upload up to {max} files at a time.")]
    TooManyFiles { max: usize, count: usize },
    #[error("Unsupported file type for '{name}'.")]
    UnsupportedType { name: String },
    #[error("'{name}' exceeds {limit_mb}MB size limit.")]
    TooLarge {
        name: String,
        limit_mb: u64,
        size: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub name: String,
    pub kind: FileKind,
}

/// Checks the batch before any byte is decoded: the count ceiling first, then
/// every file's type and declared size in submission order.
pub fn admit<R: Read + Seek>(
    limits: &Limits,
    files: &[UploadedFile<R>],
) -> Result<Vec<Admission>, BatchRejected> {
    if files.len() > limits.max_attachments {
        return Err(BatchRejected::TooManyFiles {
            max: limits.max_attachments,
            count: files.len(),
        });
    }
    files
        .iter()
        .map(|f| admit_one(limits, &f.display_name(), f.declared_size))
        .collect()
}

pub fn admit_one(
    limits: &Limits,
    name: &str,
    declared_size: Option<u64>,
) -> Result<Admission, BatchRejected> {
    let kind = FileKind::from_name(name).ok_or_else(|| BatchRejected::UnsupportedType {
        name: name.to_string(),
    })?;

    if let Some(size) = declared_size {
        if size > limits.max_attachment_size_bytes() {
            return Err(BatchRejected::TooLarge {
                name: name.to_string(),
                limit_mb: limits.max_attachment_size_mb,
                size,
            });
        }
    }

    Ok(Admission {
        name: name.to_string(),
        kind,
    })
}
