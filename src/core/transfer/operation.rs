//! Copy and move with size-verified, idempotent semantics.

use super::TransferOutcome;
use crate::error::TransferError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// How a content file reaches its destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferOperation {
    /// Copy, leaving the source in place
    Copy,
    /// Rename the source into place
    Move,
}

impl TransferOperation {
    pub fn action(self) -> &'static str {
        match self {
            Self::Copy => "copy",
            Self::Move => "move",
        }
    }

    fn in_progress(self) -> &'static str {
        match self {
            Self::Copy => "Copying",
            Self::Move => "Moving",
        }
    }

    fn completed(self) -> &'static str {
        match self {
            Self::Copy => "Copied",
            Self::Move => "Moved",
        }
    }

    /// Transfer `source` to `destination` unless it is already there.
    ///
    /// - destination missing: perform the operation
    /// - destination present with the source's size: already done, skip
    /// - destination present with another size: [`TransferError::SizeMismatch`],
    ///   nothing is overwritten
    ///
    /// Size equality is the only check; contents are not compared.
    pub fn transfer(
        self,
        source: &Path,
        destination: &Path,
    ) -> Result<TransferOutcome, TransferError> {
        tracing::debug!(
            "{} {} -> {}...",
            self.in_progress(),
            source.display(),
            destination.display()
        );

        if destination_already_present(source, destination)? {
            tracing::debug!("Destination {} already exists. Skipping...", destination.display());
            return Ok(TransferOutcome::AlreadyPresent);
        }

        self.apply(source, destination)
            .map_err(|e| TransferError::Io {
                operation: self.action(),
                source_path: source.to_path_buf(),
                destination: destination.to_path_buf(),
                source: e,
            })?;

        tracing::debug!(
            "{} {} -> {}",
            self.completed(),
            source.display(),
            destination.display()
        );
        Ok(TransferOutcome::Transferred)
    }

    fn apply(self, source: &Path, destination: &Path) -> io::Result<()> {
        match self {
            Self::Copy => fs::copy(source, destination).map(|_| ()),
            Self::Move => fs::rename(source, destination).or_else(|e| {
                if !rename_needs_copy(&e) {
                    return Err(e);
                }
                // rename fails across filesystems, fall back to copy+delete
                // with size verification before deleting source
                let source_size = fs::metadata(source)?.len();
                fs::copy(source, destination)?;

                let dest_size = fs::metadata(destination)?.len();
                if dest_size != source_size {
                    let _ = fs::remove_file(destination);
                    return Err(io::Error::other(format!(
                        "Copy verification failed: source {} bytes, dest {} bytes",
                        source_size, dest_size
                    )));
                }

                fs::remove_file(source)
            }),
        }
    }
}

/// Only a cross-device rename is retried as copy and delete
fn rename_needs_copy(error: &io::Error) -> bool {
    error.kind() == io::ErrorKind::CrossesDevices
}

fn destination_already_present(source: &Path, destination: &Path) -> Result<bool, TransferError> {
    let destination_size = match fs::metadata(destination) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            return Err(TransferError::Metadata {
                path: destination.to_path_buf(),
                source: e,
            })
        }
    };

    let source_size = fs::metadata(source)
        .map_err(|e| TransferError::Metadata {
            path: source.to_path_buf(),
            source: e,
        })?
        .len();

    if destination_size == source_size {
        Ok(true)
    } else {
        Err(TransferError::SizeMismatch {
            source_path: source.to_path_buf(),
            destination: destination.to_path_buf(),
            source_size,
            destination_size,
        })
    }
}
