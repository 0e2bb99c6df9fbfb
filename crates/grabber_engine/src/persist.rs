use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures_util::{pin_mut, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bytes buffered before each write to disk.
pub const REQUEST_CHUNK_SIZE: usize = 1_048_576;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("download of {} interrupted, partial file left behind", .path.display())]
    Interrupted {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// What to do when the target file already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    Skip,
    #[default]
    Rename,
    Overwrite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { path: PathBuf, bytes: u64 },
    Skipped { path: PathBuf },
}

/// Ensure output directory exists; create if missing. Safe to call from
/// several workers at once.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
        return Ok(());
    }
    fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))
}

/// Pick the path to write to under `policy`, or `None` to skip.
///
/// Renaming tries `name_2.ext`, `name_3.ext`, ... and takes the first free
/// one. The existence check and the later create are separate steps, so two
/// writers racing for the same name can still collide.
pub fn resolve_collision(target: &Path, policy: CollisionPolicy) -> Option<PathBuf> {
    match policy {
        CollisionPolicy::Overwrite => Some(target.to_path_buf()),
        CollisionPolicy::Skip if target.exists() => None,
        CollisionPolicy::Skip => Some(target.to_path_buf()),
        CollisionPolicy::Rename => {
            let mut candidate = target.to_path_buf();
            let mut number = 2u64;
            while candidate.exists() {
                candidate = numbered(target, number);
                number += 1;
            }
            Some(candidate)
        }
    }
}

fn numbered(target: &Path, number: u64) -> PathBuf {
    let stem = target
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match target.extension() {
        Some(ext) => format!("{stem}_{number}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{number}"),
    };
    target.with_file_name(name)
}

/// Streams downloads to disk without holding them in memory, resolving name
/// clashes per the configured policy.
#[derive(Debug, Clone, Copy)]
pub struct CollisionSafeWriter {
    policy: CollisionPolicy,
}

impl CollisionSafeWriter {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Write `stream` to `target` or a renamed sibling. A skipped target drops
    /// the stream unread. On failure the partial file stays on disk.
    pub async fn write_stream<S, E>(
        &self,
        target: &Path,
        stream: S,
    ) -> Result<WriteOutcome, PersistError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: std::error::Error + Send + Sync + 'static,
    {
        let Some(path) = resolve_collision(target, self.policy) else {
            return Ok(WriteOutcome::Skipped {
                path: target.to_path_buf(),
            });
        };

        let mut file = BufWriter::with_capacity(REQUEST_CHUNK_SIZE, File::create(&path)?);
        let mut written = 0u64;
        pin_mut!(stream);
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| PersistError::Interrupted {
                path: path.clone(),
                source: Box::new(err),
            })?;
            file.write_all(&chunk)?;
            written += chunk.len() as u64;
        }
        file.flush()?;

        Ok(WriteOutcome::Written {
            path,
            bytes: written,
        })
    }
}
