//! Filesystem-backed object store.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::store::ObjectStore;

const TEMP_SUFFIX: &str = ".tmp";

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Object store rooted at a directory: `(bucket, key)` lives at `root/bucket/key`.
///
/// Uploads are atomic (temp file + rename), and `upload_if_absent` publishes
/// with a hard link so exactly one concurrent writer wins.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_path(&self, bucket: &str) -> Result<PathBuf> {
        if bucket.contains('/') || bucket.contains('\\') {
            return Err(StorageError::InvalidKey {
                name: bucket.to_string(),
                reason: "bucket names cannot contain path separators",
            });
        }
        check_segment(bucket, bucket)?;
        Ok(self.root.join(bucket))
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf> {
        let mut path = self.bucket_path(bucket)?;
        if key.contains('\\') {
            return Err(StorageError::InvalidKey {
                name: key.to_string(),
                reason: "keys use '/' as separator",
            });
        }
        for segment in key.split('/') {
            check_segment(key, segment)?;
            path.push(segment);
        }
        Ok(path)
    }

    /// Write `bytes` to a fresh temp file next to `path` and sync it.
    fn write_temp(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
        let parent = path.parent().unwrap_or(Path::new("."));
        fs::create_dir_all(parent).map_err(|e| StorageError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source: e,
        })?;

        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("object");
        let temp_path = parent.join(format!(
            ".{file_name}.{}.{}{TEMP_SUFFIX}",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
        ));

        let mut file = File::create(&temp_path).map_err(|e| StorageError::Io {
            operation: "create",
            path: temp_path.clone(),
            source: e,
        })?;
        let written = file
            .write_all(bytes)
            .map_err(|e| ("write", e))
            .and_then(|()| file.sync_all().map_err(|e| ("sync", e)));
        if let Err((operation, source)) = written {
            drop(file);
            discard_temp(&temp_path);
            return Err(StorageError::Io {
                operation,
                path: temp_path,
                source,
            });
        }
        Ok(temp_path)
    }
}

fn check_segment(name: &str, segment: &str) -> Result<()> {
    let reason = match segment {
        "" => "empty path segment",
        "." | ".." => "relative path segment",
        _ => return Ok(()),
    };
    Err(StorageError::InvalidKey {
        name: name.to_string(),
        reason,
    })
}

fn is_temp_file(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(TEMP_SUFFIX)
}

/// Collect keys under `dir`, relative to the bucket root.
fn walk_keys(dir: &Path, relative: &str, keys: &mut Vec<String>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| StorageError::Io {
        operation: "read directory",
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| StorageError::Io {
            operation: "read directory",
            path: dir.to_path_buf(),
            source: e,
        })?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let key = if relative.is_empty() {
            name.clone()
        } else {
            format!("{relative}/{name}")
        };
        let path = entry.path();
        if path.is_dir() {
            walk_keys(&path, &key, keys)?;
        } else if !is_temp_file(&name) {
            keys.push(key);
        }
    }
    Ok(())
}

fn discard_temp(temp_path: &Path) {
    if let Err(e) = fs::remove_file(temp_path) {
        debug!(path = %temp_path.display(), error = %e, "failed to remove temp file");
    }
}

impl ObjectStore for FsObjectStore {
    fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(bucket, key)?;
        fs::read(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StorageError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }
            } else {
                StorageError::Io {
                    operation: "read",
                    path: path.clone(),
                    source: e,
                }
            }
        })
    }

    fn upload(&self, bucket: &str, key: &str, bytes: &[u8], content_type: &str) -> Result<()> {
        let path = self.object_path(bucket, key)?;
        let temp_path = Self::write_temp(&path, bytes)?;
        if let Err(e) = fs::rename(&temp_path, &path) {
            discard_temp(&temp_path);
            return Err(StorageError::Io {
                operation: "rename",
                path,
                source: e,
            });
        }
        info!(bucket, key, bytes = bytes.len(), content_type, "uploaded object");
        Ok(())
    }

    fn exists(&self, bucket: &str, key: &str) -> Result<bool> {
        let path = self.object_path(bucket, key)?;
        path.try_exists().map_err(|e| StorageError::Io {
            operation: "stat",
            path,
            source: e,
        })
    }

    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let bucket_dir = self.bucket_path(bucket)?;
        if !bucket_dir.is_dir() {
            debug!(bucket, "bucket directory does not exist");
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        walk_keys(&bucket_dir, "", &mut keys)?;
        keys.retain(|key| key.starts_with(prefix));
        keys.sort();
        Ok(keys)
    }

    fn upload_if_absent(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<bool> {
        let path = self.object_path(bucket, key)?;
        let temp_path = Self::write_temp(&path, bytes)?;
        let linked = fs::hard_link(&temp_path, &path);
        discard_temp(&temp_path);
        match linked {
            Ok(()) => {
                info!(bucket, key, bytes = bytes.len(), content_type, "uploaded object");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                debug!(bucket, key, "object already exists; not replaced");
                Ok(false)
            }
            Err(e) => Err(StorageError::Io {
                operation: "link",
                path,
                source: e,
            }),
        }
    }
}
