//! The storage trait.

use std::sync::Arc;

use crate::error::Result;

/// Durable object storage addressed by `(bucket, key)`.
///
/// Implementations make no transactional promise beyond what each method
/// states. Keys use `/` as separator.
pub trait ObjectStore: Send + Sync {
    /// Read an object. Fails with `NotFound` when it does not exist.
    fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;

    /// Create or replace an object.
    fn upload(&self, bucket: &str, key: &str, bytes: &[u8], content_type: &str) -> Result<()>;

    fn exists(&self, bucket: &str, key: &str) -> Result<bool>;

    /// Keys in `bucket` starting with `prefix`, sorted.
    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;

    /// Create an object only if the key is free. Returns false if it already existed.
    ///
    /// The default is check-then-write and races with concurrent writers
    /// (last write wins). Stores with an atomic create-if-absent override it.
    fn upload_if_absent(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<bool> {
        if self.exists(bucket, key)? {
            return Ok(false);
        }
        self.upload(bucket, key, bytes, content_type)?;
        Ok(true)
    }
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        (**self).download(bucket, key)
    }

    fn upload(&self, bucket: &str, key: &str, bytes: &[u8], content_type: &str) -> Result<()> {
        (**self).upload(bucket, key, bytes, content_type)
    }

    fn exists(&self, bucket: &str, key: &str) -> Result<bool> {
        (**self).exists(bucket, key)
    }

    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        (**self).list(bucket, prefix)
    }

    fn upload_if_absent(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<bool> {
        (**self).upload_if_absent(bucket, key, bytes, content_type)
    }
}

impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    fn download(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        (**self).download(bucket, key)
    }

    fn upload(&self, bucket: &str, key: &str, bytes: &[u8], content_type: &str) -> Result<()> {
        (**self).upload(bucket, key, bytes, content_type)
    }

    fn exists(&self, bucket: &str, key: &str) -> Result<bool> {
        (**self).exists(bucket, key)
    }

    fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        (**self).list(bucket, prefix)
    }

    fn upload_if_absent(
        &self,
        bucket: &str,
        key: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<bool> {
        (**self).upload_if_absent(bucket, key, bytes, content_type)
    }
}
