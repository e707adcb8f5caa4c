//! The capability contract both remote origins implement.

use std::fs::{self, File};
use std::path::Path;

use crate::error::Result;
use crate::storage_key::StorageKey;

/// A handle to one remote object. The size is advisory, reported from a
/// metadata call; it is never used for correctness decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    pub key: StorageKey,
    pub size: Option<i64>,
}

/// One remote origin: a listable object-storage namespace or a probe-only
/// web archive. Every call is a single attempt; retry policy belongs to
/// the caller.
pub trait RemoteOrigin {
    /// All keys under `prefix`, in whatever order the origin returns them.
    ///
    /// A prefix that denotes no namespace entry is `PrefixNotFound`; a
    /// prefix that exists but holds no objects is `Ok(vec![])`.
    async fn list(&self, prefix: &StorageKey) -> Result<Vec<StorageKey>>;

    /// Existence and size of one object, without transferring its body.
    async fn stat(&self, key: &StorageKey) -> Result<RemoteObject>;

    /// Copies the full object body to `dest`, creating or truncating the
    /// destination. Returns the number of bytes written.
    async fn fetch(&self, key: &StorageKey, dest: &Path) -> Result<u64>;
}

/// Opens `dest` for writing, creating parent directories as necessary.
/// Any existing file at `dest` is truncated.
pub fn prepare_destination(dest: &Path) -> Result<File> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(File::create(dest)?)
}
