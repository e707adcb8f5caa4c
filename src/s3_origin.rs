//! Object-storage origin backed by the anonymous NOAA Open Data buckets.

use std::io::Write;
use std::path::Path;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;

use crate::error::{ArchiveError, Result};
use crate::origin::{prepare_destination, RemoteObject, RemoteOrigin};
use crate::storage_key::StorageKey;

const DEFAULT_REGION: &str = "us-east-1";

/// An S3 bucket reached with anonymous credentials. The archive buckets
/// are public and read-only; no credential chain is consulted.
pub struct S3Origin {
    client: Client,
    bucket: String,
}

impl S3Origin {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub async fn anonymous(bucket: impl Into<String>) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .no_credentials()
            .region(Region::new(DEFAULT_REGION))
            .load()
            .await;
        Self::new(Client::new(&config), bucket)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl RemoteOrigin for S3Origin {
    async fn list(&self, prefix: &StorageKey) -> Result<Vec<StorageKey>> {
        log::debug!("listing s3://{}/{}", self.bucket, prefix);

        // A trailing separator asks for one level only; without it the
        // listing recurses over everything below the prefix.
        let mut request = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(prefix.as_str());
        if prefix.is_prefix() {
            request = request.delimiter("/");
        }

        let mut pages = request.into_paginator().send();
        let mut keys = vec![];
        let mut namespace_seen = false;

        while let Some(page) = pages.next().await {
            let page = page.map_err(ArchiveError::unavailable)?;
            if !page.common_prefixes().is_empty() {
                namespace_seen = true;
            }
            for object in page.contents() {
                if let Some(key) = object.key() {
                    keys.push(StorageKey::new(key));
                }
            }
        }

        // S3 has no directories: a prefix with neither objects nor common
        // prefixes below it does not exist in the namespace at all.
        if keys.is_empty() && !namespace_seen {
            return Err(ArchiveError::PrefixNotFound(prefix.to_string()));
        }

        log::debug!("{} keys under {}", keys.len(), prefix);
        Ok(keys)
    }

    async fn stat(&self, key: &StorageKey) -> Result<RemoteObject> {
        let head = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await;

        match head {
            Ok(head) => Ok(RemoteObject {
                key: key.clone(),
                size: head.content_length(),
            }),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Err(ArchiveError::NotFound(key.to_string()))
                } else {
                    Err(ArchiveError::unavailable(service_err))
                }
            }
        }
    }

    async fn fetch(&self, key: &StorageKey, dest: &Path) -> Result<u64> {
        log::info!("fetching s3://{}/{} -> {:?}", self.bucket, key, dest);

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await;

        let mut object = match response {
            Ok(object) => object,
            Err(err) => {
                let service_err = err.into_service_error();
                return if service_err.is_no_such_key() {
                    Err(ArchiveError::NotFound(key.to_string()))
                } else {
                    Err(ArchiveError::unavailable(service_err))
                };
            }
        };

        let mut file = prepare_destination(dest)?;
        let mut byte_count = 0_u64;
        while let Some(bytes) = object
            .body
            .try_next()
            .await
            .map_err(|err| ArchiveError::fetch(key.as_str(), err))?
        {
            file.write_all(&bytes)
                .map_err(|err| ArchiveError::fetch(key.as_str(), err))?;
            byte_count += bytes.len() as u64;
        }

        log::info!("wrote {} bytes to {:?}", byte_count, dest);
        Ok(byte_count)
    }
}
