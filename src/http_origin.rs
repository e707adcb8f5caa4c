//! Web-archive origin: files at fixed URLs, no listing capability.
//!
//! The archive serves granules at `base_url + filename`, where the caller
//! constructs the filename from the family naming convention. Existence
//! and size come from a metadata-only HEAD request; the body is a single
//! GET.

use std::io::Write;
use std::path::Path;

use futures_util::StreamExt;
use reqwest::StatusCode;
use url::Url;

use crate::error::{ArchiveError, Result};
use crate::origin::{prepare_destination, RemoteObject, RemoteOrigin};
use crate::storage_key::StorageKey;

pub struct HttpOrigin {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpOrigin {
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn url_for(&self, key: &StorageKey) -> Result<Url> {
        self.base_url
            .join(key.as_str())
            .map_err(ArchiveError::unavailable)
    }

    async fn head(&self, key: &StorageKey) -> Result<RemoteObject> {
        let url = self.url_for(key)?;
        log::debug!("probing {}", url);

        let response = self
            .client
            .head(url)
            .send()
            .await
            .map_err(ArchiveError::unavailable)?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ArchiveError::NotFound(key.to_string())),
            status if status.is_success() => Ok(RemoteObject {
                key: key.clone(),
                size: response.content_length().map(|len| len as i64),
            }),
            status => Err(ArchiveError::unavailable(format!(
                "unexpected status {status} for {key}"
            ))),
        }
    }
}

impl RemoteOrigin for HttpOrigin {
    /// The origin cannot enumerate, so listing degenerates to a probe of
    /// the exact path: one key when it exists, `PrefixNotFound` when the
    /// server reports no such resource.
    async fn list(&self, prefix: &StorageKey) -> Result<Vec<StorageKey>> {
        match self.head(prefix).await {
            Ok(object) => Ok(vec![object.key]),
            Err(ArchiveError::NotFound(path)) => Err(ArchiveError::PrefixNotFound(path)),
            Err(err) => Err(err),
        }
    }

    async fn stat(&self, key: &StorageKey) -> Result<RemoteObject> {
        self.head(key).await
    }

    async fn fetch(&self, key: &StorageKey, dest: &Path) -> Result<u64> {
        let url = self.url_for(key)?;
        log::info!("fetching {} -> {:?}", url, dest);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ArchiveError::unavailable)?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ArchiveError::NotFound(key.to_string())),
            status if status.is_success() => {}
            status => {
                return Err(ArchiveError::unavailable(format!(
                    "unexpected status {status} for {key}"
                )))
            }
        }

        let mut file = prepare_destination(dest)?;
        let mut byte_count = 0_u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|err| ArchiveError::fetch(key.as_str(), err))?;
            file.write_all(&bytes)
                .map_err(|err| ArchiveError::fetch(key.as_str(), err))?;
            byte_count += bytes.len() as u64;
        }

        log::info!("wrote {} bytes to {:?}", byte_count, dest);
        Ok(byte_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let base = Url::parse("https://archive.example.gov/viirs/af/").unwrap();
        let origin = HttpOrigin::new(base);
        let url = origin
            .url_for(&StorageKey::new(
                "AF-Iband_v1r1_j01_s202212022030123_e202212022031365_c202212022101190.nc",
            ))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://archive.example.gov/viirs/af/AF-Iband_v1r1_j01_s202212022030123_e202212022031365_c202212022101190.nc"
        );
    }
}
