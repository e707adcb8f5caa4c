#![allow(async_fn_in_trait)]
pub mod calendar;
pub mod download_plan;
mod error;
pub mod goes;
pub mod http_origin;
pub mod jpss;
pub mod matcher;
pub mod naming;
pub mod origin;
pub mod s3_origin;
pub mod scan_selection;
pub mod storage_key;

pub use error::{ArchiveError, Result};
