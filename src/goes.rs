//! GOES/ABI archive family: the listable S3 namespace.
//!
//! Keys follow `<product>/<year>/<ordinal-day>/<hour>/<filename>` inside a
//! per-satellite bucket. Resolution is: build the hour prefix, list it,
//! extract filename fields, match.

use std::path::PathBuf;

use strum::{EnumString, IntoStaticStr};

use crate::calendar::DateSelector;
use crate::download_plan::{output_path, DownloadPlan, DownloadTask};
use crate::error::{ArchiveError, Result};
use crate::matcher::{select_matching, MatchSpec};
use crate::naming::Family;
use crate::origin::RemoteOrigin;
use crate::scan_selection::ScanSelection;
use crate::storage_key::{build_key, Segment, StorageKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, IntoStaticStr)]
pub enum Satellite {
    #[strum(serialize = "G16")]
    Goes16,
    #[strum(serialize = "G17")]
    Goes17,
    #[strum(serialize = "G18")]
    Goes18,
}

impl Satellite {
    /// The NOAA Open Data bucket holding this satellite's archive.
    pub fn bucket(&self) -> &'static str {
        match self {
            Satellite::Goes16 => "noaa-goes16",
            Satellite::Goes17 => "noaa-goes17",
            Satellite::Goes18 => "noaa-goes18",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, IntoStaticStr)]
pub enum AbiProduct {
    #[strum(serialize = "ABI-L2-MCMIPC")]
    McmipC,
    #[strum(serialize = "ABI-L2-MCMIPF")]
    McmipF,
    #[strum(serialize = "ABI-L2-MCMIPM")]
    McmipM,
    #[strum(serialize = "ABI-L2-FDCC")]
    FdcC,
    #[strum(serialize = "ABI-L2-FDCF")]
    FdcF,
    #[strum(serialize = "ABI-L2-FDCM")]
    FdcM,
}

/// The one-level prefix holding every scan of `product` for the given
/// date and UTC hour, e.g. `ABI-L2-MCMIPM/2022/336/20/`.
pub fn hour_prefix(product: AbiProduct, date: &DateSelector, hour: u32) -> Result<StorageKey> {
    let product: &'static str = product.into();
    let key = build_key(&[
        Segment::name(product),
        Segment::padded(date.year as u64, 4),
        Segment::padded(date.ordinal()? as u64, 3),
        Segment::padded(hour as u64, 2),
    ])?;
    Ok(key.into_prefix())
}

/// Lists the hour prefix and returns the scans matching `spec`, in the
/// order the origin listed them.
pub async fn find_scans(
    origin: &impl RemoteOrigin,
    product: AbiProduct,
    date: &DateSelector,
    hour: u32,
    spec: &MatchSpec,
) -> Result<Vec<StorageKey>> {
    let prefix = hour_prefix(product, date, hour)?;
    let listing = origin.list(&prefix).await?;
    log::debug!("{} candidate scans under {}", listing.len(), prefix);
    select_matching(&listing, Family::Abi, spec)
}

/// Inline template for an ABI scan selection.
pub fn scan_selection_toml() -> toml::Table {
    toml::toml! {
        id = "goes.abi-l2-mcmipm"

        archive = "abi"

        // GOES-East; the satellite picks the bucket.
        satellite = "G16"

        product = "ABI-L2-MCMIPM"

        year = 2022
        month = 12
        day = 2
        hour = 20

        // Exact HHMM start time. Use [window] with start/end instead for
        // an inclusive range.
        start_time = "2030"

        // Mesoscale sector 2 only.
        product_code = "MCMIPM2"
    }
}

/// Resolves a selection against the origin and plans one task per match,
/// each written under its remote filename in `output_dir`.
pub async fn generate_download_plan(
    origin: &impl RemoteOrigin,
    selection: &ScanSelection,
    output_dir: PathBuf,
) -> Result<DownloadPlan> {
    let product: AbiProduct = selection
        .product()
        .parse()
        .map_err(|_| ArchiveError::InvalidSelection(format!(
            "unknown ABI product: {}",
            selection.product()
        )))?;
    let date = selection.date();
    let hour = selection
        .hour()
        .ok_or_else(|| ArchiveError::InvalidSelection("selection has no hour".into()))?;
    let spec = selection.to_match_spec()?;

    let scans = find_scans(origin, product, &date, hour, &spec).await?;

    let tasks = scans
        .iter()
        .map(|key| {
            let output = output_path(&output_dir, key);
            DownloadTask::new(key.as_str(), &output.to_string_lossy())
        })
        .collect();

    Ok(DownloadPlan::new(selection.id(), tasks))
}
