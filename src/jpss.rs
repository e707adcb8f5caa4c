//! JPSS/VIIRS archive family: the probe-only web archive.
//!
//! The active-fire archive has no listing endpoint; candidate filenames
//! are constructed by the caller from the naming convention, probed for
//! existence and size, then matched on their embedded start times.
//!
//! Range matching compares HHMM only, within one UTC day. A window that
//! crosses midnight ("2359" to "0001") would misorder, so selections are
//! rejected when start > end.

use std::path::PathBuf;

use strum::{EnumString, IntoStaticStr};

use crate::download_plan::{output_path, DownloadPlan, DownloadTask};
use crate::error::{ArchiveError, Result};
use crate::matcher::MatchSpec;
use crate::naming::{extract, Family};
use crate::origin::{RemoteObject, RemoteOrigin};
use crate::scan_selection::ScanSelection;
use crate::storage_key::StorageKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, IntoStaticStr)]
pub enum Satellite {
    #[strum(serialize = "npp")]
    SuomiNpp,
    #[strum(serialize = "j01")]
    Noaa20,
    #[strum(serialize = "j02")]
    Noaa21,
}

/// Probes each candidate filename that satisfies `spec` and returns the
/// handles of the ones the archive actually has, in candidate order.
///
/// An absent candidate is skipped (the probe-only analog of an empty
/// listing); a transport failure aborts the whole resolution.
pub async fn find_granules(
    origin: &impl RemoteOrigin,
    candidates: &[String],
    spec: &MatchSpec,
) -> Result<Vec<RemoteObject>> {
    let mut found = vec![];
    for name in candidates {
        let fields = extract(name, Family::Viirs)?;
        if !spec.matches(&fields) {
            continue;
        }
        let key = StorageKey::new(name.as_str());
        match origin.stat(&key).await {
            Ok(object) => {
                log::debug!("present: {} ({:?} bytes)", name, object.size);
                found.push(object);
            }
            Err(ArchiveError::NotFound(_)) => {
                log::debug!("absent: {}", name);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(found)
}

/// Inline template for a VIIRS active-fire selection.
pub fn scan_selection_toml() -> toml::Table {
    toml::toml! {
        id = "jpss.af-iband"

        archive = "viirs"

        // NOAA-20.
        satellite = "j01"

        product = "AF-Iband"

        year = 2022
        month = 12
        day = 2

        // Candidate filenames, constructed from the naming convention;
        // the archive cannot be listed.
        granules = [
            "AF-Iband_v1r1_j01_s202212022030123_e202212022031365_c202212022101190.nc",
            "AF-Iband_v1r1_j01_s202212022031366_e202212022033008_c202212022102204.nc",
        ]

        [window]
        start = "2030"
        end = "2035"
    }
}

/// Probes a selection's candidate granules and plans one task per hit,
/// each written under its remote filename in `output_dir`.
pub async fn generate_download_plan(
    origin: &impl RemoteOrigin,
    selection: &ScanSelection,
    output_dir: PathBuf,
) -> Result<DownloadPlan> {
    let candidates = selection.granules_to_probe().ok_or_else(|| {
        ArchiveError::InvalidSelection("selection lists no candidate granules".into())
    })?;
    let spec = selection.to_match_spec()?;

    let granules = find_granules(origin, &candidates, &spec).await?;

    let tasks = granules
        .iter()
        .map(|object| {
            let output = output_path(&output_dir, &object.key);
            DownloadTask::new(object.key.as_str(), &output.to_string_lossy())
        })
        .collect();

    Ok(DownloadPlan::new(selection.id(), tasks))
}
