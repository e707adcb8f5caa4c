use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use granule_fetch::download_plan::DownloadPlan;
use granule_fetch::goes::{self, Satellite};
use granule_fetch::http_origin::HttpOrigin;
use granule_fetch::jpss;
use granule_fetch::naming::Family;
use granule_fetch::origin::RemoteOrigin;
use granule_fetch::s3_origin::S3Origin;
use granule_fetch::scan_selection::ScanSelection;

#[tokio::main]
async fn main() -> Result<()> {
    let input_dir = PathBuf::from("./inputs");
    let output_dir = PathBuf::from("./outputs");
    fs::create_dir_all(&output_dir)?;

    let selection_toml = input_dir.join("scan_selection.toml");
    let selection = ScanSelection::read(selection_toml)?;

    match selection.family()? {
        Family::Abi => {
            let satellite: Satellite = selection.satellite().parse().map_err(|_| {
                anyhow::anyhow!("unknown GOES satellite: {}", selection.satellite())
            })?;
            let origin = S3Origin::anonymous(satellite.bucket()).await;
            let plan = goes::generate_download_plan(&origin, &selection, output_dir.clone()).await?;
            run(plan, &origin, &output_dir).await
        }
        Family::Viirs => {
            let origin = HttpOrigin::new(selection.base_url()?);
            let plan = jpss::generate_download_plan(&origin, &selection, output_dir.clone()).await?;
            run(plan, &origin, &output_dir).await
        }
    }
}

async fn run(plan: DownloadPlan, origin: &impl RemoteOrigin, output_dir: &Path) -> Result<()> {
    plan.write(output_dir.join("download_plan.json"))?;
    for task in plan.tasks() {
        println!("planned: {}", task.key());
    }

    let bytes = plan.execute(origin).await?;
    println!("retrieved {bytes} bytes");
    Ok(())
}
