use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::origin::RemoteOrigin;
use crate::storage_key::StorageKey;

/// One granule to copy: a remote key and the local path to write it to.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    key: String,
    output: String,
}

impl DownloadTask {
    pub fn new(key: &str, output: &str) -> Self {
        DownloadTask {
            key: key.to_string(),
            output: output.to_string(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn output(&self) -> &Path {
        Path::new(&self.output)
    }
}

/// The resolved result of one selection: the tasks to run, in listing
/// order, plus the id of the selection that produced them.
#[derive(Deserialize, Serialize, Debug)]
pub struct DownloadPlan {
    id: String,
    tasks: Vec<DownloadTask>,
}

impl DownloadPlan {
    pub fn new(id: &str, tasks: Vec<DownloadTask>) -> Self {
        Self {
            id: id.to_string(),
            tasks,
        }
    }

    pub fn tasks(&self) -> &[DownloadTask] {
        &self.tasks
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let plan: Self = serde_json::from_str(&content)?;
        Ok(plan)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Runs every task sequentially, in order, one request at a time.
    ///
    /// Destinations are always overwritten. The first failed fetch aborts
    /// the plan; a partial run is never reported as success. Returns the
    /// total bytes written.
    pub async fn execute(&self, origin: &impl RemoteOrigin) -> Result<u64> {
        let mut total_bytes = 0_u64;
        for task in self.tasks.iter() {
            log::info!("task: {} -> {}", task.key, task.output);
            let key = StorageKey::new(task.key.clone());
            total_bytes += origin.fetch(&key, task.output()).await?;
        }
        Ok(total_bytes)
    }
}

/// Joins a remote key's filename onto the output directory, keeping the
/// granule's original name.
pub fn output_path(output_dir: &Path, key: &StorageKey) -> PathBuf {
    output_dir.join(key.filename())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_OUTPUT_PATH: &str = "/tmp/granule-fetch-download_plan.json";

    fn mock_download_plan() -> DownloadPlan {
        DownloadPlan {
            id: "goes.abi-l2-mcmipm".to_string(),
            tasks: vec![
                DownloadTask {
                    key: "ABI-L2-MCMIPM/2022/336/20/file1.nc".to_string(),
                    output: "/tmp/granules/file1.nc".to_string(),
                },
                DownloadTask {
                    key: "ABI-L2-MCMIPM/2022/336/20/file2.nc".to_string(),
                    output: "/tmp/granules/file2.nc".to_string(),
                },
                DownloadTask {
                    key: "ABI-L2-MCMIPM/2022/336/21/file3.nc".to_string(),
                    output: "/tmp/granules/file3.nc".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_write_json() {
        let path = Path::new(TEST_OUTPUT_PATH);
        let plan = mock_download_plan();
        plan.write(path).unwrap();
        assert_eq!(path.exists(), true);
    }

    #[test]
    fn test_read_json() {
        let path = Path::new(TEST_OUTPUT_PATH);
        let plan = mock_download_plan();
        plan.write(path).unwrap();

        let plan = DownloadPlan::read(path).unwrap();
        assert_eq!(plan.id, "goes.abi-l2-mcmipm");
        assert_eq!(plan.tasks.len(), 3);
        assert_eq!(plan.tasks[0].key(), "ABI-L2-MCMIPM/2022/336/20/file1.nc");
    }

    #[test]
    fn test_output_path_keeps_remote_filename() {
        let key = StorageKey::new("ABI-L2-MCMIPM/2022/336/20/file1.nc");
        let out = output_path(Path::new("./outputs"), &key);
        assert_eq!(out, PathBuf::from("./outputs/file1.nc"));
    }
}
