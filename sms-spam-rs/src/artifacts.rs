//! Model artifact download from the Hugging Face hub
//!
//! Files land in the standard hub cache, so repeated startups reuse them.

use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::{Result, SpamError};

/// Download (or reuse from cache) a list of files from one hub repository.
///
/// Returns the local path of each file, in the order requested.
pub fn fetch_files(repo: &str, revision: &str, files: &[&str]) -> Result<Vec<PathBuf>> {
    info!("Fetching {:?} from hub repository {}@{}", files, repo, revision);

    let api = Api::new().map_err(|e| SpamError::ArtifactFetch {
        artifact: repo.to_string(),
        reason: format!("Failed to initialize hub client: {}", e),
    })?;
    let repo_obj = api.repo(Repo::with_revision(
        repo.to_string(),
        RepoType::Model,
        revision.to_string(),
    ));

    files
        .iter()
        .map(|file| {
            let path = repo_obj.get(file).map_err(|e| SpamError::ArtifactFetch {
                artifact: format!("{}/{}", repo, file),
                reason: e.to_string(),
            })?;
            debug!("Fetched {} -> {}", file, path.display());
            Ok(path)
        })
        .collect()
}

/// Download a single file from a hub repository
pub fn fetch_file(repo: &str, revision: &str, file: &str) -> Result<PathBuf> {
    let mut paths = fetch_files(repo, revision, &[file])?;
    paths.pop().ok_or_else(|| SpamError::ArtifactFetch {
        artifact: format!("{}/{}", repo, file),
        reason: "hub returned no path".to_string(),
    })
}
