//! Persisted model artifacts
//!
//! An artifact is a JSON document wrapping a fitted [`RandomForest`] with a
//! format version. Loading validates the version and the forest structure;
//! every failure is reported as a [`LoadError`].

use super::RandomForest;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Artifact layout version written by this crate
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Reasons an artifact could not be used
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode artifact {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("incompatible artifact {path}: {reason}")]
    Incompatible { path: PathBuf, reason: String },
}

#[derive(Serialize, Deserialize)]
struct ForestArtifact {
    format_version: u32,
    model: RandomForest,
}

/// A forest read back from disk
#[derive(Debug, Clone)]
pub struct LoadedArtifact {
    pub model: RandomForest,
    /// Hex SHA-256 of the artifact bytes
    pub checksum: String,
}

/// Read and validate the artifact at `path`
pub fn load_artifact(path: &Path) -> Result<LoadedArtifact, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let artifact: ForestArtifact =
        serde_json::from_slice(&bytes).map_err(|source| LoadError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    if artifact.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(LoadError::Incompatible {
            path: path.to_path_buf(),
            reason: format!(
                "format version {} (supported: {})",
                artifact.format_version, ARTIFACT_FORMAT_VERSION
            ),
        });
    }

    artifact
        .model
        .validate()
        .map_err(|e| LoadError::Incompatible {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    Ok(LoadedArtifact {
        model: artifact.model,
        checksum: compute_checksum(&bytes),
    })
}

impl RandomForest {
    /// Write this forest as an artifact, creating parent directories
    pub fn save(&self, path: &Path) -> anyhow::Result<String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let artifact = ForestArtifact {
            format_version: ARTIFACT_FORMAT_VERSION,
            model: self.clone(),
        };
        let bytes = serde_json::to_vec(&artifact)?;
        fs::write(path, &bytes)?;

        let checksum = compute_checksum(&bytes);
        info!(path = %path.display(), checksum = %checksum, trees = self.n_trees(), "Model artifact written");
        Ok(checksum)
    }
}

fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
