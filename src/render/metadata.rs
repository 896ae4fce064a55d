use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

use super::types::InvocationResult;

/// On-disk sidecar record consumed by image cleanup and replay tooling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockerMetadata {
    pub container_name: String,
    pub image_name: String,
    pub docker_build_cmd: String,
    pub docker_run_cmd: String,
}

impl From<&InvocationResult> for DockerMetadata {
    fn from(result: &InvocationResult) -> Self {
        Self {
            container_name: result.container_name.clone(),
            image_name: result.image_name.clone(),
            docker_build_cmd: result.build_command.clone(),
            docker_run_cmd: result.run_command.clone(),
        }
    }
}

/// Write the sidecar, replacing any existing file.
///
/// Not atomic: two renders of the same input race and the last writer wins.
pub fn write(path: &Path, result: &InvocationResult) -> Result<()> {
    let yaml = serde_yaml::to_string(&DockerMetadata::from(result))
        .map_err(|e| metadata_error(path, std::io::Error::other(e)))?;
    std::fs::write(path, yaml).map_err(|e| metadata_error(path, e))
}

/// Load a sidecar written by [`write`].
pub fn read(path: &Path) -> Result<DockerMetadata> {
    let contents = std::fs::read_to_string(path).map_err(|e| metadata_error(path, e))?;
    serde_yaml::from_str(&contents)
        .map_err(|e| metadata_error(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn metadata_error(path: &Path, source: std::io::Error) -> RenderError {
    RenderError::Metadata {
        path: path.to_path_buf(),
        source,
    }
}
