use std::ffi::OsStr;
use std::path::Path;

use tracing::debug;

use crate::config::Config;
use crate::docker;
use crate::error::{RenderError, Result};

use super::rlang::INPUT_ARG;
use super::types::ResolvedInput;

/// Validate that a render can run, before any command is built.
///
/// Checks run in order: input supplied, input exists, build descriptor
/// exists next to it, engine resolvable. Nothing is written or spawned.
pub fn check(input_path: &Path, cfg: &Config) -> Result<ResolvedInput> {
    if input_path.as_os_str().is_empty() {
        return Err(RenderError::InputMissing);
    }
    if !input_path.is_file() {
        return Err(RenderError::InputNotFound(input_path.to_path_buf()));
    }

    // Absolute but not canonical: a symlinked input keeps its own directory and stem.
    let path = std::path::absolute(input_path)
        .map_err(|_| RenderError::InputNotFound(input_path.to_path_buf()))?;
    let dir = path
        .parent()
        .ok_or_else(|| RenderError::InputNotFound(input_path.to_path_buf()))?
        .to_path_buf();
    let file_name = utf8_component(path.file_name())?;
    let stem = utf8_component(path.file_stem())?;

    let descriptor = dir.join(&cfg.descriptor_name);
    if !descriptor.is_file() {
        return Err(RenderError::MissingBuildDescriptor(descriptor));
    }

    let engine = docker::resolve_engine(&cfg.engine)
        .ok_or_else(|| RenderError::EngineNotFound(cfg.engine.clone()))?;

    debug!(input = %path.display(), engine = %engine.display(), "preconditions satisfied");

    Ok(ResolvedInput {
        path,
        dir,
        file_name,
        stem,
        engine,
    })
}

/// File names end up inside R source and image tags, so they must be valid UTF-8.
fn utf8_component(part: Option<&OsStr>) -> Result<String> {
    let part = part.unwrap_or_default();
    part.to_str()
        .map(str::to_string)
        .ok_or_else(|| RenderError::UnsupportedValue {
            key: INPUT_ARG.into(),
            reason: format!("file name {} is not valid UTF-8", part.to_string_lossy()),
        })
}
