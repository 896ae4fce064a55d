use tracing::{info, warn};

use crate::config::Config;
use crate::docker;
use crate::error::{RenderError, Result};

use super::commands::{build_command, run_command};
use super::types::{InvocationResult, RenderRequest};
use super::{metadata, naming, precheck, rlang};

/// Check a request and build its commands without touching the filesystem
/// or spawning anything.
pub fn prepare(request: &RenderRequest, cfg: &Config) -> Result<InvocationResult> {
    let input = precheck::check(&request.input_path, cfg)?;
    rlang::validate_options(&request.extra_render_options, cfg)?;

    let image_name = naming::image_name(request.image_tag.as_deref(), &input.stem);
    let container_name =
        naming::container_name(request.container_name.as_deref(), &cfg.container_prefix);

    let call = rlang::render_call(&request.extra_render_options, &input.file_name, cfg)?;

    let build_command = build_command(
        cfg,
        request.cache_enabled,
        request.build_args.as_deref(),
        &image_name,
        &input.dir,
    );
    let run_command = run_command(
        cfg,
        &container_name,
        docker::user_id(),
        &input.dir,
        &image_name,
        &call,
    );

    info!(%image_name, %container_name, "render prepared");
    info!(command = %build_command, "build");
    info!(command = %run_command, "run");

    Ok(InvocationResult {
        image_name,
        container_name,
        build_command,
        run_command,
        metadata_path: request
            .persist_metadata
            .then(|| input.metadata_path()),
    })
}

/// Build the image and render the document inside a container.
///
/// The sidecar is written once the commands are known and before anything
/// runs, so a failed build or run still leaves a record for replay. The run
/// step is skipped when the build fails.
pub fn render(request: &RenderRequest, cfg: &Config) -> Result<InvocationResult> {
    let result = prepare(request, cfg)?;

    if let Some(path) = &result.metadata_path {
        metadata::write(path, &result)?;
        info!(path = %path.display(), "metadata written");
    }

    let code = docker::execute(&result.build_command)?;
    if code != 0 {
        warn!(code, "image build failed");
        return Err(RenderError::BuildFailed { code });
    }
    info!(image = %result.image_name, "image built");

    let code = docker::execute(&result.run_command)?;
    if code != 0 {
        warn!(code, "container run failed");
        return Err(RenderError::RunFailed { code });
    }
    info!(container = %result.container_name, "render finished");

    Ok(result)
}

/// Former name of [`render`].
#[deprecated(note = "use `render` instead")]
pub fn render_docker(request: &RenderRequest, cfg: &Config) -> Result<InvocationResult> {
    warn!("render_docker is deprecated, use render instead");
    render(request, cfg)
}
