// Render orchestration — preconditions, naming, R call serialization, commands, sidecar.

pub mod commands;
pub mod metadata;
pub mod naming;
mod orchestrator;
pub mod precheck;
pub mod rlang;
mod types;

#[allow(deprecated)]
pub use orchestrator::render_docker;
pub use orchestrator::{prepare, render};
pub use types::{InvocationResult, RenderOptions, RenderRequest, ResolvedInput};
