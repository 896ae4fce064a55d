use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Map, Value};

/// Pass-through options forwarded to the in-container render call.
pub type RenderOptions = Map<String, Value>;

/// Input to a containerized render.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub input_path: PathBuf,
    /// Image tag; defaults to the input's file stem.
    pub image_tag: Option<String>,
    /// Appended verbatim to the build command. The caller owns its quoting.
    pub build_args: Option<String>,
    /// Defaults to a generated unique name.
    pub container_name: Option<String>,
    pub cache_enabled: bool,
    pub persist_metadata: bool,
    pub extra_render_options: RenderOptions,
}

impl RenderRequest {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            image_tag: None,
            build_args: None,
            container_name: None,
            cache_enabled: true,
            persist_metadata: true,
            extra_render_options: RenderOptions::new(),
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.image_tag = Some(tag.into());
        self
    }

    pub fn build_args(mut self, args: impl Into<String>) -> Self {
        self.build_args = Some(args.into());
        self
    }

    pub fn container_name(mut self, name: impl Into<String>) -> Self {
        self.container_name = Some(name.into());
        self
    }

    pub fn cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn persist_metadata(mut self, enabled: bool) -> Self {
        self.persist_metadata = enabled;
        self
    }

    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra_render_options.insert(key.into(), value.into());
        self
    }

    pub fn options(mut self, options: RenderOptions) -> Self {
        self.extra_render_options.extend(options);
        self
    }
}

/// An input document that passed the precondition checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedInput {
    /// Absolute path of the document, symlinks left as given.
    pub path: PathBuf,
    /// Directory holding the document and its build descriptor.
    pub dir: PathBuf,
    pub file_name: String,
    pub stem: String,
    /// Engine executable as found on disk.
    pub engine: PathBuf,
}

impl ResolvedInput {
    /// Sidecar location: `<dir>/<stem>.docker.yml`.
    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(format!("{}.docker.yml", self.stem))
    }
}

/// Resolved names and the two commands for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationResult {
    pub image_name: String,
    pub container_name: String,
    pub build_command: String,
    pub run_command: String,
    /// Sidecar location when metadata persistence is enabled. `prepare`
    /// fills it in without writing; `render` writes the file there.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_path: Option<PathBuf>,
}
