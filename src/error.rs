use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for render operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Everything that can stop a containerized render.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no input document was supplied")]
    InputMissing,

    #[error("input document not found: {0}")]
    InputNotFound(PathBuf),

    #[error("build descriptor not found: {0} (generate it before rendering)")]
    MissingBuildDescriptor(PathBuf),

    #[error("container engine `{0}` not found on PATH")]
    EngineNotFound(String),

    #[error("`input` is set from the document path and cannot be passed as a render option")]
    DuplicateInput,

    #[error("render option `{0}` is not supported inside a container")]
    UnsupportedOption(String),

    #[error("render option `{key}` cannot be serialized: {reason}")]
    UnsupportedValue { key: String, reason: String },

    #[error("image build failed (exit {code})")]
    BuildFailed { code: i32 },

    #[error("container run failed (exit {code})")]
    RunFailed { code: i32 },

    #[error("failed to spawn `{command}`")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse command `{command}`: {reason}")]
    CommandParse { command: String, reason: String },

    #[error("cannot access metadata file {path}")]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenderError {
    /// True for failures detected before any file is written or process spawned.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::InputMissing
                | Self::InputNotFound(_)
                | Self::MissingBuildDescriptor(_)
                | Self::EngineNotFound(_)
                | Self::DuplicateInput
                | Self::UnsupportedOption(_)
                | Self::UnsupportedValue { .. }
        )
    }

    /// Process exit code for this failure. Subprocess failures propagate their own code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::BuildFailed { code } | Self::RunFailed { code } => *code,
            e if e.is_precondition() => 2,
            _ => 1,
        }
    }
}
