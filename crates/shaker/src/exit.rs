use std::process::ExitCode;

use clap::error::ErrorKind;
use renderer::{BuildError, RendererError, StageKind};

/// Process exit statuses; each failure phase has its own code so scripts can
/// tell where a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    SubsystemInit,
    Context,
    SourceUnavailable,
    VertexCompile,
    FragmentCompile,
    Link,
    Usage,
    InvalidArgument,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::SubsystemInit => 1,
            ExitStatus::Context => 2,
            ExitStatus::SourceUnavailable => 3,
            ExitStatus::VertexCompile => 4,
            ExitStatus::FragmentCompile => 5,
            ExitStatus::Link => 6,
            ExitStatus::Usage => 7,
            ExitStatus::InvalidArgument => 8,
        }
    }

    /// Classifies a failed run by the renderer error somewhere in its chain.
    pub fn from_run_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<RendererError>() {
            Some(renderer_error) => Self::from(renderer_error),
            // Anything unclassified happened while setting up the context.
            None => ExitStatus::Context,
        }
    }

    /// Classifies a command-line parse failure.
    pub fn from_parse_error(err: &clap::Error) -> Self {
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitStatus::Success,
            ErrorKind::ValueValidation | ErrorKind::InvalidValue => ExitStatus::InvalidArgument,
            _ => ExitStatus::Usage,
        }
    }
}

impl From<&RendererError> for ExitStatus {
    fn from(err: &RendererError) -> Self {
        match err {
            RendererError::SubsystemInit(_) => ExitStatus::SubsystemInit,
            RendererError::Context(_) => ExitStatus::Context,
            RendererError::SourceUnavailable { .. } => ExitStatus::SourceUnavailable,
            RendererError::Build(BuildError::Compile {
                stage: StageKind::Vertex,
                ..
            }) => ExitStatus::VertexCompile,
            RendererError::Build(BuildError::Compile {
                stage: StageKind::Fragment,
                ..
            }) => ExitStatus::FragmentCompile,
            RendererError::Build(BuildError::Link { .. }) => ExitStatus::Link,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}
