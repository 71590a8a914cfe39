use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::program::BuildError;

/// Every way a preview run can fail before or while entering the render loop.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("could not load \"{}\": {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not initialise the windowing subsystem: {0}")]
    SubsystemInit(String),

    #[error("could not create a rendering context: {0}")]
    Context(String),

    #[error(transparent)]
    Build(#[from] BuildError),
}
