use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::RendererError;

/// Reads the user's fragment shader body.
///
/// The contents are returned untouched; GLSL problems surface later at
/// compile time. The file must be UTF-8 since the compiler consumes text.
pub fn load_fragment_source(path: &Path) -> Result<String, RendererError> {
    let unavailable = |source: io::Error| RendererError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    };

    let bytes = fs::read(path).map_err(unavailable)?;
    let text = String::from_utf8(bytes)
        .map_err(|err| unavailable(io::Error::new(io::ErrorKind::InvalidData, err)))?;

    debug!(path = %path.display(), bytes = text.len(), "loaded fragment shader");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn returns_file_contents_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("red.glsl");
        let body = "void main(){ glx_FragColor = vec4(1.0,0.0,0.0,1.0); }\n";
        fs::write(&path, body).unwrap();
        let loaded = load_fragment_source(&path).unwrap();
        assert_eq!(loaded, body);
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("does-not-exist.glsl");
        let err = load_fragment_source(&path).unwrap_err();
        assert!(matches!(err, RendererError::SourceUnavailable { .. }));
        assert!(err.to_string().contains("does-not-exist.glsl"));
    }

    #[test]
    fn non_utf8_file_is_unavailable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.glsl");
        fs::write(&path, [0xff, 0xfe, 0x00, 0x80]).unwrap();
        match load_fragment_source(&path).unwrap_err() {
            RendererError::SourceUnavailable { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::InvalidData)
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
