//! Upload input shapes
//!
//! Callers hand the upload interceptor a stream, a filesystem path, or raw
//! bytes. Anything else fails to compile, which is the typed counterpart of
//! rejecting unsupported input shapes at the call site.

use bytes::Bytes;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{GembridgeError, Result};

/// A caller-supplied file input
pub enum FileSource {
    /// An async byte stream, read to completion
    Reader(Box<dyn AsyncRead + Send + Unpin>),
    /// A filesystem path, read from disk
    Path(PathBuf),
    /// Raw bytes, used as-is
    Bytes(Bytes),
}

impl FileSource {
    /// Wrap an async reader as an upload source
    pub fn reader(reader: impl AsyncRead + Send + Unpin + 'static) -> Self {
        FileSource::Reader(Box::new(reader))
    }

    /// Resolve the source into its raw bytes.
    ///
    /// This is the upload path's suspension point: disk and stream reads
    /// yield here, raw bytes return immediately.
    pub async fn into_bytes(self) -> Result<Bytes> {
        match self {
            FileSource::Reader(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf).await?;
                Ok(buf.into())
            }
            FileSource::Path(path) => {
                let buf = tokio::fs::read(&path).await.map_err(|e| {
                    GembridgeError::Upload(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Ok(buf.into())
            }
            FileSource::Bytes(bytes) => Ok(bytes),
        }
    }
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSource::Reader(_) => f.write_str("FileSource::Reader"),
            FileSource::Path(path) => write!(f, "FileSource::Path({})", path.display()),
            FileSource::Bytes(bytes) => write!(f, "FileSource::Bytes({} bytes)", bytes.len()),
        }
    }
}

impl From<&Path> for FileSource {
    fn from(path: &Path) -> Self {
        FileSource::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for FileSource {
    fn from(path: PathBuf) -> Self {
        FileSource::Path(path)
    }
}

// Strings are paths, not content; raw content arrives as bytes.
impl From<&str> for FileSource {
    fn from(path: &str) -> Self {
        FileSource::Path(PathBuf::from(path))
    }
}

impl From<String> for FileSource {
    fn from(path: String) -> Self {
        FileSource::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for FileSource {
    fn from(bytes: Vec<u8>) -> Self {
        FileSource::Bytes(bytes.into())
    }
}

impl From<&[u8]> for FileSource {
    fn from(bytes: &[u8]) -> Self {
        FileSource::Bytes(Bytes::copy_from_slice(bytes))
    }
}

impl From<Bytes> for FileSource {
    fn from(bytes: Bytes) -> Self {
        FileSource::Bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;

    #[tokio::test]
    async fn bytes_source_is_used_as_is() {
        let source = FileSource::from(vec![9u8, 8, 7]);
        let bytes = source.into_bytes().await.unwrap();
        assert_eq!(bytes.as_ref(), &[9u8, 8, 7]);
    }

    #[tokio::test]
    async fn path_source_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"on-disk payload").unwrap();

        let source = FileSource::from(file.path());
        let bytes = source.into_bytes().await.unwrap();
        assert_eq!(bytes.as_ref(), b"on-disk payload");
    }

    #[tokio::test]
    async fn string_source_is_treated_as_a_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"string path payload").unwrap();

        let source = FileSource::from(file.path().to_str().unwrap());
        let bytes = source.into_bytes().await.unwrap();
        assert_eq!(bytes.as_ref(), b"string path payload");
    }

    #[tokio::test]
    async fn missing_path_is_an_upload_error() {
        let source = FileSource::from("/nonexistent/gembridge-upload.bin");
        let err = source.into_bytes().await.unwrap_err();
        assert!(matches!(err, GembridgeError::Upload(_)));
        assert!(err.to_string().contains("/nonexistent/gembridge-upload.bin"));
    }

    #[tokio::test]
    async fn reader_source_is_drained() {
        let source = FileSource::reader(Cursor::new(b"streamed payload".to_vec()));
        let bytes = source.into_bytes().await.unwrap();
        assert_eq!(bytes.as_ref(), b"streamed payload");
    }
}
