//! Deferred byte-retrieval handles.
//!
//! A [`ByteSource`] is a capability: invoking [`ByteSource::fetch`]
//! asynchronously yields the raw encoded bytes of one channel-source
//! image, or fails with [`RetrieveError`]. The handle decouples *where
//! bytes come from* (archive entry, external file, GLB buffer slice,
//! network payload) from *what texture they belong to*.
//!
//! Handles are conceptually idempotent: repeated invocation yields the
//! same bytes. Implementations are not required to cache; callers that
//! need the bytes more than once should cache them locally. Handles are
//! `Send + Sync` and may be invoked concurrently.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::RetrieveError;

type FetchFn = dyn Fn() -> BoxFuture<'static, Result<Vec<u8>, RetrieveError>> + Send + Sync;

/// A deferred, asynchronously-invocable byte-retrieval handle.
///
/// Cloning is cheap: clones share the underlying callable.
#[derive(Clone)]
pub struct ByteSource {
    fetch: Arc<FetchFn>,
}

impl ByteSource {
    /// Wraps an arbitrary async callable as a byte source.
    ///
    /// # Example
    ///
    /// ```
    /// use retex_import::source::ByteSource;
    ///
    /// let source = ByteSource::new(|| async { Ok(vec![0x89, b'P', b'N', b'G']) });
    /// ```
    pub fn new<F, Fut>(fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<u8>, RetrieveError>> + Send + 'static,
    {
        Self {
            fetch: Arc::new(move || Box::pin(fetch())),
        }
    }

    /// A source backed by an owned in-memory buffer.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::from_shared(Arc::new(bytes))
    }

    /// A source backed by a shared buffer, e.g. a GLB binary blob that
    /// several channel handles slice into.
    pub fn from_shared(bytes: Arc<Vec<u8>>) -> Self {
        Self::new(move || {
            let bytes = Arc::clone(&bytes);
            async move { Ok(bytes.as_ref().clone()) }
        })
    }

    /// A source yielding `length` bytes at `offset` of a shared buffer.
    ///
    /// The range is validated at fetch time, so a handle over a
    /// malformed buffer view fails with [`RetrieveError::OutOfRange`]
    /// instead of panicking.
    pub fn from_shared_slice(bytes: Arc<Vec<u8>>, offset: usize, length: usize) -> Self {
        Self::new(move || {
            let bytes = Arc::clone(&bytes);
            async move {
                let end = offset
                    .checked_add(length)
                    .filter(|end| *end <= bytes.len())
                    .ok_or(RetrieveError::OutOfRange {
                        offset,
                        length,
                        len: bytes.len(),
                    })?;
                Ok(bytes[offset..end].to_vec())
            }
        })
    }

    /// A source that reads a file on every fetch.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::new(move || {
            let path = path.clone();
            async move {
                tokio::fs::read(&path)
                    .await
                    .map_err(|source| RetrieveError::Io { path, source })
            }
        })
    }

    /// Invokes the handle, yielding the raw encoded bytes.
    pub async fn fetch(&self) -> Result<Vec<u8>, RetrieveError> {
        (self.fetch)().await
    }
}

impl fmt::Debug for ByteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ByteSource")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_from_bytes_yields_payload() {
        let source = ByteSource::from_bytes(vec![1, 2, 3]);
        assert_eq!(source.fetch().await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fetch_is_idempotent() {
        let source = ByteSource::from_bytes(vec![9, 8, 7]);
        let first = source.fetch().await.unwrap();
        let second = source.fetch().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_shared_slice_bounds() {
        let blob = Arc::new(vec![0u8, 1, 2, 3, 4, 5, 6, 7]);

        let mid = ByteSource::from_shared_slice(Arc::clone(&blob), 2, 3);
        assert_eq!(mid.fetch().await.unwrap(), vec![2, 3, 4]);

        let past_end = ByteSource::from_shared_slice(Arc::clone(&blob), 6, 4);
        assert!(matches!(
            past_end.fetch().await.unwrap_err(),
            RetrieveError::OutOfRange { len: 8, .. }
        ));

        let overflowing = ByteSource::from_shared_slice(blob, usize::MAX, 2);
        assert!(matches!(
            overflowing.fetch().await.unwrap_err(),
            RetrieveError::OutOfRange { .. }
        ));
    }

    #[tokio::test]
    async fn test_from_file_reads_and_repeats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("channel.bin");
        std::fs::write(&path, b"raw channel bytes").unwrap();

        let source = ByteSource::from_file(&path);
        assert_eq!(source.fetch().await.unwrap(), b"raw channel bytes");
        assert_eq!(source.fetch().await.unwrap(), b"raw channel bytes");
    }

    #[tokio::test]
    async fn test_from_file_missing_path_errors() {
        let source = ByteSource::from_file("/nonexistent/texture.png");
        assert!(matches!(
            source.fetch().await.unwrap_err(),
            RetrieveError::Io { .. }
        ));
    }

    #[tokio::test]
    async fn test_custom_source_failure() {
        let source = ByteSource::new(|| async {
            Err(RetrieveError::Decode("truncated payload".to_string()))
        });
        let err = source.fetch().await.unwrap_err();
        assert_eq!(err.to_string(), "failed to decode byte source payload: truncated payload");
    }

    #[tokio::test]
    async fn test_clone_shares_callable() {
        let source = ByteSource::from_bytes(vec![42]);
        let clone = source.clone();
        assert_eq!(source.fetch().await.unwrap(), clone.fetch().await.unwrap());
    }
}
