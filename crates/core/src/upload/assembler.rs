//! Stream-driven fragment assembly.

use futures::{Stream, StreamExt};

use super::error::UploadError;
use super::fragment::{AssembledUpload, Fragment, PendingUpload};

/// Drain an ordered fragment stream to completion.
///
/// The stream is fully consumed before anything else happens; orchestration
/// never starts on partial data. A transport error aborts assembly and the
/// accumulated state is discarded.
///
/// # Errors
///
/// Returns `UploadError::StreamRead` if the underlying transport yields an
/// error before end-of-stream.
pub async fn assemble<M, E, S>(mut stream: S) -> Result<AssembledUpload<M>, UploadError>
where
    S: Stream<Item = Result<Fragment<M>, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut pending = PendingUpload::new();

    while let Some(item) = stream.next().await {
        match item {
            Ok(fragment) => pending.apply(fragment),
            Err(e) => return Err(UploadError::stream_read(e.to_string())),
        }
    }

    Ok(pending.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::stream;

    type Item = Result<Fragment<&'static str>, std::io::Error>;

    fn ok(fragment: Fragment<&'static str>) -> Item {
        Ok(fragment)
    }

    #[tokio::test]
    async fn test_metadata_then_chunks() {
        let fragments = vec![
            ok(Fragment::Metadata("meta")),
            ok(Fragment::PhotoChunk(Bytes::from_static(&[1, 2]))),
            ok(Fragment::PhotoChunk(Bytes::from_static(&[3, 4]))),
        ];

        let assembled = assemble(stream::iter(fragments)).await.unwrap();

        assert_eq!(assembled.metadata, Some("meta"));
        assert_eq!(assembled.photo, Some(Bytes::from_static(&[1, 2, 3, 4])));
    }

    #[tokio::test]
    async fn test_no_metadata_is_not_an_error() {
        let fragments = vec![ok(Fragment::PhotoChunk(Bytes::from_static(&[7])))];

        let assembled = assemble(stream::iter(fragments)).await.unwrap();

        assert_eq!(assembled.metadata, None);
        assert_eq!(assembled.photo, Some(Bytes::from_static(&[7])));
    }

    #[tokio::test]
    async fn test_transport_error_discards_partial_result() {
        let fragments: Vec<Item> = vec![
            ok(Fragment::Metadata("meta")),
            ok(Fragment::PhotoChunk(Bytes::from_static(&[1, 2]))),
            Err(std::io::Error::other("connection reset")),
        ];

        let err = assemble(stream::iter(fragments)).await.unwrap_err();

        assert!(matches!(err, UploadError::StreamRead(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_interleaved_fragments() {
        let fragments = vec![
            ok(Fragment::PhotoChunk(Bytes::from_static(&[1]))),
            ok(Fragment::Empty),
            ok(Fragment::Metadata("late")),
            ok(Fragment::PhotoChunk(Bytes::from_static(&[2]))),
        ];

        let assembled = assemble(stream::iter(fragments)).await.unwrap();

        assert_eq!(assembled.metadata, Some("late"));
        assert_eq!(assembled.photo, Some(Bytes::from_static(&[1, 2])));
    }
}
