//! Fragment model and the per-call accumulator.

use bytes::{Bytes, BytesMut};

/// One unit of a chunked streamed request.
///
/// A fragment carries exactly one of a metadata object or a slice of photo
/// bytes; fragments carrying neither are `Empty` and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment<M> {
    /// Structured metadata. Callers send it once, typically first; if it
    /// appears more than once the last one wins.
    Metadata(M),
    /// A slice of the binary photo payload.
    PhotoChunk(Bytes),
    /// A fragment carrying nothing.
    Empty,
}

/// The fully assembled content of one streamed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledUpload<M> {
    /// The last non-empty metadata object seen, if any. Absence is not an
    /// error here; the caller decides whether it is fatal.
    pub metadata: Option<M>,
    /// All photo bytes concatenated in arrival order. `None` if no
    /// non-empty chunk arrived.
    pub photo: Option<Bytes>,
}

/// Transient accumulator for one in-flight streamed call.
///
/// Scoped to a single request: created when the stream opens, consumed by
/// [`PendingUpload::finish`] or dropped on any error path. Never shared
/// across calls.
#[derive(Debug)]
pub struct PendingUpload<M> {
    metadata: Option<M>,
    photo: BytesMut,
}

impl<M> PendingUpload<M> {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: None,
            photo: BytesMut::new(),
        }
    }

    /// Fold one fragment into the accumulator.
    ///
    /// Byte slices concatenate in the order they are applied; no reordering,
    /// no deduplication. Empty slices contribute nothing.
    pub fn apply(&mut self, fragment: Fragment<M>) {
        match fragment {
            Fragment::Metadata(metadata) => self.metadata = Some(metadata),
            Fragment::PhotoChunk(chunk) => {
                if !chunk.is_empty() {
                    self.photo.extend_from_slice(&chunk);
                }
            }
            Fragment::Empty => {}
        }
    }

    /// Consume the accumulator at end-of-stream.
    #[must_use]
    pub fn finish(self) -> AssembledUpload<M> {
        AssembledUpload {
            metadata: self.metadata,
            photo: if self.photo.is_empty() {
                None
            } else {
                Some(self.photo.freeze())
            },
        }
    }
}

impl<M> Default for PendingUpload<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stream_yields_nothing() {
        let pending: PendingUpload<String> = PendingUpload::new();
        let assembled = pending.finish();
        assert_eq!(assembled.metadata, None);
        assert_eq!(assembled.photo, None);
    }

    #[test]
    fn test_last_metadata_wins() {
        let mut pending = PendingUpload::new();
        pending.apply(Fragment::Metadata("first"));
        pending.apply(Fragment::Metadata("second"));

        assert_eq!(pending.finish().metadata, Some("second"));
    }

    #[test]
    fn test_chunks_concatenate_in_order() {
        let mut pending: PendingUpload<()> = PendingUpload::new();
        pending.apply(Fragment::PhotoChunk(Bytes::from_static(&[1, 2])));
        pending.apply(Fragment::PhotoChunk(Bytes::from_static(&[3, 4])));

        assert_eq!(
            pending.finish().photo,
            Some(Bytes::from_static(&[1, 2, 3, 4]))
        );
    }

    #[test]
    fn test_empty_chunks_do_not_count_as_photo() {
        let mut pending: PendingUpload<()> = PendingUpload::new();
        pending.apply(Fragment::PhotoChunk(Bytes::new()));
        pending.apply(Fragment::Empty);

        assert_eq!(pending.finish().photo, None);
    }
}
