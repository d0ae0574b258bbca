//! Photo replacement bookkeeping shared by the user and coach services.
//!
//! Replacement always overwrites under the key derived from the account id;
//! the database update is the consistency boundary. Previous bytes are
//! captured before the overwrite so an aborted update can restore them.

use bytes::Bytes;
use tracing::error;
use uuid::Uuid;

use crate::storage::ObjectStorage;

/// State captured while replacing a photo, consumed on rollback.
#[derive(Debug)]
pub(crate) struct PhotoReplacement {
    /// Key the new bytes were written under.
    pub key: String,
    /// Bytes that were stored under `key` before the overwrite, if any.
    pub previous: Option<Bytes>,
}

/// Undo a photo overwrite after the metadata update failed.
///
/// Restores the previous bytes when they were captured, otherwise removes
/// the freshly written blob. Best-effort: a failure here is logged loudly
/// and never masks the error that triggered the rollback.
pub(crate) async fn rollback_replacement<S: ObjectStorage>(
    store: &S,
    id: Uuid,
    replacement: PhotoReplacement,
) {
    match replacement.previous {
        Some(bytes) => {
            if let Err(e) = store.put(bytes, &replacement.key).await {
                error!(
                    account_id = %id,
                    key = %replacement.key,
                    error = %e,
                    "failed to restore previous photo after aborted update; blob is inconsistent"
                );
            }
        }
        None => {
            if let Err(e) = store.delete(&replacement.key).await {
                error!(
                    account_id = %id,
                    key = %replacement.key,
                    error = %e,
                    "failed to remove new photo after aborted update; blob is orphaned"
                );
            }
        }
    }
}

/// Remove a blob uploaded for a record that was never persisted.
///
/// Best-effort: a failure is logged loudly and never masks the original
/// persistence error.
pub(crate) async fn discard_uploaded_blob<S: ObjectStorage>(store: &S, id: Uuid, key: &str) {
    if let Err(e) = store.delete(key).await {
        error!(
            account_id = %id,
            key,
            error = %e,
            "failed to clean up uploaded photo after aborted create; blob is orphaned"
        );
    }
}
