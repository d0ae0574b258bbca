//! Multipart adapter for the chunked-upload assembler.
//!
//! Streamed create/update calls arrive as `multipart/form-data`. Each part
//! maps onto the fragment model: a part named `data` carries the JSON
//! metadata object, a part named `photo` streams the binary payload chunk
//! by chunk, anything else is an empty fragment and gets drained. The
//! accumulator is scoped to the request and dropped on every error path.

use axum::extract::Multipart;
use serde::de::DeserializeOwned;

use fitbase_core::upload::{AssembledUpload, Fragment, PendingUpload, UploadError};

/// Part name carrying the metadata object.
const DATA_PART: &str = "data";
/// Part name carrying photo bytes.
const PHOTO_PART: &str = "photo";

/// Drain a multipart request into one assembled upload.
///
/// The stream is fully consumed before the caller proceeds; photo chunks
/// concatenate in arrival order.
///
/// # Errors
///
/// `UploadError::StreamRead` if the transport fails mid-request,
/// `UploadError::InvalidMetadata` if the `data` part is not valid JSON for
/// `M`. A missing `data` part is not an error here; the caller decides.
pub async fn read_upload<M>(multipart: &mut Multipart) -> Result<AssembledUpload<M>, UploadError>
where
    M: DeserializeOwned,
{
    let mut pending = PendingUpload::new();

    loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| UploadError::stream_read(e.to_string()))?;

        let Some(mut field) = field else {
            break;
        };

        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some(DATA_PART) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| UploadError::stream_read(e.to_string()))?;
                let metadata = serde_json::from_str(&text)
                    .map_err(|e| UploadError::invalid_metadata(e.to_string()))?;
                pending.apply(Fragment::Metadata(metadata));
            }
            Some(PHOTO_PART) => {
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| UploadError::stream_read(e.to_string()))?
                {
                    pending.apply(Fragment::PhotoChunk(chunk));
                }
            }
            _ => {
                pending.apply(Fragment::Empty);
                // Unknown parts are drained so the stream stays ordered.
                while field
                    .chunk()
                    .await
                    .map_err(|e| UploadError::stream_read(e.to_string()))?
                    .is_some()
                {}
            }
        }
    }

    Ok(pending.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Json, Router,
        body::Body,
        http::{Request, StatusCode, header::CONTENT_TYPE},
        response::IntoResponse,
        routing::post,
    };
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    const BOUNDARY: &str = "fitbase-test-boundary";

    async fn probe(mut multipart: Multipart) -> impl IntoResponse {
        match read_upload::<serde_json::Value>(&mut multipart).await {
            Ok(assembled) => Json(json!({
                "metadata": assembled.metadata,
                "photo": assembled.photo.map(|b| b.to_vec()),
            }))
            .into_response(),
            Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        }
    }

    fn app() -> Router {
        Router::new().route("/probe", post(probe))
    }

    fn part(name: &str, content: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
        body
    }

    fn multipart_body(parts: &[(&str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, content) in parts {
            body.extend_from_slice(&part(name, content));
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn send(parts: &[(&str, &[u8])]) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/probe")
                    .header(
                        CONTENT_TYPE,
                        format!("multipart/form-data; boundary={BOUNDARY}"),
                    )
                    .body(Body::from(multipart_body(parts)))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_data_and_photo_parts() {
        let (status, body) = send(&[
            ("data", br#"{"name":"Alice"}"#),
            ("photo", &[1, 2, 3, 4]),
        ])
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metadata"]["name"], "Alice");
        assert_eq!(body["photo"], json!([1, 2, 3, 4]));
    }

    #[tokio::test]
    async fn test_photo_only() {
        let (status, body) = send(&[("photo", &[9, 9])]).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metadata"], serde_json::Value::Null);
        assert_eq!(body["photo"], json!([9, 9]));
    }

    #[tokio::test]
    async fn test_unknown_parts_are_ignored() {
        let (status, body) = send(&[
            ("extra", b"noise"),
            ("data", br#"{"name":"Alice"}"#),
        ])
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metadata"]["name"], "Alice");
        assert_eq!(body["photo"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_malformed_metadata_is_rejected() {
        let (status, _body) = send(&[("data", b"not json")]).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
