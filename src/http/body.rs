//! Request body module
//!
//! Collects request bodies with a hard size cap.

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_LENGTH;
use hyper::HeaderMap;

use crate::api::ApiError;
use crate::logger;

/// Read the whole body, rejecting anything over `max_body_size` bytes.
///
/// A declared `Content-Length` over the limit is rejected before any
/// bytes are read; bodies without one are cut off while streaming.
pub async fn read_body<B>(headers: &HeaderMap, body: B, max_body_size: u64) -> Result<Bytes, ApiError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    check_content_length(headers, max_body_size)?;

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_warning(&format!(
                "Request body exceeded {max_body_size} bytes while reading"
            ));
            Err(ApiError::PayloadTooLarge(max_body_size))
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(ApiError::BodyRead)
        }
    }
}

/// Validate Content-Length header against the limit
fn check_content_length(headers: &HeaderMap, max_body_size: u64) -> Result<(), ApiError> {
    let Some(content_length) = headers.get(CONTENT_LENGTH) else {
        return Ok(());
    };

    // hyper rejects malformed lengths before we get here
    if let Ok(Ok(size)) = content_length.to_str().map(str::parse::<u64>) {
        if size > max_body_size {
            logger::log_warning(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            return Err(ApiError::PayloadTooLarge(max_body_size));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::Full;
    use hyper::header::HeaderValue;

    #[tokio::test]
    async fn test_reads_small_body() {
        let body = Full::new(Bytes::from_static(b"{\"name\":\"x\"}"));
        let bytes = read_body(&HeaderMap::new(), body, 1024).await.unwrap();
        assert_eq!(&bytes[..], b"{\"name\":\"x\"}");
    }

    #[tokio::test]
    async fn test_rejects_oversized_stream() {
        let body = Full::new(Bytes::from(vec![b'a'; 64]));
        let err = read_body(&HeaderMap::new(), body, 16).await.unwrap_err();
        assert!(matches!(err, ApiError::PayloadTooLarge(16)));
    }

    #[tokio::test]
    async fn test_rejects_declared_length() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("4096"));
        let body = Full::new(Bytes::new());
        let err = read_body(&headers, body, 1024).await.unwrap_err();
        assert!(matches!(err, ApiError::PayloadTooLarge(1024)));
    }
}
