//! HTTP response building module
//!
//! Builders for the responses the service sends, decoupled from the
//! resource logic that decides what goes in them.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW, SERVER};
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::logger;

/// Build a JSON response from any serializable body
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = match serde_json::to_string_pretty(body) {
        Ok(j) => j,
        Err(e) => {
            logger::log_error(&format!("Failed to serialize response: {e}"));
            return Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "application/json")
                .body(Full::new(Bytes::from_static(
                    br#"{"success":false,"error":"Internal server error"}"#,
                )))
                .unwrap_or_else(|e| {
                    log_build_error("500", &e);
                    Response::new(Full::new(Bytes::new()))
                });
        }
    };

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(allow: &'static str, enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header(ALLOW, allow);

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", allow)
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build health probe response
pub fn build_health_response(status: &str) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &serde_json::json!({ "status": status }))
}

/// Stamp headers shared by every response
pub fn apply_common_headers(
    response: &mut Response<Full<Bytes>>,
    server_name: &str,
    enable_cors: bool,
) {
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(server_name) {
        headers.insert(SERVER, value);
    }
    if enable_cors {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
}

/// Add `Allow` to a 405 response
pub fn apply_allow_header(response: &mut Response<Full<Bytes>>, allow: &'static str) {
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static(allow));
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_response_headers() {
        let resp = json_response(StatusCode::CREATED, &serde_json::json!({"success": true}));
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(
            resp.headers().get("Content-Type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_options_response_cors() {
        let resp = build_options_response("GET, OPTIONS", true);
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(resp.headers().get(ALLOW).unwrap(), "GET, OPTIONS");
        assert_eq!(
            resp.headers().get("Access-Control-Allow-Origin").unwrap(),
            "*"
        );

        let plain = build_options_response("GET, OPTIONS", false);
        assert!(plain.headers().get("Access-Control-Allow-Origin").is_none());
    }

    #[test]
    fn test_common_headers() {
        let mut resp = build_health_response("ok");
        apply_common_headers(&mut resp, "geo-mock/0.1", false);
        assert_eq!(resp.headers().get(SERVER).unwrap(), "geo-mock/0.1");
        assert!(resp.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
