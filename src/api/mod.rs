// API module entry
// Routes requests to the mock resource endpoints and health probes

mod envelope;
mod error;
mod handlers;
mod query;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use serde::Serialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use crate::config::AppState;
use crate::dataset::{City, Country, Dataset, Resource};
use crate::http;
use crate::logger::{self, AccessLogEntry};

// Re-export public types
pub use envelope::{Envelope, Reply};
pub use error::ApiError;
pub use query::QueryParams;

pub const INDEX_PATH: &str = "/api";
pub const CITIES_PATH: &str = "/api/cities";
pub const COUNTRIES_PATH: &str = "/api/countries";

/// Main entry point for HTTP request handling
///
/// Wraps routing with the headers every response carries and the access log.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let mut entry = state
        .config
        .logging
        .access_log
        .then(|| AccessLogEntry::from_request(&req, peer_addr));

    let mut response = route(req, &state).await;
    http::apply_common_headers(
        &mut response,
        &state.config.http.server_name,
        state.config.http.enable_cors,
    );

    if let Some(entry) = entry.as_mut() {
        let body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.finish(response.status().as_u16(), body_bytes, started.elapsed());
        logger::log_access(entry, &state.access_log_format);
    }

    Ok(response)
}

/// Route request based on path
async fn route<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let path = normalize_path(req.uri().path());

    // Health check endpoints (highest priority, always fast)
    let health = &state.config.health;
    if health.enabled
        && (path == normalize_path(&health.liveness_path)
            || path == normalize_path(&health.readiness_path))
    {
        return http::build_health_response("ok");
    }

    match path.as_str() {
        INDEX_PATH => serve_index(req.method()),
        CITIES_PATH => serve_resource(req, &state.cities, state).await,
        COUNTRIES_PATH => serve_resource(req, &state.countries, state).await,
        _ => {
            logger::log_api_request(req.method().as_str(), &path, 404);
            not_found(&path)
        }
    }
}

/// Strip trailing slashes so `/api/cities/` routes like `/api/cities`
fn normalize_path(path: &str) -> String {
    match path.trim_end_matches('/') {
        "" => "/".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Serve one resource endpoint: read the body if the verb takes one,
/// dispatch, and render the envelope
async fn serve_resource<R, B>(
    req: Request<B>,
    dataset: &Dataset<R>,
    state: &AppState,
) -> Response<Full<Bytes>>
where
    R: Resource,
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let method = req.method().clone();
    if method == Method::OPTIONS {
        return http::build_options_response(
            handlers::ALLOWED_METHODS,
            state.config.http.enable_cors,
        );
    }

    let path = req.uri().path().to_string();
    let query = QueryParams::parse(req.uri().query());
    let (parts, body) = req.into_parts();

    let reply = read_body_for(&method, &parts.headers, body, state)
        .await
        .and_then(|body| handlers::dispatch(dataset, &method, &query, &body))
        .unwrap_or_else(|e| reply_for_error(&e));

    logger::log_api_request(method.as_str(), &path, reply.status.as_u16());

    let mut response = http::json_response(reply.status, &reply.body);
    if reply.status == StatusCode::METHOD_NOT_ALLOWED {
        http::apply_allow_header(&mut response, handlers::ALLOWED_METHODS);
    }
    response
}

/// Only POST and PUT carry a body; everything else gets an empty one
async fn read_body_for<B>(
    method: &Method,
    headers: &hyper::HeaderMap,
    body: B,
    state: &AppState,
) -> Result<Bytes, ApiError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if matches!(*method, Method::POST | Method::PUT) {
        http::read_body(headers, body, state.config.http.max_body_size).await
    } else {
        Ok(Bytes::new())
    }
}

fn reply_for_error(err: &ApiError) -> Reply {
    if let ApiError::Internal(detail) = err {
        logger::log_error(detail);
    }
    Reply::from_error(err)
}

/// Description of one resource endpoint for the index
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EndpointInfo {
    path: &'static str,
    resource: &'static str,
    methods: &'static str,
    filters: [&'static str; 6],
}

impl EndpointInfo {
    const fn of<R: Resource>(path: &'static str) -> Self {
        Self {
            path,
            resource: R::LABEL,
            methods: handlers::ALLOWED_METHODS,
            filters: [
                query::ID_PARAM,
                R::GROUP_PARAM,
                R::FLAG_PARAM,
                query::SEARCH_PARAM,
                query::MIN_POPULATION_PARAM,
                query::MAX_POPULATION_PARAM,
            ],
        }
    }
}

fn serve_index(method: &Method) -> Response<Full<Bytes>> {
    if *method != Method::GET {
        let reply = Reply::from_error(&ApiError::MethodNotAllowed(method.to_string()));
        let mut response = http::json_response(reply.status, &reply.body);
        http::apply_allow_header(&mut response, "GET");
        return response;
    }

    let endpoints = vec![
        EndpointInfo::of::<City>(CITIES_PATH),
        EndpointInfo::of::<Country>(COUNTRIES_PATH),
    ];
    logger::log_api_request("GET", INDEX_PATH, 200);
    http::json_response(StatusCode::OK, &Envelope::collection(endpoints))
}

/// 404 Not Found envelope listing the real endpoints
fn not_found(path: &str) -> Response<Full<Bytes>> {
    let envelope = Envelope::failure(&ApiError::NotFound(format!("Route {path}")))
        .with_message(format!(
            "Available endpoints: {INDEX_PATH}, {CITIES_PATH}, {COUNTRIES_PATH}"
        ));
    http::json_response(StatusCode::NOT_FOUND, &envelope)
}
