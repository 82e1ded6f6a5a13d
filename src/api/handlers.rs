// Resource request dispatcher
// Maps verb + query + body to lookup/list or a simulated write

use hyper::{Method, StatusCode};
use serde::de::DeserializeOwned;

use super::envelope::{Envelope, Reply};
use super::error::ApiError;
use super::query::{self, QueryParams};
use crate::dataset::{filter, Dataset, Resource, Selection};
use crate::logger;

/// Methods a resource endpoint answers (used for `Allow`)
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";

/// Dispatch one request against `dataset`.
///
/// The dataset is never modified: creates, updates and deletes compute
/// their result and return it without writing anything back.
pub fn dispatch<R: Resource>(
    dataset: &Dataset<R>,
    method: &Method,
    query: &QueryParams,
    body: &[u8],
) -> Result<Reply, ApiError> {
    match *method {
        Method::GET => lookup_or_list(dataset, query),
        Method::POST => create(dataset, body),
        Method::PUT => update(dataset, query, body),
        Method::DELETE => delete(dataset, query),
        _ => Err(ApiError::MethodNotAllowed(method.to_string())),
    }
}

/// GET: single record by id, otherwise the filtered collection
pub fn lookup_or_list<R: Resource>(
    dataset: &Dataset<R>,
    query: &QueryParams,
) -> Result<Reply, ApiError> {
    let criteria = query::criteria::<R>(query)?;

    match filter::apply(dataset.records(), &criteria) {
        Selection::Found(record) => Reply::new(StatusCode::OK, &Envelope::record(record)),
        Selection::Missing(id) => Err(ApiError::not_found(R::LABEL, id)),
        Selection::Many(records) => Reply::new(StatusCode::OK, &Envelope::collection(records)),
    }
}

/// POST: validate the draft and synthesize a record that is never stored
pub fn create<R: Resource>(dataset: &Dataset<R>, body: &[u8]) -> Result<Reply, ApiError> {
    let draft: R::Draft = parse_body(body)?;
    let id = dataset.next_id();
    let record = R::from_draft(id, draft).map_err(|missing| ApiError::missing_fields(&missing))?;

    logger::log_simulated_write("POST", R::LABEL, id);
    Reply::new(
        StatusCode::CREATED,
        &Envelope::record(&record).with_message(format!(
            "{} created successfully (simulated, not persisted)",
            R::LABEL
        )),
    )
}

/// PUT: shallow-merge a typed patch over the existing record
pub fn update<R: Resource>(
    dataset: &Dataset<R>,
    query: &QueryParams,
    body: &[u8],
) -> Result<Reply, ApiError> {
    let existing = require_record(dataset, query)?;
    let patch: R::Patch = parse_body(body)?;
    let merged = existing
        .merge(patch)
        .map_err(|invalid| ApiError::blank_fields(&invalid))?;

    logger::log_simulated_write("PUT", R::LABEL, merged.id());
    Reply::new(
        StatusCode::OK,
        &Envelope::record(&merged).with_message(format!(
            "{} updated successfully (simulated, not persisted)",
            R::LABEL
        )),
    )
}

/// DELETE: confirm the record exists and name it in the message
pub fn delete<R: Resource>(dataset: &Dataset<R>, query: &QueryParams) -> Result<Reply, ApiError> {
    let record = require_record(dataset, query)?;

    logger::log_simulated_write("DELETE", R::LABEL, record.id());
    Reply::new(
        StatusCode::OK,
        &Envelope::record(record).with_message(format!(
            "{} '{}' deleted successfully (simulated, not persisted)",
            R::LABEL,
            record.name()
        )),
    )
}

fn require_record<'a, R: Resource>(
    dataset: &'a Dataset<R>,
    query: &QueryParams,
) -> Result<&'a R, ApiError> {
    let id = query.id()?.ok_or_else(|| ApiError::missing_id(R::LABEL))?;
    dataset
        .find(id)
        .ok_or_else(|| ApiError::not_found(R::LABEL, id))
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(body)?)
}
