// Query string parsing module
// Turns the raw query string into typed filter criteria

use std::str::FromStr;
use url::form_urlencoded;

use super::error::ApiError;
use crate::dataset::{FilterCriteria, Resource};

pub const ID_PARAM: &str = "id";
pub const SEARCH_PARAM: &str = "search";
pub const MIN_POPULATION_PARAM: &str = "minPopulation";
pub const MAX_POPULATION_PARAM: &str = "maxPopulation";

/// Decoded query parameters, in request order
#[derive(Debug, Default)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { pairs }
    }

    /// First non-blank value for `key`. Blank values count as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }

    /// Parse `key` with `FromStr`; an unparsable value is a validation error
    pub fn parse_value<T: FromStr>(&self, key: &str) -> Result<Option<T>, ApiError> {
        self.get(key)
            .map(|raw| raw.parse().map_err(|_| ApiError::invalid_param(key, raw)))
            .transpose()
    }

    /// Accepts `true`/`false` (any case) and `1`/`0`
    pub fn parse_flag(&self, key: &str) -> Result<Option<bool>, ApiError> {
        self.get(key)
            .map(|raw| match raw.to_ascii_lowercase().as_str() {
                "true" | "1" => Ok(true),
                "false" | "0" => Ok(false),
                _ => Err(ApiError::invalid_param(key, raw)),
            })
            .transpose()
    }

    /// Any integer is accepted; ids no record can have just never match
    pub fn id(&self) -> Result<Option<i64>, ApiError> {
        self.parse_value(ID_PARAM)
    }
}

/// Build the filter criteria for resource `R`. Unknown parameters are ignored.
pub fn criteria<R: Resource>(query: &QueryParams) -> Result<FilterCriteria<R::GroupKey>, ApiError> {
    Ok(FilterCriteria {
        id: query.id()?,
        group: query.parse_value(R::GROUP_PARAM)?,
        flag: query.parse_flag(R::FLAG_PARAM)?,
        search: query.get(SEARCH_PARAM).map(ToString::to_string),
        min_population: query.parse_value(MIN_POPULATION_PARAM)?,
        max_population: query.parse_value(MAX_POPULATION_PARAM)?,
    })
}
