//! Fixture datasets module
//!
//! Holds the immutable record lists served by the mock endpoints and the
//! `Resource` trait the API dispatcher is generic over.

mod city;
pub mod country;
pub mod filter;

pub use city::City;
pub use country::Country;
pub use filter::{FilterCriteria, Selection};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;

/// A record type served by one mock REST endpoint.
///
/// Implementors describe which of their fields feed each stage of the
/// filter chain and how typed create/update bodies turn into records.
pub trait Resource: Clone + Serialize + Send + Sync + 'static {
    /// Singular label used in messages, e.g. `City`
    const LABEL: &'static str;
    /// Query parameter selecting the linking field
    const GROUP_PARAM: &'static str;
    /// Query parameter selecting the boolean flag
    const FLAG_PARAM: &'static str;

    /// Type of the linking field as queried (foreign key or category)
    type GroupKey: Copy + PartialEq + FromStr + Send + Sync;
    /// Create request body
    type Draft: DeserializeOwned;
    /// Partial update request body
    type Patch: DeserializeOwned;

    /// Hand-authored records loaded at startup
    fn fixtures() -> Vec<Self>;

    fn id(&self) -> u32;
    fn name(&self) -> &str;
    fn population(&self) -> u64;
    fn flag(&self) -> bool;
    fn group_key(&self) -> Option<Self::GroupKey>;

    /// Build a record from a create body.
    ///
    /// On failure returns the names of the missing required fields.
    fn from_draft(id: u32, draft: Self::Draft) -> Result<Self, Vec<&'static str>>;

    /// Shallow-merge a patch over this record. The id never changes.
    ///
    /// Patched values are normalised like create bodies; on failure returns
    /// the names of the fields a create would also have refused.
    fn merge(&self, patch: Self::Patch) -> Result<Self, Vec<&'static str>>;
}

/// Read-only snapshot of one resource's records.
///
/// Cloning is cheap and never copies the records. Nothing in the service
/// can mutate a dataset after construction.
#[derive(Debug)]
pub struct Dataset<R> {
    records: Arc<[R]>,
}

impl<R> Clone for Dataset<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<R: Resource> Dataset<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// Dataset built from the resource's fixture list
    pub fn fixtures() -> Self {
        Self::new(R::fixtures())
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Ids outside the `u32` range never match
    pub fn find(&self, id: i64) -> Option<&R> {
        let id = u32::try_from(id).ok()?;
        self.records.iter().find(|r| r.id() == id)
    }

    /// Id handed to a simulated create: collection length + 1.
    ///
    /// Since creates are never stored, repeated calls return the same id.
    pub fn next_id(&self) -> u32 {
        u32::try_from(self.records.len())
            .unwrap_or(u32::MAX)
            .saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_ids_are_unique() {
        let cities = Dataset::<City>::fixtures();
        let mut ids: Vec<u32> = cities.records().iter().map(Resource::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), cities.len());

        let countries = Dataset::<Country>::fixtures();
        let mut ids: Vec<u32> = countries.records().iter().map(Resource::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), countries.len());
    }

    #[test]
    fn test_every_city_links_to_a_country() {
        let cities = Dataset::<City>::fixtures();
        let countries = Dataset::<Country>::fixtures();
        for city in cities.records() {
            assert!(
                countries.find(i64::from(city.country_id)).is_some(),
                "{} links to unknown country {}",
                city.name,
                city.country_id
            );
        }
    }

    #[test]
    fn test_next_id_is_len_plus_one() {
        let cities = Dataset::<City>::fixtures();
        assert_eq!(cities.next_id() as usize, cities.len() + 1);
        // No write-back, so the id repeats
        assert_eq!(cities.next_id(), cities.next_id());
    }

    #[test]
    fn test_clone_shares_records() {
        let a = Dataset::<Country>::fixtures();
        let b = a.clone();
        assert!(std::ptr::eq(a.records(), b.records()));
    }

    #[test]
    fn test_find() {
        let countries = Dataset::<Country>::fixtures();
        assert_eq!(countries.find(3).map(Resource::name), Some("Japan"));
        assert!(countries.find(0).is_none());
        assert!(countries.find(-3).is_none());
        assert!(countries.find(i64::from(u32::MAX) + 4).is_none());
        assert!(!countries.is_empty());
    }
}
