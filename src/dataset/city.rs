// City resource
// Fixture list and typed create/update bodies for /api/cities

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use super::Resource;

/// City record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: u32,
    pub name: String,
    /// Id of the owning country
    pub country_id: u32,
    pub population: u64,
    pub is_capital: bool,
}

/// POST body for a new city
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CityDraft {
    /// Accepted and ignored, the id is always synthesized
    #[serde(default, rename = "id")]
    _id: Option<IgnoredAny>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    country_id: Option<u32>,
    #[serde(default)]
    population: Option<u64>,
    #[serde(default)]
    is_capital: Option<bool>,
}

/// PUT body: only these fields may be changed
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CityPatch {
    /// Accepted and ignored, the original id is preserved
    #[serde(default, rename = "id")]
    _id: Option<IgnoredAny>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    country_id: Option<u32>,
    #[serde(default)]
    population: Option<u64>,
    #[serde(default)]
    is_capital: Option<bool>,
}

impl Resource for City {
    const LABEL: &'static str = "City";
    const GROUP_PARAM: &'static str = "countryId";
    const FLAG_PARAM: &'static str = "isCapital";

    type GroupKey = i64;
    type Draft = CityDraft;
    type Patch = CityPatch;

    fn fixtures() -> Vec<Self> {
        FIXTURES
            .iter()
            .map(|&(id, name, country_id, population, is_capital)| Self {
                id,
                name: name.to_string(),
                country_id,
                population,
                is_capital,
            })
            .collect()
    }

    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn population(&self) -> u64 {
        self.population
    }

    fn flag(&self) -> bool {
        self.is_capital
    }

    fn group_key(&self) -> Option<i64> {
        Some(i64::from(self.country_id))
    }

    fn from_draft(id: u32, draft: CityDraft) -> Result<Self, Vec<&'static str>> {
        let name = present(draft.name);
        let country_id = linked_country(draft.country_id);

        match (name, country_id) {
            (Some(name), Some(country_id)) => Ok(Self {
                id,
                name,
                country_id,
                population: draft.population.unwrap_or(0),
                is_capital: draft.is_capital.unwrap_or(false),
            }),
            (name, country_id) => {
                let mut missing = Vec::new();
                if name.is_none() {
                    missing.push("name");
                }
                if country_id.is_none() {
                    missing.push("countryId");
                }
                Err(missing)
            }
        }
    }

    fn merge(&self, patch: CityPatch) -> Result<Self, Vec<&'static str>> {
        let name = patch.name.map(|n| n.trim().to_string());

        let mut invalid = Vec::new();
        if name.as_deref().is_some_and(str::is_empty) {
            invalid.push("name");
        }
        if patch.country_id == Some(0) {
            invalid.push("countryId");
        }
        if !invalid.is_empty() {
            return Err(invalid);
        }

        Ok(Self {
            id: self.id,
            name: name.unwrap_or_else(|| self.name.clone()),
            country_id: patch.country_id.unwrap_or(self.country_id),
            population: patch.population.unwrap_or(self.population),
            is_capital: patch.is_capital.unwrap_or(self.is_capital),
        })
    }
}

/// Trimmed value, or `None` when blank
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 0 never names a country
fn linked_country(value: Option<u32>) -> Option<u32> {
    value.filter(|&c| c != 0)
}

/// (id, name, countryId, population, isCapital)
const FIXTURES: &[(u32, &str, u32, u64, bool)] = &[
    (1, "Tokyo", 3, 13_960_000, true),
    (2, "Osaka", 3, 2_750_000, false),
    (3, "Kyoto", 3, 1_460_000, false),
    (4, "Yokohama", 3, 3_770_000, false),
    (5, "Nagoya", 3, 2_330_000, false),
    (6, "Washington, D.C.", 1, 689_545, true),
    (7, "New York", 1, 8_336_817, false),
    (8, "Los Angeles", 1, 3_898_747, false),
    (9, "Chicago", 1, 2_746_388, false),
    (10, "London", 2, 8_982_000, true),
    (11, "Manchester", 2, 553_230, false),
    (12, "Birmingham", 2, 1_144_900, false),
    (13, "Moscow", 4, 12_655_050, true),
    (14, "Saint Petersburg", 4, 5_384_342, false),
    (15, "New Delhi", 5, 21_750_000, true),
    (16, "Mumbai", 5, 12_442_373, false),
    (17, "Beijing", 6, 21_540_000, true),
    (18, "Shanghai", 6, 24_870_895, false),
    (19, "Seoul", 7, 9_668_465, true),
    (20, "Busan", 7, 3_349_016, false),
    (21, "Paris", 8, 2_161_000, true),
    (22, "Lyon", 8, 522_969, false),
    (23, "Berlin", 9, 3_645_000, true),
    (24, "Munich", 9, 1_488_000, false),
    (25, "Brasília", 10, 3_094_325, true),
    (26, "São Paulo", 10, 12_325_232, false),
    (27, "Canberra", 11, 456_692, true),
    (28, "Sydney", 11, 5_312_163, false),
    (29, "Ottawa", 12, 1_017_449, true),
    (30, "Toronto", 12, 2_794_356, false),
    (31, "Bern", 13, 134_794, true),
    (32, "Zurich", 13, 421_878, false),
    (33, "Ulaanbaatar", 14, 1_615_093, true),
    (34, "Abuja", 15, 1_235_880, true),
    (35, "Lagos", 15, 15_388_000, false),
];
