// Country resource
// Fixture list and typed create/update bodies for /api/countries

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Resource;

/// Continent a country belongs to. Used as the linking field for filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Continent {
    Africa,
    Asia,
    Europe,
    #[serde(rename = "North America")]
    NorthAmerica,
    #[serde(rename = "South America")]
    SouthAmerica,
    Oceania,
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Africa => write!(f, "Africa"),
            Self::Asia => write!(f, "Asia"),
            Self::Europe => write!(f, "Europe"),
            Self::NorthAmerica => write!(f, "North America"),
            Self::SouthAmerica => write!(f, "South America"),
            Self::Oceania => write!(f, "Oceania"),
        }
    }
}

/// Parses case-insensitively, ignoring spaces, `-` and `_`
impl FromStr for Continent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "africa" => Ok(Self::Africa),
            "asia" => Ok(Self::Asia),
            "europe" => Ok(Self::Europe),
            "northamerica" => Ok(Self::NorthAmerica),
            "southamerica" => Ok(Self::SouthAmerica),
            "oceania" => Ok(Self::Oceania),
            _ => Err(format!("unknown continent '{s}'")),
        }
    }
}

impl TryFrom<String> for Continent {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Country record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: u32,
    pub name: String,
    /// ISO 3166-1 alpha-2
    pub code: String,
    pub capital: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continent: Option<Continent>,
    pub population: u64,
    pub landlocked: bool,
}

/// POST body for a new country
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CountryDraft {
    #[serde(default, rename = "id")]
    _id: Option<IgnoredAny>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    capital: Option<String>,
    #[serde(default)]
    continent: Option<Continent>,
    #[serde(default)]
    population: Option<u64>,
    #[serde(default)]
    landlocked: Option<bool>,
}

/// PUT body: only these fields may be changed
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CountryPatch {
    #[serde(default, rename = "id")]
    _id: Option<IgnoredAny>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    capital: Option<String>,
    #[serde(default)]
    continent: Option<Continent>,
    #[serde(default)]
    population: Option<u64>,
    #[serde(default)]
    landlocked: Option<bool>,
}

fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Resource for Country {
    const LABEL: &'static str = "Country";
    const GROUP_PARAM: &'static str = "continent";
    const FLAG_PARAM: &'static str = "landlocked";

    type GroupKey = Continent;
    type Draft = CountryDraft;
    type Patch = CountryPatch;

    fn fixtures() -> Vec<Self> {
        FIXTURES
            .iter()
            .map(
                |&(id, name, code, capital, continent, population, landlocked)| Self {
                    id,
                    name: name.to_string(),
                    code: code.to_string(),
                    capital: capital.to_string(),
                    continent: Some(continent),
                    population,
                    landlocked,
                },
            )
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
        self.landlocked
    }

    fn group_key(&self) -> Option<Continent> {
        self.continent
    }

    fn from_draft(id: u32, draft: CountryDraft) -> Result<Self, Vec<&'static str>> {
        let name = present(draft.name);
        let code = present(draft.code);
        let capital = present(draft.capital);

        match (name, code, capital) {
            (Some(name), Some(code), Some(capital)) => Ok(Self {
                id,
                name,
                code: code.to_uppercase(),
                capital,
                continent: draft.continent,
                population: draft.population.unwrap_or(0),
                landlocked: draft.landlocked.unwrap_or(false),
            }),
            (name, code, capital) => Err([
                ("name", name.is_none()),
                ("code", code.is_none()),
                ("capital", capital.is_none()),
            ]
            .into_iter()
            .filter_map(|(field, missing)| missing.then_some(field))
            .collect()),
        }
    }

    fn merge(&self, patch: CountryPatch) -> Result<Self, Vec<&'static str>> {
        let name = patch.name.map(|v| v.trim().to_string());
        let code = patch.code.map(|v| v.trim().to_uppercase());
        let capital = patch.capital.map(|v| v.trim().to_string());

        let invalid: Vec<&'static str> = [("name", &name), ("code", &code), ("capital", &capital)]
            .into_iter()
            .filter_map(|(field, value)| {
                value.as_deref().is_some_and(str::is_empty).then_some(field)
            })
            .collect();
        if !invalid.is_empty() {
            return Err(invalid);
        }

        Ok(Self {
            id: self.id,
            name: name.unwrap_or_else(|| self.name.clone()),
            code: code.unwrap_or_else(|| self.code.clone()),
            capital: capital.unwrap_or_else(|| self.capital.clone()),
            continent: patch.continent.or(self.continent),
            population: patch.population.unwrap_or(self.population),
            landlocked: patch.landlocked.unwrap_or(self.landlocked),
        })
    }
}

type CountryRow = (u32, &'static str, &'static str, &'static str, Continent, u64, bool);

/// (id, name, code, capital, continent, population, landlocked)
const FIXTURES: &[CountryRow] = &[
    (1, "United States", "US", "Washington, D.C.", Continent::NorthAmerica, 331_900_000, false),
    (2, "United Kingdom", "GB", "London", Continent::Europe, 67_330_000, false),
    (3, "Japan", "JP", "Tokyo", Continent::Asia, 125_700_000, false),
    (4, "Russia", "RU", "Moscow", Continent::Europe, 143_400_000, false),
    (5, "India", "IN", "New Delhi", Continent::Asia, 1_408_000_000, false),
    (6, "China", "CN", "Beijing", Continent::Asia, 1_412_000_000, false),
    (7, "South Korea", "KR", "Seoul", Continent::Asia, 51_740_000, false),
    (8, "France", "FR", "Paris", Continent::Europe, 67_750_000, false),
    (9, "Germany", "DE", "Berlin", Continent::Europe, 83_200_000, false),
    (10, "Brazil", "BR", "Brasília", Continent::SouthAmerica, 214_300_000, false),
    (11, "Australia", "AU", "Canberra", Continent::Oceania, 25_690_000, false),
    (12, "Canada", "CA", "Ottawa", Continent::NorthAmerica, 38_250_000, false),
    (13, "Switzerland", "CH", "Bern", Continent::Europe, 8_703_000, true),
    (14, "Mongolia", "MN", "Ulaanbaatar", Continent::Asia, 3_348_000, true),
    (15, "Nigeria", "NG", "Abuja", Continent::Africa, 213_400_000, false),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continent_parse() {
        assert_eq!("asia".parse::<Continent>(), Ok(Continent::Asia));
        assert_eq!(
            "North America".parse::<Continent>(),
            Ok(Continent::NorthAmerica)
        );
        assert_eq!(
            "south_america".parse::<Continent>(),
            Ok(Continent::SouthAmerica)
        );
        assert!("Atlantis".parse::<Continent>().is_err());
    }

    #[test]
    fn test_continent_serde() {
        assert_eq!(
            serde_json::to_value(Continent::NorthAmerica).unwrap(),
            "North America"
        );
        let parsed: Continent = serde_json::from_str(r#""north-america""#).unwrap();
        assert_eq!(parsed, Continent::NorthAmerica);
        assert_eq!(Continent::SouthAmerica.to_string(), "South America");
    }

    #[test]
    fn test_missing_required_fields() {
        let draft: CountryDraft = serde_json::from_str("{}").unwrap();
        assert_eq!(
            Country::from_draft(16, draft).unwrap_err(),
            vec!["name", "code", "capital"]
        );

        let draft: CountryDraft =
            serde_json::from_str(r#"{"name":"Peru","capital":" "}"#).unwrap();
        assert_eq!(
            Country::from_draft(16, draft).unwrap_err(),
            vec!["code", "capital"]
        );
    }

    #[test]
    fn test_from_draft_normalizes() {
        let draft: CountryDraft =
            serde_json::from_str(r#"{"name":" Peru ","code":"pe","capital":"Lima"}"#).unwrap();
        let country = Country::from_draft(16, draft).unwrap();
        assert_eq!(country.name, "Peru");
        assert_eq!(country.code, "PE");
        assert_eq!(country.continent, None);
        assert_eq!(country.population, 0);
        assert!(!country.landlocked);

        let value = serde_json::to_value(&country).unwrap();
        assert!(value.get("continent").is_none());
    }

    #[test]
    fn test_merge_preserves_id() {
        let japan = Country::fixtures().remove(2);
        let patch: CountryPatch =
            serde_json::from_str(r#"{"id":999,"capital":"Kyoto"}"#).unwrap();
        let merged = japan.merge(patch).unwrap();
        assert_eq!(merged.id, 3);
        assert_eq!(merged.capital, "Kyoto");
        assert_eq!(merged.code, "JP");
    }

    #[test]
    fn test_merge_normalizes_like_create() {
        let japan = Country::fixtures().remove(2);
        let patch: CountryPatch = serde_json::from_str(r#"{"code":" jp2 "}"#).unwrap();
        assert_eq!(japan.merge(patch).unwrap().code, "JP2");

        let patch: CountryPatch =
            serde_json::from_str(r#"{"name":"  ","capital":"","population":5}"#).unwrap();
        assert_eq!(japan.merge(patch).unwrap_err(), vec!["name", "capital"]);
    }

    #[test]
    fn test_patch_rejects_unknown_fields() {
        let result: Result<CountryPatch, _> = serde_json::from_str(r#"{"currency":"JPY"}"#);
        assert!(result.is_err());
    }
}
