//! Predicate filter chain
//!
//! Narrows a record slice with optional criteria. When an id is given the
//! chain short-circuits to a single lookup; otherwise the stages run in a
//! fixed order: linking field, flag, name search, min population, max
//! population. Every stage sees only what the previous one let through.

use super::Resource;

/// Request-scoped filter criteria. Absent fields do not filter.
///
/// Numbers are kept signed as queried: a negative or oversized id simply
/// matches nothing, and a negative bound is still a valid bound.
#[derive(Debug)]
pub struct FilterCriteria<K> {
    pub id: Option<i64>,
    pub group: Option<K>,
    pub flag: Option<bool>,
    pub search: Option<String>,
    pub min_population: Option<i64>,
    pub max_population: Option<i64>,
}

impl<K> Default for FilterCriteria<K> {
    fn default() -> Self {
        Self {
            id: None,
            group: None,
            flag: None,
            search: None,
            min_population: None,
            max_population: None,
        }
    }
}

/// Result of running the chain
#[derive(Debug)]
pub enum Selection<'a, R> {
    /// Id lookup hit
    Found(&'a R),
    /// Id lookup with no matching record
    Missing(i64),
    /// Filtered collection, possibly empty
    Many(Vec<&'a R>),
}

/// Apply the criteria to `records`
pub fn apply<'a, R: Resource>(
    records: &'a [R],
    criteria: &FilterCriteria<R::GroupKey>,
) -> Selection<'a, R> {
    if let Some(id) = criteria.id {
        return records
            .iter()
            .find(|r| i64::from(r.id()) == id)
            .map_or(Selection::Missing(id), Selection::Found);
    }

    let needle = criteria
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    let matched = records
        .iter()
        .filter(|r| {
            criteria
                .group
                .is_none_or(|key| r.group_key() == Some(key))
        })
        .filter(|r| criteria.flag.is_none_or(|flag| r.flag() == flag))
        .filter(|r| {
            needle
                .as_deref()
                .is_none_or(|n| r.name().to_lowercase().contains(n))
        })
        .filter(|r| {
            criteria
                .min_population
                .is_none_or(|min| i128::from(r.population()) >= i128::from(min))
        })
        .filter(|r| {
            criteria
                .max_population
                .is_none_or(|max| i128::from(r.population()) <= i128::from(max))
        })
        .collect();

    Selection::Many(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::country::Continent;
    use crate::dataset::{City, Country, Dataset};

    fn names<R: Resource>(selection: &Selection<'_, R>) -> Vec<String> {
        match selection {
            Selection::Many(items) => items.iter().map(|r| r.name().to_string()).collect(),
            other => panic!("Expected collection, got {other:?}", other = kind(other)),
        }
    }

    const fn kind<R>(selection: &Selection<'_, R>) -> &'static str {
        match selection {
            Selection::Found(_) => "Found",
            Selection::Missing(_) => "Missing",
            Selection::Many(_) => "Many",
        }
    }

    #[test]
    fn test_no_criteria_returns_everything() {
        let cities = Dataset::<City>::fixtures();
        let result = apply(cities.records(), &FilterCriteria::default());
        assert_eq!(names(&result).len(), cities.len());
    }

    #[test]
    fn test_filter_by_country() {
        let cities = Dataset::<City>::fixtures();
        let criteria = FilterCriteria {
            group: Some(3),
            ..FilterCriteria::default()
        };
        let result = names(&apply(cities.records(), &criteria));
        assert_eq!(result, vec!["Tokyo", "Osaka", "Kyoto", "Yokohama", "Nagoya"]);
    }

    #[test]
    fn test_capitals_over_five_million() {
        let cities = Dataset::<City>::fixtures();
        let criteria = FilterCriteria {
            flag: Some(true),
            min_population: Some(5_000_000),
            ..FilterCriteria::default()
        };
        let result = names(&apply(cities.records(), &criteria));
        assert_eq!(
            result,
            vec!["Tokyo", "London", "Moscow", "New Delhi", "Beijing", "Seoul"]
        );
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let cities = Dataset::<City>::fixtures();
        let criteria = FilterCriteria {
            search: Some("  TOK ".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(names(&apply(cities.records(), &criteria)), vec!["Tokyo"]);

        let blank = FilterCriteria {
            search: Some("   ".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(names(&apply(cities.records(), &blank)).len(), cities.len());
    }

    #[test]
    fn test_population_bounds_are_inclusive() {
        let cities = Dataset::<City>::fixtures();
        let kyoto = cities
            .records()
            .iter()
            .find(|c| c.name == "Kyoto")
            .map(|c| i64::try_from(c.population).unwrap())
            .unwrap();
        let criteria = FilterCriteria {
            min_population: Some(kyoto),
            max_population: Some(kyoto),
            ..FilterCriteria::default()
        };
        assert_eq!(names(&apply(cities.records(), &criteria)), vec!["Kyoto"]);
    }

    #[test]
    fn test_inverted_bounds_yield_empty() {
        let cities = Dataset::<City>::fixtures();
        let criteria = FilterCriteria {
            min_population: Some(10_000_000),
            max_population: Some(1_000_000),
            ..FilterCriteria::default()
        };
        assert!(names(&apply(cities.records(), &criteria)).is_empty());
    }

    #[test]
    fn test_out_of_range_numbers_match_nothing() {
        let cities = Dataset::<City>::fixtures();

        let negative_id = FilterCriteria {
            id: Some(-1),
            ..FilterCriteria::default()
        };
        assert!(matches!(
            apply(cities.records(), &negative_id),
            Selection::Missing(-1)
        ));

        let huge_id = FilterCriteria {
            id: Some(i64::from(u32::MAX) + 1),
            ..FilterCriteria::default()
        };
        assert!(matches!(
            apply(cities.records(), &huge_id),
            Selection::Missing(_)
        ));

        let negative_country = FilterCriteria {
            group: Some(-1),
            ..FilterCriteria::default()
        };
        assert!(names(&apply(cities.records(), &negative_country)).is_empty());
    }

    #[test]
    fn test_negative_bounds() {
        let cities = Dataset::<City>::fixtures();
        let everything = FilterCriteria {
            min_population: Some(-5),
            ..FilterCriteria::default()
        };
        assert_eq!(names(&apply(cities.records(), &everything)).len(), cities.len());

        let nothing = FilterCriteria {
            max_population: Some(-5),
            ..FilterCriteria::default()
        };
        assert!(names(&apply(cities.records(), &nothing)).is_empty());
    }

    #[test]
    fn test_id_short_circuits_other_filters() {
        let cities = Dataset::<City>::fixtures();
        // Tokyo is not in country 1, but the id wins
        let criteria = FilterCriteria {
            id: Some(1),
            group: Some(1),
            search: Some("zzz".to_string()),
            ..FilterCriteria::default()
        };
        match apply(cities.records(), &criteria) {
            Selection::Found(city) => assert_eq!(city.name, "Tokyo"),
            other => panic!("Expected Found, got {}", kind(&other)),
        }

        let missing = FilterCriteria {
            id: Some(9999),
            ..FilterCriteria::default()
        };
        assert!(matches!(
            apply(cities.records(), &missing),
            Selection::Missing(9999)
        ));
    }

    #[test]
    fn test_conjunction_matches_manual_predicate() {
        let cities = Dataset::<City>::fixtures();
        let criteria = FilterCriteria {
            id: None,
            group: Some(3),
            flag: Some(false),
            search: Some("o".to_string()),
            min_population: Some(2_000_000),
            max_population: Some(3_000_000),
        };
        let expected: Vec<String> = cities
            .records()
            .iter()
            .filter(|c| {
                c.country_id == 3
                    && !c.is_capital
                    && c.name.to_lowercase().contains('o')
                    && (2_000_000..=3_000_000).contains(&c.population)
            })
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(names(&apply(cities.records(), &criteria)), expected);
        assert_eq!(expected, vec!["Osaka", "Nagoya"]);
    }

    #[test]
    fn test_country_filters() {
        let countries = Dataset::<Country>::fixtures();
        let criteria = FilterCriteria {
            group: Some(Continent::Europe),
            flag: Some(true),
            ..FilterCriteria::default()
        };
        assert_eq!(
            names(&apply(countries.records(), &criteria)),
            vec!["Switzerland"]
        );
    }
}
