use serde::Deserialize;
use shaping_core::{
    parse_int_param, PageLimits, QueryOptions, RangeFilter, RequestParameters, Result,
};
use uuid::Uuid;

use crate::domain::repo::{CompanyFilter, EmployeeFilter, PageRequest};

/// Raw query of `GET /api/companies`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyQuery {
    #[serde(flatten)]
    pub options: QueryOptions,
    #[serde(default, alias = "search_term")]
    pub search_term: Option<String>,
}

/// Raw query of `GET /api/companies/{company_id}/employees`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeQuery {
    #[serde(flatten)]
    pub options: QueryOptions,
    #[serde(default, alias = "min_age")]
    pub min_age: Option<String>,
    #[serde(default, alias = "max_age")]
    pub max_age: Option<String>,
    #[serde(default, alias = "search_term")]
    pub search_term: Option<String>,
}

/// Query of single-entity reads: only `fields` is honoured.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldsQuery {
    #[serde(default)]
    pub fields: Option<String>,
}

fn search_term(raw: Option<&String>) -> Option<String> {
    raw.map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Validated company list parameters.
#[derive(Debug, Clone)]
pub struct CompanyParameters {
    pub common: RequestParameters,
    pub search_term: Option<String>,
}

impl CompanyParameters {
    pub fn from_query(query: &CompanyQuery, limits: PageLimits) -> Result<Self> {
        Ok(Self {
            common: RequestParameters::from_options(&query.options, limits)?,
            search_term: search_term(query.search_term.as_ref()),
        })
    }

    pub fn page(&self) -> PageRequest {
        PageRequest::from(&self.common)
    }

    pub fn filter(&self) -> CompanyFilter {
        CompanyFilter {
            search_term: self.search_term.clone(),
        }
    }
}

/// Validated employee list parameters.
///
/// `min_age` defaults to 0 and `max_age` to unbounded. An inverted range is
/// rejected while parsing so no query ever runs with it.
#[derive(Debug, Clone)]
pub struct EmployeeParameters {
    pub common: RequestParameters,
    pub min_age: i32,
    pub max_age: i32,
    pub search_term: Option<String>,
}

impl EmployeeParameters {
    pub fn from_query(query: &EmployeeQuery, limits: PageLimits) -> Result<Self> {
        let common = RequestParameters::from_options(&query.options, limits)?;
        let min_age = parse_int_param("minAge", query.min_age.as_deref())?.unwrap_or(0);
        let max_age =
            parse_int_param("maxAge", query.max_age.as_deref())?.unwrap_or(i64::from(i32::MAX));
        // Inverted bounds are rejected as given; clamping comes after.
        RangeFilter::new(min_age, max_age).validate("age")?;
        Ok(Self {
            common,
            min_age: clamp_age(min_age),
            max_age: clamp_age(max_age),
            search_term: search_term(query.search_term.as_ref()),
        })
    }

    pub fn valid_age_range(&self) -> bool {
        self.age_range().is_valid()
    }

    pub fn age_range(&self) -> RangeFilter<i32> {
        RangeFilter::new(self.min_age, self.max_age)
    }

    pub fn page(&self) -> PageRequest {
        PageRequest::from(&self.common)
    }

    pub fn filter(&self, company_id: Uuid) -> EmployeeFilter {
        EmployeeFilter {
            company_id,
            age: self.age_range(),
            search_term: self.search_term.clone(),
        }
    }
}

fn clamp_age(age: i64) -> i32 {
    i32::try_from(age.max(0)).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::extract::Query;
    use axum::http::Uri;

    fn from_query_string<T: serde::de::DeserializeOwned>(pairs: &str) -> T {
        let uri: Uri = format!("/x?{pairs}").parse().unwrap();
        Query::<T>::try_from_uri(&uri).unwrap().0
    }

    fn employee_query(pairs: &str) -> EmployeeQuery {
        from_query_string(pairs)
    }

    #[test]
    fn employee_defaults() {
        let p = EmployeeParameters::from_query(&employee_query(""), PageLimits::default()).unwrap();
        assert_eq!(p.min_age, 0);
        assert_eq!(p.max_age, i32::MAX);
        assert_eq!(p.common.page_number(), 1);
        assert_eq!(p.common.page_size(), 10);
        assert!(p.search_term.is_none());
    }

    #[test]
    fn camel_and_snake_keys_are_accepted() {
        let camel = employee_query("minAge=26&maxAge=40&pageSize=5&orderBy=age%20desc&searchTerm=jo");
        let snake = employee_query("min_age=26&max_age=40&page_size=5&order_by=age%20desc&search_term=jo");
        for q in [camel, snake] {
            let p = EmployeeParameters::from_query(&q, PageLimits::default()).unwrap();
            assert_eq!((p.min_age, p.max_age), (26, 40));
            assert_eq!(p.common.page_size(), 5);
            assert_eq!(p.common.order_by(), Some("age desc"));
            assert_eq!(p.search_term.as_deref(), Some("jo"));
        }
    }

    #[test]
    fn inverted_age_range_is_rejected() {
        let err = EmployeeParameters::from_query(
            &employee_query("minAge=40&maxAge=30"),
            PageLimits::default(),
        )
        .unwrap_err();
        assert!(matches!(err, shaping_core::Error::InvalidRange { filter: "age", .. }));
    }

    #[test]
    fn inverted_range_outside_age_domain_is_rejected() {
        for pairs in ["minAge=-5&maxAge=-10", "minAge=5000000000&maxAge=3000000000"] {
            let err = EmployeeParameters::from_query(&employee_query(pairs), PageLimits::default())
                .unwrap_err();
            assert!(
                matches!(err, shaping_core::Error::InvalidRange { filter: "age", .. }),
                "{pairs}: {err:?}"
            );
        }
    }

    #[test]
    fn out_of_domain_bounds_are_clamped_after_validation() {
        let p = EmployeeParameters::from_query(
            &employee_query("minAge=-5&maxAge=5000000000"),
            PageLimits::default(),
        )
        .unwrap();
        assert_eq!((p.min_age, p.max_age), (0, i32::MAX));
    }

    #[test]
    fn equal_bounds_are_valid() {
        let p = EmployeeParameters::from_query(
            &employee_query("minAge=30&maxAge=30"),
            PageLimits::default(),
        )
        .unwrap();
        assert!(p.valid_age_range());
    }

    #[test]
    fn unparsable_age_is_a_query_error() {
        let err = EmployeeParameters::from_query(
            &employee_query("minAge=old"),
            PageLimits::default(),
        )
        .unwrap_err();
        assert!(matches!(err, shaping_core::Error::InvalidQueryParam { param: "minAge", .. }));
    }

    #[test]
    fn blank_search_term_is_ignored() {
        let q: CompanyQuery = from_query_string("searchTerm=%20%20");
        let p = CompanyParameters::from_query(&q, PageLimits::default()).unwrap();
        assert!(p.filter().search_term.is_none());
    }
}
