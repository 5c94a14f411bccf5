use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_PAGE_NUMBER: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 50;

/// Page-size policy applied when building [`RequestParameters`].
#[cfg_attr(feature = "with-utoipa", derive(utoipa::ToSchema))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
        }
    }
}

impl PageLimits {
    /// Bound a requested page size to `[1, max_page_size]`.
    pub fn clamp_page_size(&self, requested: i64) -> u32 {
        let max = i64::from(self.max_page_size.max(1));
        requested.clamp(1, max) as u32
    }

    fn default_size(&self) -> u32 {
        self.clamp_page_size(i64::from(self.default_page_size))
    }
}

/// Query options exactly as they arrive on the wire.
///
/// Everything is kept as text so that entity-specific query structs can embed
/// this one with `#[serde(flatten)]` under `serde_urlencoded`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryOptions {
    #[serde(default, alias = "page_number")]
    pub page_number: Option<String>,
    #[serde(default, alias = "page_size")]
    pub page_size: Option<String>,
    #[serde(default, alias = "order_by")]
    pub order_by: Option<String>,
    #[serde(default)]
    pub fields: Option<String>,
}

/// Parse an optional integer query value. Blank values count as absent.
pub fn parse_int_param(param: &'static str, raw: Option<&str>) -> Result<Option<i64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<i64>()
            .map(Some)
            .map_err(|_| Error::InvalidQueryParam {
                param,
                value: v.to_string(),
            }),
    }
}

fn non_blank(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Validated paging, sorting and field-selection options of one request.
///
/// Immutable once built: the `with_*` methods consume and return a new value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestParameters {
    page_number: u32,
    page_size: u32,
    order_by: Option<String>,
    fields: Option<String>,
    limits: PageLimits,
}

impl Default for RequestParameters {
    fn default() -> Self {
        Self::new(PageLimits::default())
    }
}

impl RequestParameters {
    pub fn new(limits: PageLimits) -> Self {
        Self {
            page_number: DEFAULT_PAGE_NUMBER,
            page_size: limits.default_size(),
            order_by: None,
            fields: None,
            limits,
        }
    }

    /// Build from raw query options. Only non-integer page values fail;
    /// out-of-range values are clamped.
    pub fn from_options(options: &QueryOptions, limits: PageLimits) -> Result<Self> {
        let mut params = Self::new(limits);
        if let Some(n) = parse_int_param("pageNumber", options.page_number.as_deref())? {
            params = params.with_page_number(n);
        }
        if let Some(n) = parse_int_param("pageSize", options.page_size.as_deref())? {
            params = params.with_page_size(n);
        }
        params.order_by = non_blank(options.order_by.as_deref());
        params.fields = non_blank(options.fields.as_deref());
        Ok(params)
    }

    pub fn with_page_number(mut self, page_number: i64) -> Self {
        self.page_number = page_number.clamp(1, i64::from(u32::MAX)) as u32;
        self
    }

    /// Sizes above the configured maximum are reduced to it; sizes below 1 become 1.
    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = self.limits.clamp_page_size(page_size);
        self
    }

    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        let order_by: String = order_by.into();
        self.order_by = non_blank(Some(order_by.as_str()));
        self
    }

    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        let fields: String = fields.into();
        self.fields = non_blank(Some(fields.as_str()));
        self
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn order_by(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    pub fn fields(&self) -> Option<&str> {
        self.fields.as_deref()
    }

    pub fn limits(&self) -> PageLimits {
        self.limits
    }

    /// Number of records preceding the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_number - 1) * u64::from(self.page_size)
    }
}

/// Inclusive numeric range filter with a validity predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeFilter<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd> RangeFilter<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    pub fn contains(&self, value: &T) -> bool {
        *value >= self.min && *value <= self.max
    }
}

impl<T: PartialOrd + Display> RangeFilter<T> {
    /// Reject (never correct) a range whose min exceeds its max.
    pub fn validate(self, filter: &'static str) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::InvalidRange {
                filter,
                min: self.min.to_string(),
                max: self.max.to_string(),
            })
        }
    }
}
