//! Response shaping for list and detail endpoints.
//!
//! Lets a caller pick a subset of an entity's fields, sort by field names
//! given as strings, and receive paged output with metadata, all driven by a
//! static per-entity [`EntitySchema`] instead of per-endpoint code.
//!
//! Typical flow for a list request:
//!
//! ```rust,ignore
//! let params = RequestParameters::from_options(&options, PageLimits::default())?;
//! let schema = registry.get::<Employee>()?;
//! let order = build_order_expression(params.order_by(), schema);
//! let rows = repo.fetch_page(&filter, &order, params.page_number(), params.page_size()).await?;
//! let total = repo.count(&filter).await?;
//! let selection = FieldSelection::resolve(params.fields(), schema);
//! let page = paginate(rows, params.page_number(), params.page_size(), total)
//!     .map_items(|e| shape_one(&e, &selection));
//! ```

mod error;
pub mod fields;
pub mod order;
pub mod page;
pub mod params;
pub mod schema;
pub mod shaper;
pub mod value;

pub use error::{Error, Result};
pub use fields::FieldSelection;
pub use order::{build_order_expression, OrderClause, OrderExpression, SortDirection};
pub use page::{paginate, PageMeta, PagedResult};
pub use params::{
    parse_int_param, PageLimits, QueryOptions, RangeFilter, RequestParameters,
    DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use schema::{Accessor, EntitySchema, EntitySchemaBuilder, FieldDef, SchemaRegistry};
pub use shaper::{shape, shape_fields, shape_one, shape_one_fields, ShapedRecord};
pub use value::FieldValue;
