use std::sync::Arc;

use shaping_core::{EntitySchema, PageLimits, SchemaRegistry};

use crate::contract::model::{Company, Employee};

/// Shaping schema of a company. Names are the canonical response keys.
pub fn company_schema() -> shaping_core::Result<EntitySchema<Company>> {
    EntitySchema::builder("Company")
        .id("Id", |c: &Company| c.id.into())
        .field("Name", |c: &Company| c.name.as_str().into())
        .field("Address", |c: &Company| c.address.as_str().into())
        .field("Country", |c: &Company| c.country.as_deref().into())
        .build()
}

/// Shaping schema of an employee. The owning company is implied by the route.
pub fn employee_schema() -> shaping_core::Result<EntitySchema<Employee>> {
    EntitySchema::builder("Employee")
        .id("Id", |e: &Employee| e.id.into())
        .field("Name", |e: &Employee| e.name.as_str().into())
        .field("Age", |e: &Employee| e.age.into())
        .field("Position", |e: &Employee| e.position.as_str().into())
        .build()
}

pub fn build_registry() -> shaping_core::Result<SchemaRegistry> {
    Ok(SchemaRegistry::builder()
        .register(company_schema()?)?
        .register(employee_schema()?)?
        .build())
}

/// Everything a handler needs to turn query options into shaped pages.
#[derive(Debug, Clone)]
pub struct ShapingContext {
    pub registry: Arc<SchemaRegistry>,
    pub limits: PageLimits,
}

impl ShapingContext {
    pub fn new(limits: PageLimits) -> shaping_core::Result<Self> {
        Ok(Self {
            registry: Arc::new(build_registry()?),
            limits,
        })
    }
}
