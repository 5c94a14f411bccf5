//! Demo data for an empty database, enabled by `modules.companies.seed_demo_data`.

use anyhow::Context;
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, TransactionTrait};
use uuid::{uuid, Uuid};

use crate::contract::model::{Company, Employee};
use crate::infra::storage::entity::{company, employee};

pub const IT_SOLUTIONS: Uuid = uuid!("c9d4c053-49b6-410c-bc78-2d54a9991870");
pub const ADMIN_SOLUTIONS: Uuid = uuid!("3d490a70-94ce-4d15-9494-5248280c2ce3");

fn demo_companies() -> Vec<Company> {
    vec![
        Company {
            id: IT_SOLUTIONS,
            name: "IT_Solutions Ltd".into(),
            address: "583 Wall Dr. Gwynn Oak, MD 21207".into(),
            country: Some("USA".into()),
        },
        Company {
            id: ADMIN_SOLUTIONS,
            name: "Admin_Solutions Ltd".into(),
            address: "312 Forest Avenue, BF 923".into(),
            country: Some("USA".into()),
        },
    ]
}

fn demo_employees() -> Vec<Employee> {
    let e = |id: Uuid, name: &str, age: i32, position: &str, company_id: Uuid| Employee {
        id,
        name: name.into(),
        age,
        position: position.into(),
        company_id,
    };
    vec![
        e(
            uuid!("80abbca8-664d-4b20-b5de-024705497d4a"),
            "Sam Raiden",
            26,
            "Software developer",
            IT_SOLUTIONS,
        ),
        e(
            uuid!("86dba8c0-d178-41e7-938c-ed49778fb52a"),
            "Jana McLeaf",
            30,
            "Software developer",
            IT_SOLUTIONS,
        ),
        e(
            uuid!("021ca3c1-0deb-4afd-ae94-2159a8479811"),
            "Kane Miller",
            35,
            "Administrator",
            ADMIN_SOLUTIONS,
        ),
    ]
}

/// Insert the demo companies and employees unless any company exists.
/// Returns whether anything was inserted.
pub async fn seed_demo_data<C>(conn: &C) -> anyhow::Result<bool>
where
    C: ConnectionTrait + TransactionTrait,
{
    let existing = company::Entity::find()
        .count(conn)
        .await
        .context("count companies failed")?;
    if existing > 0 {
        tracing::debug!(existing, "Database not empty, demo data skipped");
        return Ok(false);
    }

    let txn = conn.begin().await.context("begin failed")?;
    company::Entity::insert_many(demo_companies().into_iter().map(company::ActiveModel::from))
        .exec(&txn)
        .await
        .context("seed companies failed")?;
    employee::Entity::insert_many(demo_employees().into_iter().map(employee::ActiveModel::from))
        .exec(&txn)
        .await
        .context("seed employees failed")?;
    txn.commit().await.context("commit failed")?;

    tracing::info!("Seeded demo companies and employees");
    Ok(true)
}
