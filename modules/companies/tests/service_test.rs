//! Domain service and local client over SeaORM-backed repositories.

mod common;

use std::sync::Arc;

use anyhow::Result;
use shaping_core::{build_order_expression, OrderExpression, RangeFilter};
use uuid::Uuid;

use companies::api::rest::schema::employee_schema;
use companies::contract::client::CompaniesApi;
use companies::contract::error::CompaniesError;
use companies::contract::model::{CompanyUpdate, EmployeePatch, NewCompany, NewEmployee};
use companies::domain::error::DomainError;
use companies::domain::repo::{CompanyFilter, EmployeeFilter, PageRequest};
use companies::domain::service::{Service, ServiceConfig};
use companies::gateways::local::CompaniesLocalClient;
use companies::infra::storage::sea_orm_repo::{SeaOrmCompaniesRepository, SeaOrmEmployeesRepository};

async fn create_test_service() -> Arc<Service> {
    let db = common::test_db().await;
    Arc::new(Service::new(
        Arc::new(SeaOrmCompaniesRepository::new(db.clone())),
        Arc::new(SeaOrmEmployeesRepository::new(db)),
        ServiceConfig::default(),
    ))
}

fn new_company(name: &str) -> NewCompany {
    NewCompany {
        name: name.to_string(),
        address: "1 Main Street".to_string(),
        country: None,
        employees: Vec::new(),
    }
}

fn new_employee(name: &str, age: i32) -> NewEmployee {
    NewEmployee {
        name: name.to_string(),
        age,
        position: "Developer".to_string(),
    }
}

#[tokio::test]
async fn company_crud() -> Result<()> {
    let service = create_test_service().await;

    let mut req = new_company("Acme");
    req.employees = vec![new_employee("Ann", 30)];
    let created = service.create_company(req).await?;
    assert_eq!(service.get_company(created.id).await?, created);

    service
        .update_company(
            created.id,
            CompanyUpdate {
                name: "Acme Corp".into(),
                address: "2 Main Street".into(),
                country: Some("NL".into()),
                employees: vec![new_employee("Bob", 40)],
            },
        )
        .await?;
    let updated = service.get_company(created.id).await?;
    assert_eq!(updated.name, "Acme Corp");
    assert_eq!(updated.country.as_deref(), Some("NL"));

    let page = service
        .list_employees(
            EmployeeFilter::for_company(created.id),
            OrderExpression::empty(),
            PageRequest::new(1, 10),
        )
        .await?;
    assert_eq!(page.meta.total_count, 2);

    service.delete_company(created.id).await?;
    assert!(matches!(
        service.get_company(created.id).await,
        Err(DomainError::CompanyNotFound { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn list_companies_counts_before_paging() -> Result<()> {
    let service = create_test_service().await;
    for name in ["Delta", "Alpha", "Charlie", "Bravo", "Echo"] {
        service.create_company(new_company(name)).await?;
    }

    let page = service
        .list_companies(
            CompanyFilter::default(),
            OrderExpression::empty(),
            PageRequest::new(2, 2),
        )
        .await?;
    let names: Vec<&str> = page.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Charlie", "Delta"]);
    assert_eq!(page.meta.total_count, 5);
    assert_eq!(page.meta.total_pages, 3);
    assert!(page.meta.has_previous && page.meta.has_next);
    Ok(())
}

#[tokio::test]
async fn companies_by_ids_keep_request_order() -> Result<()> {
    let service = create_test_service().await;
    let a = service.create_company(new_company("A")).await?;
    let b = service.create_company(new_company("B")).await?;

    let got = service.get_companies_by_ids(&[b.id, a.id]).await?;
    assert_eq!(got, vec![b.clone(), a.clone()]);

    let unknown = Uuid::new_v4();
    match service.get_companies_by_ids(&[a.id, unknown]).await {
        Err(DomainError::CompaniesNotFound { missing }) => assert_eq!(missing, vec![unknown]),
        other => panic!("unexpected result: {other:?}"),
    }

    assert!(matches!(
        service.get_companies_by_ids(&[]).await,
        Err(DomainError::InvalidInput { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn batch_create_is_all_or_nothing() -> Result<()> {
    let service = create_test_service().await;
    let mut bad = new_company("Bad");
    bad.employees = vec![new_employee("Kid", 10)];

    let err = service
        .create_companies(vec![new_company("Good"), bad])
        .await
        .unwrap_err();
    match err {
        DomainError::Validation { errors } => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "employees/0/age");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let page = service
        .list_companies(
            CompanyFilter::default(),
            OrderExpression::empty(),
            PageRequest::new(1, 10),
        )
        .await?;
    assert_eq!(page.meta.total_count, 0);

    assert!(matches!(
        service.create_companies(Vec::new()).await,
        Err(DomainError::InvalidInput { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn inverted_age_range_fails_before_company_lookup() {
    let service = create_test_service().await;
    let mut filter = EmployeeFilter::for_company(Uuid::new_v4());
    filter.age = RangeFilter::new(50, 20);

    let res = service
        .list_employees(filter, OrderExpression::empty(), PageRequest::new(1, 10))
        .await;
    assert!(matches!(res, Err(DomainError::InvalidInput { .. })));
}

#[tokio::test]
async fn employee_order_and_filters() -> Result<()> {
    let service = create_test_service().await;
    let company = service.create_company(new_company("Acme")).await?;
    for (name, age) in [("Zed", 30), ("Amy", 30), ("Bo", 45), ("Cy", 19)] {
        service.create_employee(company.id, new_employee(name, age)).await?;
    }
    let schema = employee_schema()?;

    let order = build_order_expression(Some("age desc, name"), &schema);
    let page = service
        .list_employees(
            EmployeeFilter::for_company(company.id),
            order,
            PageRequest::new(1, 10),
        )
        .await?;
    let names: Vec<&str> = page.items.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Bo", "Amy", "Zed", "Cy"]);

    let mut filter = EmployeeFilter::for_company(company.id);
    filter.age = RangeFilter::new(20, 40);
    let page = service
        .list_employees(filter, OrderExpression::empty(), PageRequest::new(1, 10))
        .await?;
    let names: Vec<&str> = page.items.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["Amy", "Zed"]);
    Ok(())
}

#[tokio::test]
async fn employees_are_scoped_to_their_company() -> Result<()> {
    let service = create_test_service().await;
    let a = service.create_company(new_company("A")).await?;
    let b = service.create_company(new_company("B")).await?;
    let emp = service.create_employee(a.id, new_employee("Ann", 30)).await?;

    assert!(matches!(
        service.get_employee(b.id, emp.id).await,
        Err(DomainError::EmployeeNotFound { .. })
    ));
    assert!(matches!(
        service.delete_employee(b.id, emp.id).await,
        Err(DomainError::EmployeeNotFound { .. })
    ));
    assert_eq!(service.get_employee(a.id, emp.id).await?, emp);
    Ok(())
}

#[tokio::test]
async fn patch_validates_the_patched_result() -> Result<()> {
    let service = create_test_service().await;
    let company = service.create_company(new_company("Acme")).await?;
    let emp = service.create_employee(company.id, new_employee("Ann", 30)).await?;

    let unchanged = service
        .patch_employee(company.id, emp.id, EmployeePatch::default())
        .await?;
    assert_eq!(unchanged, emp);

    let patched = service
        .patch_employee(
            company.id,
            emp.id,
            EmployeePatch {
                age: Some(31),
                ..EmployeePatch::default()
            },
        )
        .await?;
    assert_eq!(patched.age, 31);
    assert_eq!(patched.name, "Ann");

    let res = service
        .patch_employee(
            company.id,
            emp.id,
            EmployeePatch {
                position: Some(String::new()),
                ..EmployeePatch::default()
            },
        )
        .await;
    assert!(matches!(res, Err(DomainError::Validation { .. })));
    assert_eq!(service.get_employee(company.id, emp.id).await?.age, 31);
    Ok(())
}

#[tokio::test]
async fn local_client_maps_errors() -> Result<()> {
    let service = create_test_service().await;
    let client: Arc<dyn CompaniesApi> = Arc::new(CompaniesLocalClient::new(service));

    let created = client.create_company(new_company("Acme")).await?;
    assert_eq!(client.get_company(created.id).await?.name, "Acme");

    let unknown = Uuid::new_v4();
    assert_eq!(
        client.get_company(unknown).await,
        Err(CompaniesError::CompanyNotFound { id: unknown })
    );
    assert!(matches!(
        client.create_employee(created.id, new_employee("", 10)).await,
        Err(CompaniesError::Validation { .. })
    ));
    Ok(())
}
