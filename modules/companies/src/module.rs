use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::{openapi, routes, schema::ShapingContext};
use crate::config::CompaniesConfig;
use crate::contract::client::CompaniesApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::CompaniesLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::{SeaOrmCompaniesRepository, SeaOrmEmployeesRepository};
use crate::infra::storage::seed;

/// The companies module: domain service over SeaORM repositories plus the
/// REST surface built on top of it.
#[derive(Clone)]
pub struct Companies {
    db: DatabaseConnection,
    config: CompaniesConfig,
    service: Arc<Service>,
    shaping: Arc<ShapingContext>,
}

impl Companies {
    /// Wire repositories, service and shaping schemas. Does not touch the
    /// database; call [`Companies::migrate`] before serving.
    pub fn init(db: DatabaseConnection, config: CompaniesConfig) -> anyhow::Result<Self> {
        info!("Initializing companies module");
        debug!(
            "Loaded companies config: default_page_size={}, max_page_size={}, seed_demo_data={}",
            config.default_page_size, config.max_page_size, config.seed_demo_data
        );

        let service = Service::new(
            Arc::new(SeaOrmCompaniesRepository::new(db.clone())),
            Arc::new(SeaOrmEmployeesRepository::new(db.clone())),
            ServiceConfig::default(),
        );
        let shaping = ShapingContext::new(config.limits())?;

        Ok(Self {
            db,
            config,
            service: Arc::new(service),
            shaping: Arc::new(shaping),
        })
    }

    /// Apply pending migrations, then seed demo data when configured.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        info!("Running companies database migrations");
        Migrator::up(&self.db, None).await?;
        info!("Companies database migrations completed successfully");

        if self.config.seed_demo_data {
            seed::seed_demo_data(&self.db).await?;
        }
        Ok(())
    }

    /// Mount the REST routes on `router`.
    pub fn register_rest(&self, router: Router) -> Router {
        info!("Registering companies REST routes");
        routes::register_routes(router, self.service.clone(), self.shaping.clone())
    }

    pub fn openapi(&self) -> anyhow::Result<serde_json::Value> {
        openapi::openapi_document()
    }

    /// In-process client for other modules.
    pub fn client(&self) -> Arc<dyn CompaniesApi> {
        Arc::new(CompaniesLocalClient::new(self.service.clone()))
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }
}
