//! Shared application state: configuration, connection pools, and one service per domain.
//!
//! Cloned per handler (all fields are cheap: `Arc`s, connection pools, or config structs).

use std::sync::Arc;

use database::postgres::DatabaseConnection;
use database::redis::ConnectionManager;
use domain_allocation::AllocationService;
use domain_apikeys::{ApiKeyCache, ApiKeyService, PgApiKeyRepository};
use domain_pricing::{PgPricingRepository, PricingService};
use domain_recommender::{PgRecommenderRepository, RecommenderService};
use domain_tenancy::{PgTenantRepository, TenancyService};
use domain_timeseries::{IngestService, PgTimeseriesRepository};

pub type Apikeys = ApiKeyService<PgApiKeyRepository>;
pub type Pricing = PricingService<PgPricingRepository>;
pub type Tenancy = TenancyService<PgTenantRepository>;
pub type Timeseries = IngestService<PgTimeseriesRepository>;
pub type Recommender = RecommenderService<PgRecommenderRepository, PgTimeseriesRepository, PgPricingRepository>;
pub type Allocation = AllocationService<PgTimeseriesRepository, PgPricingRepository>;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub db: DatabaseConnection,
    pub redis: ConnectionManager,
    pub apikeys: Arc<Apikeys>,
    pub pricing: Arc<Pricing>,
    pub tenancy: Arc<Tenancy>,
    pub timeseries: Arc<Timeseries>,
    pub recommender: Arc<Recommender>,
    pub allocation: Arc<Allocation>,
    pub timeseries_store: Arc<PgTimeseriesRepository>,
}

impl AppState {
    pub fn new(config: crate::config::Config, db: DatabaseConnection, redis: ConnectionManager) -> Self {
        let pricing_repo = PgPricingRepository::new(db.clone());
        let pricing = Arc::new(PricingService::new(pricing_repo));

        let timeseries_repo = Arc::new(PgTimeseriesRepository::new(db.clone()));

        let apikeys = Arc::new(ApiKeyService::new(
            PgApiKeyRepository::new(db.clone()),
            ApiKeyCache::new(redis.clone(), config.api_key_cache_ttl_seconds),
            config.api_key_pepper.clone(),
        ));

        let tenancy = Arc::new(TenancyService::new(PgTenantRepository::new(db.clone())));

        let timeseries = Arc::new(IngestService::new(
            PgTimeseriesRepository::new(db.clone()),
            config.max_ingest_payload_bytes,
        ));

        let recommender = Arc::new(RecommenderService::new(
            PgRecommenderRepository::new(db.clone()),
            timeseries_repo.clone(),
            pricing.clone(),
        ));

        let allocation = Arc::new(AllocationService::new(timeseries_repo.clone(), pricing.clone()));

        Self {
            config,
            db,
            redis,
            apikeys,
            pricing,
            tenancy,
            timeseries,
            recommender,
            allocation,
            timeseries_store: timeseries_repo,
        }
    }
}
