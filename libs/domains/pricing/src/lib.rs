//! Pricing Domain
//!
//! Resolves per-unit CPU/memory rates for a tenant's cluster, following the
//! lookup chain in §4.1 of the spec: a node's direct hourly override, the
//! cluster's bound pricing config, the tenant's default config, then
//! hard-coded provider/tier defaults.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Service   │  ← Resolve() lookup chain
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs, enums
//! └─────────────┘
//! ```

pub mod entity;
pub mod error;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{PricingError, PricingResult};
pub use models::{
    CreatePricingConfig, CreatePricingRate, NodePricingOverride, PricingConfig, PricingRate,
    PricingTier, ResolveQuery, ResolvedRates, ResourceType,
};
pub use postgres::PgPricingRepository;
pub use repository::PricingRepository;
pub use service::{NodeCapacity, PricingService};
