//! Tenant/Plan Gate (C3)
//!
//! Owns tenant, plan and user provisioning, and the pure plan-limit check the ingest pipeline
//! invokes before writing samples (§4.3). Identity-provider integration (SSO, OAuth) is treated
//! as external: requests carry an already-authenticated `external_identity`, bound by C9's
//! tenant-context middleware upstream of this crate.

pub mod context;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use context::TenantContext;
pub use error::{TenantError, TenantResult};
pub use models::{
    CreatePlan, CreateTenant, CreateUser, IngestUsage, Plan, Role, Tenant, User, UserStatus,
};
pub use postgres::PgTenantRepository;
pub use repository::TenantRepository;
pub use service::{PlanGate, TenancyService};
