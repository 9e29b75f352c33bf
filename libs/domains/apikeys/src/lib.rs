//! API-Key Domain (C2)
//!
//! Mints, validates and revokes per-tenant, per-cluster credentials. `Validate`
//! checks Redis first, falling through to the relational store on a miss and
//! repopulating the cache, per §4.2.

pub mod cache;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use cache::ApiKeyCache;
pub use error::{ApiKeyError, ApiKeyResult};
pub use models::{ApiKeyRecord, ApiKeyRow, CreateApiKeyRequest, CreatedApiKey};
pub use postgres::PgApiKeyRepository;
pub use repository::ApiKeyRepository;
pub use service::ApiKeyService;
