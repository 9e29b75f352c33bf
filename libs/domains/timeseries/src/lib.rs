//! Ingest Pipeline (C4) and Time-Series Store Adapter (C5)
//!
//! Persists append-only pod/node samples under explicit tenant isolation and drives the
//! collection-bundle ingest contract in §4.4.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{TimeseriesError, TimeseriesResult};
pub use models::{CollectionBundle, IngestAccepted, NodeSample, PodSample, TimeWindow};
pub use postgres::PgTimeseriesRepository;
pub use repository::TimeseriesRepository;
pub use service::IngestService;
