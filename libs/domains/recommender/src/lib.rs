//! Right-Sizing Recommender (C7)
//!
//! Computes P95 usage statistics over a lookback window and emits deduplicated, confidence-
//! scored recommendations (§4.7).

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{RecommenderError, RecommenderResult};
pub use models::{GenerateRequest, Recommendation, RecommendationStatus, ResourceType};
pub use postgres::PgRecommenderRepository;
pub use repository::RecommenderRepository;
pub use service::RecommenderService;
