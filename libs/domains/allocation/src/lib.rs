//! Allocation Engine (C6)
//!
//! An OpenCost-compatible cost allocation engine computed directly over C5's pod/node
//! time-series samples and C1's pricing resolver — it owns no storage of its own (§4.6).

pub mod error;
pub mod handlers;
pub mod models;
pub mod service;

pub use error::{AllocationError, AllocationResult};
pub use models::{
    AggregateToken, Allocation, AllocationQuery, AllocationSet, FilterClause, IdleMode, Summary,
    SummaryItem, Topline,
};
pub use service::AllocationService;
