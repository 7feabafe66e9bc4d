//! Async resource layer for the battle station.
//!
//! This crate owns the cannon pool and everything that talks to it. Callers
//! hand an [`AttackRequest`] to an [`AttackCoordinator`], which runs the
//! target pipeline from `battlestation-core` and then asks the
//! [`CannonManager`] for the best available cannon to fire.
//!
//! Modules are organized by responsibility:
//! - [`api`] holds the error types and the [`CannonClient`] seam for endpoints
//! - [`cannon`] models a single rate-limited cannon and its status cache
//! - [`manager`] arbitrates between cannons under a deadline
//! - [`attack`] composes selection and firing into one request
//! - [`metrics`] counts attack outcomes
pub mod api;
pub mod attack;
pub mod cannon;
pub mod manager;
pub mod metrics;

pub use api::{
    AttackError, CannonClient, CannonError, ClientError, ManagerError, RequestError, Result,
};
pub use attack::{AttackCoordinator, AttackRequest, AttackResponse, validate_request};
pub use cannon::{
    CannonStatus, FireRequest, FireResponse, Generation, IonCannon, STATUS_CACHE_TTL,
    StatusCache, UnknownGeneration,
};
pub use manager::{CannonManager, CannonReport};
pub use metrics::{AttackMetrics, ClassCount, MetricsSnapshot};
