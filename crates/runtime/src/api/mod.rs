//! Public runtime API surface.
//!
//! This module gathers the error types and the transport seam exposed to
//! consumers of the runtime crate.

pub mod client;
pub mod errors;

pub use client::CannonClient;
pub use errors::{AttackError, CannonError, ClientError, ManagerError, RequestError, Result};
