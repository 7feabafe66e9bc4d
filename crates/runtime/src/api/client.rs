//! Asynchronous abstraction over cannon endpoints.
//!
//! The runtime never speaks HTTP itself. Binaries plug in a
//! [`CannonClient`] implementation (the server uses a reqwest-backed one);
//! tests plug in in-memory fakes.
use async_trait::async_trait;

use super::errors::ClientError;
use crate::cannon::{CannonStatus, FireRequest, FireResponse};

/// Transport used to reach a cannon endpoint.
///
/// `location` is the address the cannon was configured with; implementations
/// decide how to turn it into requests.
#[async_trait]
pub trait CannonClient: Send + Sync {
    /// Fetch the endpoint's current status (`GET /status`).
    async fn status(&self, location: &str) -> Result<CannonStatus, ClientError>;

    /// Order the endpoint to fire (`POST /fire`).
    ///
    /// Not idempotent: callers must not retry blindly, the endpoint may have
    /// already fired when an error comes back.
    async fn fire(
        &self,
        location: &str,
        request: &FireRequest,
    ) -> Result<FireResponse, ClientError>;
}
