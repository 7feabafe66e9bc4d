//! Rate-limited remote weapons.
//!
//! An [`IonCannon`] wraps one cannon endpoint. It tracks its own cooldown
//! locally, caches the endpoint's last reported status for a short time, and
//! re-checks availability right before firing so that two selection rounds
//! racing for the same cannon cannot both fire it.

mod status_cache;

pub use status_cache::{STATUS_CACHE_TTL, StatusCache};

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use battlestation_core::Position;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::{Instant, timeout_at};

use crate::api::{CannonClient, CannonError};

/// Cannon generation. Lower generations are preferred when several cannons
/// are available at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Generation {
    First = 1,
    Second = 2,
    Third = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown cannon generation: {0}")]
pub struct UnknownGeneration(pub u32);

impl Generation {
    pub const ALL: [Self; 3] = [Self::First, Self::Second, Self::Third];

    pub const fn number(self) -> u32 {
        self as u32
    }

    /// Minimum time between two shots of this generation.
    pub const fn cooldown(self) -> Duration {
        match self {
            Self::First => Duration::from_millis(3500),
            Self::Second => Duration::from_millis(1500),
            Self::Third => Duration::from_millis(2500),
        }
    }
}

impl TryFrom<u32> for Generation {
    type Error = UnknownGeneration;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|generation| generation.number() == value)
            .ok_or(UnknownGeneration(value))
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Status reported by a cannon endpoint (`GET /status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CannonStatus {
    pub generation: u32,
    pub available: bool,
}

/// Body of a fire order (`POST /fire`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireRequest {
    pub target: Position,
    pub enemies: i32,
}

/// Outcome reported by a cannon after firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FireResponse {
    pub casualties: i32,
    pub generation: u32,
}

/// One cannon endpoint with its local cooldown and cached remote status.
pub struct IonCannon {
    generation: Generation,
    location: String,
    client: Arc<dyn CannonClient>,
    last_fired: RwLock<Option<Instant>>,
    // Serializes fire orders so the availability re-check and the cooldown
    // stamp happen atomically with respect to other shots.
    fire_guard: Mutex<()>,
    status_cache: StatusCache,
}

impl fmt::Debug for IonCannon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IonCannon")
            .field("generation", &self.generation)
            .field("location", &self.location)
            .field("last_fired", &self.last_fired())
            .finish_non_exhaustive()
    }
}

impl IonCannon {
    pub fn new(
        generation: Generation,
        location: impl Into<String>,
        client: Arc<dyn CannonClient>,
    ) -> Self {
        Self {
            generation,
            location: location.into(),
            client,
            last_fired: RwLock::new(None),
            fire_guard: Mutex::new(()),
            status_cache: StatusCache::default(),
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Address of the cannon endpoint.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn last_fired(&self) -> Option<Instant> {
        *self.last_fired.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Local cooldown check. Never suspends and never touches the network.
    pub fn is_available(&self) -> bool {
        match self.last_fired() {
            None => true,
            Some(fired_at) => fired_at.elapsed() >= self.generation.cooldown(),
        }
    }

    /// Returns the endpoint's status, served from cache when fresh.
    pub async fn check_status(&self) -> Result<CannonStatus, CannonError> {
        if let Some(status) = self.status_cache.get() {
            return Ok(status);
        }

        let status = self
            .client
            .status(&self.location)
            .await
            .map_err(CannonError::Status)?;

        tracing::debug!(
            generation = %self.generation,
            available = status.available,
            "refreshed cannon status"
        );
        self.status_cache.store(status);
        Ok(status)
    }

    /// Fires at the requested target.
    ///
    /// Fails with [`CannonError::NotAvailable`] without calling the endpoint
    /// if the cooldown has not elapsed. The cooldown is stamped only after the
    /// endpoint confirms the shot.
    pub async fn fire(
        &self,
        request: &FireRequest,
        deadline: Instant,
    ) -> Result<FireResponse, CannonError> {
        let _guard = timeout_at(deadline, self.fire_guard.lock())
            .await
            .map_err(|_| CannonError::DeadlineExceeded(self.generation))?;

        if !self.is_available() {
            return Err(CannonError::NotAvailable(self.generation));
        }

        let response = timeout_at(deadline, self.client.fire(&self.location, request))
            .await
            .map_err(|_| CannonError::DeadlineExceeded(self.generation))?
            .map_err(CannonError::Fire)?;

        *self
            .last_fired
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Instant::now());

        tracing::info!(
            generation = %self.generation,
            x = request.target.x,
            y = request.target.y,
            casualties = response.casualties,
            "cannon fired"
        );
        Ok(response)
    }
}
