//! HTTP front end for the battle station.
//!
//! Binds `POST /attack` to the attack coordinator and talks to the configured
//! ion cannons through [`HttpCannonClient`].
pub mod cannon_client;
pub mod config;
pub mod handlers;
pub mod response;

use std::sync::Arc;

use battlestation_runtime::{AttackCoordinator, CannonClient, CannonManager, IonCannon};

pub use cannon_client::HttpCannonClient;
pub use config::{CannonEndpoint, ConfigError, ServerConfig};
pub use handlers::{AppState, configure};

/// Builds the cannon pool and coordinator described by `config`.
pub fn build_state(config: &ServerConfig) -> Result<AppState, reqwest::Error> {
    let client: Arc<dyn CannonClient> =
        Arc::new(HttpCannonClient::new(config.cannon_http_timeout)?);
    let cannons = config
        .cannons
        .iter()
        .map(|endpoint| {
            IonCannon::new(endpoint.generation, endpoint.url.clone(), Arc::clone(&client))
        })
        .collect();

    let manager = Arc::new(CannonManager::new(cannons));
    Ok(AppState::new(
        AttackCoordinator::new(manager),
        config.request_timeout,
    ))
}
