//! Stand-in for a real ion cannon endpoint.
//!
//! Serves `GET /status` and `POST /fire` with the same JSON shapes as the
//! real cannons and enforces its own fire-time cooldown, so the battle
//! station can be exercised end to end without hardware.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use actix_web::{
    HttpResponse,
    web::{self, Bytes, Data},
};
use battlestation_runtime::{CannonStatus, FireRequest, FireResponse};

/// One simulated cannon.
#[derive(Debug)]
pub struct MockCannon {
    generation: u32,
    fire_time: Duration,
    last_fired: Mutex<Option<Instant>>,
}

impl MockCannon {
    pub fn new(generation: u32, fire_time: Duration) -> Self {
        Self {
            generation,
            fire_time,
            last_fired: Mutex::new(None),
        }
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn fire_time(&self) -> Duration {
        self.fire_time
    }

    pub fn is_available(&self) -> bool {
        let last_fired = *self.last_fired.lock().unwrap_or_else(PoisonError::into_inner);
        Self::ready(last_fired, self.fire_time)
    }

    fn ready(last_fired: Option<Instant>, fire_time: Duration) -> bool {
        last_fired.is_none_or(|fired_at| fired_at.elapsed() >= fire_time)
    }

    pub fn status(&self) -> CannonStatus {
        CannonStatus {
            generation: self.generation,
            available: self.is_available(),
        }
    }
}

async fn status(cannon: Data<MockCannon>) -> HttpResponse {
    HttpResponse::Ok().json(cannon.status())
}

async fn fire(cannon: Data<MockCannon>, body: Bytes) -> HttpResponse {
    let mut last_fired = cannon
        .last_fired
        .lock()
        .unwrap_or_else(PoisonError::into_inner);

    if !MockCannon::ready(*last_fired, cannon.fire_time) {
        return HttpResponse::ServiceUnavailable().body("Cannon not available");
    }

    let request: FireRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            tracing::warn!(error = %err, "rejected fire order");
            return HttpResponse::BadRequest().body("Invalid request body");
        }
    };

    *last_fired = Some(Instant::now());
    tracing::info!(
        generation = cannon.generation,
        x = request.target.x,
        y = request.target.y,
        enemies = request.enemies,
        "fired"
    );

    HttpResponse::Ok().json(FireResponse {
        casualties: request.enemies,
        generation: cannon.generation,
    })
}

/// Registers the cannon endpoints. The [`MockCannon`] must be supplied as
/// `Data<MockCannon>` app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/status", web::get().to(status))
        .route("/fire", web::post().to(fire));
}
