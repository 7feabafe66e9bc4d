//! Arbiter over the cannon pool.
//!
//! Every selection round fans out one probe per cannon, joins all of them
//! (or gives up at the caller's deadline), and then picks a winner from the
//! snapshot of outcomes. Nothing that reports after the join influences the
//! round.

use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout_at};

use crate::api::{CannonError, ManagerError};
use crate::cannon::{CannonStatus, FireRequest, FireResponse, IonCannon};

/// Result of probing a single cannon during a selection round.
#[derive(Debug)]
enum Probe {
    /// Local cooldown has not elapsed; the endpoint was not contacted.
    CoolingDown,
    Ready(CannonStatus),
    Failed(CannonError),
}

async fn probe(cannon: &IonCannon) -> Probe {
    if !cannon.is_available() {
        return Probe::CoolingDown;
    }
    match cannon.check_status().await {
        Ok(status) => Probe::Ready(status),
        Err(err) => Probe::Failed(err),
    }
}

/// Picks the lowest reported generation among available probes, breaking
/// ties by pool order.
fn select(outcomes: &[(usize, Probe)], pool_size: usize) -> Result<usize, ManagerError> {
    let best = outcomes
        .iter()
        .filter_map(|(index, probe)| match probe {
            Probe::Ready(status) if status.available => Some((status.generation, *index)),
            _ => None,
        })
        .min();

    if let Some((_, index)) = best {
        return Ok(index);
    }

    let failed = outcomes
        .iter()
        .filter(|(_, probe)| matches!(probe, Probe::Failed(_)))
        .count()
        + pool_size.saturating_sub(outcomes.len());
    if pool_size > 0 && failed == pool_size {
        Err(ManagerError::ProbesFailed(failed))
    } else {
        Err(ManagerError::NoCannonsAvailable)
    }
}

/// Per-cannon entry of [`CannonManager::status_report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CannonReport {
    pub generation: u32,
    pub location: String,
    pub locally_available: bool,
    pub status: Option<CannonStatus>,
    pub error: Option<String>,
}

/// Owns the cannon pool for its whole lifetime.
///
/// The pool is sorted by ascending generation once at construction and
/// never changes afterwards, so it is shared without locking.
#[derive(Debug, Clone)]
pub struct CannonManager {
    cannons: Arc<[Arc<IonCannon>]>,
}

impl CannonManager {
    pub fn new(mut cannons: Vec<IonCannon>) -> Self {
        cannons.sort_by_key(IonCannon::generation);
        Self {
            cannons: cannons.into_iter().map(Arc::new).collect(),
        }
    }

    /// Cannons in pool order.
    pub fn cannons(&self) -> &[Arc<IonCannon>] {
        &self.cannons
    }

    pub fn len(&self) -> usize {
        self.cannons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cannons.is_empty()
    }

    /// Polls every cannon concurrently and returns the best one that is both
    /// off cooldown and reported available by its endpoint.
    ///
    /// A failed probe only makes that cannon unselectable for this round.
    /// If the deadline elapses first, outstanding probes are cancelled and
    /// joined before [`ManagerError::DeadlineExceeded`] is returned.
    pub async fn get_best_available(
        &self,
        deadline: Instant,
    ) -> Result<Arc<IonCannon>, ManagerError> {
        if self.cannons.is_empty() {
            return Err(ManagerError::NoCannonsAvailable);
        }

        let mut probes = JoinSet::new();
        for (index, cannon) in self.cannons.iter().enumerate() {
            let cannon = Arc::clone(cannon);
            probes.spawn(async move { (index, probe(&cannon).await) });
        }

        let mut outcomes = Vec::with_capacity(self.cannons.len());
        let joined = timeout_at(deadline, async {
            while let Some(joined) = probes.join_next().await {
                match joined {
                    Ok(outcome) => outcomes.push(outcome),
                    Err(err) => tracing::warn!(error = %err, "cannon probe task failed"),
                }
            }
        })
        .await;

        if joined.is_err() {
            probes.shutdown().await;
            tracing::warn!(
                reported = outcomes.len(),
                pool = self.cannons.len(),
                "deadline exceeded while polling cannons"
            );
            return Err(ManagerError::DeadlineExceeded);
        }

        for (index, outcome) in &outcomes {
            let generation = self.cannons[*index].generation();
            match outcome {
                Probe::CoolingDown => {
                    tracing::debug!(%generation, "cannon cooling down");
                }
                Probe::Ready(status) => {
                    tracing::debug!(%generation, available = status.available, "cannon probed");
                }
                Probe::Failed(err) => {
                    tracing::warn!(%generation, error = %err, "cannon probe failed");
                }
            }
        }

        let index = select(&outcomes, self.cannons.len())?;
        let cannon = Arc::clone(&self.cannons[index]);
        tracing::debug!(generation = %cannon.generation(), "selected cannon");
        Ok(cannon)
    }

    /// Fires `cannon` after checking that it belongs to this pool.
    pub async fn fire(
        &self,
        cannon: &Arc<IonCannon>,
        request: &FireRequest,
        deadline: Instant,
    ) -> Result<FireResponse, ManagerError> {
        if !self.cannons.iter().any(|member| Arc::ptr_eq(member, cannon)) {
            return Err(ManagerError::UnknownCannon);
        }

        cannon
            .fire(request, deadline)
            .await
            .map_err(ManagerError::Fire)
    }

    /// Fetches every cannon's status concurrently, ignoring local cooldowns.
    ///
    /// Cannons that have not answered by the deadline are reported with an
    /// error instead of failing the whole report.
    pub async fn status_report(&self, deadline: Instant) -> Vec<CannonReport> {
        let mut probes = JoinSet::new();
        for (index, cannon) in self.cannons.iter().enumerate() {
            let cannon = Arc::clone(cannon);
            probes.spawn(async move { (index, cannon.check_status().await) });
        }

        let mut results: Vec<Option<Result<CannonStatus, CannonError>>> =
            vec![None; self.cannons.len()];
        let joined = timeout_at(deadline, async {
            while let Some(joined) = probes.join_next().await {
                if let Ok((index, result)) = joined {
                    results[index] = Some(result);
                }
            }
        })
        .await;

        if joined.is_err() {
            probes.shutdown().await;
        }

        self.cannons
            .iter()
            .zip(results)
            .map(|(cannon, result)| {
                let (status, error) = match result {
                    Some(Ok(status)) => (Some(status), None),
                    Some(Err(err)) => (None, Some(err.to_string())),
                    None => (None, Some("no status before deadline".to_string())),
                };
                CannonReport {
                    generation: cannon.generation().number(),
                    location: cannon.location().to_string(),
                    locally_available: cannon.is_available(),
                    status,
                    error,
                }
            })
            .collect()
    }
}
