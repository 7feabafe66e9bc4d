//! Attack coordination: from a scan to a confirmed shot.

use std::sync::Arc;

use battlestation_core::{
    Classified, Position, ProtocolChain, ScanPoint, SelectionError, targets_in_range,
};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::api::{AttackError, RequestError, Result};
use crate::cannon::FireRequest;
use crate::manager::CannonManager;
use crate::metrics::AttackMetrics;

/// Body of `POST /attack`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRequest {
    #[serde(default)]
    pub protocols: Vec<String>,
    #[serde(default)]
    pub scan: Vec<ScanPoint>,
}

/// Outcome of a successful attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResponse {
    pub target: Position,
    pub casualties: i32,
    pub generation: u32,
}

/// Checks the shape of a request before any selection runs.
pub fn validate_request(request: &AttackRequest) -> std::result::Result<(), RequestError> {
    if request.protocols.is_empty() {
        return Err(RequestError::NoProtocols);
    }
    if request.scan.is_empty() {
        return Err(RequestError::NoScanPoints);
    }
    for (index, point) in request.scan.iter().enumerate() {
        point
            .validate()
            .map_err(|source| RequestError::ScanPoint { index, source })?;
    }
    Ok(())
}

/// Runs the target pipeline and fires the best available cannon.
#[derive(Debug, Clone)]
pub struct AttackCoordinator {
    manager: Arc<CannonManager>,
    metrics: Arc<AttackMetrics>,
}

impl AttackCoordinator {
    pub fn new(manager: Arc<CannonManager>) -> Self {
        Self {
            manager,
            metrics: Arc::new(AttackMetrics::new()),
        }
    }

    pub fn manager(&self) -> &Arc<CannonManager> {
        &self.manager
    }

    pub fn metrics(&self) -> &Arc<AttackMetrics> {
        &self.metrics
    }

    /// Selects a target and fires at it, respecting `deadline` for both the
    /// cannon poll and the shot.
    pub async fn execute(
        &self,
        request: &AttackRequest,
        deadline: Instant,
    ) -> Result<AttackResponse> {
        let started = Instant::now();
        let outcome = self.attack(request, deadline).await;
        let latency = started.elapsed();

        match &outcome {
            Ok(response) => {
                self.metrics.record_success(latency);
                tracing::info!(
                    x = response.target.x,
                    y = response.target.y,
                    casualties = response.casualties,
                    generation = response.generation,
                    "attack completed"
                );
            }
            Err(err) => {
                self.metrics.record_failure(err.class(), latency);
                tracing::warn!(
                    class = %err.class(),
                    code = err.error_code(),
                    error = %err,
                    "attack failed"
                );
            }
        }
        outcome
    }

    async fn attack(&self, request: &AttackRequest, deadline: Instant) -> Result<AttackResponse> {
        validate_request(request)?;
        let chain = ProtocolChain::build(request.protocols.as_slice())?;

        let targets = targets_in_range(&request.scan);
        tracing::debug!(
            scanned = request.scan.len(),
            in_range = targets.len(),
            stages = chain.stages().len(),
            "running protocol chain"
        );
        if targets.is_empty() {
            return Err(SelectionError::NoTargetsInRange.into());
        }

        let target = chain.select(targets)?;

        let cannon = self
            .manager
            .get_best_available(deadline)
            .await
            .map_err(AttackError::Arsenal)?;

        let order = FireRequest {
            target: target.coordinates(),
            enemies: target.enemies().number,
        };
        let fired = self
            .manager
            .fire(&cannon, &order, deadline)
            .await
            .map_err(AttackError::Fire)?;

        Ok(AttackResponse {
            target: target.coordinates(),
            casualties: fired.casualties,
            generation: fired.generation,
        })
    }
}

#[cfg(test)]
mod tests {
    use battlestation_core::{EnemyGroup, EnemyKind, ErrorClass, ScanPointError};

    use super::*;

    fn point(x: i32, y: i32, kind: EnemyKind, number: i32) -> ScanPoint {
        ScanPoint::new(Position::new(x, y), EnemyGroup { kind, number }, None)
    }

    fn request(protocols: &[&str], scan: Vec<ScanPoint>) -> AttackRequest {
        AttackRequest {
            protocols: protocols.iter().map(|p| p.to_string()).collect(),
            scan,
        }
    }

    #[test]
    fn validation_catches_empty_fields_first() {
        let scan = vec![point(0, 40, EnemyKind::Soldier, 10)];
        assert_eq!(
            validate_request(&request(&[], scan.clone())),
            Err(RequestError::NoProtocols)
        );
        assert_eq!(
            validate_request(&request(&["avoid-mech"], Vec::new())),
            Err(RequestError::NoScanPoints)
        );
        assert_eq!(validate_request(&request(&["avoid-mech"], scan)), Ok(()));
    }

    #[test]
    fn validation_names_the_bad_scan_point() {
        let scan = vec![
            point(0, 40, EnemyKind::Soldier, 10),
            point(0, 80, EnemyKind::Mech, 0),
        ];
        assert_eq!(
            validate_request(&request(&["avoid-mech"], scan)),
            Err(RequestError::ScanPoint {
                index: 1,
                source: ScanPointError::EnemyNumber(0),
            })
        );
    }

    #[tokio::test]
    async fn request_problems_never_reach_the_arsenal() {
        let coordinator = AttackCoordinator::new(Arc::new(CannonManager::new(Vec::new())));
        let deadline = Instant::now() + std::time::Duration::from_secs(1);

        let err = coordinator
            .execute(
                &request(
                    &["closest-enemies", "furthest-enemies"],
                    vec![point(0, 40, EnemyKind::Soldier, 10)],
                ),
                deadline,
            )
            .await
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Validation);

        let err = coordinator
            .execute(
                &request(&["avoid-mech"], vec![point(0, 101, EnemyKind::Soldier, 3)]),
                deadline,
            )
            .await
            .unwrap_err();
        assert_eq!(err, AttackError::Selection(SelectionError::NoTargetsInRange));

        // An empty pool is only consulted once a target survives the chain.
        let err = coordinator
            .execute(
                &request(&["avoid-mech"], vec![point(0, 40, EnemyKind::Soldier, 3)]),
                deadline,
            )
            .await
            .unwrap_err();
        assert_eq!(err.class(), ErrorClass::Unavailable);

        let metrics = coordinator.metrics();
        assert_eq!(metrics.failed(), 3);
        assert_eq!(metrics.failures(ErrorClass::Validation), 1);
        assert_eq!(metrics.failures(ErrorClass::Exhausted), 1);
    }

    #[test]
    fn request_json_uses_wire_names() {
        let body = r#"{
            "protocols": ["avoid-mech"],
            "scan": [{"coordinates": {"x": 0, "y": 40}, "enemies": {"type": "soldier", "number": 10}}]
        }"#;
        let parsed: AttackRequest = serde_json::from_str(body).expect("decode");
        assert_eq!(
            parsed,
            request(&["avoid-mech"], vec![point(0, 40, EnemyKind::Soldier, 10)])
        );

        let response = AttackResponse {
            target: Position::new(0, 40),
            casualties: 10,
            generation: 1,
        };
        assert_eq!(
            serde_json::to_value(response).expect("encode"),
            serde_json::json!({"target": {"x": 0, "y": 40}, "casualties": 10, "generation": 1})
        );
    }
}
