//! Validation, ordering and execution of protocol chains.

use core::str::FromStr;

use thiserror::Error;

use super::Protocol;
use crate::error::{Classified, ErrorClass};
use crate::target::Target;

/// Rejections raised while building a chain from requested names.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("invalid protocol: {0}")]
    Unknown(String),

    #[error("incompatible protocols: closest-enemies and furthest-enemies")]
    Incompatible,
}

impl Classified for ProtocolError {
    fn class(&self) -> ErrorClass {
        ErrorClass::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Unknown(_) => "invalid_protocol",
            Self::Incompatible => "incompatible_protocols",
        }
    }
}

/// Failures while narrowing the candidate targets down to one.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no valid targets in range")]
    NoTargetsInRange,

    #[error("no valid targets after applying protocol {0}")]
    EmptiedBy(Protocol),
}

impl Classified for SelectionError {
    fn class(&self) -> ErrorClass {
        ErrorClass::Exhausted
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoTargetsInRange => "no_targets_in_range",
            Self::EmptiedBy(_) => "no_targets_after_protocol",
        }
    }
}

/// Validated protocol sequence in execution order.
///
/// Stages are grouped by [`ProtocolTier`](super::ProtocolTier) regardless of
/// the order the caller listed them; within a tier the caller's order is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProtocolChain {
    stages: Vec<Protocol>,
}

impl ProtocolChain {
    /// Parses, validates and orders the requested protocol names.
    pub fn build<S: AsRef<str>>(names: &[S]) -> Result<Self, ProtocolError> {
        let mut stages = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                Protocol::from_str(name).map_err(|_| ProtocolError::Unknown(name.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let closest = stages.contains(&Protocol::ClosestEnemies);
        let furthest = stages.contains(&Protocol::FurthestEnemies);
        if closest && furthest {
            return Err(ProtocolError::Incompatible);
        }

        // `sort_by_key` is stable, which keeps the caller's order inside a tier.
        stages.sort_by_key(|protocol| protocol.tier());

        Ok(Self { stages })
    }

    /// Protocols in the order they will run.
    pub fn stages(&self) -> &[Protocol] {
        &self.stages
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Folds `targets` through every stage.
    ///
    /// Stops at the first stage that leaves no targets and reports it.
    pub fn apply(&self, targets: Vec<Target>) -> Result<Vec<Target>, SelectionError> {
        if targets.is_empty() {
            return Err(SelectionError::NoTargetsInRange);
        }

        self.stages.iter().try_fold(targets, |current, &protocol| {
            let next = protocol.apply(current);
            if next.is_empty() {
                return Err(SelectionError::EmptiedBy(protocol));
            }
            Ok(next)
        })
    }

    /// Runs the chain and returns the first surviving target.
    pub fn select(&self, targets: Vec<Target>) -> Result<Target, SelectionError> {
        let survivors = self.apply(targets)?;
        survivors
            .into_iter()
            .next()
            .ok_or(SelectionError::NoTargetsInRange)
    }
}
