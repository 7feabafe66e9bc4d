//! Raw scan points as reported by the probe droids.

use thiserror::Error;

use crate::error::{Classified, ErrorClass};
use crate::target::{EnemyGroup, Position, Target};

/// One scanned location before it becomes a [`Target`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanPoint {
    pub coordinates: Position,
    pub enemies: EnemyGroup,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub allies: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScanPointError {
    #[error("invalid enemy number: {0}")]
    EnemyNumber(i32),

    #[error("invalid allies number: {0}")]
    AlliesNumber(i32),
}

impl Classified for ScanPointError {
    fn class(&self) -> ErrorClass {
        ErrorClass::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EnemyNumber(_) => "invalid_enemy_number",
            Self::AlliesNumber(_) => "invalid_allies_number",
        }
    }
}

impl ScanPoint {
    pub const fn new(coordinates: Position, enemies: EnemyGroup, allies: Option<i32>) -> Self {
        Self {
            coordinates,
            enemies,
            allies,
        }
    }

    /// Checks that the enemy count is positive and the ally count, if any, is
    /// not negative.
    pub fn validate(&self) -> Result<(), ScanPointError> {
        if self.enemies.number <= 0 {
            return Err(ScanPointError::EnemyNumber(self.enemies.number));
        }
        match self.allies {
            Some(allies) if allies < 0 => Err(ScanPointError::AlliesNumber(allies)),
            _ => Ok(()),
        }
    }

    pub fn to_target(&self) -> Target {
        Target::new(self.coordinates, self.enemies, self.allies)
    }
}

/// Converts scan points to targets, dropping the ones beyond engagement range.
pub fn targets_in_range(points: &[ScanPoint]) -> Vec<Target> {
    points
        .iter()
        .map(ScanPoint::to_target)
        .filter(Target::is_valid)
        .collect()
}
