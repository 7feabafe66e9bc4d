//! Target-selection protocols.
//!
//! A [`Protocol`] is a named, stateless rule that narrows or reorders a list of
//! targets. The vocabulary is closed; each variant maps to one pure transform.
//! Protocols never fail on their own: if a rule filters everything out, the
//! [`ProtocolChain`] executor is the one that reports it.

mod chain;

pub use chain::{ProtocolChain, ProtocolError, SelectionError};

use crate::target::Target;

/// Named selection rule accepted in attack requests.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[strum(serialize_all = "kebab-case")]
pub enum Protocol {
    /// Drop every mech group.
    AvoidMech,
    /// Drop every point where allies are present.
    AvoidCrossfire,
    /// Keep only mech groups, when there are any.
    PrioritizeMech,
    /// Keep only the targets at the minimum distance.
    ClosestEnemies,
    /// Keep only the targets at the maximum distance.
    FurthestEnemies,
    /// Keep only points with allies, when there are any.
    AssistAllies,
}

/// Execution tier of a protocol inside a chain. Lower tiers run first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProtocolTier {
    /// Hard exclusions prune the candidate set before anything interprets it.
    Exclusion,
    TypePreference,
    Positional,
    /// Final tie-breaking among the survivors.
    Tactical,
}

impl Protocol {
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub const fn tier(self) -> ProtocolTier {
        match self {
            Self::AvoidMech | Self::AvoidCrossfire => ProtocolTier::Exclusion,
            Self::PrioritizeMech => ProtocolTier::TypePreference,
            Self::ClosestEnemies | Self::FurthestEnemies => ProtocolTier::Positional,
            Self::AssistAllies => ProtocolTier::Tactical,
        }
    }

    /// Applies this rule to `targets`, returning the surviving targets.
    ///
    /// Relative input order is preserved among survivors, including distance
    /// ties. Preference and positional rules leave lists of zero or one
    /// element untouched. Exclusion rules are hard constraints and have no
    /// short-list pass-through: a lone mech is still dropped by
    /// [`Protocol::AvoidMech`], and the chain then reports the emptied stage.
    pub fn apply(self, targets: Vec<Target>) -> Vec<Target> {
        if targets.len() <= 1 && self.tier() != ProtocolTier::Exclusion {
            return targets;
        }

        match self {
            Self::AvoidMech => retain(targets, |t| !t.is_mech()),
            Self::AvoidCrossfire => retain(targets, |t| !t.has_allies()),
            Self::PrioritizeMech => prefer(targets, Target::is_mech),
            Self::AssistAllies => prefer(targets, Target::has_allies),
            Self::ClosestEnemies => extreme_distance(targets, |a, b| a.total_cmp(&b)),
            Self::FurthestEnemies => extreme_distance(targets, |a, b| b.total_cmp(&a)),
        }
    }
}

fn retain(mut targets: Vec<Target>, keep: impl Fn(&Target) -> bool) -> Vec<Target> {
    targets.retain(|t| keep(t));
    targets
}

/// Keeps only matching targets if at least one matches, otherwise returns the
/// list unchanged.
fn prefer(targets: Vec<Target>, matches: impl Fn(&Target) -> bool) -> Vec<Target> {
    if targets.iter().any(&matches) {
        retain(targets, matches)
    } else {
        targets
    }
}

/// Stable-sorts by distance using `order`, then keeps every target tied with
/// the first one.
fn extreme_distance(
    mut targets: Vec<Target>,
    order: impl Fn(f64, f64) -> core::cmp::Ordering,
) -> Vec<Target> {
    targets.sort_by(|a, b| order(a.distance(), b.distance()));

    let Some(best) = targets.first().map(Target::distance) else {
        return targets;
    };
    let ties = targets
        .iter()
        .take_while(|t| t.distance() == best)
        .count();
    targets.truncate(ties);
    targets
}
