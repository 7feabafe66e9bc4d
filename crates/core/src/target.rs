//! Geometry and target model.
//!
//! A [`Target`] is the unit the selection pipeline reasons about. Targets are
//! built fresh from scan points for every request and never mutated; the
//! distance from the origin is computed once at construction so that sorting
//! and filtering passes can read it for free.

/// Fixed engagement range, in the same units as coordinates.
pub const MAX_ENGAGEMENT_RANGE: f64 = 100.0;

/// Integer grid position relative to the battle station at the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance from the origin.
    pub fn distance(&self) -> f64 {
        let x = f64::from(self.x);
        let y = f64::from(self.y);
        (x * x + y * y).sqrt()
    }
}

/// Enemy composition tag reported by the probe droids.
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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum EnemyKind {
    Soldier,
    Mech,
}

/// A group of enemies of the same kind at one scan point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyGroup {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: EnemyKind,
    pub number: i32,
}

impl EnemyGroup {
    pub const fn new(kind: EnemyKind, number: i32) -> Self {
        Self { kind, number }
    }
}

/// Candidate location considered for engagement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    coordinates: Position,
    enemies: EnemyGroup,
    allies: Option<i32>,
    distance: f64,
}

impl Target {
    pub fn new(coordinates: Position, enemies: EnemyGroup, allies: Option<i32>) -> Self {
        Self {
            coordinates,
            enemies,
            allies,
            distance: coordinates.distance(),
        }
    }

    pub fn coordinates(&self) -> Position {
        self.coordinates
    }

    pub fn enemies(&self) -> EnemyGroup {
        self.enemies
    }

    pub fn allies(&self) -> Option<i32> {
        self.allies
    }

    /// Distance from the origin, cached at construction.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// True when the target lies within [`MAX_ENGAGEMENT_RANGE`] (inclusive).
    pub fn is_valid(&self) -> bool {
        self.distance <= MAX_ENGAGEMENT_RANGE
    }

    /// True when allied units are present. An explicit zero counts as none.
    pub fn has_allies(&self) -> bool {
        self.allies.is_some_and(|allies| allies > 0)
    }

    pub fn is_mech(&self) -> bool {
        self.enemies.kind == EnemyKind::Mech
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soldiers_at(x: i32, y: i32) -> Target {
        Target::new(
            Position::new(x, y),
            EnemyGroup::new(EnemyKind::Soldier, 10),
            None,
        )
    }

    #[test]
    fn distance_matches_pythagoras() {
        for (x, y) in [(0, 0), (3, 4), (-3, 4), (0, -100), (71, 71), (-60, -80)] {
            let expected = ((x * x + y * y) as f64).sqrt();
            assert_eq!(Position::new(x, y).distance(), expected);
            assert_eq!(soldiers_at(x, y).distance(), expected);
        }
    }

    #[test]
    fn range_boundary_is_inclusive() {
        assert!(soldiers_at(0, 100).is_valid());
        assert!(soldiers_at(60, 80).is_valid());
        assert!(!soldiers_at(0, 101).is_valid());
        // sqrt(70^2 + 72^2) ~= 100.42
        assert!(!soldiers_at(70, 72).is_valid());
    }

    #[test]
    fn explicit_zero_allies_means_none() {
        let pos = Position::new(1, 1);
        let group = EnemyGroup::new(EnemyKind::Soldier, 3);

        assert!(!Target::new(pos, group, None).has_allies());
        assert!(!Target::new(pos, group, Some(0)).has_allies());
        assert!(Target::new(pos, group, Some(2)).has_allies());
    }

    #[test]
    fn mech_detection_follows_enemy_kind() {
        let pos = Position::new(1, 1);
        assert!(Target::new(pos, EnemyGroup::new(EnemyKind::Mech, 1), None).is_mech());
        assert!(!Target::new(pos, EnemyGroup::new(EnemyKind::Soldier, 1), None).is_mech());
    }

    #[test]
    fn enemy_kind_parses_wire_tags() {
        assert_eq!("mech".parse::<EnemyKind>().ok(), Some(EnemyKind::Mech));
        assert_eq!("soldier".parse::<EnemyKind>().ok(), Some(EnemyKind::Soldier));
        assert!("tank".parse::<EnemyKind>().is_err());
        assert_eq!(EnemyKind::Mech.to_string(), "mech");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn enemy_group_uses_type_tag_on_the_wire() {
        let group: EnemyGroup =
            serde_json::from_str(r#"{"type":"mech","number":4}"#).expect("valid group");
        assert_eq!(group, EnemyGroup::new(EnemyKind::Mech, 4));

        let invalid = serde_json::from_str::<EnemyGroup>(r#"{"type":"tank","number":4}"#);
        assert!(invalid.is_err());
    }
}
