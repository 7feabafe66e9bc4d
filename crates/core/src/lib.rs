//! Deterministic target-selection logic for the battle station.
//!
//! `battlestation-core` defines the target model, the closed set of selection
//! protocols, and the chain that composes them into a single decision. All
//! APIs are pure and synchronous; the async resource layer lives in
//! `battlestation-runtime`.
pub mod error;
pub mod protocol;
pub mod scan;
pub mod target;

pub use error::{Classified, ErrorClass};
pub use protocol::{Protocol, ProtocolChain, ProtocolError, ProtocolTier, SelectionError};
pub use scan::{ScanPoint, ScanPointError, targets_in_range};
pub use target::{EnemyGroup, EnemyKind, MAX_ENGAGEMENT_RANGE, Position, Target};
