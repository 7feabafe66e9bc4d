//! Common error infrastructure for battlestation-core.
//!
//! Domain-specific errors (e.g. [`ProtocolError`](crate::ProtocolError),
//! [`SelectionError`](crate::SelectionError)) live next to the code that
//! produces them. This module provides the classification shared by every
//! error that can reach a caller, so outer layers can react to the kind of
//! failure without inspecting messages.

/// Failure taxonomy for an attack request.
///
/// - **Validation**: malformed or contradictory input, never retried
/// - **Exhausted**: the selection pipeline ran out of candidate targets
/// - **Unavailable**: no cannon could be selected this round
/// - **Timeout**: the caller's deadline elapsed
/// - **Remote**: a cannon endpoint failed while firing
/// - **Internal**: anything else
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum ErrorClass {
    Validation,
    Exhausted,
    Unavailable,
    Timeout,
    Remote,
    Internal,
}

impl ErrorClass {
    pub const ALL: [Self; 6] = [
        Self::Validation,
        Self::Exhausted,
        Self::Unavailable,
        Self::Timeout,
        Self::Remote,
        Self::Internal,
    ];

    /// Dense index into [`ErrorClass::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns true if the failure was caused by the request content itself.
    pub const fn is_caller_fault(self) -> bool {
        matches!(self, Self::Validation | Self::Exhausted)
    }
}

/// Common trait for all surfaced errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify by what the caller can do about it, not by where it happened
/// - Wrapping errors should delegate to their source's classification
pub trait Classified: core::fmt::Display + core::fmt::Debug {
    fn class(&self) -> ErrorClass;

    /// Short machine-readable identifier for this error variant.
    fn error_code(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_indices_are_dense() {
        for (expected, class) in ErrorClass::ALL.iter().enumerate() {
            assert_eq!(class.index(), expected);
        }
    }

    #[test]
    fn only_request_content_failures_are_caller_faults() {
        assert!(ErrorClass::Validation.is_caller_fault());
        assert!(ErrorClass::Exhausted.is_caller_fault());
        assert!(!ErrorClass::Unavailable.is_caller_fault());
        assert!(!ErrorClass::Timeout.is_caller_fault());
        assert_eq!(ErrorClass::Unavailable.to_string(), "unavailable");
    }
}
