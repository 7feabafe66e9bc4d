//! Unified error types surfaced by the runtime API.
//!
//! Errors wrap their cause with context as they travel up from a cannon
//! endpoint to the attack coordinator, and every layer keeps the
//! [`ErrorClass`] of its source so the transport can map failures to
//! responses without looking at messages.
use thiserror::Error;

use battlestation_core::{
    Classified, ErrorClass, ProtocolError, ScanPointError, SelectionError,
};

use crate::cannon::Generation;

/// Failure talking to a cannon endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected status code: {status}, body: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CannonError {
    #[error("cannon generation {0} is not available")]
    NotAvailable(Generation),

    #[error("failed to get cannon status: {0}")]
    Status(#[source] ClientError),

    #[error("failed to fire cannon: {0}")]
    Fire(#[source] ClientError),

    #[error("deadline exceeded waiting for cannon generation {0}")]
    DeadlineExceeded(Generation),
}

impl Classified for CannonError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::NotAvailable(_) | Self::Status(_) => ErrorClass::Unavailable,
            Self::Fire(_) => ErrorClass::Remote,
            Self::DeadlineExceeded(_) => ErrorClass::Timeout,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotAvailable(_) => "cannon_not_available",
            Self::Status(_) => "cannon_status_failed",
            Self::Fire(_) => "cannon_fire_failed",
            Self::DeadlineExceeded(_) => "deadline_exceeded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    #[error("no cannons available")]
    NoCannonsAvailable,

    #[error("all {0} cannon status probes failed")]
    ProbesFailed(usize),

    #[error("deadline exceeded while polling cannons")]
    DeadlineExceeded,

    #[error("invalid cannon")]
    UnknownCannon,

    #[error("fire failed: {0}")]
    Fire(#[source] CannonError),
}

impl Classified for ManagerError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::NoCannonsAvailable | Self::ProbesFailed(_) => ErrorClass::Unavailable,
            Self::DeadlineExceeded => ErrorClass::Timeout,
            Self::UnknownCannon => ErrorClass::Internal,
            Self::Fire(source) => source.class(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoCannonsAvailable => "no_cannons_available",
            Self::ProbesFailed(_) => "cannon_probes_failed",
            Self::DeadlineExceeded => "deadline_exceeded",
            Self::UnknownCannon => "invalid_cannon",
            Self::Fire(source) => source.error_code(),
        }
    }
}

/// Structural problems with an attack request, found before any selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("no protocols specified")]
    NoProtocols,

    #[error("no scan points provided")]
    NoScanPoints,

    #[error("invalid scan point at index {index}: {source}")]
    ScanPoint {
        index: usize,
        #[source]
        source: ScanPointError,
    },
}

impl Classified for RequestError {
    fn class(&self) -> ErrorClass {
        ErrorClass::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoProtocols => "no_protocols",
            Self::NoScanPoints => "no_scan_points",
            Self::ScanPoint { source, .. } => source.error_code(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AttackError>;

/// Everything that can stop an attack, wrapped with the stage it failed in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttackError {
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] RequestError),

    #[error("invalid protocols: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("target selection failed: {0}")]
    Selection(#[from] SelectionError),

    #[error("cannon selection failed: {0}")]
    Arsenal(#[source] ManagerError),

    #[error("cannon fire failed: {0}")]
    Fire(#[source] ManagerError),
}

impl Classified for AttackError {
    fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidRequest(source) => source.class(),
            Self::Protocol(source) => source.class(),
            Self::Selection(source) => source.class(),
            Self::Arsenal(source) | Self::Fire(source) => source.class(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(source) => source.error_code(),
            Self::Protocol(source) => source.error_code(),
            Self::Selection(source) => source.error_code(),
            Self::Arsenal(source) | Self::Fire(source) => source.error_code(),
        }
    }
}
