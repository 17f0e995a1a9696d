//! Error types for instance construction and solver entry.
//!
//! Only caller-supplied input is validated here. Broken apply/unapply pairing
//! or out-of-range cylinder indices are programmer errors and panic instead.

use thiserror::Error;

/// Which side of the transfer a rejected cylinder belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Target,
    Donor,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Target => f.write_str("target"),
            Role::Donor => f.write_str("donor"),
        }
    }
}

/// Rejected construction input.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    #[error("{role} {index}: volume must be finite and positive, got {value}")]
    InvalidVolume { role: Role, index: usize, value: f64 },

    #[error("{role} {index}: pressure must be finite and non-negative, got {value}")]
    InvalidPressure { role: Role, index: usize, value: f64 },

    #[error("target {index}: max pressure must be finite and non-negative, got {value}")]
    InvalidMaxPressure { index: usize, value: f64 },

    #[error("invalid state configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl ModelError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Rejected solver parameters.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    #[error("number of chunks must be at least 1")]
    NoChunks,
}
