// ─────────────────────────────────────────────────────────────────────
// SCPN Cosmo Core — Error
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CosmoError {
    /// Invalid input detected before any computation started.
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),

    /// Quadrature failed to converge, or an interpolant was evaluated
    /// outside the domain it was built over.
    #[error("Numerical divergence in {context}: {message}")]
    NumericalDivergence { context: String, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CosmoError {
    pub fn precondition(message: impl Into<String>) -> Self {
        CosmoError::PreconditionViolation(message.into())
    }

    pub fn divergence(context: impl Into<String>, message: impl Into<String>) -> Self {
        CosmoError::NumericalDivergence {
            context: context.into(),
            message: message.into(),
        }
    }

    /// Prefix the context of a `NumericalDivergence` with an outer caller's
    /// description. Other variants pass through unchanged.
    pub fn within(self, outer: impl std::fmt::Display) -> Self {
        match self {
            CosmoError::NumericalDivergence { context, message } => {
                CosmoError::NumericalDivergence {
                    context: format!("{outer}: {context}"),
                    message,
                }
            }
            other => other,
        }
    }
}

pub type CosmoResult<T> = Result<T, CosmoError>;
