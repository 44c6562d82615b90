//! Failure modes of a dashboard run. Everything here is fatal except where noted in the pipeline.

use std::fmt;
use thiserror::Error;

/// Which outbound call a network failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authenticate,
    FetchPortfolio,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Authenticate => f.write_str("access-token request"),
            Stage::FetchPortfolio => f.write_str("portfolio request"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("no secret key found: PUBLIC_SECRET is missing or empty")]
    MissingSecret,

    #[error("no account id found: PORTFOLIO_ID is missing or empty")]
    MissingAccountId,

    #[error("token validity must be a positive number of minutes, got {0}")]
    InvalidValidity(u32),

    #[error("{stage} failed: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("{stage} returned HTTP {status}: {body}")]
    Status {
        stage: Stage,
        status: u16,
        body: String,
    },

    #[error("{stage} returned an unexpected body: {source}")]
    Decode {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },

    #[error("position {symbol} has a malformed openedAt timestamp {value:?}")]
    Timestamp { symbol: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_the_stage() {
        let e = PageError::Status {
            stage: Stage::FetchPortfolio,
            status: 401,
            body: "unauthorized".into(),
        };
        assert_eq!(
            e.to_string(),
            "portfolio request returned HTTP 401: unauthorized"
        );
    }
}
