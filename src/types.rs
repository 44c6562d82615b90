//! Public.com response schema and the normalized portfolio snapshot built from it.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PageError;

/// Equity breakdown tag carrying the account's stock total.
pub const STOCK_EQUITY: &str = "STOCK";

// ---------- Wire schema ----------

/// Body of `GET /userapigateway/trading/{accountId}/portfolio/v2`.
/// Only the fields the dashboard reads are modelled; missing arrays decode as empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    #[serde(default)]
    pub positions: Vec<ApiPosition>,
    #[serde(default)]
    pub equity: Vec<ApiEquity>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPosition {
    pub instrument: ApiInstrument,
    pub current_value: Decimal,
    pub cost_basis: ApiCostBasis,
    pub opened_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiInstrument {
    pub symbol: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCostBasis {
    pub gain_percentage: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiEquity {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Decimal,
}

/// Body of `POST /userapiauthservice/personal/access-tokens`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenRequest<'a> {
    pub validity_in_minutes: u32,
    pub secret: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

// ---------- Domain ----------

/// Short-lived bearer credential. Lives only as long as the run.
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    validity_minutes: u32,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, validity_minutes: u32) -> Self {
        Self {
            value: value.into(),
            validity_minutes,
        }
    }

    pub fn bearer(&self) -> &str {
        &self.value
    }

    pub fn validity_minutes(&self) -> u32 {
        self.validity_minutes
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &crate::utils::mask_secret(&self.value))
            .field("validity_minutes", &self.validity_minutes)
            .finish()
    }
}

/// One holding, normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub symbol: String,
    pub value: Decimal,
    pub gain_pct: Decimal,
    pub acquired_on: NaiveDate,
}

/// Positions in API order plus the stock equity total.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSnapshot {
    pub positions: Vec<Position>,
    pub total_equity: Decimal,
}

impl PortfolioSnapshot {
    /// Normalize a raw response. A missing STOCK equity entry becomes zero;
    /// a malformed `openedAt` fails the whole snapshot.
    pub fn from_response(raw: PortfolioResponse) -> Result<Self, PageError> {
        let total_equity = raw
            .equity
            .iter()
            .find(|e| e.kind == STOCK_EQUITY)
            .map(|e| e.value)
            .unwrap_or(Decimal::ZERO);

        let positions = raw
            .positions
            .into_iter()
            .map(|p| {
                let acquired_on =
                    parse_acquired_on(&p.opened_at).ok_or_else(|| PageError::Timestamp {
                        symbol: p.instrument.symbol.clone(),
                        value: p.opened_at.clone(),
                    })?;
                Ok(Position {
                    symbol: p.instrument.symbol,
                    value: p.current_value,
                    gain_pct: p.cost_basis.gain_percentage,
                    acquired_on,
                })
            })
            .collect::<Result<Vec<_>, PageError>>()?;

        Ok(Self {
            positions,
            total_equity,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Calendar date of an ISO-8601 timestamp, as written (`Z` or an explicit offset,
/// or a naive local timestamp). Time of day is dropped.
pub fn parse_acquired_on(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    // Basic-format offsets such as `+0000`.
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
