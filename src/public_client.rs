//! Thin wrapper over the Public.com personal API: access-token exchange and portfolio snapshot.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info};

use crate::config::ApiCfg;
use crate::error::{PageError, Stage};
use crate::types::{AccessToken, AccessTokenRequest, AccessTokenResponse, PortfolioResponse};
use crate::utils::{mask_secret, truncate};

const TOKEN_PATH: &str = "/userapiauthservice/personal/access-tokens";
const ERROR_BODY_CHARS: usize = 300;

/// The two calls a run makes. Implemented over HTTP below and by a recording fake in tests.
#[async_trait]
pub trait PublicApi: Send + Sync {
    async fn create_access_token(
        &self,
        secret: &str,
        validity_minutes: u32,
    ) -> Result<AccessToken, PageError>;

    async fn get_portfolio(
        &self,
        account_id: &str,
        token: &AccessToken,
    ) -> Result<PortfolioResponse, PageError>;
}

pub struct HttpPublicApi {
    client: Client,
    base_url: String,
}

impl HttpPublicApi {
    pub fn new(cfg: &ApiCfg) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_sec))
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn portfolio_url(&self, account_id: &str) -> String {
        format!(
            "{}/userapigateway/trading/{}/portfolio/v2",
            self.base_url, account_id
        )
    }
}

/// Turn a response into `T`, or the matching error for its stage.
async fn decode<T: DeserializeOwned>(
    stage: Stage,
    response: reqwest::Response,
) -> Result<T, PageError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| PageError::Transport { stage, source })?;
    if !status.is_success() {
        return Err(PageError::Status {
            stage,
            status: status.as_u16(),
            body: truncate(&body, ERROR_BODY_CHARS),
        });
    }
    serde_json::from_str(&body).map_err(|source| PageError::Decode { stage, source })
}

#[async_trait]
impl PublicApi for HttpPublicApi {
    async fn create_access_token(
        &self,
        secret: &str,
        validity_minutes: u32,
    ) -> Result<AccessToken, PageError> {
        let stage = Stage::Authenticate;
        let url = format!("{}{}", self.base_url, TOKEN_PATH);
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .json(&AccessTokenRequest {
                validity_in_minutes: validity_minutes,
                secret,
            })
            .send()
            .await
            .map_err(|source| PageError::Transport { stage, source })?;
        let body: AccessTokenResponse = decode(stage, response).await?;
        Ok(AccessToken::new(body.access_token, validity_minutes))
    }

    async fn get_portfolio(
        &self,
        account_id: &str,
        token: &AccessToken,
    ) -> Result<PortfolioResponse, PageError> {
        let stage = Stage::FetchPortfolio;
        let url = self.portfolio_url(account_id);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token.bearer())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| PageError::Transport { stage, source })?;
        decode(stage, response).await
    }
}

/// Exchange the long-lived secret for a bearer token. An empty secret fails
/// before anything goes over the wire.
pub async fn obtain_token(
    api: &dyn PublicApi,
    secret: &str,
    validity_minutes: u32,
) -> Result<AccessToken, PageError> {
    if secret.trim().is_empty() {
        return Err(PageError::MissingSecret);
    }
    if validity_minutes == 0 {
        return Err(PageError::InvalidValidity(validity_minutes));
    }
    let token = api
        .create_access_token(secret, validity_minutes)
        .await
        .map_err(|e| {
            error!("Failed to get access token: {}", e);
            e
        })?;
    info!(
        "Access token obtained: {} (valid {} min)",
        mask_secret(token.bearer()),
        token.validity_minutes()
    );
    Ok(token)
}

pub async fn fetch_portfolio(
    api: &dyn PublicApi,
    token: &AccessToken,
    account_id: &str,
) -> Result<PortfolioResponse, PageError> {
    let portfolio = api.get_portfolio(account_id, token).await.map_err(|e| {
        error!("Failed to fetch portfolio: {}", e);
        e
    })?;
    info!(
        "Portfolio fetched: {} positions, {} equity entries",
        portfolio.positions.len(),
        portfolio.equity.len()
    );
    Ok(portfolio)
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records every call and answers with canned data.
    pub struct RecordingApi {
        pub token_calls: AtomicUsize,
        pub portfolio_calls: AtomicUsize,
        pub seen_bearer: Mutex<Option<String>>,
        pub seen_account: Mutex<Option<String>>,
        pub portfolio_body: String,
        pub fail_auth_with: Option<u16>,
    }

    impl RecordingApi {
        pub fn with_portfolio(body: &str) -> Self {
            Self {
                token_calls: AtomicUsize::new(0),
                portfolio_calls: AtomicUsize::new(0),
                seen_bearer: Mutex::new(None),
                seen_account: Mutex::new(None),
                portfolio_body: body.to_string(),
                fail_auth_with: None,
            }
        }

        pub fn total_calls(&self) -> usize {
            self.token_calls.load(Ordering::SeqCst) + self.portfolio_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PublicApi for RecordingApi {
        async fn create_access_token(
            &self,
            _secret: &str,
            validity_minutes: u32,
        ) -> Result<AccessToken, PageError> {
            self.token_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.fail_auth_with {
                return Err(PageError::Status {
                    stage: Stage::Authenticate,
                    status,
                    body: "denied".into(),
                });
            }
            Ok(AccessToken::new("tok-123456", validity_minutes))
        }

        async fn get_portfolio(
            &self,
            account_id: &str,
            token: &AccessToken,
        ) -> Result<PortfolioResponse, PageError> {
            self.portfolio_calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_bearer.lock().unwrap() = Some(token.bearer().to_string());
            *self.seen_account.lock().unwrap() = Some(account_id.to_string());
            serde_json::from_str(&self.portfolio_body).map_err(|source| PageError::Decode {
                stage: Stage::FetchPortfolio,
                source,
            })
        }
    }
}
