use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;

/// Payment state reported for a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
    #[serde(other)]
    Unknown,
}

/// The parts of a checkout session this service reads.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn retrieve_session(&self, session_id: &str) -> anyhow::Result<CheckoutSession>;
}

/// Client for the Stripe checkout sessions API.
pub struct StripeGateway {
    client: reqwest::Client,
    api_base: Url,
    secret_key: String,
}

impl StripeGateway {
    pub fn new(api_base: &str, secret_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build payment gateway client")?;
        let api_base = Url::parse(api_base)
            .with_context(|| format!("invalid payment api base '{api_base}'"))?;
        if api_base.cannot_be_a_base() {
            return Err(anyhow!("payment api base '{api_base}' cannot carry a path"));
        }

        Ok(Self {
            client,
            api_base,
            secret_key: secret_key.to_string(),
        })
    }

    /// The session id is appended as one percent-encoded path segment.
    fn session_url(&self, session_id: &str) -> anyhow::Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("payment api base cannot carry a path"))?
            .pop_if_empty()
            .extend(["v1", "checkout", "sessions", session_id]);
        Ok(url)
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn retrieve_session(&self, session_id: &str) -> anyhow::Result<CheckoutSession> {
        tracing::debug!(session_id, "retrieving checkout session");

        let session = self
            .client
            .get(self.session_url(session_id)?)
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .with_context(|| format!("checkout session '{session_id}' request failed"))?
            .error_for_status()
            .with_context(|| format!("payment gateway rejected session '{session_id}'"))?
            .json::<CheckoutSession>()
            .await
            .with_context(|| format!("checkout session '{session_id}' has an unexpected shape"))?;

        Ok(session)
    }
}
