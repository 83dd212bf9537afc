use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

/// Asks the invoicing service to send the invoice for an order.
#[async_trait]
pub trait InvoiceNotifier: Send + Sync {
    /// `authorization` is the caller's bearer credential, forwarded as-is.
    async fn send_invoice(&self, order_id: Uuid, authorization: &str) -> anyhow::Result<()>;
}

#[derive(Serialize)]
struct SendInvoice {
    order_id: Uuid,
}

/// Posts `{order_id}` to `{backend_url}/api/v1/send-invoice`.
pub struct HttpInvoiceNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpInvoiceNotifier {
    pub fn new(backend_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build invoicing client")?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/v1/send-invoice", backend_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl InvoiceNotifier for HttpInvoiceNotifier {
    async fn send_invoice(&self, order_id: Uuid, authorization: &str) -> anyhow::Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, authorization)
            .json(&SendInvoice { order_id })
            .send()
            .await
            .with_context(|| format!("invoice request for order {order_id} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("invoicing service answered {status} for order {order_id}: {body}");
        }

        Ok(())
    }
}

/// Used when no invoicing backend is configured.
pub struct DisabledInvoiceNotifier;

#[async_trait]
impl InvoiceNotifier for DisabledInvoiceNotifier {
    async fn send_invoice(&self, order_id: Uuid, _authorization: &str) -> anyhow::Result<()> {
        tracing::info!(%order_id, "invoicing disabled; skipping invoice");
        Ok(())
    }
}
