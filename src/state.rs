//! Shared handles injected into every module router.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::FromRef;
use bookstore_authz::{JwtVerifier, TokenVerifier};
use bookstore_db::{InMemoryStore, Store};
use bookstore_kernel::settings::{SalesBucket, Settings};
use bookstore_payments::{
    DisabledInvoiceNotifier, HttpInvoiceNotifier, InvoiceNotifier, PaymentGateway, StripeGateway,
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub payments: Arc<dyn PaymentGateway>,
    pub invoices: Arc<dyn InvoiceNotifier>,
    pub sales_bucket: SalesBucket,
}

impl AppState {
    /// Wire the production collaborators described by `settings`.
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let store = match &settings.store.fixture_path {
            Some(path) => InMemoryStore::from_fixture_file(path)?,
            None => InMemoryStore::new(),
        };

        if settings.payment.secret_key.is_empty() {
            tracing::warn!("payment.secret_key is empty; checkout verification will fail");
        }
        let payments = StripeGateway::new(
            &settings.payment.api_base,
            &settings.payment.secret_key,
            Duration::from_millis(settings.payment.timeout_ms),
        )?;

        let invoices: Arc<dyn InvoiceNotifier> = match &settings.invoicing.backend_url {
            Some(url) => Arc::new(
                HttpInvoiceNotifier::new(url, Duration::from_millis(settings.invoicing.timeout_ms))
                    .context("failed to configure invoicing")?,
            ),
            None => {
                tracing::warn!("invoicing.backend_url not set; invoices will not be sent");
                Arc::new(DisabledInvoiceNotifier)
            }
        };

        Ok(Self {
            store: Arc::new(store),
            verifier: Arc::new(JwtVerifier::new(&settings.auth.jwt_secret)),
            payments: Arc::new(payments),
            invoices,
            sales_bucket: settings.sales.bucket,
        })
    }
}

impl FromRef<AppState> for Arc<dyn TokenVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.verifier.clone()
    }
}
