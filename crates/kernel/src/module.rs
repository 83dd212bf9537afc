use async_trait::async_trait;
use axum::Router;

use crate::settings::Settings;

/// Borrowed view handed to modules while the application boots.
pub struct InitCtx<'a> {
    pub settings: &'a Settings,
}

/// A feature area of the bookstore: its routes, API docs and lifecycle hooks.
///
/// Modules carry their own state; [`Module::routes`] returns a router with
/// that state already applied so the HTTP layer can merge it as-is.
#[async_trait]
pub trait Module: Sync + Send {
    /// Stable identifier used in logs and registry lookups.
    fn name(&self) -> &'static str;

    /// Runs once, in registration order, before the listener binds.
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Paths are relative; they end up under `server.api_prefix`.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// `{paths, components.schemas}` fragment merged into `/docs/openapi.json`.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs in reverse registration order once the server has drained.
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
