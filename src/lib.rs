//! Bookstore application library
//!
//! Book requests, checkout order placement and the admin sales report, mounted
//! as kernel modules on the shared HTTP facade.

pub mod modules;
pub mod state;
pub mod utils;

use anyhow::Context;
use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use state::AppState;

/// Registry holding every application module wired to `state`.
pub fn build_registry(state: &AppState) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, state);
    registry
}

/// Full HTTP router for `state`, as served by [`run`].
pub fn build_router(state: &AppState, settings: &Settings) -> axum::Router {
    bookstore_http::build_router(&build_registry(state), settings)
}

/// Run the server until Ctrl-C.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let state = AppState::from_settings(&settings).context("failed to build application state")?;
    let registry = build_registry(&state);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = bookstore_http::start_server(&registry, &settings, shutdown_signal()).await;

    registry.stop_all().await?;
    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
