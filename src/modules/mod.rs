pub mod book_requests;
pub mod orders;
pub mod sales;

use std::str::FromStr;

use bookstore_db::UnknownStatus;
use bookstore_http::AppError;
use bookstore_kernel::ModuleRegistry;
use serde::Deserialize;

use crate::state::AppState;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, state: &AppState) {
    registry.register(book_requests::create_module(state.clone()));
    registry.register(orders::create_module(state.clone()));
    registry.register(sales::create_module(state.clone()));
}

/// Body of the status update routes: `{status}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: String,
}

impl StatusUpdate {
    /// Parse into a record status enum, reporting unknown values as a validation error.
    pub fn parse_status<S>(&self) -> Result<S, AppError>
    where
        S: FromStr<Err = UnknownStatus>,
    {
        self.status
            .parse()
            .map_err(|e: UnknownStatus| AppError::invalid_field("status", e.to_string()))
    }
}
