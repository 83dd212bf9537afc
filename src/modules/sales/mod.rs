pub mod models;
pub mod report;
pub mod routes;

use async_trait::async_trait;
use axum::{routing::get, Router};
use bookstore_kernel::{InitCtx, Module};
use serde_json::json;

use crate::state::AppState;

/// Admin sales report over a date range
pub struct SalesModule {
    state: AppState,
}

impl SalesModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for SalesModule {
    fn name(&self) -> &'static str {
        "sales"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            bucket = ?ctx.settings.sales.bucket,
            "sales module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/sales-report", get(routes::sales_report))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({
            "description": "Error",
            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ErrorResponse"}}}
        });
        let date = |name: &str| {
            json!({
                "name": name,
                "in": "query",
                "required": true,
                "schema": {"type": "string", "format": "date-time"}
            })
        };

        Some(json!({
            "paths": {
                "/sales-report": {
                    "get": {
                        "summary": "Sales totals, buckets and top sellers for orders in a date range",
                        "tags": ["Sales", "Admin"],
                        "security": [{"bearer": []}],
                        "parameters": [date("startDate"), date("endDate")],
                        "responses": {
                            "200": {
                                "description": "Sales summary",
                                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/SalesSummary"}}}
                            },
                            "400": error,
                            "401": error,
                            "403": error,
                            "500": error
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "SalesSummary": {
                        "type": "object",
                        "properties": {
                            "totalOrders": {"type": "integer", "description": "All orders in the store"},
                            "totalBooksSold": {"type": "integer"},
                            "totalRevenue": {"type": "number"},
                            "monthlySales": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {"month": {"type": "string"}, "sales": {"type": "number"}}
                                }
                            },
                            "topSellingBooks": {
                                "type": "array",
                                "maxItems": 5,
                                "items": {
                                    "type": "object",
                                    "properties": {"name": {"type": "string"}, "sales": {"type": "integer"}}
                                }
                            },
                            "allOrders": {"type": "array", "items": {"$ref": "#/components/schemas/Order"}}
                        }
                    }
                }
            }
        }))
    }
}

/// Create a new instance of the sales module
pub fn create_module(state: AppState) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(SalesModule::new(state))
}
