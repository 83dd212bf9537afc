pub mod models;
pub mod routes;

use async_trait::async_trait;
use axum::{
    routing::{get, post},
    Router,
};
use bookstore_kernel::{InitCtx, Module};
use serde_json::json;

use crate::state::AppState;

/// Checkout completion, order history and order administration
pub struct OrdersModule {
    state: AppState,
}

impl OrdersModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for OrdersModule {
    fn name(&self) -> &'static str {
        "orders"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            payment_api = %ctx.settings.payment.api_base,
            invoicing = ctx.settings.invoicing.backend_url.is_some(),
            "orders module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/place-order", post(routes::place_order))
            .route("/get-order-history", get(routes::order_history))
            .route("/get-all-orders", get(routes::all_orders))
            // GET kept for existing clients; PATCH is the intended verb.
            .route(
                "/update-status/{id}",
                get(routes::update_order_status).patch(routes::update_order_status),
            )
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({
            "description": "Error",
            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ErrorResponse"}}}
        });
        let order_list = json!({
            "description": "Orders",
            "content": {"application/json": {"schema": {
                "type": "object",
                "properties": {
                    "status": {"type": "string"},
                    "message": {"type": "string"},
                    "data": {"type": "array", "items": {"$ref": "#/components/schemas/Order"}}
                }
            }}}
        });
        let status_update = json!({
            "summary": "Change an order's status",
            "tags": ["Orders", "Admin"],
            "security": [{"bearer": []}],
            "parameters": [{"name": "id", "in": "path", "required": true, "schema": {"type": "string", "format": "uuid"}}],
            "requestBody": {
                "required": true,
                "content": {"application/json": {"schema": {"$ref": "#/components/schemas/StatusUpdate"}}}
            },
            "responses": {
                "200": {"description": "Status updated"},
                "400": error,
                "403": error,
                "404": error
            }
        });

        Some(json!({
            "paths": {
                "/place-order": {
                    "post": {
                        "summary": "Create orders for a paid checkout session",
                        "tags": ["Orders"],
                        "security": [{"bearer": []}],
                        "requestBody": {
                            "required": true,
                            "content": {"application/json": {"schema": {
                                "type": "object",
                                "properties": {"session_id": {"type": "string"}},
                                "required": ["session_id"]
                            }}}
                        },
                        "responses": {
                            "200": {"description": "Orders placed"},
                            "400": error,
                            "403": error,
                            "404": error,
                            "500": error
                        }
                    }
                },
                "/get-order-history": {
                    "get": {
                        "summary": "The caller's orders, newest first",
                        "tags": ["Orders"],
                        "security": [{"bearer": []}],
                        "parameters": [{"name": "id", "in": "header", "required": false, "description": "Admin only: another user's id", "schema": {"type": "string", "format": "uuid"}}],
                        "responses": {"200": order_list, "403": error, "404": error}
                    }
                },
                "/get-all-orders": {
                    "get": {
                        "summary": "Every order, newest first",
                        "tags": ["Orders", "Admin"],
                        "security": [{"bearer": []}],
                        "responses": {"200": order_list, "403": error}
                    }
                },
                "/update-status/{id}": {
                    "get": status_update,
                    "patch": status_update
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "string", "format": "uuid"},
                            "name": {"type": "string"},
                            "author": {"type": "string"},
                            "price": {"type": "number"}
                        },
                        "required": ["id", "name", "price"]
                    },
                    "Order": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "string", "format": "uuid"},
                            "user": {
                                "type": "object",
                                "nullable": true,
                                "properties": {
                                    "id": {"type": "string", "format": "uuid"},
                                    "username": {"type": "string"},
                                    "email": {"type": "string"}
                                }
                            },
                            "books": {"type": "array", "items": {"$ref": "#/components/schemas/Book"}},
                            "status": {"type": "string", "enum": ["Order Placed", "Out for Delivery", "Delivered", "Canceled"]},
                            "createdAt": {"type": "string", "format": "date-time"}
                        },
                        "required": ["id", "books", "status", "createdAt"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "orders module stopped");
        Ok(())
    }
}

/// Create a new instance of the orders module
pub fn create_module(state: AppState) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(OrdersModule::new(state))
}
