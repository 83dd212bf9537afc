pub mod models;
pub mod routes;

use async_trait::async_trait;
use axum::{
    routing::{get, patch, post},
    Router,
};
use bookstore_kernel::{InitCtx, Module};
use serde_json::json;

use crate::state::AppState;

/// Book requests: readers ask for titles the store does not carry yet
pub struct BookRequestsModule {
    state: AppState,
}

impl BookRequestsModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for BookRequestsModule {
    fn name(&self) -> &'static str {
        "book_requests"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "book requests module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/request-book", post(routes::submit_request))
            .route("/user/requests", get(routes::list_own_requests))
            .route("/admin/requests", get(routes::list_all_requests))
            .route("/admin/request/{id}", patch(routes::update_request_status))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({
            "description": "Error",
            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/ErrorResponse"}}}
        });
        let request = json!({"$ref": "#/components/schemas/BookRequest"});

        Some(json!({
            "paths": {
                "/request-book": {
                    "post": {
                        "summary": "Submit a book request",
                        "tags": ["Book Requests"],
                        "security": [{"bearer": []}],
                        "requestBody": {
                            "required": true,
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/SubmitBookRequest"}}}
                        },
                        "responses": {
                            "201": {"description": "Created request", "content": {"application/json": {"schema": request}}},
                            "400": error,
                            "401": error,
                            "500": error
                        }
                    }
                },
                "/user/requests": {
                    "get": {
                        "summary": "List the caller's book requests",
                        "tags": ["Book Requests"],
                        "security": [{"bearer": []}],
                        "responses": {
                            "200": {"description": "Requests", "content": {"application/json": {"schema": {"type": "array", "items": request}}}},
                            "404": error,
                            "500": error
                        }
                    }
                },
                "/admin/requests": {
                    "get": {
                        "summary": "List every book request with its requester",
                        "tags": ["Book Requests", "Admin"],
                        "security": [{"bearer": []}],
                        "responses": {
                            "200": {"description": "Requests", "content": {"application/json": {"schema": {"type": "array", "items": request}}}},
                            "403": error,
                            "404": error,
                            "500": error
                        }
                    }
                },
                "/admin/request/{id}": {
                    "patch": {
                        "summary": "Change a book request's status",
                        "tags": ["Book Requests", "Admin"],
                        "security": [{"bearer": []}],
                        "parameters": [{"name": "id", "in": "path", "required": true, "schema": {"type": "string", "format": "uuid"}}],
                        "requestBody": {
                            "required": true,
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/StatusUpdate"}}}
                        },
                        "responses": {
                            "200": {"description": "Updated request", "content": {"application/json": {"schema": request}}},
                            "400": error,
                            "403": error,
                            "404": error
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "SubmitBookRequest": {
                        "type": "object",
                        "properties": {
                            "bookTitle": {"type": "string"},
                            "author": {"type": "string"},
                            "isbn": {"type": "string", "pattern": "^[0-9]{13}$"},
                            "message": {"type": "string"}
                        },
                        "required": ["bookTitle", "author", "isbn"]
                    },
                    "BookRequest": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "string", "format": "uuid"},
                            "user": {"description": "Requester id, or {id, username, email} on admin listings"},
                            "bookTitle": {"type": "string"},
                            "author": {"type": "string"},
                            "isbn": {"type": "string"},
                            "message": {"type": "string"},
                            "status": {"type": "string", "enum": ["Pending", "Approved", "Rejected", "Fulfilled"]},
                            "createdAt": {"type": "string", "format": "date-time"}
                        },
                        "required": ["id", "user", "bookTitle", "author", "isbn", "status", "createdAt"]
                    },
                    "StatusUpdate": {
                        "type": "object",
                        "properties": {"status": {"type": "string"}},
                        "required": ["status"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "book requests module stopped");
        Ok(())
    }
}

/// Create a new instance of the book requests module
pub fn create_module(state: AppState) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BookRequestsModule::new(state))
}
