use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use bookstore_db::{BookRequest, NewBookRequest, PopulatedBookRequest, RecordId, RequestStatus};
use bookstore_http::{AdminUser, AppError, AuthUser};
use serde_json::json;

use super::models::{is_valid_isbn, SubmitBookRequest};
use crate::modules::StatusUpdate;
use crate::state::AppState;

const INVALID_ISBN: &str = "Invalid ISBN format. ISBN should be a 13-digit number.";

/// `POST /request-book`
pub async fn submit_request(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<SubmitBookRequest>,
) -> Result<(StatusCode, Json<BookRequest>), AppError> {
    let mut problems = Vec::new();
    if !is_valid_isbn(&body.isbn) {
        problems.push(json!({"field": "isbn", "error": INVALID_ISBN}));
    }
    if body.book_title.trim().is_empty() {
        problems.push(json!({"field": "bookTitle", "error": "required"}));
    }
    if body.author.trim().is_empty() {
        problems.push(json!({"field": "author", "error": "required"}));
    }
    if !problems.is_empty() {
        let message = if is_valid_isbn(&body.isbn) {
            "Book request is missing required fields."
        } else {
            INVALID_ISBN
        };
        return Err(AppError::validation(problems, message));
    }

    let created = state
        .store
        .create_request(NewBookRequest {
            user: user.identity.user_id,
            book_title: body.book_title.trim().to_string(),
            author: body.author.trim().to_string(),
            isbn: body.isbn,
            message: body.message.filter(|m| !m.trim().is_empty()),
        })
        .await?;

    tracing::info!(
        request_id = %created.id,
        user_id = %created.user,
        isbn = %created.isbn,
        "book request submitted"
    );

    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /user/requests`
pub async fn list_own_requests(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<BookRequest>>, AppError> {
    let requests = state
        .store
        .requests_for_user(&user.identity.user_id)
        .await?;

    if requests.is_empty() {
        return Err(AppError::not_found("No requests found."));
    }

    Ok(Json(requests))
}

/// `GET /admin/requests`
pub async fn list_all_requests(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Vec<PopulatedBookRequest>>, AppError> {
    let requests = state.store.all_requests().await?;

    if requests.is_empty() {
        return Err(AppError::not_found("No requests found."));
    }

    Ok(Json(requests))
}

/// `PATCH /admin/request/{id}`
pub async fn update_request_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<RecordId>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<BookRequest>, AppError> {
    let status: RequestStatus = body.parse_status()?;

    let updated = state
        .store
        .update_request_status(&id, status)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Book request {id} not found.")))?;

    tracing::info!(
        request_id = %id,
        status = %status,
        admin_id = %admin.identity.user_id,
        "book request status updated"
    );

    Ok(Json(updated))
}
