use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use bookstore_db::{NewOrder, OrderStatus, PopulatedOrder, RecordId};
use bookstore_http::{AdminUser, AppError, AuthUser};
use bookstore_payments::CheckoutMetadata;

use super::models::{Envelope, PlaceOrder};
use crate::modules::StatusUpdate;
use crate::state::AppState;

/// Header an administrator may set to read another user's history.
const HISTORY_USER_HEADER: &str = "id";

/// Checkout session ids are opaque `[A-Za-z0-9_]+` tokens.
fn is_valid_session_id(session_id: &str) -> bool {
    !session_id.is_empty()
        && session_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// `POST /place-order`
///
/// A checkout session places orders at most once; replays are rejected.
/// Orders are written one cart item at a time without a surrounding
/// transaction; a store failure part-way leaves the earlier orders in place.
pub async fn place_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<PlaceOrder>,
) -> Result<Json<Envelope<Vec<RecordId>>>, AppError> {
    if !is_valid_session_id(&body.session_id) {
        return Err(AppError::invalid_field(
            "session_id",
            "not a checkout session id",
        ));
    }

    let session = state.payments.retrieve_session(&body.session_id).await?;

    if !session.is_paid() {
        tracing::info!(
            session_id = %session.id,
            payment_status = ?session.payment_status,
            "checkout session is not paid"
        );
        return Err(AppError::bad_request("Payment not successful"));
    }

    let checkout = CheckoutMetadata::from_session(&session).map_err(|e| {
        tracing::warn!(session_id = %session.id, error = %e, "rejecting checkout metadata");
        AppError::bad_request(e.to_string())
    })?;

    if !user.identity.may_act_for(&checkout.user_id) {
        return Err(AppError::forbidden(
            "Checkout session belongs to a different user",
        ));
    }

    if state.store.find_user(&checkout.user_id).await?.is_none() {
        return Err(AppError::not_found("User not found"));
    }

    if !state.store.claim_checkout_session(&session.id).await? {
        tracing::warn!(session_id = %session.id, "checkout session replayed");
        return Err(AppError::bad_request("Checkout session already processed"));
    }

    let mut order_ids = Vec::with_capacity(checkout.cart_items.len());
    for book_id in &checkout.cart_items {
        let placed = async {
            let order = state
                .store
                .create_order(NewOrder {
                    user: checkout.user_id,
                    books: vec![*book_id],
                    status: OrderStatus::OrderPlaced,
                })
                .await?;
            state
                .store
                .record_placed_order(&checkout.user_id, &order.id, book_id)
                .await?;
            anyhow::Ok(order.id)
        }
        .await;

        match placed {
            Ok(order_id) => order_ids.push(order_id),
            Err(e) => {
                tracing::error!(
                    user_id = %checkout.user_id,
                    book_id = %book_id,
                    created = ?order_ids,
                    "order placement stopped part-way"
                );
                return Err(e.into());
            }
        }
    }

    tracing::info!(
        user_id = %checkout.user_id,
        session_id = %session.id,
        orders = order_ids.len(),
        "orders placed"
    );

    let authorization = user.authorization();
    for order_id in &order_ids {
        match state.invoices.send_invoice(*order_id, &authorization).await {
            Ok(()) => tracing::info!(order_id = %order_id, "invoice sent"),
            Err(e) => tracing::warn!(order_id = %order_id, error = ?e, "failed to send invoice"),
        }
    }

    Ok(Json(Envelope::success(
        "Order placed successfully & Invoice Sent!",
        order_ids,
    )))
}

/// `GET /get-order-history`
pub async fn order_history(
    State(state): State<AppState>,
    user: AuthUser,
    headers: HeaderMap,
) -> Result<Json<Envelope<Vec<PopulatedOrder>>>, AppError> {
    let target = match headers.get(HISTORY_USER_HEADER) {
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|raw| raw.trim().parse::<RecordId>().ok())
            .ok_or_else(|| AppError::invalid_field(HISTORY_USER_HEADER, "not a valid user id"))?,
        None => user.identity.user_id,
    };

    if !user.identity.may_act_for(&target) {
        tracing::warn!(
            caller = %user.identity.user_id,
            requested = %target,
            "order history requested for another user"
        );
        return Err(AppError::forbidden("Cannot read another user's order history"));
    }

    let history = state
        .store
        .order_history(&target)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(Envelope::success(
        "history books fetched successfully",
        history,
    )))
}

/// `GET /get-all-orders`
pub async fn all_orders(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<Envelope<Vec<PopulatedOrder>>>, AppError> {
    let orders = state.store.all_orders().await?;

    Ok(Json(Envelope::success(
        "All orders fetched successfully",
        orders,
    )))
}

/// `GET|PATCH /update-status/{id}`
pub async fn update_order_status(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<RecordId>,
    Json(body): Json<StatusUpdate>,
) -> Result<Json<Envelope<()>>, AppError> {
    let status: OrderStatus = body.parse_status()?;

    state
        .store
        .update_order_status(&id, status)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id} not found.")))?;

    tracing::info!(
        order_id = %id,
        status = %status,
        admin_id = %admin.identity.user_id,
        "order status updated"
    );

    Ok(Json(Envelope::done("update status successfully")))
}
