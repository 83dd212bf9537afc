//! Store traits consumed by the route handlers.
//!
//! Every method is a single atomic store operation. Multi-step workflows
//! (like order placement) are composed by the caller and are not transactional.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    BookRequest, NewBookRequest, NewOrder, Order, OrderStatus, PopulatedBookRequest,
    PopulatedOrder, RecordId, RequestStatus, User,
};

#[async_trait]
pub trait BookRequestStore: Send + Sync {
    async fn create_request(&self, request: NewBookRequest) -> anyhow::Result<BookRequest>;

    async fn requests_for_user(&self, user: &RecordId) -> anyhow::Result<Vec<BookRequest>>;

    /// All requests with the requester populated.
    async fn all_requests(&self) -> anyhow::Result<Vec<PopulatedBookRequest>>;

    /// Returns `None` when no request has this id.
    async fn update_request_status(
        &self,
        id: &RecordId,
        status: RequestStatus,
    ) -> anyhow::Result<Option<BookRequest>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create_order(&self, order: NewOrder) -> anyhow::Result<Order>;

    /// Mark a checkout session as consumed. `false` when it already was.
    async fn claim_checkout_session(&self, session_id: &str) -> anyhow::Result<bool>;

    /// Count of every order in the store.
    async fn count_orders(&self) -> anyhow::Result<u64>;

    /// Orders with `start <= createdAt <= end`, populated, in insertion order.
    async fn orders_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<PopulatedOrder>>;

    /// Every order, populated, newest first.
    async fn all_orders(&self) -> anyhow::Result<Vec<PopulatedOrder>>;

    /// Returns `None` when no order has this id.
    async fn update_order_status(
        &self,
        id: &RecordId,
        status: OrderStatus,
    ) -> anyhow::Result<Option<Order>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user(&self, id: &RecordId) -> anyhow::Result<Option<User>>;

    /// Append `order` to the user's orders and remove `book` from their cart.
    async fn record_placed_order(
        &self,
        user: &RecordId,
        order: &RecordId,
        book: &RecordId,
    ) -> anyhow::Result<()>;

    /// The user's orders, populated, most recently placed first.
    /// Returns `None` when the user does not exist.
    async fn order_history(&self, user: &RecordId) -> anyhow::Result<Option<Vec<PopulatedOrder>>>;
}

/// Everything the handlers need from persistence.
pub trait Store: BookRequestStore + OrderStore + UserStore {}

impl<T> Store for T where T: BookRequestStore + OrderStore + UserStore {}
