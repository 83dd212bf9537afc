//! In-memory document store used for development and tests.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{
    Book, BookRequest, NewBookRequest, NewOrder, Order, OrderStatus, PopulatedBookRequest,
    PopulatedOrder, RecordId, RequestStatus, User, UserSummary,
};
use crate::store::{BookRequestStore, OrderStore, UserStore};

#[derive(Default)]
struct Collections {
    books: IndexMap<RecordId, Book>,
    users: IndexMap<RecordId, User>,
    orders: IndexMap<RecordId, Order>,
    requests: IndexMap<RecordId, BookRequest>,
    checkout_sessions: HashSet<String>,
}

impl Collections {
    fn user_summary(&self, id: &RecordId) -> Option<UserSummary> {
        self.users.get(id).map(UserSummary::from)
    }

    fn populate_order(&self, order: &Order) -> PopulatedOrder {
        PopulatedOrder {
            id: order.id,
            user: self.user_summary(&order.user),
            books: order
                .books
                .iter()
                .filter_map(|id| self.books.get(id).cloned())
                .collect(),
            status: order.status,
            created_at: order.created_at,
        }
    }
}

/// Seed data loaded at startup.
#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub users: Vec<User>,
}

/// Thread-safe in-memory store. Clones share the same collections.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Collections>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store seeded from a JSON fixture file.
    pub fn from_fixture_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture '{}'", path.display()))?;
        let fixture: Fixture = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse fixture '{}'", path.display()))?;

        let store = Self::new();
        store.load_fixture(fixture)?;
        Ok(store)
    }

    pub fn load_fixture(&self, fixture: Fixture) -> anyhow::Result<()> {
        let (books, users) = (fixture.books.len(), fixture.users.len());
        for book in fixture.books {
            self.seed_book(book)?;
        }
        for user in fixture.users {
            self.seed_user(user)?;
        }
        tracing::info!(books, users, "store seeded from fixture");
        Ok(())
    }

    pub fn seed_book(&self, book: Book) -> anyhow::Result<()> {
        self.write()?.books.insert(book.id, book);
        Ok(())
    }

    pub fn seed_user(&self, user: User) -> anyhow::Result<()> {
        self.write()?.users.insert(user.id, user);
        Ok(())
    }

    /// Insert an order as-is, keeping its id and timestamp.
    pub fn seed_order(&self, order: Order) -> anyhow::Result<()> {
        self.write()?.orders.insert(order.id, order);
        Ok(())
    }

    fn read(&self) -> anyhow::Result<RwLockReadGuard<'_, Collections>> {
        self.inner
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))
    }

    fn write(&self) -> anyhow::Result<RwLockWriteGuard<'_, Collections>> {
        self.inner
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))
    }
}

#[async_trait]
impl BookRequestStore for InMemoryStore {
    async fn create_request(&self, request: NewBookRequest) -> anyhow::Result<BookRequest> {
        let record = BookRequest {
            id: Uuid::now_v7(),
            user: request.user,
            book_title: request.book_title,
            author: request.author,
            isbn: request.isbn,
            message: request.message,
            status: RequestStatus::default(),
            created_at: Utc::now(),
        };

        self.write()?.requests.insert(record.id, record.clone());
        Ok(record)
    }

    async fn requests_for_user(&self, user: &RecordId) -> anyhow::Result<Vec<BookRequest>> {
        Ok(self
            .read()?
            .requests
            .values()
            .filter(|request| &request.user == user)
            .cloned()
            .collect())
    }

    async fn all_requests(&self) -> anyhow::Result<Vec<PopulatedBookRequest>> {
        let collections = self.read()?;
        Ok(collections
            .requests
            .values()
            .map(|request| {
                let requester = collections.user_summary(&request.user);
                request.clone().populate(requester)
            })
            .collect())
    }

    async fn update_request_status(
        &self,
        id: &RecordId,
        status: RequestStatus,
    ) -> anyhow::Result<Option<BookRequest>> {
        let mut collections = self.write()?;
        Ok(collections.requests.get_mut(id).map(|request| {
            request.status = status;
            request.clone()
        }))
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn create_order(&self, order: NewOrder) -> anyhow::Result<Order> {
        let record = Order {
            id: Uuid::now_v7(),
            user: order.user,
            books: order.books,
            status: order.status,
            created_at: Utc::now(),
        };

        self.write()?.orders.insert(record.id, record.clone());
        Ok(record)
    }

    async fn claim_checkout_session(&self, session_id: &str) -> anyhow::Result<bool> {
        Ok(self.write()?.checkout_sessions.insert(session_id.to_string()))
    }

    async fn count_orders(&self) -> anyhow::Result<u64> {
        Ok(self.read()?.orders.len() as u64)
    }

    async fn orders_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<PopulatedOrder>> {
        let collections = self.read()?;
        Ok(collections
            .orders
            .values()
            .filter(|order| order.created_at >= start && order.created_at <= end)
            .map(|order| collections.populate_order(order))
            .collect())
    }

    async fn all_orders(&self) -> anyhow::Result<Vec<PopulatedOrder>> {
        let collections = self.read()?;
        let mut orders: Vec<PopulatedOrder> = collections
            .orders
            .values()
            .map(|order| collections.populate_order(order))
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn update_order_status(
        &self,
        id: &RecordId,
        status: OrderStatus,
    ) -> anyhow::Result<Option<Order>> {
        let mut collections = self.write()?;
        Ok(collections.orders.get_mut(id).map(|order| {
            order.status = status;
            order.clone()
        }))
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_user(&self, id: &RecordId) -> anyhow::Result<Option<User>> {
        Ok(self.read()?.users.get(id).cloned())
    }

    async fn record_placed_order(
        &self,
        user: &RecordId,
        order: &RecordId,
        book: &RecordId,
    ) -> anyhow::Result<()> {
        let mut collections = self.write()?;
        let record = collections
            .users
            .get_mut(user)
            .ok_or_else(|| anyhow!("user {} not found", user))?;

        record.orders.push(*order);
        record.cart.retain(|item| item != book);
        Ok(())
    }

    async fn order_history(&self, user: &RecordId) -> anyhow::Result<Option<Vec<PopulatedOrder>>> {
        let collections = self.read()?;
        let Some(record) = collections.users.get(user) else {
            return Ok(None);
        };

        Ok(Some(
            record
                .orders
                .iter()
                .rev()
                .filter_map(|id| collections.orders.get(id))
                .map(|order| collections.populate_order(order))
                .collect(),
        ))
    }
}
