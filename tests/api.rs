//! End-to-end tests driving the full router with fake payment and invoicing backends.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bookstore_app::{build_router, AppState};
use bookstore_authz::{Identity, JwtVerifier, Role};
use bookstore_db::{
    Book, BookRequest, BookRequestStore, InMemoryStore, NewBookRequest, NewOrder, Order,
    OrderStatus, OrderStore, PopulatedBookRequest, PopulatedOrder, RecordId, RequestStatus, Store,
    User, UserStore,
};
use bookstore_kernel::settings::{SalesBucket, Settings};
use bookstore_payments::{CheckoutSession, InvoiceNotifier, PaymentGateway, PaymentStatus};
use chrono::{DateTime, TimeZone, Utc};
use http_body_util::BodyExt;
use rstest::rstest;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &str = "integration-secret";

/// Buyer named by a checkout session but absent from the store.
const GHOST_BUYER: Uuid = Uuid::from_u128(0x0190_a5b8_7c4e_7000_8000_0000_0000_dead);

struct FakeGateway {
    sessions: HashMap<String, CheckoutSession>,
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn retrieve_session(&self, session_id: &str) -> anyhow::Result<CheckoutSession> {
        self.sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no such session: {session_id}"))
    }
}

#[derive(Default)]
struct RecordingNotifier {
    fail: bool,
    sent: Mutex<Vec<(Uuid, String)>>,
}

#[async_trait]
impl InvoiceNotifier for RecordingNotifier {
    async fn send_invoice(&self, order_id: Uuid, authorization: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((order_id, authorization.to_string()));
        if self.fail {
            anyhow::bail!("invoicing backend unavailable");
        }
        Ok(())
    }
}

struct Harness {
    router: Router,
    store: InMemoryStore,
    invoices: Arc<RecordingNotifier>,
    buyer: Uuid,
    admin: Uuid,
    book_a: Book,
    book_b: Book,
}

fn book(name: &str, price: i64) -> Book {
    Book {
        id: Uuid::now_v7(),
        name: name.to_string(),
        author: "Anon".to_string(),
        price: Decimal::from(price),
    }
}

fn session(id: &str, status: PaymentStatus, user: Uuid, items: &[Uuid]) -> CheckoutSession {
    let mut metadata = HashMap::new();
    metadata.insert("userId".to_string(), user.to_string());
    metadata.insert(
        "cartItems".to_string(),
        serde_json::to_string(items).unwrap(),
    );
    CheckoutSession {
        id: id.to_string(),
        payment_status: status,
        metadata,
    }
}

/// Delegates to the in-memory store but fails the `nth` (1-based) cart update.
struct FailingPlacementStore {
    inner: InMemoryStore,
    fail_on: usize,
    placements: AtomicUsize,
}

#[async_trait]
impl BookRequestStore for FailingPlacementStore {
    async fn create_request(&self, request: NewBookRequest) -> anyhow::Result<BookRequest> {
        self.inner.create_request(request).await
    }

    async fn requests_for_user(&self, user: &RecordId) -> anyhow::Result<Vec<BookRequest>> {
        self.inner.requests_for_user(user).await
    }

    async fn all_requests(&self) -> anyhow::Result<Vec<PopulatedBookRequest>> {
        self.inner.all_requests().await
    }

    async fn update_request_status(
        &self,
        id: &RecordId,
        status: RequestStatus,
    ) -> anyhow::Result<Option<BookRequest>> {
        self.inner.update_request_status(id, status).await
    }
}

#[async_trait]
impl OrderStore for FailingPlacementStore {
    async fn create_order(&self, order: NewOrder) -> anyhow::Result<Order> {
        self.inner.create_order(order).await
    }

    async fn claim_checkout_session(&self, session_id: &str) -> anyhow::Result<bool> {
        self.inner.claim_checkout_session(session_id).await
    }

    async fn count_orders(&self) -> anyhow::Result<u64> {
        self.inner.count_orders().await
    }

    async fn orders_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<PopulatedOrder>> {
        self.inner.orders_created_between(start, end).await
    }

    async fn all_orders(&self) -> anyhow::Result<Vec<PopulatedOrder>> {
        self.inner.all_orders().await
    }

    async fn update_order_status(
        &self,
        id: &RecordId,
        status: OrderStatus,
    ) -> anyhow::Result<Option<Order>> {
        self.inner.update_order_status(id, status).await
    }
}

#[async_trait]
impl UserStore for FailingPlacementStore {
    async fn find_user(&self, id: &RecordId) -> anyhow::Result<Option<User>> {
        self.inner.find_user(id).await
    }

    async fn record_placed_order(
        &self,
        user: &RecordId,
        order: &RecordId,
        book: &RecordId,
    ) -> anyhow::Result<()> {
        let call = self.placements.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            anyhow::bail!("user document write timed out");
        }
        self.inner.record_placed_order(user, order, book).await
    }

    async fn order_history(&self, user: &RecordId) -> anyhow::Result<Option<Vec<PopulatedOrder>>> {
        self.inner.order_history(user).await
    }
}

fn harness_with(fail_invoices: bool) -> Harness {
    build_harness(fail_invoices, |store| -> Arc<dyn Store> { Arc::new(store) })
}

fn build_harness(
    fail_invoices: bool,
    wrap_store: impl FnOnce(InMemoryStore) -> Arc<dyn Store>,
) -> Harness {
    let store = InMemoryStore::new();
    let buyer = Uuid::now_v7();
    let admin = Uuid::now_v7();
    let book_a = book("Dune", 20);
    let book_b = book("Emma", 12);

    store.seed_book(book_a.clone()).unwrap();
    store.seed_book(book_b.clone()).unwrap();
    store
        .seed_user(User {
            id: buyer,
            username: "reader".to_string(),
            email: "reader@example.com".to_string(),
            orders: vec![],
            cart: vec![book_a.id, book_b.id],
        })
        .unwrap();
    store
        .seed_user(User {
            id: admin,
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            orders: vec![],
            cart: vec![],
        })
        .unwrap();

    let mut sessions = HashMap::new();
    for s in [
        session("cs_paid", PaymentStatus::Paid, buyer, &[book_a.id, book_b.id]),
        session("cs_unpaid", PaymentStatus::Unpaid, buyer, &[book_a.id]),
        session("cs_other", PaymentStatus::Paid, admin, &[book_a.id]),
        session("cs_ghost", PaymentStatus::Paid, GHOST_BUYER, &[book_a.id]),
    ] {
        sessions.insert(s.id.clone(), s);
    }
    let mut bad_cart = session("cs_bad_cart", PaymentStatus::Paid, buyer, &[]);
    bad_cart
        .metadata
        .insert("cartItems".to_string(), "book-1,book-2".to_string());
    sessions.insert(bad_cart.id.clone(), bad_cart);

    let invoices = Arc::new(RecordingNotifier {
        fail: fail_invoices,
        ..RecordingNotifier::default()
    });
    let state = AppState {
        store: wrap_store(store.clone()),
        verifier: Arc::new(JwtVerifier::new(SECRET)),
        payments: Arc::new(FakeGateway { sessions }),
        invoices: invoices.clone(),
        sales_bucket: SalesBucket::Timestamp,
    };

    Harness {
        router: build_router(&state, &Settings::default()),
        store,
        invoices,
        buyer,
        admin,
        book_a,
        book_b,
    }
}

fn harness() -> Harness {
    harness_with(false)
}

fn token(user: Uuid, role: Role) -> String {
    JwtVerifier::new(SECRET)
        .issue(&Identity { user_id: user, role }, chrono::Duration::minutes(5))
        .unwrap()
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    bearer: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(bearer) = bearer {
        request = request.header(header::AUTHORIZATION, format!("Bearer {bearer}"));
    }
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn health_check_is_public() {
    let h = harness();
    let response = h
        .router
        .clone()
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn book_request_with_bad_isbn_is_rejected_and_not_stored() {
    let h = harness();
    let user = token(h.buyer, Role::User);

    let (status, body) = send(
        &h.router,
        Method::POST,
        "/api/v1/request-book",
        Some(&user),
        Some(json!({"bookTitle": "Dune", "author": "Herbert", "isbn": "12345"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"]["message"],
        "Invalid ISBN format. ISBN should be a 13-digit number."
    );
    assert!(h.store.requests_for_user(&h.buyer).await.unwrap().is_empty());
}

#[tokio::test]
async fn book_request_lifecycle() {
    let h = harness();
    let user = token(h.buyer, Role::User);
    let admin = token(h.admin, Role::Admin);

    let (status, _) = send(&h.router, Method::GET, "/api/v1/user/requests", Some(&user), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, created) = send(
        &h.router,
        Method::POST,
        "/api/v1/request-book",
        Some(&user),
        Some(json!({
            "bookTitle": "Dune",
            "author": "Frank Herbert",
            "isbn": "9780441013593",
            "message": "Please stock it"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "Pending");
    assert_eq!(created["user"], h.buyer.to_string());

    let (status, own) = send(&h.router, Method::GET, "/api/v1/user/requests", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(own.as_array().unwrap().len(), 1);

    let (status, all) = send(&h.router, Method::GET, "/api/v1/admin/requests", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all[0]["user"]["username"], "reader");

    let uri = format!("/api/v1/admin/request/{}", created["id"].as_str().unwrap());
    let (status, updated) = send(
        &h.router,
        Method::PATCH,
        &uri,
        Some(&admin),
        Some(json!({"status": "Approved"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Approved");

    let (status, _) = send(
        &h.router,
        Method::PATCH,
        &uri,
        Some(&admin),
        Some(json!({"status": "Shelved"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing = format!("/api/v1/admin/request/{}", Uuid::now_v7());
    let (status, _) = send(
        &h.router,
        Method::PATCH,
        &missing,
        Some(&admin),
        Some(json!({"status": "Rejected"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn paid_session_places_one_order_per_cart_item() {
    let h = harness();
    let user = token(h.buyer, Role::User);

    let (status, body) = send(
        &h.router,
        Method::POST,
        "/api/v1/place-order",
        Some(&user),
        Some(json!({"session_id": "cs_paid"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Order placed successfully & Invoice Sent!");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let buyer = h.store.find_user(&h.buyer).await.unwrap().unwrap();
    assert!(buyer.cart.is_empty());
    assert_eq!(buyer.orders.len(), 2);

    let orders = h.store.all_orders().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o.status == OrderStatus::OrderPlaced));
    let mut ordered: Vec<Uuid> = orders.iter().map(|o| o.books[0].id).collect();
    ordered.sort();
    let mut expected = vec![h.book_a.id, h.book_b.id];
    expected.sort();
    assert_eq!(ordered, expected);

    let sent = h.invoices.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|(_, auth)| auth == &format!("Bearer {user}")));
}

#[tokio::test]
async fn unpaid_session_creates_nothing() {
    let h = harness();
    let user = token(h.buyer, Role::User);

    let (status, body) = send(
        &h.router,
        Method::POST,
        "/api/v1/place-order",
        Some(&user),
        Some(json!({"session_id": "cs_unpaid"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Payment not successful");
    assert_eq!(h.store.count_orders().await.unwrap(), 0);
    assert_eq!(
        h.store.find_user(&h.buyer).await.unwrap().unwrap().cart.len(),
        2
    );
}

#[tokio::test]
async fn session_for_another_user_is_forbidden() {
    let h = harness();
    let user = token(h.buyer, Role::User);

    let (status, _) = send(
        &h.router,
        Method::POST,
        "/api/v1/place-order",
        Some(&user),
        Some(json!({"session_id": "cs_other"})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(h.store.count_orders().await.unwrap(), 0);
}

#[tokio::test]
async fn missing_buyer_is_not_found_and_writes_nothing() {
    let h = harness();
    let admin = token(h.admin, Role::Admin);

    let (status, body) = send(
        &h.router,
        Method::POST,
        "/api/v1/place-order",
        Some(&admin),
        Some(json!({"session_id": "cs_ghost"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "User not found");
    assert_eq!(h.store.count_orders().await.unwrap(), 0);
}

#[tokio::test]
async fn malformed_cart_metadata_is_a_bad_request() {
    let h = harness();
    let user = token(h.buyer, Role::User);

    let (status, body) = send(
        &h.router,
        Method::POST,
        "/api/v1/place-order",
        Some(&user),
        Some(json!({"session_id": "cs_bad_cart"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
    assert_eq!(h.store.count_orders().await.unwrap(), 0);
    assert_eq!(
        h.store.find_user(&h.buyer).await.unwrap().unwrap().cart.len(),
        2
    );
}

#[tokio::test]
async fn store_failure_mid_placement_keeps_earlier_orders() {
    let h = build_harness(false, |store| -> Arc<dyn Store> {
        Arc::new(FailingPlacementStore {
            inner: store,
            fail_on: 2,
            placements: AtomicUsize::new(0),
        })
    });
    let user = token(h.buyer, Role::User);

    let (status, body) = send(
        &h.router,
        Method::POST,
        "/api/v1/place-order",
        Some(&user),
        Some(json!({"session_id": "cs_paid"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "internal_error");

    let buyer = h.store.find_user(&h.buyer).await.unwrap().unwrap();
    assert_eq!(buyer.orders.len(), 1);
    assert_eq!(buyer.cart, vec![h.book_b.id]);
    // The second order was created before its cart update failed.
    assert_eq!(h.store.count_orders().await.unwrap(), 2);
    assert!(h.invoices.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn checkout_session_cannot_be_replayed() {
    let h = harness();
    let user = token(h.buyer, Role::User);
    let place = || {
        send(
            &h.router,
            Method::POST,
            "/api/v1/place-order",
            Some(&user),
            Some(json!({"session_id": "cs_paid"})),
        )
    };

    let (status, _) = place().await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = place().await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Checkout session already processed");
    assert_eq!(h.store.count_orders().await.unwrap(), 2);
}

#[rstest]
#[case::traversal("../../v1/customers/cus_x")]
#[case::query("cs_paid?expand[]=customer")]
#[case::empty("")]
#[tokio::test]
async fn malformed_session_id_is_rejected_before_the_gateway(#[case] session_id: &str) {
    let h = harness();
    let user = token(h.buyer, Role::User);

    let (status, body) = send(
        &h.router,
        Method::POST,
        "/api/v1/place-order",
        Some(&user),
        Some(json!({"session_id": session_id})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(h.store.count_orders().await.unwrap(), 0);
}

#[tokio::test]
async fn unknown_session_is_an_internal_error() {
    let h = harness();
    let user = token(h.buyer, Role::User);

    let (status, body) = send(
        &h.router,
        Method::POST,
        "/api/v1/place-order",
        Some(&user),
        Some(json!({"session_id": "cs_missing"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["message"], "An internal server error occurred");
}

#[tokio::test]
async fn invoice_failures_do_not_fail_the_order() {
    let h = harness_with(true);
    let user = token(h.buyer, Role::User);

    let (status, body) = send(
        &h.router,
        Method::POST,
        "/api/v1/place-order",
        Some(&user),
        Some(json!({"session_id": "cs_paid"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(h.invoices.sent.lock().unwrap().len(), 2);
    assert_eq!(h.store.count_orders().await.unwrap(), 2);
}

#[tokio::test]
async fn order_history_is_newest_first_and_scoped_to_caller() {
    let h = harness();
    let user = token(h.buyer, Role::User);
    let admin = token(h.admin, Role::Admin);

    send(
        &h.router,
        Method::POST,
        "/api/v1/place-order",
        Some(&user),
        Some(json!({"session_id": "cs_paid"})),
    )
    .await;
    let placed = h.store.find_user(&h.buyer).await.unwrap().unwrap().orders;

    let (status, body) = send(&h.router, Method::GET, "/api/v1/get-order-history", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "history books fetched successfully");
    let history: Vec<String> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        history,
        placed.iter().rev().map(Uuid::to_string).collect::<Vec<_>>()
    );

    let peek = |bearer: String, target: Uuid| {
        let router = h.router.clone();
        async move {
            let request = Request::builder()
                .uri("/api/v1/get-order-history")
                .header(header::AUTHORIZATION, format!("Bearer {bearer}"))
                .header("id", target.to_string())
                .body(Body::empty())
                .unwrap();
            router.oneshot(request).await.unwrap().status()
        }
    };

    assert_eq!(peek(user.clone(), h.admin).await, StatusCode::FORBIDDEN);
    assert_eq!(peek(admin.clone(), h.buyer).await, StatusCode::OK);
    assert_eq!(peek(admin, Uuid::now_v7()).await, StatusCode::NOT_FOUND);
}

#[rstest]
#[case(Method::GET, "/api/v1/admin/requests")]
#[case(Method::GET, "/api/v1/get-all-orders")]
#[case(Method::GET, "/api/v1/sales-report?startDate=2024-01-01&endDate=2024-12-31")]
#[tokio::test]
async fn admin_routes_require_admin(#[case] method: Method, #[case] uri: &str) {
    let h = harness();

    let (status, body) = send(&h.router, method.clone(), uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");

    let user = token(h.buyer, Role::User);
    let (status, body) = send(&h.router, method, uri, Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "forbidden");
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let h = harness();
    let forged = JwtVerifier::new("someone-else")
        .issue(
            &Identity {
                user_id: h.admin,
                role: Role::Admin,
            },
            chrono::Duration::minutes(5),
        )
        .unwrap();

    let (status, _) = send(&h.router, Method::GET, "/api/v1/get-all-orders", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case::patch(Method::PATCH)]
#[case::legacy_get(Method::GET)]
#[tokio::test]
async fn admin_updates_order_status(#[case] method: Method) {
    let h = harness();
    let admin = token(h.admin, Role::Admin);
    let order = Order {
        id: Uuid::now_v7(),
        user: h.buyer,
        books: vec![h.book_a.id],
        status: OrderStatus::OrderPlaced,
        created_at: Utc::now(),
    };
    h.store.seed_order(order.clone()).unwrap();
    let uri = format!("/api/v1/update-status/{}", order.id);

    let (status, body) = send(
        &h.router,
        method.clone(),
        &uri,
        Some(&admin),
        Some(json!({"status": "Out for Delivery"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "update status successfully");

    let (_, all) = send(&h.router, Method::GET, "/api/v1/get-all-orders", Some(&admin), None).await;
    assert_eq!(all["data"][0]["status"], "Out for Delivery");

    let (status, body) = send(
        &h.router,
        method,
        &uri,
        Some(&admin),
        Some(json!({"status": "Lost"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}

fn seeded_order(h: &Harness, book: &Book, status: OrderStatus, day: u32) -> Order {
    let order = Order {
        id: Uuid::now_v7(),
        user: h.buyer,
        books: vec![book.id],
        status,
        created_at: Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap(),
    };
    h.store.seed_order(order.clone()).unwrap();
    order
}

#[tokio::test]
async fn sales_report_aggregates_orders_in_range() {
    let h = harness();
    let admin = token(h.admin, Role::Admin);
    seeded_order(&h, &h.book_a, OrderStatus::Delivered, 2);
    seeded_order(&h, &h.book_a, OrderStatus::OrderPlaced, 3);
    seeded_order(&h, &h.book_b, OrderStatus::Delivered, 4);
    seeded_order(&h, &h.book_b, OrderStatus::Delivered, 20);

    let (status, body) = send(
        &h.router,
        Method::GET,
        "/api/v1/sales-report?startDate=2024-05-01&endDate=2024-05-10",
        Some(&admin),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalOrders"], 4);
    assert_eq!(body["totalBooksSold"], 2);
    assert_eq!(body["totalRevenue"], 32.0);
    assert_eq!(body["allOrders"].as_array().unwrap().len(), 3);
    assert_eq!(body["monthlySales"].as_array().unwrap().len(), 3);
    assert_eq!(body["monthlySales"][1]["sales"], 0.0);
    assert_eq!(body["topSellingBooks"][0], json!({"name": "Dune", "sales": 2}));
    assert_eq!(body["topSellingBooks"][1], json!({"name": "Emma", "sales": 1}));
}

#[tokio::test]
async fn sales_report_for_an_empty_range() {
    let h = harness();
    let admin = token(h.admin, Role::Admin);
    seeded_order(&h, &h.book_a, OrderStatus::Delivered, 2);

    let (status, body) = send(
        &h.router,
        Method::GET,
        "/api/v1/sales-report?startDate=2023-01-01&endDate=2023-12-31",
        Some(&admin),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalOrders"], 1);
    assert_eq!(body["totalBooksSold"], 0);
    assert_eq!(body["totalRevenue"], 0.0);
    assert_eq!(body["monthlySales"], json!([]));
    assert_eq!(body["topSellingBooks"], json!([]));
    assert_eq!(body["allOrders"], json!([]));
}

#[rstest]
#[case::missing_end("/api/v1/sales-report?startDate=2024-01-01")]
#[case::garbage("/api/v1/sales-report?startDate=yesterday&endDate=2024-01-01")]
#[case::reversed("/api/v1/sales-report?startDate=2024-02-01&endDate=2024-01-01")]
#[tokio::test]
async fn sales_report_rejects_bad_ranges(#[case] uri: &str) {
    let h = harness();
    let admin = token(h.admin, Role::Admin);

    let (status, body) = send(&h.router, Method::GET, uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
}

#[tokio::test]
async fn openapi_document_lists_every_route() {
    let h = harness();
    let (status, spec) = send(&h.router, Method::GET, "/docs/openapi.json", None, None).await;

    assert_eq!(status, StatusCode::OK);
    for path in [
        "/api/v1/request-book",
        "/api/v1/user/requests",
        "/api/v1/admin/requests",
        "/api/v1/admin/request/{id}",
        "/api/v1/place-order",
        "/api/v1/get-order-history",
        "/api/v1/get-all-orders",
        "/api/v1/update-status/{id}",
        "/api/v1/sales-report",
    ] {
        assert!(spec["paths"][path].is_object(), "missing {path}");
    }
}
