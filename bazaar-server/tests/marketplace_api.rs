//! HTTP-level marketplace flows
//!
//! Each test runs the full router against a private in-memory database.
//! Accounts are inserted directly and tokens minted from the state's JWT
//! service; only the auth test goes through password hashing.

use axum::Router;
use axum::body::Body;
use bazaar_server::db::{DbService, account, account::NewAccount};
use bazaar_server::{Config, ServerState, api};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::{Account, AccountStatus, Role};
use tower::ServiceExt;

struct TestApp {
    app: Router,
    state: ServerState,
}

impl TestApp {
    async fn new() -> Self {
        let db = DbService::in_memory().await.unwrap();
        let state = ServerState::with_db(Config::default(), db);
        Self {
            app: api::build_app(state.clone()),
            state,
        }
    }

    /// Multi-connection pool on a file database under `dir`
    async fn on_disk(dir: &tempfile::TempDir, config: Config) -> Self {
        let config = Config {
            database_url: format!("sqlite://{}", dir.path().join("bazaar.db").display()),
            db_max_connections: 8,
            ..config
        };
        let db = DbService::new(&config).await.unwrap();
        let state = ServerState::with_db(config, db);
        Self {
            app: api::build_app(state.clone()),
            state,
        }
    }

    async fn account(&self, role: Role, status: AccountStatus, email: &str) -> Account {
        account::create(
            self.state.pool(),
            NewAccount {
                role,
                full_name: format!("{role} {email}"),
                email: email.into(),
                mobile: None,
                password_hash: "unused".into(),
                shop_name: (role == Role::Shopkeeper).then(|| "Corner Shop".to_string()),
                address: None,
                status,
            },
        )
        .await
        .unwrap()
    }

    /// Account plus a bearer token for it
    async fn login_as(&self, role: Role, email: &str) -> (Account, String) {
        let account = self.account(role, AccountStatus::Active, email).await;
        let token = self.state.get_jwt_service().generate_token(&account).unwrap();
        (account, token)
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body)).await
    }

    async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(token), Some(body)).await
    }

    async fn create_product(&self, token: &str, name: &str, price: f64, quantity: i64) -> String {
        let (status, body) = self
            .post(
                "/api/shopkeeper/products",
                token,
                json!({ "name": name, "category": "Home", "price": price, "quantity": quantity }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["id"].as_str().unwrap().to_string()
    }
}

/// One shopkeeper, one customer, one product (price 50, stock 10) and a
/// placed order for 3 units
struct Placed {
    t: TestApp,
    shopkeeper: String,
    customer: String,
    product_id: String,
    order_id: String,
}

async fn placed_order() -> Placed {
    let t = TestApp::new().await;
    let (_, shopkeeper) = t.login_as(Role::Shopkeeper, "shop@example.com").await;
    let (_, customer) = t.login_as(Role::Customer, "ada@example.com").await;
    let product_id = t.create_product(&shopkeeper, "Teapot", 50.0, 10).await;

    let (status, _) = t
        .post("/api/cart", &customer, json!({ "product_id": product_id, "quantity": 3 }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = t
        .post("/api/order/checkout", &customer, json!({ "shipping_address": "1 Main St" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let order_id = body["order_id"].as_str().unwrap().to_string();

    Placed {
        t,
        shopkeeper,
        customer,
        product_id,
        order_id,
    }
}

#[tokio::test]
async fn test_health() {
    let t = TestApp::new().await;
    let (status, body) = t.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_register_and_login() {
    let t = TestApp::new().await;

    let (status, body) = t
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "role": "customer",
                "full_name": "Ada Lovelace",
                "email": "ada@example.com",
                "password": "secret1"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["id"], "C11111");
    assert_eq!(body["status"], "active");

    let (status, body) = t
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "role": "customer",
                "full_name": "Ada Again",
                "email": "ada@example.com",
                "password": "secret1"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 8002);

    let (status, _) = t
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "wrong-one" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = t
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "ada@example.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["role"], "customer");
    assert!(body["user"].get("password_hash").is_none());
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = t.get("/api/auth/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "C11111");
    assert_eq!(body["email"], "ada@example.com");
}

#[tokio::test]
async fn test_pending_shopkeeper_cannot_log_in() {
    let t = TestApp::new().await;
    let (status, body) = t
        .send(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "role": "shopkeeper",
                "full_name": "Sam Shop",
                "email": "sam@example.com",
                "password": "secret1",
                "shop_name": "Sam's"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["id"], "S1111");
    assert_eq!(body["status"], "pending");

    let (status, body) = t
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "sam@example.com", "password": "secret1" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 1007);
}

#[tokio::test]
async fn test_roles_are_enforced() {
    let t = TestApp::new().await;
    let (_, customer) = t.login_as(Role::Customer, "ada@example.com").await;
    let (_, shopkeeper) = t.login_as(Role::Shopkeeper, "shop@example.com").await;

    let (status, _) = t.send(Method::GET, "/api/cart", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = t.get("/api/cart", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = t.get("/api/cart", &shopkeeper).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2002);

    let (status, body) = t.get("/api/admin/stats", &customer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let (status, _) = t.get("/api/shopkeeper/orders", &customer).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cart_clamps_and_prices_lines() {
    let t = TestApp::new().await;
    let (_, shopkeeper) = t.login_as(Role::Shopkeeper, "shop@example.com").await;
    let (_, customer) = t.login_as(Role::Customer, "ada@example.com").await;
    let product_id = t.create_product(&shopkeeper, "Kettle", 40.0, 4).await;
    let (status, _) = t
        .put(
            &format!("/api/shopkeeper/products/{product_id}"),
            &shopkeeper,
            json!({ "discount": 25.0 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = t
        .post("/api/cart", &customer, json!({ "product_id": product_id, "quantity": 10 }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["items"][0]["quantity"], 4);
    assert_eq!(body["items"][0]["final_price"], 30.0);
    assert_eq!(body["total"], 120.0);

    let (status, body) = t
        .post("/api/cart", &customer, json!({ "product_id": product_id, "quantity": 0 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, body) = t
        .post("/api/cart", &customer, json!({ "product_id": "P9999", "quantity": 1 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);

    let (status, body) = t
        .put(&format!("/api/cart/{product_id}"), &customer, json!({ "quantity": 0 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["items"].as_array().unwrap().is_empty());

    let (status, body) = t
        .send(
            Method::DELETE,
            &format!("/api/cart/{product_id}"),
            Some(&customer),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6101);
}

#[tokio::test]
async fn test_cart_sync_replaces_lines() {
    let t = TestApp::new().await;
    let (_, shopkeeper) = t.login_as(Role::Shopkeeper, "shop@example.com").await;
    let (_, customer) = t.login_as(Role::Customer, "ada@example.com").await;
    let mug = t.create_product(&shopkeeper, "Mug", 5.0, 3).await;
    let plate = t.create_product(&shopkeeper, "Plate", 7.5, 0).await;

    let (status, body) = t
        .post(
            "/api/cart/sync",
            &customer,
            json!({ "items": [
                { "product_id": mug, "quantity": 5 },
                { "product_id": plate, "quantity": 1 },
                { "product_id": "P9999", "quantity": 1 }
            ] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["product_id"], mug.as_str());
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(body["total"], 15.0);
}

#[tokio::test]
async fn test_checkout_end_to_end() {
    let p = placed_order().await;
    let t = &p.t;
    assert_eq!(p.order_id, "ORD10001");

    let (_, product) = t
        .send(Method::GET, &format!("/api/products/{}", p.product_id), None, None)
        .await;
    assert_eq!(product["quantity"], 7);

    let (_, cart) = t.get("/api/cart", &p.customer).await;
    assert!(cart["items"].as_array().unwrap().is_empty());

    let (status, detail) = t.get(&format!("/api/order/{}", p.order_id), &p.customer).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["total_amount"], 150.0);
    assert_eq!(detail["status"], "pending");
    assert_eq!(detail["items"][0]["product_name"], "Teapot");
    assert_eq!(detail["items"][0]["subtotal"], 150.0);
    assert_eq!(detail["history"].as_array().unwrap().len(), 1);
    assert_eq!(detail["history"][0]["actor"], "system");

    let (_, history) = t.get("/api/orders/history", &p.customer).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["items_count"], 3);
    assert_eq!(history[0]["line_count"], 1);

    let (status, page) = t.get("/api/shopkeeper/orders?status=pending", &p.shopkeeper).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["order_id"], "ORD10001");
    assert_eq!(page["items"][0]["quantity"], 3);
}

#[tokio::test]
async fn test_other_customers_cannot_read_order() {
    let p = placed_order().await;
    let (_, other) = p.t.login_as(Role::Customer, "eve@example.com").await;
    let (status, body) = p.t.get(&format!("/api/order/{}", p.order_id), &other).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn test_checkout_failures_leave_cart() {
    let t = TestApp::new().await;
    let (_, shopkeeper) = t.login_as(Role::Shopkeeper, "shop@example.com").await;
    let (_, customer) = t.login_as(Role::Customer, "ada@example.com").await;

    let (status, body) = t
        .post("/api/order/checkout", &customer, json!({ "shipping_address": "1 Main St" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4002);

    let product_id = t.create_product(&shopkeeper, "Lamp", 20.0, 5).await;
    t.post("/api/cart", &customer, json!({ "product_id": product_id, "quantity": 5 }))
        .await;
    let (status, _) = t
        .put(
            &format!("/api/shopkeeper/products/{product_id}"),
            &shopkeeper,
            json!({ "quantity": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = t
        .post("/api/order/checkout", &customer, json!({ "shipping_address": "1 Main St" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4003);
    assert_eq!(body["details"]["available"], 2);
    assert_eq!(body["details"]["requested"], 5);

    let (status, body) = t
        .post("/api/order/checkout", &customer, json!({ "shipping_address": "   " }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (_, cart) = t.get("/api/cart", &customer).await;
    assert_eq!(cart["items"][0]["quantity"], 5);
    let (_, product) = t
        .send(Method::GET, &format!("/api/products/{product_id}"), None, None)
        .await;
    assert_eq!(product["quantity"], 2);
}

#[tokio::test]
async fn test_shopkeeper_status_updates() {
    let p = placed_order().await;
    let t = &p.t;
    let uri = format!("/api/shopkeeper/orders/{}/status", p.order_id);

    let (status, body) = t.put(&uri, &p.shopkeeper, json!({ "status": "delivered" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4004);

    let (_, stranger) = t.login_as(Role::Shopkeeper, "other@example.com").await;
    let (status, body) = t.put(&uri, &stranger, json!({ "status": "shipped" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);

    let (status, body) = t
        .put(&uri, &p.shopkeeper, json!({ "status": "shipped", "note": "Courier picked up" }))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["updated"], 1);
    assert_eq!(body["status"], "shipped");

    let (_, detail) = t.get(&format!("/api/order/{}", p.order_id), &p.customer).await;
    let history = detail["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1]["actor"], "shopkeeper");
    assert_eq!(history[1]["note"], "Courier picked up");
    // Order-level status is not derived from sub-orders
    assert_eq!(detail["status"], "pending");
}

#[tokio::test]
async fn test_malformed_bodies_get_error_envelope() {
    let p = placed_order().await;
    let t = &p.t;
    let uri = format!("/api/shopkeeper/orders/{}/status", p.order_id);

    let cases = [
        (Method::PUT, uri.as_str(), &p.shopkeeper, Some(json!({ "note": "no status" }))),
        (Method::PUT, uri.as_str(), &p.shopkeeper, Some(json!({ "status": 7 }))),
        (Method::POST, "/api/order/checkout", &p.customer, Some(json!({ "shipping_address": 12 }))),
        (Method::POST, "/api/order/checkout", &p.customer, None),
    ];
    for (method, uri, token, body) in cases {
        let (status, response) = t
            .send(method.clone(), uri, Some(token.as_str()), body.clone())
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri} {body:?}");
        assert_eq!(response["code"], 2, "{response}");
        assert!(response["message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    // Nothing moved
    let (_, detail) = t.get(&format!("/api/order/{}", p.order_id), &p.customer).await;
    assert_eq!(detail["history"].as_array().unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_request_timeout_answers_408() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        request_timeout_ms: 200,
        checkout_timeout_ms: 10_000,
        ..Config::default()
    };
    let t = TestApp::on_disk(&dir, config).await;
    let (_, shopkeeper) = t.login_as(Role::Shopkeeper, "shop@example.com").await;
    let (_, customer) = t.login_as(Role::Customer, "ada@example.com").await;
    let product_id = t.create_product(&shopkeeper, "Teapot", 50.0, 10).await;
    let (status, _) = t
        .post("/api/cart", &customer, json!({ "product_id": product_id, "quantity": 1 }))
        .await;
    assert_eq!(status, StatusCode::OK);

    // Hold the write lock past the request deadline
    let mut blocker = t.state.pool().begin().await.unwrap();
    sqlx::query("UPDATE id_sequences SET last_value = last_value WHERE kind = 'order'")
        .execute(&mut *blocker)
        .await
        .unwrap();

    let (status, _) = t
        .post("/api/order/checkout", &customer, json!({ "shipping_address": "1 Main St" }))
        .await;
    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);

    blocker.rollback().await.unwrap();
    let (_, cart) = t.get("/api/cart", &customer).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_product_in_orders_cannot_be_deleted() {
    let p = placed_order().await;
    let uri = format!("/api/shopkeeper/products/{}", p.product_id);

    let (_, stranger) = p.t.login_as(Role::Shopkeeper, "other@example.com").await;
    let (status, body) = p.t.send(Method::DELETE, &uri, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);

    let (status, body) = p.t.send(Method::DELETE, &uri, Some(&p.shopkeeper), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6004);
}

#[tokio::test]
async fn test_admin_order_controls() {
    let p = placed_order().await;
    let t = &p.t;
    let (_, admin) = t.login_as(Role::Admin, "admin@example.com").await;

    let (status, order) = t
        .put(
            &format!("/api/admin/orders/{}/status", p.order_id),
            &admin,
            json!({ "status": "delivered" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{order}");
    assert_eq!(order["status"], "delivered");

    let (_, page) = t.get("/api/shopkeeper/orders", &p.shopkeeper).await;
    assert_eq!(page["items"][0]["status"], "delivered");

    let (status, order) = t
        .put(
            &format!("/api/admin/orders/{}/payment", p.order_id),
            &admin,
            json!({ "status": "paid" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["payment_status"], "paid");

    let (status, body) = t
        .put(
            &format!("/api/admin/orders/{}/payment", p.order_id),
            &admin,
            json!({ "status": "refunded" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 5001);

    let (status, history) = t
        .get(&format!("/api/admin/orders/{}/history", p.order_id), &admin)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 2);
    assert_eq!(history[1]["actor"], "admin");

    let (status, _) = t.get("/api/admin/orders/ORD99999/history", &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, page) = t.get("/api/admin/orders?status=delivered&limit=5", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
    assert_eq!(page["limit"], 5);

    let (status, body) = t.get("/api/admin/orders?status=lost", &admin).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4004);
}

#[tokio::test]
async fn test_admin_shopkeeper_moderation() {
    let t = TestApp::new().await;
    let (admin_account, admin) = t.login_as(Role::Admin, "admin@example.com").await;
    let (customer, _) = t.login_as(Role::Customer, "ada@example.com").await;
    let pending = t
        .account(Role::Shopkeeper, AccountStatus::Pending, "new@example.com")
        .await;

    let (status, list) = t.get("/api/admin/shopkeepers?status=pending", &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"], pending.id.as_str());

    let (status, updated) = t
        .put(
            &format!("/api/admin/shopkeepers/{}/status", pending.id),
            &admin,
            json!({ "status": "active" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "active");

    let (status, body) = t
        .put(
            &format!("/api/admin/shopkeepers/{}/status", admin_account.id),
            &admin,
            json!({ "status": "blocked" }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2004);

    let (status, body) = t
        .put(
            &format!("/api/admin/shopkeepers/{}/status", customer.id),
            &admin,
            json!({ "status": "blocked" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 8001);

    let (status, _) = t
        .put(
            &format!("/api/admin/shopkeepers/{}/status", pending.id),
            &admin,
            json!({ "status": "banished" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_stats() {
    let p = placed_order().await;
    let t = &p.t;
    let (_, admin) = t.login_as(Role::Admin, "admin@example.com").await;
    t.account(Role::Shopkeeper, AccountStatus::Pending, "new@example.com")
        .await;

    let (status, stats) = t.get("/api/admin/stats", &admin).await;
    assert_eq!(status, StatusCode::OK, "{stats}");
    assert_eq!(stats["customers"], 1);
    assert_eq!(stats["shopkeepers"], 2);
    assert_eq!(stats["pending_shopkeepers"], 1);
    assert_eq!(stats["products"], 1);
    assert_eq!(stats["orders"], 1);
    assert_eq!(stats["revenue"], 150.0);
    assert_eq!(stats["orders_by_status"]["pending"], 1);
    assert_eq!(stats["orders_by_status"]["cancelled"], 0);

    t.put(
        &format!("/api/admin/orders/{}/status", p.order_id),
        &admin,
        json!({ "status": "cancelled" }),
    )
    .await;
    let (_, stats) = t.get("/api/admin/stats", &admin).await;
    assert_eq!(stats["revenue"], 0.0);
    assert_eq!(stats["orders_by_status"]["cancelled"], 1);
}
