/// Integration tests against a live PostgreSQL database
///
/// These verify the full system end-to-end: login exchange, the session gate
/// in front of real handlers, and the aggregation projections. They run only
/// when `DATABASE_URL` points at a reachable database (pgcrypto must be
/// installable); otherwise each test skips itself.
mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestContext;
use oficina_shared::models::customer::{CreateCustomer, Customer};
use oficina_shared::models::order::{CreateOrder, CreateOrderItem, Order, OrderItem};
use oficina_shared::models::pending_service::{CreatePendingService, PendingService};
use oficina_shared::models::user::{CreateUser, User};
use oficina_shared::reports::{OrderSummary, PendingServiceSummary};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

async fn json_body(resp: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_login_roundtrip() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "email": ctx.user.email,
                "password": ctx.password,
            })
            .to_string(),
        ))
        .unwrap();

    let resp = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    assert_eq!(body["user_name"], "Test User");
    assert_eq!(body["user_email"], ctx.user.email);
    let token = body["token"].as_str().unwrap().to_string();

    // The issued token opens the gate
    let resp = ctx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/reports/orders")
                .header("authorization", format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Login stamped last_login_at
    let user = User::find_by_id(&ctx.db, ctx.user.id).await.unwrap().unwrap();
    assert!(user.last_login_at.is_some());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let request = Request::builder()
        .method("POST")
        .uri("/v1/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "email": ctx.user.email,
                "password": "wrong-password",
            })
            .to_string(),
        ))
        .unwrap();

    let resp = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body = json_body(resp).await;
    assert!(body.get("token").is_none());

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_order_totals_sum_line_items() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let order = Order::create(
        &ctx.db,
        CreateOrder {
            customer: "ACME Ltda".to_string(),
            description: "brake service".to_string(),
            payment: "card".to_string(),
            user_id: ctx.user.id,
        },
    )
    .await
    .unwrap();

    for price in [10, 20, 30] {
        OrderItem::create(
            &ctx.db,
            CreateOrderItem {
                name: format!("part-{price}"),
                price,
                order_id: order.id,
            },
        )
        .await
        .unwrap();
    }

    let fetched = Order::find_by_id(&ctx.db, order.id).await.unwrap();
    assert_eq!(fetched.map(|o| o.id), Some(order.id));

    let items = OrderItem::list_for_order(&ctx.db, order.id).await.unwrap();
    assert_eq!(items.len(), 3);

    let rows = OrderSummary::list(&ctx.db).await.unwrap();
    let row = rows.iter().find(|r| r.id == order.id).expect("order listed");
    assert_eq!(row.total, 60);
    assert_eq!(row.customer, "ACME Ltda");
    assert_eq!(row.description, "brake service");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_order_without_items_appears_with_zero_total() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let order = Order::create(
        &ctx.db,
        CreateOrder {
            customer: "Empty Ltda".to_string(),
            description: "inspection only".to_string(),
            payment: "cash".to_string(),
            user_id: ctx.user.id,
        },
    )
    .await
    .unwrap();

    let rows = OrderSummary::list(&ctx.db).await.unwrap();
    let row = rows.iter().find(|r| r.id == order.id).expect("order listed");
    assert_eq!(row.total, 0);

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_soft_deleted_rows_leave_the_projection() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let order = Order::create(
        &ctx.db,
        CreateOrder {
            customer: "Tombstone Ltda".to_string(),
            description: "to be deleted".to_string(),
            payment: "cash".to_string(),
            user_id: ctx.user.id,
        },
    )
    .await
    .unwrap();
    let item = OrderItem::create(
        &ctx.db,
        CreateOrderItem {
            name: "part".to_string(),
            price: 99,
            order_id: order.id,
        },
    )
    .await
    .unwrap();

    // Deleting the item drops it from the sum but keeps the order
    OrderItem::soft_delete(&ctx.db, item.id).await.unwrap();
    let items = OrderItem::list_for_order(&ctx.db, order.id).await.unwrap();
    assert!(items.is_empty());
    let rows = OrderSummary::list(&ctx.db).await.unwrap();
    let row = rows.iter().find(|r| r.id == order.id).expect("order listed");
    assert_eq!(row.total, 0);

    // Deleting the order drops the row entirely
    Order::soft_delete(&ctx.db, order.id).await.unwrap();
    assert!(Order::find_by_id(&ctx.db, order.id).await.unwrap().is_none());
    let rows = OrderSummary::list(&ctx.db).await.unwrap();
    assert!(rows.iter().all(|r| r.id != order.id));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_customer_lifecycle() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let customer = Customer::create(
        &ctx.db,
        CreateCustomer {
            name: "Oficina do Zé".to_string(),
            cnpj: "12.345.678/0001-90".to_string(),
        },
    )
    .await
    .unwrap();

    let listed = Customer::list(&ctx.db).await.unwrap();
    let row = listed.iter().find(|c| c.id == customer.id).expect("listed");
    assert_eq!(row.cnpj, "12.345.678/0001-90");

    // Soft deletion removes it from the listing; a second delete is a no-op
    assert!(Customer::soft_delete(&ctx.db, customer.id).await.unwrap());
    assert!(!Customer::soft_delete(&ctx.db, customer.id).await.unwrap());
    let listed = Customer::list(&ctx.db).await.unwrap();
    assert!(listed.iter().all(|c| c.id != customer.id));

    sqlx::query("DELETE FROM customers WHERE id = $1")
        .bind(customer.id)
        .execute(&ctx.db)
        .await
        .unwrap();
    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_pending_services_report_requester_name() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let service = PendingService::create(
        &ctx.db,
        CreatePendingService {
            user_id: ctx.user.id,
            description: "replace timing belt".to_string(),
        },
    )
    .await
    .unwrap();

    let rows = PendingServiceSummary::list(&ctx.db).await.unwrap();
    let row = rows.iter().find(|r| r.id == service.id).expect("listed");
    assert_eq!(row.user_name.as_deref(), Some("Test User"));
    assert_eq!(row.description, "replace timing belt");

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_soft_deleted_pending_service_leaves_projection() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let service = PendingService::create(
        &ctx.db,
        CreatePendingService {
            user_id: ctx.user.id,
            description: "withdrawn request".to_string(),
        },
    )
    .await
    .unwrap();

    assert!(PendingService::soft_delete(&ctx.db, service.id).await.unwrap());

    let rows = PendingServiceSummary::list(&ctx.db).await.unwrap();
    assert!(rows.iter().all(|r| r.id != service.id));

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_orphaned_pending_service_keeps_row_with_null_name() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    // Requester that gets soft-deleted after raising the service
    let ghost = User::create(
        &ctx.db,
        CreateUser {
            name: "Ghost".to_string(),
            email: format!("ghost-{}@example.com", Uuid::new_v4()),
            password: "whatever".to_string(),
            user_type: 0,
        },
    )
    .await
    .unwrap();

    let orphaned = PendingService::create(
        &ctx.db,
        CreatePendingService {
            user_id: ghost.id,
            description: "owner vanished".to_string(),
        },
    )
    .await
    .unwrap();

    // A service pointing at a user id that never existed at all
    let dangling = PendingService::create(
        &ctx.db,
        CreatePendingService {
            user_id: Uuid::new_v4(),
            description: "no such owner".to_string(),
        },
    )
    .await
    .unwrap();

    User::soft_delete(&ctx.db, ghost.id).await.unwrap();

    let rows = PendingServiceSummary::list(&ctx.db).await.unwrap();

    let row = rows.iter().find(|r| r.id == orphaned.id).expect("row kept");
    assert_eq!(row.user_name, None);

    let row = rows.iter().find(|r| r.id == dangling.id).expect("row kept");
    assert_eq!(row.user_name, None);

    // Hard-delete local fixtures
    for id in [orphaned.id, dangling.id] {
        sqlx::query("DELETE FROM pending_services WHERE id = $1")
            .bind(id)
            .execute(&ctx.db)
            .await
            .unwrap();
    }
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(ghost.id)
        .execute(&ctx.db)
        .await
        .unwrap();

    ctx.cleanup().await.unwrap();
}

#[tokio::test]
async fn test_reports_over_http_with_session() {
    let Some(ctx) = TestContext::try_new().await.unwrap() else {
        return;
    };

    let order = Order::create(
        &ctx.db,
        CreateOrder {
            customer: "HTTP Ltda".to_string(),
            description: "via router".to_string(),
            payment: "pix".to_string(),
            user_id: ctx.user.id,
        },
    )
    .await
    .unwrap();
    OrderItem::create(
        &ctx.db,
        CreateOrderItem {
            name: "labor".to_string(),
            price: 150,
            order_id: order.id,
        },
    )
    .await
    .unwrap();

    let resp = ctx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/reports/orders")
                .header("authorization", ctx.auth_header())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = json_body(resp).await;
    let row = body
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["id"] == order.id.to_string())
        .expect("order in response");
    assert_eq!(row["total"], 150);

    ctx.cleanup().await.unwrap();
}
