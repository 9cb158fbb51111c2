mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    response::Response,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use shop_ordering_api::{
    availability::{ManualOverride, StoreStatus},
    dto::{orders::UpdateOrderStatusRequest, shops::ShopSettingsRequest},
    entity::users::ActiveModel as UserActive,
    error::AppError,
    middleware::session::create_session_layer,
    models::{OrderStatus, Role},
    routes::{create_api_router, params::CustomerQuery},
    services::{
        auth_service::issue_token, availability_service, customer_service, order_service,
        shop_service,
    },
    state::AppState,
};
use tower::ServiceExt;
use uuid::Uuid;

use common::{
    ADMIN_PASSWORD, add_menu_item, create_super_admin, database_url, mobile_device, order_for,
    provision, provision_request, set_override, setup_state,
};

// Integration flow: super admin provisions a shop -> shop admin opens it and
// adds menu items -> customer orders -> admin completes the order and prints the bill.
#[tokio::test]
async fn provision_order_and_bill_flow() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&database_url).await?;
    let owner = create_super_admin(&state).await?;
    let (provisioned, shop_admin) = provision(&state, &owner, "flow", 500, None).await?;
    let slug = provisioned.shop.slug.clone();
    assert_eq!(provisioned.admin.email, format!("{slug}@example.com"));
    assert_eq!(provisioned.availability.opening_time, "09:00");

    // Provisioning the same slug twice is rejected.
    let duplicate =
        shop_service::provision_shop(&state, &owner, provision_request(&slug, 0, None)).await;
    assert!(matches!(duplicate, Err(AppError::BadRequest(_))));

    set_override(&state, &shop_admin, ManualOverride::ForceOpen).await?;
    let status = availability_service::public_status(&state, &slug)
        .await?
        .data
        .expect("status");
    assert_eq!(status.status, StoreStatus::ForceOpen);

    let brew = add_menu_item(&state, &shop_admin, "Cold Brew", 1000).await?;
    let scone = add_menu_item(&state, &shop_admin, "Scone", 250).await?;

    let device = mobile_device();
    // Lines are listed back in the order the customer submitted them.
    let placed = order_service::place_order(
        &state,
        &slug,
        &device,
        order_for("+1 555 010 0199", &[(scone.id, 4), (brew.id, 1)]),
    )
    .await?
    .data
    .expect("placed order");
    assert_eq!(placed.order.subtotal, 2000);
    assert_eq!(placed.order.tax_rate_bps, 500);
    assert_eq!(placed.order.tax_amount, 100);
    assert_eq!(placed.order.total_amount, 2100);
    assert_eq!(placed.order.status, "pending");
    let names: Vec<&str> = placed.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Scone", "Cold Brew"]);
    assert_eq!(placed.items[0].line_no, 1);
    assert_eq!(placed.items[1].line_no, 2);

    let looked_up = order_service::get_order_by_number(&state, &slug, &placed.order.order_number)
        .await?
        .data
        .expect("order by number");
    assert_eq!(looked_up.order.id, placed.order.id);
    let names: Vec<&str> = looked_up.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Scone", "Cold Brew"]);

    let completed = order_service::update_order_status(
        &state,
        &shop_admin,
        placed.order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Completed,
        },
    )
    .await?
    .data
    .expect("updated order");
    assert_eq!(completed.status, "completed");

    let reopened = order_service::update_order_status(
        &state,
        &shop_admin,
        placed.order.id,
        UpdateOrderStatusRequest {
            status: OrderStatus::Pending,
        },
    )
    .await;
    assert!(matches!(reopened, Err(AppError::BadRequest(_))));

    // A later tax change does not rewrite the bill of an existing order.
    shop_service::update_settings(
        &state,
        &shop_admin,
        ShopSettingsRequest {
            name: None,
            phone: None,
            address: None,
            currency_symbol: None,
            tax_rate_bps: Some(1800),
        },
    )
    .await?;

    let (order_number, html) =
        order_service::order_bill(&state, &shop_admin, placed.order.id).await?;
    assert_eq!(order_number, placed.order.order_number);
    assert!(html.contains(&order_number));
    assert!(html.contains("Tax (5%)"));
    assert!(!html.contains("Tax (18%)"));
    assert!(html.contains("$21.00"));
    let scone_at = html.find("Scone").expect("scone line");
    let brew_at = html.find("Cold Brew").expect("brew line");
    assert!(scone_at < brew_at);

    let customers = customer_service::list_customers(
        &state,
        &shop_admin,
        CustomerQuery {
            page: Some(1),
            per_page: Some(20),
            q: Some("flow".into()),
        },
    )
    .await?
    .data
    .expect("customers");
    assert_eq!(customers.items.len(), 1);
    assert_eq!(customers.items[0].order_count, 1);
    assert_eq!(customers.items[0].total_spent, 2100);
    assert_eq!(customers.items[0].device_type.as_deref(), Some("mobile"));

    // A force-closed shop refuses new orders.
    set_override(&state, &shop_admin, ManualOverride::ForceClose).await?;
    let refused = order_service::place_order(
        &state,
        &slug,
        &device,
        order_for("+1 555 010 0199", &[(brew.id, 1)]),
    )
    .await;
    assert!(matches!(refused, Err(AppError::BadRequest(_))));

    Ok(())
}

#[tokio::test]
async fn concurrent_first_orders_share_one_customer() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&database_url).await?;
    let owner = create_super_admin(&state).await?;
    let (provisioned, shop_admin) = provision(&state, &owner, "race", 0, None).await?;
    let slug = provisioned.shop.slug.clone();
    set_override(&state, &shop_admin, ManualOverride::ForceOpen).await?;
    let tea = add_menu_item(&state, &shop_admin, "Tea", 300).await?;

    let device = mobile_device();
    let first = order_for("555-777-0001", &[(tea.id, 1)]);
    let second = order_for("555 777 0001", &[(tea.id, 2)]);
    let (a, b) = tokio::join!(
        order_service::place_order(&state, &slug, &device, first),
        order_service::place_order(&state, &slug, &device, second),
    );
    let a = a?.data.expect("first order");
    let b = b?.data.expect("second order");
    assert_eq!(a.order.customer_id, b.order.customer_id);

    let customer = customer_service::get_customer(&state, &shop_admin, a.order.customer_id)
        .await?
        .data
        .expect("customer");
    assert_eq!(customer.customer.phone, "5557770001");
    assert_eq!(customer.customer.order_count, 2);
    assert_eq!(customer.customer.total_spent, 900);
    Ok(())
}

#[tokio::test]
async fn unique_violations_surface_as_bad_requests() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&database_url).await?;
    let owner = create_super_admin(&state).await?;
    let (provisioned, _) = provision(&state, &owner, "dupe", 0, None).await?;

    // Bypass the service pre-checks, as a concurrent request would.
    let err = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(provisioned.admin.email.clone()),
        password_hash: Set("dummy".into()),
        role: Set(Role::ShopAdmin.as_str().into()),
        shop_id: Set(Some(provisioned.shop.id)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .expect_err("email is unique");
    assert!(matches!(AppError::from(err), AppError::BadRequest(_)));

    let raw = sqlx::query("INSERT INTO shops (name, slug) VALUES ($1, $2)")
        .bind("Copy")
        .bind(&provisioned.shop.slug)
        .execute(&state.pool)
        .await
        .expect_err("slug is unique");
    assert!(matches!(AppError::from(raw), AppError::BadRequest(_)));
    Ok(())
}

fn api(state: &AppState) -> Router {
    Router::new()
        .nest("/api", create_api_router())
        .layer(create_session_layer(&state.pool, &state.config))
        .with_state(state.clone())
}

fn disposition(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn bill_route_sets_content_type_and_disposition() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&database_url).await?;
    let owner = create_super_admin(&state).await?;
    let (provisioned, shop_admin) = provision(&state, &owner, "bill", 0, None).await?;
    let (other, _) = provision(&state, &owner, "other", 0, None).await?;
    set_override(&state, &shop_admin, ManualOverride::ForceOpen).await?;
    let tea = add_menu_item(&state, &shop_admin, "Tea", 300).await?;
    let placed = order_service::place_order(
        &state,
        &provisioned.shop.slug,
        &mobile_device(),
        order_for("555-777-0002", &[(tea.id, 1)]),
    )
    .await?
    .data
    .expect("placed order");

    let token = issue_token(&provisioned.admin, &state.config.jwt_secret, 1)?;
    let get = |uri: String, token: &str| {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
    };
    let bill_uri = format!("/api/admin/orders/{}/bill", placed.order.id);

    let download = api(&state)
        .oneshot(get(format!("{bill_uri}?download=true"), &token)?)
        .await?;
    assert_eq!(download.status(), StatusCode::OK);
    let content_type = download
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("text/html"));
    let expected = format!("attachment; filename=\"bill-{}.html\"", placed.order.order_number);
    assert_eq!(disposition(&download), Some(expected.as_str()));
    let body = to_bytes(download.into_body(), usize::MAX).await?;
    assert!(std::str::from_utf8(&body)?.contains(&placed.order.order_number));

    let inline = api(&state).oneshot(get(bill_uri.clone(), &token)?).await?;
    assert_eq!(inline.status(), StatusCode::OK);
    assert_eq!(disposition(&inline), Some("inline"));

    // Another shop's admin cannot see the bill.
    let outsider = issue_token(&other.admin, &state.config.jwt_secret, 1)?;
    let hidden = api(&state).oneshot(get(bill_uri, &outsider)?).await?;
    assert_eq!(hidden.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn login_session_survives_requests_until_logout() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&database_url).await?;
    let owner = create_super_admin(&state).await?;
    let (provisioned, _) = provision(&state, &owner, "login", 0, None).await?;

    let login = |password: &str| {
        Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "email": provisioned.admin.email, "password": password })
                    .to_string(),
            ))
    };
    let me = |cookie: &str| {
        Request::builder()
            .uri("/api/auth/me")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
    };

    let rejected = api(&state).oneshot(login("wrong-password")?).await?;
    assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);

    let accepted = api(&state).oneshot(login(ADMIN_PASSWORD)?).await?;
    assert_eq!(accepted.status(), StatusCode::OK);
    let cookie = accepted
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("session cookie")
        .to_string();
    let body: serde_json::Value =
        serde_json::from_slice(&to_bytes(accepted.into_body(), usize::MAX).await?)?;
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));

    let current = api(&state).oneshot(me(&cookie)?).await?;
    assert_eq!(current.status(), StatusCode::OK);
    let body: serde_json::Value =
        serde_json::from_slice(&to_bytes(current.into_body(), usize::MAX).await?)?;
    assert_eq!(body["data"]["id"], provisioned.admin.id.to_string());

    let logout = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())?;
    assert_eq!(api(&state).oneshot(logout).await?.status(), StatusCode::OK);

    let revoked = api(&state).oneshot(me(&cookie)?).await?;
    assert_eq!(revoked.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
