use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    audit::{AuditAction, audit},
    bill::{Bill, BillLine, render_bill},
    dto::orders::{OrderList, OrderWithItems, PlaceOrderRequest, UpdateOrderStatusRequest},
    entity::{
        customers::Entity as Customers,
        menu_items::{Column as MenuCol, Entity as MenuItems, Model as MenuModel},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
    },
    error::{AppError, AppResult},
    fingerprint::ClientDevice,
    middleware::auth::{AuthUser, ensure_shop_admin},
    models::{Order, OrderItem, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::{
        availability_service::status_for_shop,
        customer_service,
        shop_service::{find_active_by_slug, find_shop},
    },
    state::AppState,
};

pub const MAX_LINE_QUANTITY: i32 = 999;
pub const MAX_ORDER_LINES: usize = 100;
const MAX_NOTES_LEN: usize = 500;

/// A requested line resolved against the shop's menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub menu_item_id: Uuid,
    pub name: String,
    pub unit_price: i64,
    pub quantity: i32,
}

impl PricedLine {
    /// `None` when the product does not fit in an i64.
    pub fn line_total(&self) -> Option<i64> {
        self.unit_price.checked_mul(i64::from(self.quantity))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub subtotal: i64,
    pub tax_amount: i64,
    pub total_amount: i64,
}

fn amount_too_large() -> AppError {
    AppError::bad_request("Order total is too large")
}

/// Subtotal, tax (`subtotal * bps / 10000`, truncated) and total.
/// Any overflow rejects the order instead of wrapping.
pub fn compute_totals(lines: &[PricedLine], tax_rate_bps: i32) -> AppResult<OrderTotals> {
    let subtotal = lines
        .iter()
        .try_fold(0_i64, |acc, line| line.line_total().and_then(|t| acc.checked_add(t)))
        .ok_or_else(amount_too_large)?;
    let tax_amount = subtotal
        .checked_mul(i64::from(tax_rate_bps))
        .map(|v| v / 10_000)
        .ok_or_else(amount_too_large)?;
    let total_amount = subtotal
        .checked_add(tax_amount)
        .ok_or_else(amount_too_large)?;
    Ok(OrderTotals {
        subtotal,
        tax_amount,
        total_amount,
    })
}

/// Shape checks that need no database.
pub fn validate_order_request(payload: &PlaceOrderRequest) -> AppResult<()> {
    if payload.items.is_empty() {
        return Err(AppError::bad_request("Order has no items"));
    }
    if payload.items.len() > MAX_ORDER_LINES {
        return Err(AppError::bad_request("Order has too many items"));
    }
    if payload
        .items
        .iter()
        .any(|line| line.quantity <= 0 || line.quantity > MAX_LINE_QUANTITY)
    {
        return Err(AppError::bad_request(format!(
            "quantity must be between 1 and {MAX_LINE_QUANTITY}"
        )));
    }
    if payload.customer.name.trim().is_empty() {
        return Err(AppError::bad_request("customer name is required"));
    }
    customer_service::normalize_phone(&payload.customer.phone)?;
    if payload
        .notes
        .as_ref()
        .is_some_and(|n| n.chars().count() > MAX_NOTES_LEN)
    {
        return Err(AppError::bad_request(format!(
            "notes must be at most {MAX_NOTES_LEN} characters"
        )));
    }
    Ok(())
}

/// Resolve each requested line against the menu; unknown or unavailable items are rejected.
pub fn price_lines(
    payload: &PlaceOrderRequest,
    menu: &HashMap<Uuid, MenuModel>,
) -> AppResult<Vec<PricedLine>> {
    payload
        .items
        .iter()
        .map(|line| {
            let item = menu.get(&line.menu_item_id).ok_or_else(|| {
                AppError::bad_request(format!("Menu item {} not found", line.menu_item_id))
            })?;
            if !item.is_available {
                return Err(AppError::bad_request(format!(
                    "{} is currently unavailable",
                    item.name
                )));
            }
            Ok(PricedLine {
                menu_item_id: item.id,
                name: item.name.clone(),
                unit_price: item.price,
                quantity: line.quantity,
            })
        })
        .collect()
}

pub fn build_order_number(order_id: Uuid, now: DateTime<Utc>) -> String {
    let date = now.format("%Y%m%d");
    let suffix = order_id.simple().to_string();
    let short = &suffix[..8];
    format!("ORD-{}-{}", date, short.to_uppercase())
}

pub async fn place_order(
    state: &AppState,
    slug: &str,
    device: &ClientDevice,
    payload: PlaceOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    validate_order_request(&payload)?;
    let shop = find_active_by_slug(&state.orm, slug).await?;
    let now = Utc::now();

    let status = status_for_shop(&state.orm, shop.id, now).await?;
    if !status.is_open {
        return Err(AppError::bad_request(format!(
            "Shop is not accepting orders: {}",
            status.message
        )));
    }

    let txn = state.orm.begin().await?;

    let ids: Vec<Uuid> = payload.items.iter().map(|l| l.menu_item_id).collect();
    let menu: HashMap<Uuid, MenuModel> = MenuItems::find()
        .filter(
            Condition::all()
                .add(MenuCol::ShopId.eq(shop.id))
                .add(MenuCol::Id.is_in(ids)),
        )
        .all(&txn)
        .await?
        .into_iter()
        .map(|item| (item.id, item))
        .collect();

    let lines = price_lines(&payload, &menu)?;
    let totals = compute_totals(&lines, shop.tax_rate_bps)?;

    let customer = customer_service::record_order(
        &txn,
        shop.id,
        &payload.customer,
        device,
        totals.total_amount,
        now,
    )
    .await?;

    let order_id = Uuid::new_v4();
    let order = OrderActive {
        id: Set(order_id),
        shop_id: Set(shop.id),
        customer_id: Set(customer.id),
        order_number: Set(build_order_number(order_id, now)),
        status: Set(OrderStatus::Pending.as_str().into()),
        payment_mode: Set(payload.payment_mode.as_str().into()),
        subtotal: Set(totals.subtotal),
        tax_rate_bps: Set(shop.tax_rate_bps),
        tax_amount: Set(totals.tax_amount),
        total_amount: Set(totals.total_amount),
        notes: Set(payload.notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(lines.len());
    for (line_no, line) in (1..).zip(&lines) {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            line_no: Set(line_no),
            menu_item_id: Set(Some(line.menu_item_id)),
            name: Set(line.name.clone()),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            line_total: Set(line.line_total().ok_or_else(amount_too_large)?),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(OrderItem::from(item));
    }

    txn.commit().await?;

    tracing::info!(
        shop_id = %shop.id,
        order_number = %order.order_number,
        total = order.total_amount,
        "order placed"
    );

    Ok(ApiResponse::ok(
        "Order placed",
        OrderWithItems {
            order: Order::from(order),
            items,
        },
    ))
}

/// Storefront order lookup by its public number.
pub async fn get_order_by_number(
    state: &AppState,
    slug: &str,
    order_number: &str,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let shop = find_active_by_slug(&state.orm, slug).await?;
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::ShopId.eq(shop.id))
                .add(OrderCol::OrderNumber.eq(order_number)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let data = with_items(state, order).await?;
    Ok(ApiResponse::ok("Order", data))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let shop_id = ensure_shop_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all().add(OrderCol::ShopId.eq(shop_id));
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items: orders },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let shop_id = ensure_shop_admin(user)?;
    let order = find_owned(state, shop_id, id).await?;
    let data = with_items(state, order).await?;
    Ok(ApiResponse::ok("Order found", data))
}

pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let shop_id = ensure_shop_admin(user)?;
    let txn = state.orm.begin().await?;

    let existing = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::Id.eq(id))
                .add(OrderCol::ShopId.eq(shop_id)),
        )
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let current: OrderStatus = existing.status.parse()?;
    if current.is_terminal() && current != payload.status {
        return Err(AppError::bad_request(format!(
            "Order is already {current}"
        )));
    }

    let mut active: OrderActive = existing.into();
    active.status = Set(payload.status.as_str().into());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&txn).await?;
    txn.commit().await?;

    audit(
        &state.pool,
        user.user_id,
        AuditAction::OrderStatusUpdate,
        "orders",
        serde_json::json!({ "order_id": order.id, "from": current.as_str(), "to": order.status }),
    )
    .await;

    Ok(ApiResponse::ok("Order updated", Order::from(order)))
}

/// Render the printable bill for one of the admin's orders.
pub async fn order_bill(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<(String, String)> {
    let shop_id = ensure_shop_admin(user)?;
    let order = find_owned(state, shop_id, id).await?;
    let shop = find_shop(&state.orm, shop_id).await?;
    let customer = Customers::find_by_id(order.customer_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order {} has no customer", order.id)))?;

    let lines = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::LineNo)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|item| BillLine {
            name: item.name,
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_total: item.line_total,
        })
        .collect();

    let bill = Bill {
        shop_name: shop.name,
        shop_address: shop.address,
        shop_phone: shop.phone,
        currency_symbol: shop.currency_symbol,
        order_number: order.order_number.clone(),
        placed_at: order.created_at.with_timezone(&Utc),
        customer_name: customer.name,
        customer_phone: customer.phone,
        payment_mode: order.payment_mode,
        lines,
        subtotal: order.subtotal,
        tax_rate_bps: order.tax_rate_bps,
        tax_amount: order.tax_amount,
        total_amount: order.total_amount,
        notes: order.notes,
    };

    Ok((order.order_number, render_bill(&bill)?))
}

async fn find_owned(state: &AppState, shop_id: Uuid, id: Uuid) -> AppResult<OrderModel> {
    Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::Id.eq(id))
                .add(OrderCol::ShopId.eq(shop_id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn with_items(state: &AppState, order: OrderModel) -> AppResult<OrderWithItems> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::LineNo)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();
    Ok(OrderWithItems {
        order: Order::from(order),
        items,
    })
}
