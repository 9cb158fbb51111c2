use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{
    Alias, Expr, Func, NullOrdering, OnConflict, Order as SortDirection,
    extension::postgres::PgExpr,
};
use uuid::Uuid;

use crate::{
    dto::{
        customers::{CustomerDetail, CustomerList},
        orders::CustomerDetails,
    },
    entity::{
        customers::{
            ActiveModel as CustomerActive, Column as CustomerCol, Entity as Customers,
            Model as CustomerModel,
        },
        orders::{Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    fingerprint::ClientDevice,
    middleware::auth::{AuthUser, ensure_shop_admin},
    models::{Customer, Order},
    response::{ApiResponse, Meta},
    routes::params::CustomerQuery,
    state::AppState,
};

const RECENT_ORDER_LIMIT: u64 = 10;

/// Keep digits and a leading `+`; 6 to 15 digits.
pub fn normalize_phone(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if !(6..=15).contains(&digits.len()) {
        return Err(AppError::bad_request("phone must contain 6 to 15 digits"));
    }
    if trimmed.starts_with('+') {
        Ok(format!("+{digits}"))
    } else {
        Ok(digits)
    }
}

/// Upsert the ordering customer by (shop, phone) and bump their order aggregates
/// in one statement.
pub async fn record_order<C: ConnectionTrait>(
    db: &C,
    shop_id: Uuid,
    details: &CustomerDetails,
    device: &ClientDevice,
    order_total: i64,
    now: DateTime<Utc>,
) -> AppResult<CustomerModel> {
    let name = details.name.trim().to_string();
    let phone = normalize_phone(&details.phone)?;
    let email = details
        .email
        .as_ref()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty());

    let customer = CustomerActive {
        id: Set(Uuid::new_v4()),
        shop_id: Set(shop_id),
        name: Set(name),
        phone: Set(phone),
        email: Set(email),
        visit_count: Set(0),
        order_count: Set(1),
        total_spent: Set(order_total),
        last_order_at: Set(Some(now.into())),
        device_type: Set(Some(device.info.device_type.as_str().into())),
        browser: Set(Some(device.info.browser.clone())),
        os: Set(Some(device.info.os.clone())),
        device_fingerprint: Set(Some(device.fingerprint.clone())),
        created_at: NotSet,
        updated_at: Set(now.into()),
    };

    // A returning phone keeps its row; counters grow in place so concurrent
    // first orders from the same phone cannot collide.
    let on_conflict = OnConflict::columns([CustomerCol::ShopId, CustomerCol::Phone])
        .update_columns([
            CustomerCol::Name,
            CustomerCol::LastOrderAt,
            CustomerCol::DeviceType,
            CustomerCol::Browser,
            CustomerCol::Os,
            CustomerCol::DeviceFingerprint,
            CustomerCol::UpdatedAt,
        ])
        .value(
            CustomerCol::Email,
            Func::coalesce([
                Expr::col((Alias::new("excluded"), CustomerCol::Email)).into(),
                Expr::col((Customers, CustomerCol::Email)).into(),
            ]),
        )
        .value(
            CustomerCol::OrderCount,
            Expr::col((Customers, CustomerCol::OrderCount)).add(1),
        )
        .value(
            CustomerCol::TotalSpent,
            Expr::col((Customers, CustomerCol::TotalSpent)).add(order_total),
        )
        .to_owned();

    let customer = Customers::insert(customer)
        .on_conflict(on_conflict)
        .exec_with_returning(db)
        .await?;

    Ok(customer)
}

/// Count a storefront visit against customers previously seen on this device.
pub async fn record_visit<C: ConnectionTrait>(
    db: &C,
    shop_id: Uuid,
    fingerprint: &str,
) -> AppResult<u64> {
    let result = Customers::update_many()
        .col_expr(CustomerCol::VisitCount, Expr::col(CustomerCol::VisitCount).add(1))
        .filter(
            Condition::all()
                .add(CustomerCol::ShopId.eq(shop_id))
                .add(CustomerCol::DeviceFingerprint.eq(fingerprint)),
        )
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn list_customers(
    state: &AppState,
    user: &AuthUser,
    query: CustomerQuery,
) -> AppResult<ApiResponse<CustomerList>> {
    let shop_id = ensure_shop_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all().add(CustomerCol::ShopId.eq(shop_id));
    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", q.replace('%', "\\%").replace('_', "\\_"));
        condition = condition.add(
            Condition::any()
                .add(Expr::col(CustomerCol::Name).ilike(pattern.as_str()))
                .add(Expr::col(CustomerCol::Phone).ilike(pattern.as_str())),
        );
    }

    let finder = Customers::find()
        .filter(condition)
        .order_by_with_nulls(CustomerCol::LastOrderAt, SortDirection::Desc, NullOrdering::Last)
        .order_by_asc(CustomerCol::Name);

    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Customer::from)
        .collect();

    Ok(ApiResponse::success(
        "Customers",
        CustomerList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_customer(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<CustomerDetail>> {
    let shop_id = ensure_shop_admin(user)?;
    let customer = Customers::find()
        .filter(
            Condition::all()
                .add(CustomerCol::Id.eq(id))
                .add(CustomerCol::ShopId.eq(shop_id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let recent_orders = Orders::find()
        .filter(OrderCol::CustomerId.eq(customer.id))
        .order_by_desc(OrderCol::CreatedAt)
        .limit(RECENT_ORDER_LIMIT)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    Ok(ApiResponse::ok(
        "Customer",
        CustomerDetail {
            customer: Customer::from(customer),
            recent_orders,
        },
    ))
}
