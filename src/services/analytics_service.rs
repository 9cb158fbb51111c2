use chrono::{Duration, NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, Set};
use sea_orm::ActiveValue::NotSet;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    dto::analytics::{CountBucket, DailyVisits, RecordVisitRequest, VisitRecorded, VisitStats},
    entity::page_visits::ActiveModel as VisitActive,
    error::{AppError, AppResult},
    fingerprint::{ClientDevice, DeviceType},
    middleware::auth::{AuthUser, ensure_super_admin},
    response::{ApiResponse, Meta},
    routes::params::VisitStatsQuery,
    services::{customer_service, shop_service::find_active_by_slug},
    state::AppState,
};

const MAX_PAGE_LEN: usize = 512;
const TOP_PAGES: i64 = 10;

#[derive(FromRow)]
struct TotalsRow {
    total_visits: i64,
    unique_visitors: i64,
}

#[derive(FromRow)]
struct BucketRow {
    key: String,
    count: i64,
}

#[derive(FromRow)]
struct DailyRow {
    day: NaiveDate,
    visits: i64,
    unique_visitors: i64,
}

fn clean_page(page: &str) -> AppResult<String> {
    let page = page.trim();
    if page.is_empty() || page.len() > MAX_PAGE_LEN {
        return Err(AppError::bad_request(format!(
            "page must be 1 to {MAX_PAGE_LEN} characters"
        )));
    }
    Ok(page.to_string())
}

/// Record a storefront page view. Bots are acknowledged but not stored.
pub async fn record_visit(
    state: &AppState,
    slug: &str,
    device: &ClientDevice,
    payload: RecordVisitRequest,
) -> AppResult<ApiResponse<VisitRecorded>> {
    let page = clean_page(&payload.page)?;
    let shop = find_active_by_slug(&state.orm, slug).await?;

    let device_type = device.info.device_type;
    if device_type == DeviceType::Bot {
        return Ok(ApiResponse::ok(
            "Visit ignored",
            VisitRecorded {
                recorded: false,
                device_type: device_type.as_str().into(),
            },
        ));
    }

    VisitActive {
        id: Set(Uuid::new_v4()),
        shop_id: Set(Some(shop.id)),
        page: Set(page),
        device_type: Set(device_type.as_str().into()),
        browser: Set(device.info.browser.clone()),
        os: Set(device.info.os.clone()),
        fingerprint: Set(device.fingerprint.clone()),
        ip_hash: Set(device.ip_hash.clone()),
        referrer: Set(payload
            .referrer
            .map(|r| r.trim().chars().take(MAX_PAGE_LEN).collect::<String>())
            .filter(|r| !r.is_empty())),
        visited_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    customer_service::record_visit(&state.orm, shop.id, &device.fingerprint).await?;

    Ok(ApiResponse::ok(
        "Visit recorded",
        VisitRecorded {
            recorded: true,
            device_type: device_type.as_str().into(),
        },
    ))
}

/// Visitor analytics over the last `days` days, platform-wide or for one shop.
pub async fn visit_stats(
    state: &AppState,
    user: &AuthUser,
    query: VisitStatsQuery,
) -> AppResult<ApiResponse<VisitStats>> {
    ensure_super_admin(user)?;
    let days = query.window_days();
    let since = Utc::now() - Duration::days(days);
    let shop_id = query.shop_id;

    let totals = sqlx::query_as::<_, TotalsRow>(
        r#"
        SELECT COUNT(*) AS total_visits, COUNT(DISTINCT ip_hash) AS unique_visitors
        FROM page_visits
        WHERE visited_at >= $1 AND ($2::uuid IS NULL OR shop_id = $2)
        "#,
    )
    .bind(since)
    .bind(shop_id)
    .fetch_one(&state.pool)
    .await?;

    let by_device = sqlx::query_as::<_, BucketRow>(
        r#"
        SELECT device_type AS key, COUNT(*) AS count
        FROM page_visits
        WHERE visited_at >= $1 AND ($2::uuid IS NULL OR shop_id = $2)
        GROUP BY device_type
        ORDER BY count DESC, key ASC
        "#,
    )
    .bind(since)
    .bind(shop_id)
    .fetch_all(&state.pool)
    .await?;

    let top_pages = sqlx::query_as::<_, BucketRow>(
        r#"
        SELECT page AS key, COUNT(*) AS count
        FROM page_visits
        WHERE visited_at >= $1 AND ($2::uuid IS NULL OR shop_id = $2)
        GROUP BY page
        ORDER BY count DESC, key ASC
        LIMIT $3
        "#,
    )
    .bind(since)
    .bind(shop_id)
    .bind(TOP_PAGES)
    .fetch_all(&state.pool)
    .await?;

    let daily = sqlx::query_as::<_, DailyRow>(
        r#"
        SELECT (visited_at AT TIME ZONE 'UTC')::date AS day,
               COUNT(*) AS visits,
               COUNT(DISTINCT ip_hash) AS unique_visitors
        FROM page_visits
        WHERE visited_at >= $1 AND ($2::uuid IS NULL OR shop_id = $2)
        GROUP BY day
        ORDER BY day ASC
        "#,
    )
    .bind(since)
    .bind(shop_id)
    .fetch_all(&state.pool)
    .await?;

    let to_buckets = |rows: Vec<BucketRow>| {
        rows.into_iter()
            .map(|row| CountBucket {
                key: row.key,
                count: row.count,
            })
            .collect::<Vec<_>>()
    };

    let stats = VisitStats {
        days,
        total_visits: totals.total_visits,
        unique_visitors: totals.unique_visitors,
        by_device: to_buckets(by_device),
        top_pages: to_buckets(top_pages),
        daily: daily
            .into_iter()
            .map(|row| DailyVisits {
                date: row.day,
                visits: row.visits,
                unique_visitors: row.unique_visitors,
            })
            .collect(),
    };

    Ok(ApiResponse::success(
        "Visit analytics",
        stats,
        Some(Meta::empty()),
    ))
}
