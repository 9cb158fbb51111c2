use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::{AuditAction, audit},
    availability::{
        self, AvailabilityStatus, Holiday as CalendarHoliday, ManualOverride, StoreHours,
        local_now, validate_time, validate_timezone,
    },
    dto::availability::{CreateHolidayRequest, HolidayList, UpdateAvailabilityRequest},
    entity::{
        store_availability::{
            ActiveModel as AvailabilityActive, Entity as StoreAvailability,
            Model as AvailabilityModel,
        },
        store_holidays::{ActiveModel as HolidayActive, Column as HolidayCol, Entity as StoreHolidays},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_shop_admin},
    models::{AvailabilitySettings, Holiday},
    response::{ApiResponse, Meta},
    services::shop_service::find_active_by_slug,
    state::AppState,
};

const MAX_REASON_LEN: usize = 200;

/// Hours used for shops that never saved a schedule.
pub fn default_hours() -> StoreHours {
    StoreHours {
        opening_time: "09:00".into(),
        closing_time: "22:00".into(),
        timezone: "UTC".into(),
        manual_override: ManualOverride::None,
        override_reason: None,
    }
}

fn hours_from_model(model: AvailabilityModel) -> StoreHours {
    let settings = AvailabilitySettings::from(model);
    StoreHours {
        opening_time: settings.opening_time,
        closing_time: settings.closing_time,
        timezone: settings.timezone,
        manual_override: settings.manual_override,
        override_reason: settings.override_reason,
    }
}

fn clean_reason(reason: Option<String>) -> AppResult<Option<String>> {
    let reason = reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());
    if reason.as_ref().is_some_and(|r| r.chars().count() > MAX_REASON_LEN) {
        return Err(AppError::bad_request(format!(
            "reason must be at most {MAX_REASON_LEN} characters"
        )));
    }
    Ok(reason)
}

/// Resolve a shop's status at `now`, reading its schedule and today's holidays.
pub async fn status_for_shop<C: ConnectionTrait>(
    db: &C,
    shop_id: Uuid,
    now: DateTime<Utc>,
) -> AppResult<AvailabilityStatus> {
    let hours = StoreAvailability::find_by_id(shop_id)
        .one(db)
        .await?
        .map(hours_from_model)
        .unwrap_or_else(default_hours);

    let local = local_now(&hours.timezone, now);
    let holidays: Vec<CalendarHoliday> = StoreHolidays::find()
        .filter(
            Condition::all()
                .add(HolidayCol::ShopId.eq(shop_id))
                .add(HolidayCol::HolidayDate.eq(local.date())),
        )
        .all(db)
        .await?
        .into_iter()
        .map(|h| CalendarHoliday {
            date: h.holiday_date,
            reason: h.reason,
        })
        .collect();

    Ok(availability::resolve(&hours, &holidays, local)?)
}

pub async fn public_status(
    state: &AppState,
    slug: &str,
) -> AppResult<ApiResponse<AvailabilityStatus>> {
    let shop = find_active_by_slug(&state.orm, slug).await?;
    let status = status_for_shop(&state.orm, shop.id, Utc::now()).await?;
    Ok(ApiResponse::ok("Status", status))
}

pub async fn admin_status(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AvailabilityStatus>> {
    let shop_id = ensure_shop_admin(user)?;
    let status = status_for_shop(&state.orm, shop_id, Utc::now()).await?;
    Ok(ApiResponse::ok("Status", status))
}

pub async fn get_availability(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<AvailabilitySettings>> {
    let shop_id = ensure_shop_admin(user)?;
    let settings = match StoreAvailability::find_by_id(shop_id).one(&state.orm).await? {
        Some(model) => AvailabilitySettings::from(model),
        None => {
            let hours = default_hours();
            AvailabilitySettings {
                shop_id,
                opening_time: hours.opening_time,
                closing_time: hours.closing_time,
                timezone: hours.timezone,
                manual_override: hours.manual_override,
                override_reason: hours.override_reason,
                updated_at: Utc::now(),
            }
        }
    };
    Ok(ApiResponse::ok("Availability", settings))
}

pub async fn update_availability(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateAvailabilityRequest,
) -> AppResult<ApiResponse<AvailabilitySettings>> {
    let shop_id = ensure_shop_admin(user)?;
    validate_time(&payload.opening_time)?;
    validate_time(&payload.closing_time)?;
    validate_timezone(&payload.timezone)?;
    let override_reason = clean_reason(payload.override_reason)?;

    let model = match StoreAvailability::find_by_id(shop_id).one(&state.orm).await? {
        Some(existing) => {
            let mut active: AvailabilityActive = existing.into();
            active.opening_time = Set(payload.opening_time);
            active.closing_time = Set(payload.closing_time);
            active.timezone = Set(payload.timezone);
            active.manual_override = Set(payload.manual_override.as_str().into());
            active.override_reason = Set(override_reason);
            active.updated_at = Set(Utc::now().into());
            active.update(&state.orm).await?
        }
        None => {
            AvailabilityActive {
                shop_id: Set(shop_id),
                opening_time: Set(payload.opening_time),
                closing_time: Set(payload.closing_time),
                timezone: Set(payload.timezone),
                manual_override: Set(payload.manual_override.as_str().into()),
                override_reason: Set(override_reason),
                updated_at: NotSet,
            }
            .insert(&state.orm)
            .await?
        }
    };

    tracing::info!(
        shop_id = %shop_id,
        manual_override = %model.manual_override,
        "availability updated"
    );
    audit(
        &state.pool,
        user.user_id,
        AuditAction::AvailabilityUpdate,
        "store_availability",
        serde_json::json!({
            "shop_id": shop_id,
            "opening_time": model.opening_time,
            "closing_time": model.closing_time,
            "manual_override": model.manual_override,
        }),
    )
    .await;

    Ok(ApiResponse::ok(
        "Availability updated",
        AvailabilitySettings::from(model),
    ))
}

pub async fn list_holidays(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<HolidayList>> {
    let shop_id = ensure_shop_admin(user)?;
    let items: Vec<Holiday> = StoreHolidays::find()
        .filter(HolidayCol::ShopId.eq(shop_id))
        .order_by_asc(HolidayCol::HolidayDate)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Holiday::from)
        .collect();
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Holidays", HolidayList { items }, Some(meta)))
}

pub async fn create_holiday(
    state: &AppState,
    user: &AuthUser,
    payload: CreateHolidayRequest,
) -> AppResult<ApiResponse<Holiday>> {
    let shop_id = ensure_shop_admin(user)?;
    let reason = clean_reason(Some(payload.reason))?
        .ok_or_else(|| AppError::bad_request("reason is required"))?;

    let exists = StoreHolidays::find()
        .filter(
            Condition::all()
                .add(HolidayCol::ShopId.eq(shop_id))
                .add(HolidayCol::HolidayDate.eq(payload.holiday_date)),
        )
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::bad_request("A holiday already exists on that date"));
    }

    let holiday = HolidayActive {
        id: Set(Uuid::new_v4()),
        shop_id: Set(shop_id),
        holiday_date: Set(payload.holiday_date),
        reason: Set(reason),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit(
        &state.pool,
        user.user_id,
        AuditAction::HolidayCreate,
        "store_holidays",
        serde_json::json!({ "holiday_id": holiday.id, "date": holiday.holiday_date }),
    )
    .await;

    Ok(ApiResponse::ok("Holiday added", Holiday::from(holiday)))
}

pub async fn delete_holiday(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let shop_id = ensure_shop_admin(user)?;
    let result = StoreHolidays::delete_many()
        .filter(
            Condition::all()
                .add(HolidayCol::Id.eq(id))
                .add(HolidayCol::ShopId.eq(shop_id)),
        )
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit(
        &state.pool,
        user.user_id,
        AuditAction::HolidayDelete,
        "store_holidays",
        serde_json::json!({ "holiday_id": id }),
    )
    .await;

    Ok(ApiResponse::ok("Deleted", serde_json::json!({})))
}
