use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    dto::feedback::{FeedbackList, SubmitFeedbackRequest},
    entity::{
        feedback::{ActiveModel as FeedbackActive, Column as FeedbackCol, Entity as FeedbackEntity},
        orders::{Column as OrderCol, Entity as Orders},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_shop_admin},
    models::Feedback,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::shop_service::find_active_by_slug,
    state::AppState,
};

pub const MAX_COMMENT_LEN: usize = 2000;

pub fn validate_feedback(payload: &SubmitFeedbackRequest) -> AppResult<()> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::bad_request("rating must be between 1 and 5"));
    }
    if payload
        .comment
        .as_ref()
        .is_some_and(|c| c.chars().count() > MAX_COMMENT_LEN)
    {
        return Err(AppError::bad_request(format!(
            "comment must be at most {MAX_COMMENT_LEN} characters"
        )));
    }
    Ok(())
}

pub async fn submit_feedback(
    state: &AppState,
    slug: &str,
    payload: SubmitFeedbackRequest,
) -> AppResult<ApiResponse<Feedback>> {
    validate_feedback(&payload)?;
    let shop = find_active_by_slug(&state.orm, slug).await?;

    let order_id = match payload
        .order_number
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
    {
        Some(number) => {
            let order = Orders::find()
                .filter(
                    Condition::all()
                        .add(OrderCol::ShopId.eq(shop.id))
                        .add(OrderCol::OrderNumber.eq(number)),
                )
                .one(&state.orm)
                .await?
                .ok_or_else(|| AppError::bad_request("order not found for this shop"))?;
            Some(order.id)
        }
        None => None,
    };

    let feedback = FeedbackActive {
        id: Set(Uuid::new_v4()),
        shop_id: Set(shop.id),
        order_id: Set(order_id),
        customer_name: Set(payload
            .customer_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())),
        rating: Set(payload.rating),
        comment: Set(payload
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::debug!(shop_id = %shop.id, rating = feedback.rating, "feedback received");
    Ok(ApiResponse::ok("Thank you for your feedback", Feedback::from(feedback)))
}

pub async fn list_feedback(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<FeedbackList>> {
    let shop_id = ensure_shop_admin(user)?;
    let (page, limit, offset) = pagination.normalize();

    let finder = FeedbackEntity::find()
        .filter(FeedbackCol::ShopId.eq(shop_id))
        .order_by_desc(FeedbackCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Feedback::from)
        .collect();

    let average: (Option<f64>,) =
        sqlx::query_as("SELECT AVG(rating)::float8 FROM feedback WHERE shop_id = $1")
            .bind(shop_id)
            .fetch_one(&state.pool)
            .await?;

    Ok(ApiResponse::success(
        "Feedback",
        FeedbackList {
            items,
            average_rating: average.0.map(|avg| (avg * 100.0).round() / 100.0),
        },
        Some(Meta::new(page, limit, total)),
    ))
}
