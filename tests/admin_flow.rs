mod common;

use chrono::NaiveDate;
use shop_ordering_api::{
    availability::ManualOverride,
    dto::{
        availability::CreateHolidayRequest, feedback::SubmitFeedbackRequest,
        themes::CreateThemeRequest,
    },
    error::AppError,
    models::ButtonStyle,
    routes::params::Pagination,
    services::{availability_service, feedback_service, order_service, shop_service, theme_service},
};

use common::{
    add_menu_item, create_super_admin, database_url, mobile_device, order_for, provision,
    set_override, setup_state, unique,
};

fn theme_request(name: &str, primary_color: &str) -> CreateThemeRequest {
    CreateThemeRequest {
        name: name.into(),
        primary_color: primary_color.into(),
        secondary_color: "#ffffff".into(),
        background_color: "#fafafa".into(),
        text_color: "#111".into(),
        font_family: "Inter".into(),
        button_style: ButtonStyle::Pill,
    }
}

#[tokio::test]
async fn themes_validate_colors_and_detach_on_delete() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&database_url).await?;
    let owner = create_super_admin(&state).await?;
    let name = unique("Sunset");

    let bad = theme_service::create_theme(&state, &owner, theme_request(&name, "orange")).await;
    assert!(matches!(bad, Err(AppError::BadRequest(_))));

    let theme = theme_service::create_theme(&state, &owner, theme_request(&name, "#ff7f50"))
        .await?
        .data
        .expect("theme");
    assert_eq!(theme.primary_color, "#ff7f50");

    let duplicate =
        theme_service::create_theme(&state, &owner, theme_request(&name, "#000000")).await;
    assert!(matches!(duplicate, Err(AppError::BadRequest(_))));

    let (provisioned, shop_admin) = provision(&state, &owner, "themed", 0, Some(theme.id)).await?;
    assert_eq!(provisioned.shop.theme_id, Some(theme.id));

    // Shop admins cannot manage themes.
    let forbidden = theme_service::delete_theme(&state, &shop_admin, theme.id).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));

    let deleted = theme_service::delete_theme(&state, &owner, theme.id)
        .await?
        .data
        .expect("delete result");
    assert_eq!(deleted["detached_shops"], 1);

    let shop = shop_service::get_shop(&state, &owner, provisioned.shop.id)
        .await?
        .data
        .expect("shop");
    assert_eq!(shop.theme_id, None);

    let again = theme_service::delete_theme(&state, &owner, theme.id).await;
    assert!(matches!(again, Err(AppError::NotFound)));
    Ok(())
}

#[tokio::test]
async fn holidays_reject_duplicates_and_can_be_removed() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&database_url).await?;
    let owner = create_super_admin(&state).await?;
    let (_, shop_admin) = provision(&state, &owner, "holiday", 0, None).await?;
    let (_, other_admin) = provision(&state, &owner, "neighbour", 0, None).await?;
    let date = NaiveDate::from_ymd_opt(2031, 12, 25).expect("valid date");

    let holiday = availability_service::create_holiday(
        &state,
        &shop_admin,
        CreateHolidayRequest {
            holiday_date: date,
            reason: "Christmas".into(),
        },
    )
    .await?
    .data
    .expect("holiday");
    assert_eq!(holiday.holiday_date, date);

    let duplicate = availability_service::create_holiday(
        &state,
        &shop_admin,
        CreateHolidayRequest {
            holiday_date: date,
            reason: "Again".into(),
        },
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::BadRequest(_))));

    let blank = availability_service::create_holiday(
        &state,
        &shop_admin,
        CreateHolidayRequest {
            holiday_date: date.succ_opt().expect("next day"),
            reason: "   ".into(),
        },
    )
    .await;
    assert!(matches!(blank, Err(AppError::BadRequest(_))));

    // Holidays are scoped to the admin's own shop.
    let foreign = availability_service::delete_holiday(&state, &other_admin, holiday.id).await;
    assert!(matches!(foreign, Err(AppError::NotFound)));

    let listed = availability_service::list_holidays(&state, &shop_admin)
        .await?
        .data
        .expect("holidays");
    assert_eq!(listed.items.len(), 1);

    availability_service::delete_holiday(&state, &shop_admin, holiday.id).await?;
    let listed = availability_service::list_holidays(&state, &shop_admin)
        .await?
        .data
        .expect("holidays");
    assert!(listed.items.is_empty());

    let gone = availability_service::delete_holiday(&state, &shop_admin, holiday.id).await;
    assert!(matches!(gone, Err(AppError::NotFound)));
    Ok(())
}

fn feedback(rating: i32, order_number: Option<String>) -> SubmitFeedbackRequest {
    SubmitFeedbackRequest {
        rating,
        comment: Some("Lovely".into()),
        customer_name: Some("Asha".into()),
        order_number,
    }
}

#[tokio::test]
async fn feedback_links_own_orders_and_reports_the_average() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        return Ok(());
    };
    let state = setup_state(&database_url).await?;
    let owner = create_super_admin(&state).await?;
    let (provisioned, shop_admin) = provision(&state, &owner, "rated", 0, None).await?;
    let (other, other_admin) = provision(&state, &owner, "unrated", 0, None).await?;
    let slug = provisioned.shop.slug.clone();

    set_override(&state, &other_admin, ManualOverride::ForceOpen).await?;
    let tea = add_menu_item(&state, &other_admin, "Tea", 300).await?;
    let foreign_order = order_service::place_order(
        &state,
        &other.shop.slug,
        &mobile_device(),
        order_for("555-777-0003", &[(tea.id, 1)]),
    )
    .await?
    .data
    .expect("order");

    // An order number from another shop cannot be attached.
    let foreign = feedback_service::submit_feedback(
        &state,
        &slug,
        feedback(5, Some(foreign_order.order.order_number.clone())),
    )
    .await;
    assert!(matches!(foreign, Err(AppError::BadRequest(_))));

    let linked = feedback_service::submit_feedback(
        &state,
        &other.shop.slug,
        feedback(3, Some(foreign_order.order.order_number.clone())),
    )
    .await?
    .data
    .expect("feedback");
    assert_eq!(linked.order_id, Some(foreign_order.order.id));

    let out_of_range = feedback_service::submit_feedback(&state, &slug, feedback(6, None)).await;
    assert!(matches!(out_of_range, Err(AppError::BadRequest(_))));

    let empty = feedback_service::list_feedback(&state, &shop_admin, Pagination::default())
        .await?
        .data
        .expect("feedback list");
    assert!(empty.items.is_empty());
    assert_eq!(empty.average_rating, None);

    for rating in [4, 5, 5] {
        feedback_service::submit_feedback(&state, &slug, feedback(rating, None)).await?;
    }

    let listed = feedback_service::list_feedback(&state, &shop_admin, Pagination::default())
        .await?
        .data
        .expect("feedback list");
    assert_eq!(listed.items.len(), 3);
    assert_eq!(listed.average_rating, Some(4.67));
    Ok(())
}
