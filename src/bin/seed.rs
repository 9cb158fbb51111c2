use shop_ordering_api::{
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm_from_pool(&pool)).await?;

    let super_admin_id =
        ensure_user(&pool, "owner@example.com", "owner12345", "super_admin", None).await?;
    let theme_id = ensure_theme(&pool).await?;
    let shop_id = ensure_shop(&pool, "Demo Cafe", "demo-cafe", theme_id).await?;
    ensure_availability(&pool, shop_id).await?;
    let shop_admin_id = ensure_user(
        &pool,
        "cafe@example.com",
        "cafe12345",
        "shop_admin",
        Some(shop_id),
    )
    .await?;
    seed_menu(&pool, shop_id).await?;

    println!(
        "Seed completed. Super admin ID: {super_admin_id}, shop ID: {shop_id}, shop admin ID: {shop_admin_id}"
    );
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
    shop_id: Option<Uuid>,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role, shop_id)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role, shop_id = EXCLUDED.shop_id
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .bind(shop_id)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn ensure_theme(pool: &sqlx::PgPool) -> anyhow::Result<Uuid> {
    let (theme_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO shop_themes
            (id, name, primary_color, secondary_color, background_color, text_color, font_family, button_style)
        VALUES ($1, 'Espresso', '#6F4E37', '#C8A27C', '#FFF8F0', '#2B1B10', 'Inter', 'pill')
        ON CONFLICT (name) DO UPDATE SET updated_at = now()
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .fetch_one(pool)
    .await?;

    println!("Ensured theme Espresso");
    Ok(theme_id)
}

async fn ensure_shop(
    pool: &sqlx::PgPool,
    name: &str,
    slug: &str,
    theme_id: Uuid,
) -> anyhow::Result<Uuid> {
    let (shop_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO shops (id, name, slug, phone, address, currency_symbol, tax_rate_bps, theme_id)
        VALUES ($1, $2, $3, '+15550100', '1 Demo Street', '$', 500, $4)
        ON CONFLICT (slug) DO UPDATE SET theme_id = EXCLUDED.theme_id, updated_at = now()
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(slug)
    .bind(theme_id)
    .fetch_one(pool)
    .await?;

    println!("Ensured shop {slug}");
    Ok(shop_id)
}

async fn ensure_availability(pool: &sqlx::PgPool, shop_id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO store_availability (shop_id, opening_time, closing_time, timezone)
        VALUES ($1, '08:00', '20:00', 'UTC')
        ON CONFLICT (shop_id) DO NOTHING
        "#,
    )
    .bind(shop_id)
    .execute(pool)
    .await?;
    Ok(())
}

async fn seed_menu(pool: &sqlx::PgPool, shop_id: Uuid) -> anyhow::Result<()> {
    let items = vec![
        ("Espresso", "Double shot", "Coffee", 250_i64),
        ("Flat White", "Espresso with steamed milk", "Coffee", 400),
        ("Croissant", "Butter croissant, baked daily", "Bakery", 325),
        ("Avocado Toast", "Sourdough, avocado, chilli flakes", "Brunch", 950),
    ];

    for (name, desc, category, price) in items {
        sqlx::query(
            r#"
            INSERT INTO menu_items (id, shop_id, name, description, category, price)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE NOT EXISTS (
                SELECT 1 FROM menu_items WHERE shop_id = $2 AND name = $3
            )
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(shop_id)
        .bind(name)
        .bind(desc)
        .bind(category)
        .bind(price)
        .execute(pool)
        .await?;
    }

    println!("Seeded menu");
    Ok(())
}
