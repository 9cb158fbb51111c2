use sea_orm::entity::prelude::*;

/// One storefront or platform page view. Raw IPs are never stored.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "page_visits")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub shop_id: Option<Uuid>,
    pub page: String,
    pub device_type: String,
    pub browser: String,
    pub os: String,
    pub fingerprint: String,
    pub ip_hash: String,
    pub referrer: Option<String>,
    pub visited_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
