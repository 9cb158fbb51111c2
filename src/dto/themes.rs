use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{ButtonStyle, ShopTheme};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateThemeRequest {
    pub name: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub font_family: String,
    pub button_style: ButtonStyle,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateThemeRequest {
    pub name: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub font_family: Option<String>,
    pub button_style: Option<ButtonStyle>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ThemeList {
    pub items: Vec<ShopTheme>,
}
