use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Guide {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub property_id: Uuid,
    pub title: String,
    pub welcome_message: Option<String>,
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GuideSection {
    pub id: Uuid,
    pub guide_id: Uuid,
    pub title: String,
    pub content: String,
    pub sort_order: i32,
}

/// What an anonymous visitor sees before proving they are a guest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideSummary {
    pub property_id: Uuid,
    pub property_name: String,
    pub title: String,
    pub requires_validation: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideContent {
    #[serde(flatten)]
    pub guide: Guide,
    pub sections: Vec<GuideSection>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GuideAccessRequest {
    pub property_id: Uuid,
    #[validate(custom(function = "validation::not_blank"), length(max = 100))]
    pub first_name: String,
    #[validate(custom(function = "validation::not_blank"), length(max = 100))]
    pub last_name: String,
}
