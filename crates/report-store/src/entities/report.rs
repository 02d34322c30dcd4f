use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::StringList;
use crate::enums::pagespeed_status::PagespeedStatus;

/// One persisted analysis snapshot. Immutable after creation except for
/// the four pagespeed score columns and `pagespeed_status`, which the
/// enrichment worker writes exactly once.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "report")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// `None` marks a guest-submitted report, subject to retention sweeps.
    pub user_id: Option<i32>,
    pub url: String,
    pub created_at: DateTimeUtc,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub h1_count: i32,
    pub h2_count: i32,
    pub image_count: i32,
    pub missing_alt_count: i32,
    pub word_count: i32,
    pub internal_links_count: i32,
    pub external_links_count: i32,
    pub canonical_url: Option<String>,
    pub og_tags_present: bool,
    pub schema_present: bool,
    pub robots_txt_exists: bool,
    pub sitemap_exists: bool,
    #[sea_orm(column_type = "Json", nullable)]
    pub top_keywords: Option<StringList>,
    pub load_time: f64,
    pub seo_score: i32,
    pub ai_summary: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub ai_suggestions: Option<StringList>,
    pub pagespeed_performance: Option<f64>,
    pub pagespeed_accessibility: Option<f64>,
    pub pagespeed_seo: Option<f64>,
    pub pagespeed_best_practices: Option<f64>,
    pub pagespeed_status: PagespeedStatus,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
