use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tracks only the detached performance-fetch stage of a report.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum PagespeedStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl Default for PagespeedStatus {
    fn default() -> Self {
        Self::Pending
    }
}
