use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generation::criteria::Studio;
use crate::models::generation::Example;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[default]
    Learner,
    Guide,
}

/// A saved world-class / not-approved pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub id: Uuid,
    pub title: String,
    pub studio: Studio,
    pub prompt_text: String,
    pub world_class: Example,
    pub not_approved: Example,
    pub created_at: DateTime<Utc>,
    pub created_by_role: UserRole,
}
