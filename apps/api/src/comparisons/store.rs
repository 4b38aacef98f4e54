use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::generation::criteria::Studio;
use crate::models::comparison::{Comparison, UserRole};
use crate::models::generation::Example;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComparison {
    #[serde(default)]
    pub title: Option<String>,
    pub studio: Studio,
    pub prompt_text: String,
    pub world_class: Example,
    pub not_approved: Example,
    #[serde(default)]
    pub created_by_role: Option<UserRole>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub world_class: Option<Example>,
    #[serde(default)]
    pub not_approved: Option<Example>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComparisonFilter {
    #[serde(default)]
    pub studio: Option<Studio>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StudioCounts {
    #[serde(rename = "ES")]
    pub elementary: usize,
    #[serde(rename = "MS")]
    pub middle: usize,
    #[serde(rename = "LP")]
    pub launchpad: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonStats {
    pub total: usize,
    pub by_studio: StudioCounts,
}

/// Title used when a comparison is saved without one.
pub fn default_title(studio: Studio) -> String {
    format!("Generated Example - {studio}")
}

/// In-memory comparison store shared across handlers.
#[derive(Debug, Default)]
pub struct ComparisonStore {
    comparisons: RwLock<HashMap<Uuid, Comparison>>,
}

impl ComparisonStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn save(&self, new: NewComparison) -> Comparison {
        let title = new
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| default_title(new.studio));

        let comparison = Comparison {
            id: Uuid::new_v4(),
            title,
            studio: new.studio,
            prompt_text: new.prompt_text,
            world_class: new.world_class,
            not_approved: new.not_approved,
            created_at: Utc::now(),
            created_by_role: new.created_by_role.unwrap_or_default(),
        };

        self.comparisons
            .write()
            .await
            .insert(comparison.id, comparison.clone());
        comparison
    }

    pub async fn get(&self, id: Uuid) -> Option<Comparison> {
        self.comparisons.read().await.get(&id).cloned()
    }

    /// Newest first. `search` matches title or prompt text, case-insensitively.
    pub async fn list(&self, filter: &ComparisonFilter) -> Vec<Comparison> {
        let needle = filter
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        let mut matches: Vec<Comparison> = self
            .comparisons
            .read()
            .await
            .values()
            .filter(|c| filter.studio.map_or(true, |s| c.studio == s))
            .filter(|c| {
                needle.as_deref().map_or(true, |n| {
                    c.title.to_lowercase().contains(n) || c.prompt_text.to_lowercase().contains(n)
                })
            })
            .cloned()
            .collect();

        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.title.cmp(&b.title)));
        matches
    }

    /// Applies the patch; `None` when the id is unknown.
    pub async fn update(&self, id: Uuid, patch: ComparisonPatch) -> Option<Comparison> {
        let mut guard = self.comparisons.write().await;
        let comparison = guard.get_mut(&id)?;

        if let Some(title) = patch.title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            comparison.title = title;
        }
        if let Some(world_class) = patch.world_class {
            comparison.world_class = world_class;
        }
        if let Some(not_approved) = patch.not_approved {
            comparison.not_approved = not_approved;
        }
        Some(comparison.clone())
    }

    pub async fn delete(&self, id: Uuid) -> bool {
        self.comparisons.write().await.remove(&id).is_some()
    }

    pub async fn stats(&self) -> ComparisonStats {
        let guard = self.comparisons.read().await;
        let mut by_studio = StudioCounts::default();
        for comparison in guard.values() {
            match comparison.studio {
                Studio::Elementary => by_studio.elementary += 1,
                Studio::Middle => by_studio.middle += 1,
                Studio::Launchpad => by_studio.launchpad += 1,
            }
        }
        ComparisonStats {
            total: guard.len(),
            by_studio,
        }
    }
}
