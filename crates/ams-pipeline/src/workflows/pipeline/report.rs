use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use super::domain::{Category, Stage, StageId, StageStatus};

#[derive(Debug, Clone, Serialize)]
pub struct StatusCountEntry {
    pub status: StageStatus,
    pub status_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryEntry {
    pub category: Category,
    pub category_label: &'static str,
    pub accent: &'static str,
    pub stages: usize,
    pub configured: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttentionItem {
    pub stage_id: StageId,
    pub name: String,
    pub order: u32,
    pub status: StageStatus,
    pub missing_items: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub overdue: bool,
}

/// Configuration readiness summary for one pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub total_stages: usize,
    pub scheduled_stages: usize,
    pub readiness_pct: f32,
    pub status_breakdown: Vec<StatusCountEntry>,
    pub category_breakdown: Vec<CategoryEntry>,
    pub attention: Vec<AttentionItem>,
}

#[derive(Default)]
struct CategoryTally {
    stages: usize,
    configured: usize,
}

impl PipelineReport {
    pub fn build(stages: &[Stage], today: NaiveDate) -> Self {
        let mut status_counts: HashMap<StageStatus, usize> = HashMap::new();
        let mut categories: HashMap<Category, CategoryTally> = HashMap::new();
        let mut attention = Vec::new();

        for stage in stages {
            *status_counts.entry(stage.status).or_default() += 1;

            let tally = categories.entry(stage.category).or_default();
            tally.stages += 1;
            if stage.is_configured() {
                tally.configured += 1;
            }

            let overdue = stage.is_overdue(today);
            if !stage.is_configured() || overdue {
                let missing_items = if stage.status == StageStatus::NotConfigured {
                    vec!["Configuration".to_string()]
                } else {
                    stage.missing_items.clone()
                };
                attention.push(AttentionItem {
                    stage_id: stage.id.clone(),
                    name: stage.name.clone(),
                    order: stage.order,
                    status: stage.status,
                    missing_items,
                    due_date: stage.due_date,
                    overdue,
                });
            }
        }

        // Overdue first, then pipeline order.
        attention.sort_by(|a, b| b.overdue.cmp(&a.overdue).then(a.order.cmp(&b.order)));

        let status_breakdown = StageStatus::ordered()
            .into_iter()
            .map(|status| StatusCountEntry {
                status,
                status_label: status.label(),
                count: status_counts.get(&status).copied().unwrap_or_default(),
            })
            .collect();

        let category_breakdown = Category::ordered()
            .into_iter()
            .filter_map(|category| {
                categories.get(&category).map(|tally| CategoryEntry {
                    category,
                    category_label: category.label(),
                    accent: category.accent(),
                    stages: tally.stages,
                    configured: tally.configured,
                })
            })
            .collect();

        let configured = status_counts
            .get(&StageStatus::Configured)
            .copied()
            .unwrap_or_default();
        let readiness_pct = if stages.is_empty() {
            0.0
        } else {
            configured as f32 / stages.len() as f32 * 100.0
        };

        Self {
            total_stages: stages.len(),
            scheduled_stages: stages
                .iter()
                .filter(|stage| stage.scheduling.is_scheduled)
                .count(),
            readiness_pct,
            status_breakdown,
            category_breakdown,
            attention,
        }
    }

    pub fn count(&self, status: StageStatus) -> usize {
        self.status_breakdown
            .iter()
            .find(|entry| entry.status == status)
            .map(|entry| entry.count)
            .unwrap_or_default()
    }
}
