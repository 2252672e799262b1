use serde::Serialize;

use super::domain::{Category, Stage, StageId, StageStatus};
use super::stage_config::StageType;

pub const FINAL_STAGE_LABEL: &str = "Final Stage";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageCard {
    pub id: StageId,
    pub name: String,
    pub order: u32,
    pub category: Category,
    pub category_label: &'static str,
    pub accent: &'static str,
    pub stage_type: StageType,
    pub stage_type_label: &'static str,
    pub status: StageStatus,
    pub status_label: &'static str,
    pub interviewer_count: usize,
    pub scheduled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_items: Vec<String>,
}

impl StageCard {
    fn from_stage(stage: &Stage) -> Self {
        Self {
            id: stage.id.clone(),
            name: stage.name.clone(),
            order: stage.order,
            category: stage.category,
            category_label: stage.category.label(),
            accent: stage.category.accent(),
            stage_type: stage.stage_type,
            stage_type_label: stage.stage_type.label(),
            status: stage.status,
            status_label: stage.status.label(),
            interviewer_count: stage.interviewers.len(),
            scheduled: stage.scheduling.is_scheduled,
            missing_items: stage.missing_items.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlowNode {
    Stage(StageCard),
    Connector { from: StageId, to: StageId },
    FinalStage { label: &'static str, after: StageId },
}

/// Render sequence for the pipeline: stage cards joined by connectors, closed by a
/// final-stage marker. Derived entirely from the stage list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineFlow {
    pub nodes: Vec<FlowNode>,
}

impl PipelineFlow {
    pub fn from_stages(stages: &[Stage]) -> Self {
        let mut ordered: Vec<&Stage> = stages.iter().collect();
        ordered.sort_by_key(|stage| stage.order);

        let mut nodes = Vec::with_capacity(ordered.len() * 2);
        for (index, stage) in ordered.iter().enumerate() {
            if index > 0 {
                nodes.push(FlowNode::Connector {
                    from: ordered[index - 1].id.clone(),
                    to: stage.id.clone(),
                });
            }
            nodes.push(FlowNode::Stage(StageCard::from_stage(stage)));
        }

        if let Some(last) = ordered.last() {
            nodes.push(FlowNode::FinalStage {
                label: FINAL_STAGE_LABEL,
                after: last.id.clone(),
            });
        }

        Self { nodes }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn stage_cards(&self) -> Vec<&StageCard> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                FlowNode::Stage(card) => Some(card),
                _ => None,
            })
            .collect()
    }

    pub fn connector_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, FlowNode::Connector { .. }))
            .count()
    }
}
