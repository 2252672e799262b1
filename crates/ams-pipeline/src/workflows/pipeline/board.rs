use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::collection::{
    add_stage, remove_stage, reorder_stage, validate_stages, StageIdSequence,
};
use super::domain::{PipelineError, Stage, StageId, StageTemplate};
use super::drag::{CardBounds, DragSession};
use super::flow::PipelineFlow;
use super::report::PipelineReport;
use super::stage_config::{open_config_form, save_config, StageConfig};

/// Owner of one pipeline's stage list and its id sequence.
///
/// Exposes the callback contract the pipeline editor drives. Every mutation keeps the
/// stage order dense.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoardSnapshot")]
pub struct PipelineBoard {
    stages: Vec<Stage>,
    sequence: StageIdSequence,
}

/// Serialized form of a board, validated on the way back in.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardSnapshot {
    pub stages: Vec<Stage>,
    pub sequence: StageIdSequence,
}

impl TryFrom<BoardSnapshot> for PipelineBoard {
    type Error = PipelineError;

    fn try_from(snapshot: BoardSnapshot) -> Result<Self, Self::Error> {
        validate_stages(&snapshot.stages)?;

        for stage in &snapshot.stages {
            if let Some(config) = &stage.config {
                if config.stage_type() != stage.stage_type {
                    return Err(PipelineError::StageTypeMismatch {
                        stage_id: stage.id.clone(),
                        expected: stage.stage_type,
                        received: config.stage_type(),
                    });
                }
            }
        }

        let highest = snapshot.stages.iter().filter_map(issued_sequence).max();
        if let Some(highest) = highest {
            if snapshot.sequence.peek() <= highest {
                return Err(PipelineError::StaleSequence {
                    next: snapshot.sequence.peek(),
                    highest,
                });
            }
        }

        Ok(Self {
            stages: snapshot.stages,
            sequence: snapshot.sequence,
        })
    }
}

/// Sequence number of an id issued as `{template_id}-{seq}`. Other ids were not issued by
/// a board sequence and are ignored.
fn issued_sequence(stage: &Stage) -> Option<u64> {
    stage
        .id
        .0
        .strip_prefix(stage.template_id.as_str())?
        .strip_prefix('-')?
        .parse()
        .ok()
}

impl PipelineBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, stage_id: &StageId) -> Option<&Stage> {
        self.stages.iter().find(|stage| &stage.id == stage_id)
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Append a stage for `template` and return it.
    pub fn on_add_stage(&mut self, template: &StageTemplate) -> &Stage {
        let id = self.sequence.next_for(template);
        self.stages = add_stage(&self.stages, template, id);
        let last = self.stages.len() - 1;
        &self.stages[last]
    }

    /// Returns whether a stage was removed.
    pub fn on_remove_stage(&mut self, stage_id: &StageId) -> bool {
        let before = self.stages.len();
        self.stages = remove_stage(&self.stages, stage_id);
        self.stages.len() != before
    }

    pub fn on_reorder_stages(&mut self, drag_index: usize, hover_index: usize) {
        self.stages = reorder_stage(&self.stages, drag_index, hover_index);
    }

    /// Feed one hover tick of a drag gesture. Returns whether the stages moved.
    pub fn on_drag_hover(
        &mut self,
        session: &mut DragSession,
        hover_index: usize,
        bounds: CardBounds,
        pointer_x: f64,
    ) -> bool {
        if hover_index >= self.stages.len() || session.index() >= self.stages.len() {
            return false;
        }
        match session.hover(hover_index, bounds, pointer_x) {
            Some(reorder) => {
                self.on_reorder_stages(reorder.from, reorder.to);
                true
            }
            None => false,
        }
    }

    pub fn on_configure_stage(&self, stage_id: &StageId) -> Option<StageConfig> {
        open_config_form(self.stage(stage_id))
    }

    pub fn on_save_stage_config(
        &mut self,
        stage_id: &StageId,
        config: StageConfig,
    ) -> Result<&Stage, PipelineError> {
        self.stages = save_config(&self.stages, stage_id, config)?;
        self.stage(stage_id)
            .ok_or_else(|| PipelineError::StageNotFound(stage_id.clone()))
    }

    pub fn flow(&self) -> PipelineFlow {
        PipelineFlow::from_stages(&self.stages)
    }

    pub fn report(&self, today: NaiveDate) -> PipelineReport {
        PipelineReport::build(&self.stages, today)
    }
}
