//! Pure add/remove/reorder operations over an ordered stage list.
//!
//! Every operation returns a new list whose `order` fields run `1..=len`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::domain::{PipelineError, Stage, StageId, StageTemplate};

/// Append a new, unconfigured stage built from `template` to the end of the pipeline.
pub fn add_stage(stages: &[Stage], template: &StageTemplate, id: StageId) -> Vec<Stage> {
    let mut updated = stages.to_vec();
    updated.push(Stage::from_template(template, id, 0));
    renumber(&mut updated);
    updated
}

/// Drop the stage with `stage_id`. Unknown ids leave the list unchanged.
pub fn remove_stage(stages: &[Stage], stage_id: &StageId) -> Vec<Stage> {
    let mut updated: Vec<Stage> = stages
        .iter()
        .filter(|stage| &stage.id != stage_id)
        .cloned()
        .collect();
    renumber(&mut updated);
    updated
}

/// Move the stage at `drag_index` so it ends up at `hover_index`.
///
/// Splice semantics: the dragged stage is removed and reinserted, shifting the stages in
/// between. Equal or out-of-range indices leave the list unchanged.
pub fn reorder_stage(stages: &[Stage], drag_index: usize, hover_index: usize) -> Vec<Stage> {
    let mut updated = stages.to_vec();
    if drag_index != hover_index && drag_index < updated.len() && hover_index < updated.len() {
        let dragged = updated.remove(drag_index);
        updated.insert(hover_index, dragged);
    }
    renumber(&mut updated);
    updated
}

pub(crate) fn renumber(stages: &mut [Stage]) {
    for (index, stage) in stages.iter_mut().enumerate() {
        stage.order = index as u32 + 1;
    }
}

/// Check the pipeline invariants: unique ids and a dense `1..=len` order in list position.
pub fn validate_stages(stages: &[Stage]) -> Result<(), PipelineError> {
    let mut seen = HashSet::new();
    for (position, stage) in stages.iter().enumerate() {
        if !seen.insert(&stage.id) {
            return Err(PipelineError::DuplicateStage(stage.id.clone()));
        }
        let expected = position as u32 + 1;
        if stage.order != expected {
            return Err(PipelineError::OrderGap {
                position,
                expected,
                found: stage.order,
            });
        }
    }
    Ok(())
}

/// Monotonic stage id generator owned by a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageIdSequence {
    next: u64,
}

impl StageIdSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next: next.max(1) }
    }

    pub fn peek(&self) -> u64 {
        self.next
    }

    pub fn next_for(&mut self, template: &StageTemplate) -> StageId {
        let id = StageId(format!("{}-{:04}", template.id, self.next));
        self.next += 1;
        id
    }
}

impl Default for StageIdSequence {
    fn default() -> Self {
        Self::new()
    }
}
