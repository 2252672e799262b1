//! Adapter translating pointer movement during a card drag into reorder moves.

use serde::{Deserialize, Serialize};

/// Horizontal extent of the hovered stage card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardBounds {
    pub left: f64,
    pub right: f64,
}

impl CardBounds {
    pub fn midpoint(&self) -> f64 {
        self.left + (self.right - self.left) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderMove {
    pub from: usize,
    pub to: usize,
}

/// Tracks the dragged card's current index for the lifetime of one drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    index: usize,
}

impl DragSession {
    pub fn start(index: usize) -> Self {
        Self { index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Called on every hover tick. A move is only emitted once the pointer has crossed the
    /// midpoint of the hovered card in the direction of travel, so adjacent cards do not
    /// swap back and forth while the pointer sits near their shared edge.
    pub fn hover(
        &mut self,
        hover_index: usize,
        bounds: CardBounds,
        pointer_x: f64,
    ) -> Option<ReorderMove> {
        if hover_index == self.index {
            return None;
        }

        let midpoint = bounds.midpoint();
        let moving_right = self.index < hover_index;
        if moving_right && pointer_x < midpoint {
            return None;
        }
        if !moving_right && pointer_x > midpoint {
            return None;
        }

        let reorder = ReorderMove {
            from: self.index,
            to: hover_index,
        };
        self.index = hover_index;
        Some(reorder)
    }
}
