//! Interaction events for direct manipulation of the canvas.

use serde::{Deserialize, Serialize};

use crate::{NodeId, ShapeKind};

/// A discrete user gesture, already resolved to its target.
///
/// Coordinates named `client_*` are viewport coordinates as delivered by the
/// pointer event; the reducer translates them by the canvas offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum InteractionEvent {
    /// A shape started being dragged out of the palette.
    PaletteDragStart {
        /// Shape kind carried by the drag.
        kind: ShapeKind,
    },

    /// A palette button was pressed; the node lands at the default spot.
    PaletteAdd {
        /// Shape kind to create.
        kind: ShapeKind,
    },

    /// Something was dropped on the canvas.
    CanvasDrop {
        /// Viewport X of the drop.
        client_x: f32,
        /// Viewport Y of the drop.
        client_y: f32,
    },

    /// A node drag finished with its bounding box at the given offset.
    NodeDragEnd {
        /// Dragged node.
        id: NodeId,
        /// Viewport top of the node's bounding box.
        client_top: f32,
        /// Viewport left of the node's bounding box.
        client_left: f32,
    },

    /// A node was clicked.
    NodeClick {
        /// Clicked node.
        id: NodeId,
    },

    /// Empty canvas space was clicked.
    CanvasClick,

    /// The label editor of the selected node changed.
    TextInput {
        /// Full label text after the keystroke.
        text: String,
    },

    /// The resize handle of a node was dragged.
    ResizeDrag {
        /// Resized node.
        id: NodeId,
        /// Horizontal pointer travel since the drag started.
        delta_width: f32,
        /// Vertical pointer travel since the drag started.
        delta_height: f32,
    },

    /// Discard the whole diagram.
    Reset,
}

impl InteractionEvent {
    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PaletteDragStart { .. } => "palette_drag_start",
            Self::PaletteAdd { .. } => "palette_add",
            Self::CanvasDrop { .. } => "canvas_drop",
            Self::NodeDragEnd { .. } => "node_drag_end",
            Self::NodeClick { .. } => "node_click",
            Self::CanvasClick => "canvas_click",
            Self::TextInput { .. } => "text_input",
            Self::ResizeDrag { .. } => "resize_drag",
            Self::Reset => "reset",
        }
    }
}
