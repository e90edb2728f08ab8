//! Flowchart session state and the gesture reducer.

use serde::{Deserialize, Serialize};

use crate::{FlowError, FlowResult, InteractionEvent, NodeId, NodeStore, Position, ShapeKind, Size};

/// Where palette-button nodes are placed.
pub const DEFAULT_DROP_POSITION: Position = Position::new(100.0, 100.0);

/// Placement and extent of the canvas inside the host viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasFrame {
    /// Canvas top edge in viewport coordinates.
    pub offset_top: f32,
    /// Canvas left edge in viewport coordinates.
    pub offset_left: f32,
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
}

impl CanvasFrame {
    /// Create a frame at the viewport origin.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            offset_top: 0.0,
            offset_left: 0.0,
            width,
            height,
        }
    }

    /// Set the viewport offset of the canvas.
    #[must_use]
    pub fn with_offset(mut self, offset_top: f32, offset_left: f32) -> Self {
        self.offset_top = offset_top;
        self.offset_left = offset_left;
        self
    }

    /// Translate viewport coordinates to canvas coordinates.
    #[must_use]
    pub fn to_canvas(&self, client_top: f32, client_left: f32) -> Position {
        Position::new(client_top - self.offset_top, client_left - self.offset_left)
    }
}

impl Default for CanvasFrame {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// What a single reduced event did to the state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "id", rename_all = "snake_case")]
pub enum Outcome {
    /// A palette drag is in progress.
    DragStarted,
    /// A node was created.
    Added(NodeId),
    /// A node was moved.
    Moved(NodeId),
    /// A node was resized.
    Resized(NodeId),
    /// A node's label changed.
    Relabeled(NodeId),
    /// The selection pointer changed.
    Selected(Option<NodeId>),
    /// The diagram was cleared.
    Cleared,
    /// The event had nothing to act on.
    Ignored,
}

/// The complete state of one drawing session.
///
/// Owns the [`NodeStore`] and the single selected-node pointer. Every gesture
/// goes through [`FlowchartState::apply`].
#[derive(Debug, Clone, Default)]
pub struct FlowchartState {
    /// The shape nodes.
    store: NodeStore,
    /// At most one selected node.
    selected: Option<NodeId>,
    /// Shape kind being dragged out of the palette, if any.
    palette_drag: Option<ShapeKind>,
    /// Canvas placement in the viewport.
    frame: CanvasFrame,
}

impl FlowchartState {
    /// Create an empty session on the given canvas.
    #[must_use]
    pub fn new(frame: CanvasFrame) -> Self {
        Self {
            frame,
            ..Self::default()
        }
    }

    /// Create a session around an existing store.
    #[must_use]
    pub fn with_store(store: NodeStore, frame: CanvasFrame) -> Self {
        Self {
            store,
            frame,
            ..Self::default()
        }
    }

    /// The node store.
    #[must_use]
    pub fn store(&self) -> &NodeStore {
        &self.store
    }

    /// The selected node, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&NodeId> {
        self.selected.as_ref()
    }

    /// Check whether a node is the selected one.
    #[must_use]
    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// The shape kind of the palette drag in progress.
    #[must_use]
    pub fn palette_drag(&self) -> Option<ShapeKind> {
        self.palette_drag
    }

    /// The canvas frame.
    #[must_use]
    pub fn frame(&self) -> &CanvasFrame {
        &self.frame
    }

    /// Update the canvas frame after a host layout change.
    pub fn set_frame(&mut self, frame: CanvasFrame) {
        self.frame = frame;
    }

    /// Reduce one gesture against the state.
    ///
    /// # Errors
    ///
    /// Returns an error if the gesture targets a missing node or carries
    /// non-finite coordinates. The state is unchanged in that case.
    pub fn apply(&mut self, event: &InteractionEvent) -> FlowResult<Outcome> {
        let outcome = match event {
            InteractionEvent::PaletteDragStart { kind } => {
                self.palette_drag = Some(*kind);
                Outcome::DragStarted
            }
            InteractionEvent::PaletteAdd { kind } => {
                Outcome::Added(self.store.add_node(*kind, DEFAULT_DROP_POSITION)?)
            }
            InteractionEvent::CanvasDrop { client_x, client_y } => {
                let Some(kind) = self.palette_drag else {
                    return Ok(Outcome::Ignored);
                };
                let position = self.frame.to_canvas(*client_y, *client_x);
                let id = self.store.add_node(kind, position)?;
                self.palette_drag = None;
                Outcome::Added(id)
            }
            InteractionEvent::NodeDragEnd {
                id,
                client_top,
                client_left,
            } => {
                let position = self.frame.to_canvas(*client_top, *client_left);
                self.store.update_position(id, position)?;
                Outcome::Moved(id.clone())
            }
            InteractionEvent::NodeClick { id } => {
                if !self.store.contains(id) {
                    return Ok(Outcome::Ignored);
                }
                self.selected = Some(id.clone());
                Outcome::Selected(self.selected.clone())
            }
            InteractionEvent::CanvasClick => {
                if self.selected.take().is_none() {
                    return Ok(Outcome::Ignored);
                }
                Outcome::Selected(None)
            }
            InteractionEvent::TextInput { text } => {
                let Some(id) = self.selected.clone() else {
                    return Ok(Outcome::Ignored);
                };
                self.store.update_text(&id, text.as_str())?;
                Outcome::Relabeled(id)
            }
            InteractionEvent::ResizeDrag {
                id,
                delta_width,
                delta_height,
            } => {
                let current = self
                    .store
                    .get(id)
                    .map(|node| node.size)
                    .ok_or_else(|| FlowError::NodeNotFound(id.to_string()))?;
                let size = Size::new(current.width + delta_width, current.height + delta_height);
                self.store.update_size(id, size)?;
                Outcome::Resized(id.clone())
            }
            InteractionEvent::Reset => {
                self.store.reset();
                self.selected = None;
                self.palette_drag = None;
                Outcome::Cleared
            }
        };

        tracing::trace!(event = event.name(), ?outcome, "interaction applied");
        Ok(outcome)
    }

    /// Reduce a gesture without touching `self`, returning the next state.
    ///
    /// # Errors
    ///
    /// Same as [`FlowchartState::apply`].
    pub fn next(&self, event: &InteractionEvent) -> FlowResult<(Self, Outcome)> {
        let mut next = self.clone();
        let outcome = next.apply(event)?;
        Ok((next, outcome))
    }
}
