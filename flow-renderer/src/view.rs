//! Projection of the flowchart state into drawable node views.

use flow_core::{FlowchartState, NodeId, ShapeKind, ShapeNode};
use serde::Serialize;

/// Corner radius of rectangle shapes.
pub const RECT_CORNER_RADIUS: f32 = 5.0;

/// Side length of the resize handle.
pub const RESIZE_HANDLE_SIZE: f32 = 12.0;

/// Gap between the resize handle and the node's bottom-right corner.
pub const RESIZE_HANDLE_INSET: f32 = 5.0;

/// Label font size in pixels.
pub const LABEL_FONT_SIZE: f32 = 14.0;

/// Diamond vertices as fractions of the node box.
const DIAMOND_POINTS: [(f32, f32); 4] = [(0.5, 0.0), (1.0, 0.5), (0.5, 1.0), (0.0, 0.5)];

/// Parallelogram vertices as fractions of the node box.
const PARALLELOGRAM_POINTS: [(f32, f32); 4] = [(0.2, 0.0), (0.8, 0.0), (1.0, 1.0), (0.0, 1.0)];

/// Vector geometry drawn inside a node's box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ShapeGeometry {
    /// Rectangle filling the box with rounded corners.
    RoundedRect {
        /// Corner radius.
        rx: f32,
        /// Fill color.
        fill: &'static str,
    },
    /// Circle centred in the box.
    Circle {
        /// Fill color.
        fill: &'static str,
    },
    /// Closed polygon with vertices given as fractions of the box.
    Polygon {
        /// `(x, y)` fractions in `0.0..=1.0`.
        points: &'static [(f32, f32)],
        /// Fill color.
        fill: &'static str,
    },
}

impl ShapeGeometry {
    /// The geometry used for a shape kind.
    #[must_use]
    pub fn for_kind(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Rectangle => Self::RoundedRect {
                rx: RECT_CORNER_RADIUS,
                fill: "#ccc",
            },
            ShapeKind::Circle => Self::Circle { fill: "#aaa" },
            ShapeKind::Diamond => Self::Polygon {
                points: &DIAMOND_POINTS,
                fill: "#ffcc00",
            },
            ShapeKind::Parallelogram => Self::Polygon {
                points: &PARALLELOGRAM_POINTS,
                fill: "#ff6666",
            },
        }
    }

    /// Fill color of the shape.
    #[must_use]
    pub fn fill(&self) -> &'static str {
        match self {
            Self::RoundedRect { fill, .. } | Self::Circle { fill } | Self::Polygon { fill, .. } => {
                *fill
            }
        }
    }

    /// Polygon vertices scaled to a box of the given size.
    #[must_use]
    pub fn scaled_points(&self, width: f32, height: f32) -> Vec<(f32, f32)> {
        match self {
            Self::Polygon { points, .. } => points
                .iter()
                .map(|(fx, fy)| (fx * width, fy * height))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Label editor overlay shown on the selected node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextEditor {
    /// Current label text.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f32,
}

/// Resize affordance shown on the selected node, relative to the node box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResizeHandle {
    /// Left edge of the handle.
    pub x: f32,
    /// Top edge of the handle.
    pub y: f32,
    /// Width and height of the handle.
    pub size: f32,
}

impl ResizeHandle {
    fn for_box(width: f32, height: f32) -> Self {
        let offset = RESIZE_HANDLE_INSET + RESIZE_HANDLE_SIZE;
        Self {
            x: (width - offset).max(0.0),
            y: (height - offset).max(0.0),
            size: RESIZE_HANDLE_SIZE,
        }
    }
}

/// Drawable view of one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    /// Node id.
    pub id: NodeId,
    /// Node shape kind.
    pub kind: ShapeKind,
    /// Left edge on the canvas.
    pub x: f32,
    /// Top edge on the canvas.
    pub y: f32,
    /// Box width.
    pub width: f32,
    /// Box height.
    pub height: f32,
    /// Shape drawn inside the box.
    pub geometry: ShapeGeometry,
    /// Label text.
    pub label: String,
    /// Label editor, present only on the selected node.
    pub editor: Option<TextEditor>,
    /// Resize handle, present only on the selected node.
    pub resize_handle: Option<ResizeHandle>,
}

impl NodeView {
    fn project(node: &ShapeNode, selected: bool) -> Self {
        let (width, height) = (node.size.width, node.size.height);
        Self {
            id: node.id.clone(),
            kind: node.kind,
            x: node.position.left,
            y: node.position.top,
            width,
            height,
            geometry: ShapeGeometry::for_kind(node.kind),
            label: node.text.clone(),
            editor: selected.then(|| TextEditor {
                text: node.text.clone(),
                font_size: LABEL_FONT_SIZE,
            }),
            resize_handle: selected.then(|| ResizeHandle::for_box(width, height)),
        }
    }

    /// Whether this view belongs to the selected node.
    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.editor.is_some()
    }
}

/// Drawable view of the whole canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanvasView {
    /// Canvas width.
    pub width: f32,
    /// Canvas height.
    pub height: f32,
    /// Node views in paint order.
    pub nodes: Vec<NodeView>,
}

impl CanvasView {
    /// Project a state snapshot into a view.
    #[must_use]
    pub fn project(state: &FlowchartState) -> Self {
        let frame = state.frame();
        Self {
            width: frame.width,
            height: frame.height,
            nodes: state
                .store()
                .nodes()
                .iter()
                .map(|node| NodeView::project(node, state.is_selected(&node.id)))
                .collect(),
        }
    }

    /// Find the view of a node.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&NodeView> {
        self.nodes.iter().find(|view| &view.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_core::{CanvasFrame, InteractionEvent, NodeStore};

    fn state_from(json: &str) -> FlowchartState {
        let store = NodeStore::from_json(json).expect("valid nodes");
        FlowchartState::with_store(store, CanvasFrame::default())
    }

    #[test]
    fn test_single_rectangle_projection() {
        let state = state_from(
            r#"[{"id":"n1","type":"Rectangle","position":{"top":100,"left":100}}]"#,
        );
        let view = CanvasView::project(&state);

        assert_eq!(view.nodes.len(), 1);
        let node = &view.nodes[0];
        assert!(matches!(node.geometry, ShapeGeometry::RoundedRect { .. }));
        assert!((node.x - 100.0).abs() < f32::EPSILON);
        assert!((node.y - 100.0).abs() < f32::EPSILON);
        assert!(node.editor.is_none());
        assert!(node.resize_handle.is_none());
    }

    #[test]
    fn test_geometry_per_kind() {
        assert_eq!(ShapeGeometry::for_kind(ShapeKind::Circle).fill(), "#aaa");
        assert_eq!(
            ShapeGeometry::for_kind(ShapeKind::Diamond).scaled_points(100.0, 50.0),
            vec![(50.0, 0.0), (100.0, 25.0), (50.0, 50.0), (0.0, 25.0)]
        );
        assert_eq!(
            ShapeGeometry::for_kind(ShapeKind::Parallelogram).scaled_points(100.0, 50.0),
            vec![(20.0, 0.0), (80.0, 0.0), (100.0, 50.0), (0.0, 50.0)]
        );
    }

    #[test]
    fn test_only_selected_node_gets_overlays() {
        let mut state = state_from(
            r#"[{"id":"a","type":"Rectangle","position":{"top":0,"left":0},"text":"start"},
                {"id":"b","type":"Circle","position":{"top":200,"left":0}}]"#,
        );
        state
            .apply(&InteractionEvent::NodeClick { id: "a".into() })
            .expect("select");

        let view = CanvasView::project(&state);
        let a = view.node(&"a".into()).expect("a");
        let b = view.node(&"b".into()).expect("b");

        assert_eq!(a.editor.as_ref().map(|e| e.text.as_str()), Some("start"));
        assert_eq!(
            a.resize_handle,
            Some(ResizeHandle {
                x: 133.0,
                y: 58.0,
                size: RESIZE_HANDLE_SIZE
            })
        );
        assert!(!b.is_selected());
        assert!(b.resize_handle.is_none());
    }
}
