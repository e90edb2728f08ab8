//! Shape nodes - the building blocks of a flowchart.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{FlowError, FlowResult};

/// Default node width in pixels.
pub const DEFAULT_WIDTH: f32 = 150.0;

/// Default node height in pixels.
pub const DEFAULT_HEIGHT: f32 = 75.0;

/// Smallest width or height a node can be resized to.
pub const MIN_EXTENT: f32 = 10.0;

/// Unique identifier for a shape node.
///
/// Generated ids look like `node-<uuid>`; ids read back from a snapshot are
/// kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new unique node ID.
    #[must_use]
    pub fn new() -> Self {
        Self(format!("node-{}", Uuid::new_v4()))
    }

    /// Wrap an existing identifier.
    #[must_use]
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::from_string(id)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of shapes a node can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Process step, drawn as a rounded rectangle.
    Rectangle,
    /// Terminator, drawn as a circle.
    Circle,
    /// Decision, drawn as a diamond.
    Diamond,
    /// Input/output, drawn as a parallelogram.
    Parallelogram,
}

impl ShapeKind {
    /// Every shape kind, in palette order.
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::Diamond,
        ShapeKind::Parallelogram,
    ];

    /// The display name of this shape.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Diamond => "Diamond",
            ShapeKind::Parallelogram => "Parallelogram",
        }
    }
}

impl std::fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FlowError::UnknownShape(s.to_string()))
    }
}

/// Offset of a node's top-left corner from the canvas origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Pixels from the top edge of the canvas.
    pub top: f32,
    /// Pixels from the left edge of the canvas.
    pub left: f32,
}

impl Position {
    /// Create a position.
    #[must_use]
    pub const fn new(top: f32, left: f32) -> Self {
        Self { top, left }
    }

    /// Validate and clamp to the canvas quadrant.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidGeometry`] if either component is not finite.
    pub fn normalized(self) -> FlowResult<Self> {
        if !self.top.is_finite() || !self.left.is_finite() {
            return Err(FlowError::InvalidGeometry(format!(
                "position ({}, {}) is not finite",
                self.top, self.left
            )));
        }
        Ok(Self {
            top: self.top.max(0.0),
            left: self.left.max(0.0),
        })
    }
}

/// Width and height of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Validate and clamp to [`MIN_EXTENT`].
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidGeometry`] if either component is not finite.
    pub fn normalized(self) -> FlowResult<Self> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(FlowError::InvalidGeometry(format!(
                "size {}x{} is not finite",
                self.width, self.height
            )));
        }
        Ok(Self {
            width: self.width.max(MIN_EXTENT),
            height: self.height.max(MIN_EXTENT),
        })
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

/// A flowchart shape with its geometry and label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeNode {
    /// Unique identifier, fixed at creation.
    pub id: NodeId,
    /// Shape kind, fixed at creation.
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    /// Top-left corner relative to the canvas origin.
    pub position: Position,
    /// Bounding box size.
    #[serde(default)]
    pub size: Size,
    /// Free-form label.
    #[serde(default)]
    pub text: String,
}

impl ShapeNode {
    /// Create a node of the given kind with default size and an empty label.
    #[must_use]
    pub fn new(kind: ShapeKind, position: Position) -> Self {
        Self {
            id: NodeId::new(),
            kind,
            position,
            size: Size::default(),
            text: String::new(),
        }
    }

    /// Use an explicit identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the size.
    #[must_use]
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Set the label.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Check if a point (in canvas coordinates) is within this node's box.
    #[must_use]
    pub fn contains_point(&self, top: f32, left: f32) -> bool {
        let p = &self.position;
        top >= p.top
            && top <= p.top + self.size.height
            && left >= p.left
            && left <= p.left + self.size.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_prefixed_and_distinct() {
        let a = NodeId::new();
        let b = NodeId::new();
        assert!(a.as_str().starts_with("node-"));
        assert_ne!(a, b);
    }

    #[test]
    fn shape_kind_parses_case_insensitively() {
        assert_eq!("diamond".parse::<ShapeKind>().ok(), Some(ShapeKind::Diamond));
        assert_eq!(
            " Parallelogram ".parse::<ShapeKind>().ok(),
            Some(ShapeKind::Parallelogram)
        );
        assert!("Hexagon".parse::<ShapeKind>().is_err());
    }

    #[test]
    fn new_node_has_defaults() {
        let node = ShapeNode::new(ShapeKind::Circle, Position::new(10.0, 20.0));
        assert_eq!(node.size, Size::new(150.0, 75.0));
        assert!(node.text.is_empty());
        assert_eq!(node.kind, ShapeKind::Circle);
    }

    #[test]
    fn position_clamps_negative_components() {
        let p = Position::new(-5.0, 12.5).normalized().expect("finite");
        assert_eq!(p, Position::new(0.0, 12.5));
    }

    #[test]
    fn non_finite_geometry_is_rejected() {
        assert!(Position::new(f32::NAN, 0.0).normalized().is_err());
        assert!(Size::new(100.0, f32::INFINITY).normalized().is_err());
    }

    #[test]
    fn size_clamps_to_minimum() {
        let s = Size::new(2.0, 400.0).normalized().expect("finite");
        assert_eq!(s, Size::new(MIN_EXTENT, 400.0));
    }

    #[test]
    fn node_serializes_with_type_field() {
        let node = ShapeNode::new(ShapeKind::Rectangle, Position::new(1.0, 2.0)).with_id("n1");
        let json = serde_json::to_value(&node).expect("serialize");
        assert_eq!(json["id"], "n1");
        assert_eq!(json["type"], "Rectangle");
        assert_eq!(json["position"]["top"], 1.0);
    }

    #[test]
    fn contains_point_uses_box() {
        let node = ShapeNode::new(ShapeKind::Rectangle, Position::new(100.0, 100.0));
        assert!(node.contains_point(120.0, 200.0));
        assert!(!node.contains_point(50.0, 50.0));
    }
}
