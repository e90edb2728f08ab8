//! # Flow2Code Renderer
//!
//! Turns a [`FlowchartState`] into something drawable.
//!
//! ```text
//! FlowchartState ──project──▶ CanvasView ──render_svg──▶ SVG
//!                                                    │
//!                                        (export) rasterize ──▶ flowchart.png
//! ```
//!
//! The projection is a deterministic function of the node store and the
//! selected-node pointer; nothing in this crate mutates node fields.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
#[cfg(feature = "export")]
pub mod export;
pub mod svg;
pub mod view;

pub use error::{RenderError, RenderResult};
pub use svg::{render_svg, SvgOptions};
pub use view::{CanvasView, NodeView, ResizeHandle, ShapeGeometry, TextEditor};

#[cfg(feature = "export")]
pub use export::{export_or_log, ExportArtifact, ExportConfig, FlowchartExporter, EXPORT_FILE_NAME};

use flow_core::FlowchartState;

/// Project the state and render it as an interactive SVG document.
///
/// Selected nodes carry their label editor and resize handle.
#[must_use]
pub fn render_canvas(state: &FlowchartState) -> String {
    render_svg(&CanvasView::project(state), &SvgOptions::default())
}
