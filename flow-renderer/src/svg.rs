//! SVG serialization of a [`CanvasView`].

use std::fmt::Write;

use crate::view::{CanvasView, NodeView, ShapeGeometry, LABEL_FONT_SIZE};

/// Line height of multi-line labels, as a multiple of the font size.
const LINE_HEIGHT: f32 = 1.2;

/// Options controlling SVG output.
#[derive(Debug, Clone)]
pub struct SvgOptions {
    /// Draw the label editor and resize handle of the selected node.
    pub include_overlays: bool,
    /// Canvas background color; `None` leaves the canvas transparent.
    pub background: Option<String>,
    /// Output scale factor (e.g. 2.0 for retina).
    pub scale: f32,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            include_overlays: true,
            background: Some("#fff".to_string()),
            scale: 1.0,
        }
    }
}

impl SvgOptions {
    /// Options for a static export: no interactive overlays.
    #[must_use]
    pub fn for_export() -> Self {
        Self {
            include_overlays: false,
            ..Self::default()
        }
    }
}

/// Render a canvas view to an SVG document.
#[must_use]
pub fn render_svg(view: &CanvasView, options: &SvgOptions) -> String {
    let (out_w, out_h) = output_size(view, options.scale);

    let mut svg = String::with_capacity(512 + view.nodes.len() * 256);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {} {}\">",
        view.width, view.height,
    );

    if let Some(bg) = &options.background {
        let _ = write!(
            svg,
            "<rect class=\"canvas-background\" width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape_xml(bg),
        );
    }

    for node in &view.nodes {
        render_node(&mut svg, node, options.include_overlays);
    }

    svg.push_str("</svg>");
    svg
}

/// Pixel size of the rendered document.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn output_size(view: &CanvasView, scale: f32) -> (u32, u32) {
    let w = (view.width.max(1.0) * scale).round() as u32;
    let h = (view.height.max(1.0) * scale).round() as u32;
    (w.max(1), h.max(1))
}

fn render_node(svg: &mut String, node: &NodeView, include_overlays: bool) {
    let _ = write!(
        svg,
        "<g id=\"{}\" data-kind=\"{}\" transform=\"translate({},{})\">",
        escape_xml(node.id.as_str()),
        node.kind,
        node.x,
        node.y,
    );

    render_shape(svg, node);
    render_label(svg, node);

    if include_overlays {
        if let Some(editor) = &node.editor {
            let _ = write!(
                svg,
                "<rect class=\"text-editor\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"#1e90ff\" stroke-dasharray=\"4 2\" data-font-size=\"{}\"/>",
                node.width, node.height, editor.font_size,
            );
        }
        if let Some(handle) = &node.resize_handle {
            let r = handle.size / 2.0;
            let _ = write!(
                svg,
                "<circle class=\"resize-handle\" cx=\"{}\" cy=\"{}\" r=\"{r}\" fill=\"#000\"/>",
                handle.x + r,
                handle.y + r,
            );
        }
    }

    svg.push_str("</g>");
}

fn render_shape(svg: &mut String, node: &NodeView) {
    let class = format!("shape {}", node.kind.name().to_ascii_lowercase());
    match &node.geometry {
        ShapeGeometry::RoundedRect { rx, fill } => {
            let _ = write!(
                svg,
                "<rect class=\"{class}\" x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" rx=\"{rx}\" fill=\"{fill}\"/>",
                node.width, node.height,
            );
        }
        ShapeGeometry::Circle { fill } => {
            let r = node.width.min(node.height) / 2.0;
            let _ = write!(
                svg,
                "<circle class=\"{class}\" cx=\"{}\" cy=\"{}\" r=\"{r}\" fill=\"{fill}\"/>",
                node.width / 2.0,
                node.height / 2.0,
            );
        }
        geometry @ ShapeGeometry::Polygon { fill, .. } => {
            let points = geometry
                .scaled_points(node.width, node.height)
                .iter()
                .map(|(x, y)| format!("{x},{y}"))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = write!(
                svg,
                "<polygon class=\"{class}\" points=\"{points}\" fill=\"{fill}\"/>",
            );
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn render_label(svg: &mut String, node: &NodeView) {
    if node.label.trim().is_empty() {
        return;
    }

    let lines: Vec<&str> = node.label.lines().collect();
    let line_height = LABEL_FONT_SIZE * LINE_HEIGHT;
    let cx = node.width / 2.0;
    let first_y = node.height / 2.0 - (lines.len() as f32 - 1.0) * line_height / 2.0;

    let _ = write!(
        svg,
        "<text class=\"label\" x=\"{cx}\" y=\"{first_y}\" font-size=\"{LABEL_FONT_SIZE}\" font-family=\"sans-serif\" text-anchor=\"middle\" dominant-baseline=\"middle\">",
    );
    for (i, line) in lines.iter().enumerate() {
        let dy = if i == 0 { 0.0 } else { line_height };
        let _ = write!(
            svg,
            "<tspan x=\"{cx}\" dy=\"{dy}\">{}</tspan>",
            escape_xml(line),
        );
    }
    svg.push_str("</text>");
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_core::{CanvasFrame, FlowchartState, InteractionEvent, NodeStore};

    fn view_of(json: &str) -> CanvasView {
        let store = NodeStore::from_json(json).expect("valid nodes");
        CanvasView::project(&FlowchartState::with_store(store, CanvasFrame::new(800.0, 600.0)))
    }

    #[test]
    fn test_one_rectangle_at_its_position() {
        let view = view_of(r#"[{"id":"n1","type":"Rectangle","position":{"top":100,"left":100}}]"#);
        let svg = render_svg(&view, &SvgOptions::default());

        assert_eq!(svg.matches("class=\"shape rectangle\"").count(), 1);
        assert_eq!(svg.matches("class=\"shape").count(), 1);
        assert!(svg.contains("<g id=\"n1\" data-kind=\"Rectangle\" transform=\"translate(100,100)\">"));
        assert!(svg.contains("rx=\"5\" fill=\"#ccc\""));
    }

    #[test]
    fn test_document_size() {
        let view = view_of("[]");
        let svg = render_svg(&view, &SvgOptions::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("height=\"600\""));
    }

    #[test]
    fn test_scale_keeps_view_box() {
        let view = view_of("[]");
        let svg = render_svg(
            &view,
            &SvgOptions {
                scale: 2.0,
                ..SvgOptions::default()
            },
        );
        assert!(svg.contains("width=\"1600\""));
        assert!(svg.contains("viewBox=\"0 0 800 600\""));
    }

    #[test]
    fn test_each_shape_kind() {
        let view = view_of(
            r#"[{"id":"c","type":"Circle","position":{"top":0,"left":0},"size":{"width":100,"height":60}},
                {"id":"d","type":"Diamond","position":{"top":0,"left":0},"size":{"width":100,"height":60}},
                {"id":"p","type":"Parallelogram","position":{"top":0,"left":0},"size":{"width":100,"height":60}}]"#,
        );
        let svg = render_svg(&view, &SvgOptions::default());

        assert!(svg.contains("<circle class=\"shape circle\" cx=\"50\" cy=\"30\" r=\"30\" fill=\"#aaa\"/>"));
        assert!(svg.contains("points=\"50,0 100,30 50,60 0,30\" fill=\"#ffcc00\""));
        assert!(svg.contains("points=\"20,0 80,0 100,60 0,60\" fill=\"#ff6666\""));
    }

    #[test]
    fn test_overlays_follow_selection() {
        let store = NodeStore::from_json(
            r#"[{"id":"n1","type":"Diamond","position":{"top":10,"left":10}}]"#,
        )
        .expect("nodes");
        let mut state = FlowchartState::with_store(store, CanvasFrame::default());

        let svg = render_svg(&CanvasView::project(&state), &SvgOptions::default());
        assert!(!svg.contains("resize-handle"));

        state
            .apply(&InteractionEvent::NodeClick { id: "n1".into() })
            .expect("select");
        let view = CanvasView::project(&state);

        let interactive = render_svg(&view, &SvgOptions::default());
        assert!(interactive.contains("class=\"text-editor\""));
        assert!(interactive.contains("class=\"resize-handle\""));

        let exported = render_svg(&view, &SvgOptions::for_export());
        assert!(!exported.contains("text-editor"));
        assert!(!exported.contains("resize-handle"));
    }

    #[test]
    fn test_labels_are_escaped_and_split() {
        let view = view_of(
            r#"[{"id":"n1","type":"Rectangle","position":{"top":0,"left":0},"text":"a < b\nthen"}]"#,
        );
        let svg = render_svg(&view, &SvgOptions::default());
        assert!(svg.contains(">a &lt; b</tspan>"));
        assert!(svg.contains(">then</tspan>"));
        assert_eq!(svg.matches("<tspan").count(), 2);
    }

    #[test]
    fn test_empty_label_renders_no_text() {
        let view = view_of(r#"[{"id":"n1","type":"Circle","position":{"top":0,"left":0}}]"#);
        let svg = render_svg(&view, &SvgOptions::default());
        assert!(!svg.contains("<text"));
    }
}
