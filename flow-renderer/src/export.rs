//! Flowchart export to a PNG download.
//!
//! Renders the canvas through the SVG intermediate and rasterizes it with the
//! resvg/tiny-skia pipeline. Interactive overlays are never exported.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine as _;
use flow_core::FlowchartState;

use crate::error::{RenderError, RenderResult};
use crate::svg::{output_size, render_svg, SvgOptions};
use crate::view::CanvasView;

/// File name of the exported image.
pub const EXPORT_FILE_NAME: &str = "flowchart.png";

/// Configuration for flowchart export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Background color; `None` exports a transparent canvas.
    pub background: Option<String>,
    /// Scale factor (e.g. 2.0 for retina).
    pub scale: f32,
    /// Load system fonts so labels are drawn.
    pub load_system_fonts: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            background: Some("#fff".to_string()),
            scale: 1.0,
            load_system_fonts: true,
        }
    }
}

/// A finished export, ready to be offered as a download.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    /// Suggested file name.
    pub file_name: &'static str,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// PNG-encoded bytes.
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// The image as a `data:image/png;base64,...` URL.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// Write the image into `dir` under [`ExportArtifact::file_name`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, dir: impl AsRef<Path>) -> RenderResult<PathBuf> {
        let path = dir.as_ref().join(self.file_name);
        std::fs::write(&path, &self.bytes)?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "flowchart exported");
        Ok(path)
    }
}

/// Exports a [`FlowchartState`] to PNG.
pub struct FlowchartExporter {
    config: ExportConfig,
    fontdb: Arc<usvg::fontdb::Database>,
}

impl FlowchartExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        let mut db = usvg::fontdb::Database::new();
        if config.load_system_fonts {
            db.load_system_fonts();
        }
        Self {
            config,
            fontdb: Arc::new(db),
        }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(ExportConfig::default())
    }

    /// Render the canvas to the SVG used for export.
    #[must_use]
    pub fn render_to_svg(&self, state: &FlowchartState) -> String {
        let options = SvgOptions {
            include_overlays: false,
            background: self.config.background.clone(),
            scale: self.config.scale,
        };
        render_svg(&CanvasView::project(state), &options)
    }

    /// Export the canvas as a PNG artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization or PNG encoding fails.
    pub fn export(&self, state: &FlowchartState) -> RenderResult<ExportArtifact> {
        let view = CanvasView::project(state);
        let (width, height) = output_size(&view, self.config.scale);
        let bytes = self.rasterize(&self.render_to_svg(state))?;
        tracing::debug!(width, height, nodes = view.nodes.len(), "flowchart rasterized");
        Ok(ExportArtifact {
            file_name: EXPORT_FILE_NAME,
            width,
            height,
            bytes,
        })
    }

    /// Rasterize an SVG string to PNG bytes.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize(&self, svg: &str) -> RenderResult<Vec<u8>> {
        let mut opt = usvg::Options::default();
        opt.fontdb = Arc::clone(&self.fontdb);

        let tree = usvg::Tree::from_str(svg, &opt).map_err(|e| RenderError::Svg(e.to_string()))?;

        let px_w = tree.size().width().ceil() as u32;
        let px_h = tree.size().height().ceil() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Export(format!("cannot allocate {px_w}x{px_h} pixmap")))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }
}

impl Default for FlowchartExporter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Export the canvas, logging a failure instead of returning it.
///
/// A failed export leaves the session untouched; the caller simply has no
/// file to offer.
#[must_use]
pub fn export_or_log(exporter: &FlowchartExporter, state: &FlowchartState) -> Option<ExportArtifact> {
    match exporter.export(state) {
        Ok(artifact) => Some(artifact),
        Err(err) => {
            tracing::error!(error = %err, "flowchart export failed");
            None
        }
    }
}
