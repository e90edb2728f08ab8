//! WebAssembly bindings for flow-core.
//!
//! The browser host forwards DOM gestures as JSON-encoded
//! [`InteractionEvent`]s and re-renders from the returned snapshot.

use wasm_bindgen::prelude::*;

use crate::{CanvasFrame, FlowchartState, InteractionEvent, NodeId, NodeStore};

/// Initialize the flowchart WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();
}

/// Flowchart session for WASM.
#[wasm_bindgen]
pub struct WasmFlowchart {
    state: FlowchartState,
}

#[wasm_bindgen]
impl WasmFlowchart {
    /// Create a new session for a canvas of the given size.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            state: FlowchartState::new(CanvasFrame::new(width, height)),
        }
    }

    /// Update where the canvas sits in the viewport.
    #[wasm_bindgen(js_name = setFrame)]
    pub fn set_frame(&mut self, offset_top: f32, offset_left: f32, width: f32, height: f32) {
        self.state
            .set_frame(CanvasFrame::new(width, height).with_offset(offset_top, offset_left));
    }

    /// Apply a JSON-encoded interaction event and return the JSON outcome.
    ///
    /// # Errors
    ///
    /// Returns an error string if the event cannot be parsed or applied.
    #[wasm_bindgen(js_name = dispatch)]
    pub fn dispatch(&mut self, event_json: &str) -> Result<String, String> {
        let event: InteractionEvent =
            serde_json::from_str(event_json).map_err(|e| e.to_string())?;
        let outcome = self.state.apply(&event).map_err(|e| e.to_string())?;
        serde_json::to_string(&outcome).map_err(|e| e.to_string())
    }

    /// Get the nodes as a JSON array.
    #[wasm_bindgen(js_name = getNodesJson)]
    #[must_use]
    pub fn get_nodes_json(&self) -> String {
        self.state.store().to_json().unwrap_or_else(|_| "[]".to_string())
    }

    /// Replace the nodes from a JSON array, clearing the selection.
    ///
    /// # Errors
    ///
    /// Returns an error string if the JSON is invalid or ids collide.
    #[wasm_bindgen(js_name = loadNodesJson)]
    pub fn load_nodes_json(&mut self, json: &str) -> Result<(), String> {
        let store = NodeStore::from_json(json).map_err(|e| e.to_string())?;
        self.state = FlowchartState::with_store(store, *self.state.frame());
        Ok(())
    }

    /// Id of the selected node, if any.
    #[wasm_bindgen(js_name = selectedId)]
    #[must_use]
    pub fn selected_id(&self) -> Option<String> {
        self.state.selected().map(NodeId::to_string)
    }

    /// Number of nodes on the canvas.
    #[wasm_bindgen(js_name = nodeCount)]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.state.store().len()
    }
}

impl Default for WasmFlowchart {
    fn default() -> Self {
        let frame = CanvasFrame::default();
        Self::new(frame.width, frame.height)
    }
}
