//! # Flow2Code Core
//!
//! Flowchart model and direct-manipulation logic for the Flow2Code canvas.
//! Compiles to WASM so the browser host drives the same reducer the tests do.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               flow-core.wasm                │
//! ├─────────────────────────────────────────────┤
//! │  Node Store        │  Interaction Layer     │
//! │  - Shape nodes     │  - Palette drag/drop   │
//! │  - Insertion order │  - Node drag, resize   │
//! │  - Geometry rules  │  - Selection, labels   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Gestures are plain values ([`InteractionEvent`]) reduced against an
//! explicit [`FlowchartState`], so the whole interaction contract is testable
//! without a rendering environment.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod event;
pub mod node;
pub mod state;
pub mod store;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{FlowError, FlowResult};
pub use event::InteractionEvent;
pub use node::{NodeId, Position, ShapeKind, ShapeNode, Size};
pub use state::{CanvasFrame, FlowchartState, Outcome};
pub use store::NodeStore;

/// Flow core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
