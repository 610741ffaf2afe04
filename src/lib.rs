//! Livery - vehicle paint compositing and region selection
//!
//! Overlay paint on the segmented parts of a car photo, paint freehand with a
//! brush or lasso, and undo any of it. The engine is headless: hosts feed
//! pointer and key events into an [`EditorSession`] and draw the image it
//! renders.

pub mod color;
pub mod compositing;
pub mod config;
pub mod constants;
pub mod coords;
pub mod error;
pub mod gallery;
pub mod geometry;
pub mod hit_test;
pub mod history;
pub mod keybindings;
pub mod model;
pub mod raster_layer;
pub mod region;
pub mod segmentation;
pub mod session;
pub mod tools;

pub use color::PaintColor;
pub use compositing::{BlendStyle, CompositeSettings, CompositingPipeline};
pub use config::{ConfigError, EditorConfig, LogLevel, Preferences};
pub use coords::{ScreenRect, Transform, ViewportGeometry, to_logical, to_screen};
pub use error::EngineError;
pub use geometry::{Bounds, Point, Polygon};
pub use hit_test::hit_test;
pub use history::{Checkpoint, HistoryConfig, HistoryEntry, HistoryManager};
pub use keybindings::{EditorCommand, KeyBindings, KeyCode, Modifiers};
pub use model::{Part, PartId, PartSet, Provenance};
pub use region::{PaintSource, PaintState, RegionLayer};
pub use segmentation::{Analysis, RequestTicket, SegmentationService};
pub use session::{EditorSession, PointerEvent, PointerKind, Rejection, StateDelta};
pub use tools::{Cursor, LassoDraft, ToolMode, ToolState};
