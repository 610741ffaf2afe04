//! Global constants for the paint engine

/// Paint color selected when a session starts
pub const DEFAULT_COLOR: &str = "#4f46e5";

/// Global paint opacity when a session starts
pub const DEFAULT_OPACITY: f32 = 0.7;

/// Brush width in logical pixels
pub const DEFAULT_BRUSH_WIDTH: f32 = 20.0;

/// Opacity of the white hover highlight over unpainted parts
pub const DEFAULT_HOVER_OPACITY: f32 = 0.3;

/// Number of undo steps kept by default
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Minimum number of lasso points for a commit
pub const MIN_LASSO_POINTS: usize = 3;
