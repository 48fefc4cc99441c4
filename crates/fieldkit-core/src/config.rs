//! Editor tuning parameters.

use serde::{Deserialize, Serialize};

/// Where a freshly drawn or pasted area lands in the stacking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackMode {
    /// New areas go on top of the pile.
    #[default]
    Top,
    /// New areas go underneath existing ones.
    Bottom,
}

/// Tuning knobs for the interactive edit tools.
///
/// Distances are in map units. The defaults suit a map pane a few hundred
/// units across; embedders scale them to their projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Radius for picking features and snapping drawn endpoints to vertices.
    pub pick_tolerance: f64,
    /// Working resolution of drawn curves; also the minimum useful length
    /// for drawn segments and dividing lines.
    pub spline_resolution: f64,
    /// Smoothing factor for drawn curves, 0 to 100. Joins are only
    /// smoothed above 1.0.
    pub smoothing: f64,
    /// Offset applied when a copy is pasted over its own source.
    pub paste_offset: f64,
    /// Stacking placement for new and pasted areas.
    pub stack_mode: StackMode,
    /// Whether labels ride along with moved or merged areas.
    pub move_labels: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            pick_tolerance: 3.0,
            spline_resolution: 5.0,
            smoothing: 0.0,
            paste_offset: 5.0,
            stack_mode: StackMode::Top,
            move_labels: true,
        }
    }
}

impl EditorConfig {
    /// True when drawn joins should be smoothed.
    pub fn smoothing_active(&self) -> bool {
        self.smoothing > 1.0
    }
}
