//! Fixed drawing dimensions for the canvas.
//!
//! Every value is in graph units, so all of it scales with zoom once the
//! viewport transform is applied to the context. The grid threshold is the
//! one exception and lives in [`crate::config::CanvasConfig`].

/// Distance between grid dots.
pub const GRID_SPACING: f64 = 100.0;
pub const GRID_DOT_RADIUS: f64 = 0.5;

/// Half-length of each arm of the origin crosshair.
pub const CROSSHAIR_EXTENT: f64 = 16.0;
pub const CROSSHAIR_WIDTH: f64 = 0.5;

/// Dash pattern for sibling edges.
pub const SIBLING_DASH: [f64; 2] = [5.0, 5.0];

pub const ARROW_LENGTH: f64 = 10.0;
/// Angle between the edge and each arrowhead stroke.
pub const ARROW_ANGLE: f64 = std::f64::consts::PI / 6.0;

/// Icon background radius relative to the icon size. Arrow tips stop on
/// this circle.
pub const ICON_BACKGROUND_RATIO: f64 = 1.125;
/// Vertical nudge that centers Material Symbols glyphs on their circle.
pub const ICON_GLYPH_NUDGE: f64 = 2.5;

pub const LABEL_FONT_SIZE: f64 = 14.0;
pub const LABEL_FONT: &str = "14px monospace";
/// Unselected labels are cut to this many characters.
pub const LABEL_MAX_CHARS: usize = 16;
pub const LABEL_ELLIPSIS: char = '…';

pub fn icon_radius(size: f64) -> f64 {
	size * ICON_BACKGROUND_RATIO
}

/// Canvas font for a glyph of `size`; glyphs are drawn at twice the icon
/// size with weight 200.
pub fn icon_font(family: &str, size: f64) -> String {
	format!("normal normal 200 {}px \"{family}\"", size * 2.0)
}

/// Baseline offset of a label below its vertex center.
pub fn label_offset(size: f64) -> f64 {
	size + LABEL_FONT_SIZE * 1.5
}
