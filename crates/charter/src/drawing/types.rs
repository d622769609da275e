//! Drawing modes and the styles annotations are painted with.

use charter_core::AnnotationKind;

/// Operator-selected interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawingMode {
    #[default]
    Select,
    Trendline,
    HorizontalLine,
    Rectangle,
}

impl DrawingMode {
    /// Get the display name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            DrawingMode::Select => "Select",
            DrawingMode::Trendline => "Trendline",
            DrawingMode::HorizontalLine => "H-Line",
            DrawingMode::Rectangle => "Box",
        }
    }

    /// Get the keyboard shortcut for this mode.
    pub fn shortcut(&self) -> char {
        match self {
            DrawingMode::Select => 'v',
            DrawingMode::Trendline => 't',
            DrawingMode::HorizontalLine => 'h',
            DrawingMode::Rectangle => 'b',
        }
    }

    /// Mode bound to a shortcut key, case-insensitive.
    pub fn from_shortcut(c: char) -> Option<Self> {
        let c = c.to_ascii_lowercase();
        Self::all().iter().copied().find(|m| m.shortcut() == c)
    }

    /// The kind of annotation this mode creates, if any.
    pub fn annotation_kind(&self) -> Option<AnnotationKind> {
        match self {
            DrawingMode::Select => None,
            DrawingMode::Trendline => Some(AnnotationKind::Trendline),
            DrawingMode::HorizontalLine => Some(AnnotationKind::HorizontalLine),
            DrawingMode::Rectangle => Some(AnnotationKind::Rectangle),
        }
    }

    /// Whether completing a shape takes two clicks.
    pub fn is_two_click(&self) -> bool {
        self.annotation_kind().is_some_and(AnnotationKind::needs_second_anchor)
    }

    /// Get all available modes.
    pub fn all() -> &'static [DrawingMode] {
        &[
            DrawingMode::Select,
            DrawingMode::Trendline,
            DrawingMode::HorizontalLine,
            DrawingMode::Rectangle,
        ]
    }
}

/// RGBA color, components in `0.0..=1.0`.
pub type Color = [f32; 4];

/// Default color for annotations (cyan/teal).
pub const DEFAULT_DRAWING_COLOR: Color = [0.0, 0.8, 0.8, 1.0];
/// Selected annotation color.
pub const SELECTED_DRAWING_COLOR: Color = [1.0, 0.75, 0.0, 1.0];
/// Preview color (more transparent).
pub const PREVIEW_DRAWING_COLOR: Color = [0.0, 0.8, 0.8, 0.5];

/// How a shape is stroked and filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub stroke: Color,
    /// Stroke width in logical pixels.
    pub line_width: f64,
    /// Interior fill, used by rectangles only.
    pub fill: Option<Color>,
}

impl Style {
    pub const NORMAL: Style = Style {
        stroke: DEFAULT_DRAWING_COLOR,
        line_width: 1.5,
        fill: Some([0.0, 0.8, 0.8, 0.15]),
    };

    pub const SELECTED: Style = Style {
        stroke: SELECTED_DRAWING_COLOR,
        line_width: 3.0,
        fill: Some([1.0, 0.75, 0.0, 0.15]),
    };

    pub const PREVIEW: Style = Style {
        stroke: PREVIEW_DRAWING_COLOR,
        line_width: 1.0,
        fill: Some([0.0, 0.8, 0.8, 0.08]),
    };
}
