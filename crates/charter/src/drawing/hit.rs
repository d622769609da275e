//! Pixel geometry of annotations: resolution and hit testing.

use charter_core::{Annotation, AnnotationId};

use crate::coords::{CoordinateMapper, ScreenPos};

/// Default hit tolerance in logical pixels.
pub const HIT_TOLERANCE: f64 = 6.0;

/// An annotation resolved to pixels under the current view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolvedShape {
    /// Spans the full surface width at row `y`.
    HorizontalLine { y: f64 },
    Segment { from: ScreenPos, to: ScreenPos },
    /// Axis-aligned box; `min` is the top-left corner.
    Rect { min: ScreenPos, max: ScreenPos },
}

impl ResolvedShape {
    /// Resolve an annotation's anchors to pixels.
    ///
    /// `None` if any anchor the shape needs does not resolve, e.g. because
    /// its time has scrolled out of view. A horizontal line needs only its
    /// price.
    pub fn resolve(annotation: &Annotation, mapper: &CoordinateMapper<'_>) -> Option<Self> {
        match annotation {
            Annotation::HorizontalLine(line) => Some(ResolvedShape::HorizontalLine {
                y: mapper.price_to_y(line.level.price)?,
            }),
            Annotation::Trendline(line) => Some(ResolvedShape::Segment {
                from: mapper.to_pixels(line.start)?,
                to: mapper.to_pixels(line.end)?,
            }),
            Annotation::Rectangle(rect) => {
                let a = mapper.to_pixels(rect.corner1)?;
                let b = mapper.to_pixels(rect.corner2)?;
                Some(ResolvedShape::Rect {
                    min: ScreenPos::new(a.x.min(b.x), a.y.min(b.y)),
                    max: ScreenPos::new(a.x.max(b.x), a.y.max(b.y)),
                })
            }
        }
    }

    /// Whether a click at `pos` selects this shape.
    ///
    /// Lines hit within `tolerance` pixels; rectangles hit anywhere inside
    /// their bounds, edges included.
    #[must_use]
    pub fn hits(&self, pos: ScreenPos, tolerance: f64) -> bool {
        match *self {
            ResolvedShape::HorizontalLine { y } => (pos.y - y).abs() < tolerance,
            ResolvedShape::Segment { from, to } => distance_to_segment(pos, from, to) < tolerance,
            ResolvedShape::Rect { min, max } => {
                pos.x >= min.x && pos.x <= max.x && pos.y >= min.y && pos.y <= max.y
            }
        }
    }
}

/// Euclidean distance from `p` to the segment `a`-`b`.
///
/// The projection parameter is clamped to `[0, 1]`, so points beyond either
/// end measure to that endpoint. A zero-length segment measures to `a`.
#[must_use]
pub fn distance_to_segment(p: ScreenPos, a: ScreenPos, b: ScreenPos) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    p.distance_to(ScreenPos::new(a.x + t * dx, a.y + t * dy))
}

/// Topmost annotation hit by a click at `pos`.
///
/// Searches in reverse z-order so later annotations win overlaps.
/// Annotations that do not resolve under the current view are skipped.
pub fn find_annotation_at(
    annotations: &[Annotation],
    pos: ScreenPos,
    mapper: &CoordinateMapper<'_>,
    tolerance: f64,
) -> Option<AnnotationId> {
    annotations
        .iter()
        .rev()
        .find(|a| ResolvedShape::resolve(a, mapper).is_some_and(|shape| shape.hits(pos, tolerance)))
        .map(Annotation::id)
}
