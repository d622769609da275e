//! Interactive drawing tools for chart annotations.

mod hit;
mod state;
mod store;
mod types;

pub use hit::{distance_to_segment, find_annotation_at, ResolvedShape, HIT_TOLERANCE};
pub use state::{ClickOutcome, DrawingManager};
pub use store::{AnnotationStore, SharedPersistence};
pub use types::{Color, DrawingMode, Style, DEFAULT_DRAWING_COLOR, PREVIEW_DRAWING_COLOR, SELECTED_DRAWING_COLOR};

use charter_core::Annotation;

use crate::coords::CoordinateMapper;

/// One shape to paint, in paint order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub shape: ResolvedShape,
    pub style: Style,
}

/// Build the overlay draw list for the current view.
///
/// Annotations come first in z-order, the selected one with the selected
/// style. The live preview, if any, is last. Anything that does not resolve
/// under the current view is left out.
pub fn prepare_overlay(
    annotations: &[Annotation],
    manager: &DrawingManager,
    mapper: &CoordinateMapper<'_>,
) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(annotations.len() + 1);

    for annotation in annotations {
        let Some(shape) = ResolvedShape::resolve(annotation, mapper) else {
            continue;
        };
        let is_selected = manager.selected() == Some(annotation.id());
        commands.push(DrawCommand {
            shape,
            style: if is_selected { Style::SELECTED } else { Style::NORMAL },
        });
    }

    if let Some(shape) = manager.preview().and_then(|p| ResolvedShape::resolve(&p, mapper)) {
        commands.push(DrawCommand {
            shape,
            style: Style::PREVIEW,
        });
    }

    commands
}
