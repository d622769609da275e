//! Drawing interaction state machine.

use charter_core::{Annotation, AnnotationId, Point};
use charter_data::StoreError;

use super::hit::{find_annotation_at, HIT_TOLERANCE};
use super::store::AnnotationStore;
use super::types::DrawingMode;
use crate::coords::{CoordinateMapper, ScreenPos};

/// What a click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click did not resolve to chart space.
    Ignored,
    /// Select mode: the new selection, `None` if nothing was hit.
    Selected(Option<AnnotationId>),
    /// First click of a two-click gesture.
    Pending,
    /// An annotation was created (and persisted, unless the write failed).
    Created(AnnotationId),
}

/// Interaction session: mode, pending gesture and selection.
///
/// Transient and never persisted. Store mutations go through the
/// [`AnnotationStore`] passed to each handler.
#[derive(Debug)]
pub struct DrawingManager {
    mode: DrawingMode,
    /// First anchor of an in-progress two-click gesture.
    pending: Option<Point>,
    selected: Option<AnnotationId>,
    /// Last pointer position that resolved to chart space.
    cursor: Option<Point>,
    tolerance: f64,
}

impl Default for DrawingManager {
    fn default() -> Self {
        Self::new(HIT_TOLERANCE)
    }
}

impl DrawingManager {
    pub fn new(tolerance: f64) -> Self {
        Self {
            mode: DrawingMode::default(),
            pending: None,
            selected: None,
            cursor: None,
            tolerance,
        }
    }

    pub fn mode(&self) -> DrawingMode {
        self.mode
    }

    pub fn pending(&self) -> Option<Point> {
        self.pending
    }

    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Switch mode. Abandons any pending gesture but keeps the selection.
    pub fn set_mode(&mut self, mode: DrawingMode) {
        if self.pending.take().is_some() {
            log::debug!("Abandoned {} gesture", self.mode.name());
        }
        self.mode = mode;
    }

    /// Drop the pending gesture and the selection.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.selected = None;
    }

    /// Forget everything tied to the previous symbol's annotation set.
    pub fn reset_for_symbol(&mut self) {
        self.pending = None;
        self.selected = None;
        self.cursor = None;
    }

    /// Handle a pointer click at `pos`.
    ///
    /// A click that does not resolve to chart space is ignored and leaves
    /// the session unchanged. `Err` means a created annotation is in memory
    /// but could not be persisted.
    pub fn handle_click(
        &mut self,
        pos: ScreenPos,
        mapper: &CoordinateMapper<'_>,
        store: &mut AnnotationStore,
    ) -> Result<ClickOutcome, StoreError> {
        match self.mode {
            DrawingMode::Select => {
                self.selected = find_annotation_at(store.all(), pos, mapper, self.tolerance);
                Ok(ClickOutcome::Selected(self.selected))
            }

            DrawingMode::HorizontalLine => {
                let Some(point) = self.resolve(pos, mapper) else {
                    return Ok(ClickOutcome::Ignored);
                };
                let annotation = Annotation::horizontal_line(point);
                let id = annotation.id();
                store.add(annotation)?;
                Ok(ClickOutcome::Created(id))
            }

            DrawingMode::Trendline | DrawingMode::Rectangle => {
                let Some(point) = self.resolve(pos, mapper) else {
                    return Ok(ClickOutcome::Ignored);
                };
                let Some(first) = self.pending.take() else {
                    self.pending = Some(point);
                    return Ok(ClickOutcome::Pending);
                };

                let annotation = match self.mode {
                    DrawingMode::Trendline => Annotation::trendline(first, point),
                    _ => Annotation::rectangle(first, point),
                };
                let id = annotation.id();
                store.add(annotation)?;
                Ok(ClickOutcome::Created(id))
            }
        }
    }

    /// Track the pointer. Returns whether a live preview needs repainting.
    pub fn handle_move(&mut self, pos: ScreenPos, mapper: &CoordinateMapper<'_>) -> bool {
        match mapper.to_chart_space(pos) {
            Some(point) => {
                self.cursor = Some(point);
                self.pending.is_some()
            }
            None => false,
        }
    }

    /// Delete the selected annotation. A no-op without a selection.
    pub fn delete_selected(&mut self, store: &mut AnnotationStore) -> Result<Option<AnnotationId>, StoreError> {
        let Some(id) = self.selected.take() else {
            return Ok(None);
        };
        store.remove(id)?;
        Ok(Some(id))
    }

    /// Shape from the pending anchor to the pointer, for display only.
    pub fn preview(&self) -> Option<Annotation> {
        let first = self.pending?;
        let cursor = self.cursor?;
        let kind = self.mode.annotation_kind()?;
        Annotation::new(kind, first, Some(cursor)).ok()
    }

    fn resolve(&self, pos: ScreenPos, mapper: &CoordinateMapper<'_>) -> Option<Point> {
        let point = mapper.to_chart_space(pos);
        if point.is_none() {
            log::debug!("Ignoring {} click at ({:.1}, {:.1}) outside the plot", self.mode.name(), pos.x, pos.y);
        }
        point
    }
}
