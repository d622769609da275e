//! Overlay render loop.
//!
//! Repaints are requested, not performed: anything that invalidates the
//! overlay (a range change, a mutation, a pointer move with a live preview)
//! sets a shared dirty flag, and the host calls [`RenderLoop::frame`] once per
//! display frame. However many requests arrive between frames, at most one
//! repaint happens.

use std::cell::Cell;
use std::rc::Rc;

use crate::drawing::{DrawCommand, ResolvedShape, Style};

/// Logical size of the overlay and the display's pixel density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    /// Logical width in device-independent pixels.
    pub width: f64,
    /// Logical height in device-independent pixels.
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl SurfaceSize {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            device_pixel_ratio: if device_pixel_ratio > 0.0 { device_pixel_ratio } else { 1.0 },
        }
    }

    /// Backing buffer width in physical pixels, at least 1.
    pub fn buffer_width(&self) -> u32 {
        ((self.width * self.device_pixel_ratio).round() as u32).max(1)
    }

    /// Backing buffer height in physical pixels, at least 1.
    pub fn buffer_height(&self) -> u32 {
        ((self.height * self.device_pixel_ratio).round() as u32).max(1)
    }
}

impl Default for SurfaceSize {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// The transparent drawing surface stacked over the host chart.
///
/// Shapes are given in logical pixels; the surface applies the scale set by
/// [`set_scale`](Self::set_scale) when rasterizing.
pub trait OverlaySurface {
    /// Resize the backing buffer, in physical pixels.
    fn set_buffer_size(&mut self, width: u32, height: u32);

    /// Scale applied to every subsequent draw call.
    fn set_scale(&mut self, device_pixel_ratio: f64);

    fn clear(&mut self);

    fn draw_shape(&mut self, shape: &ResolvedShape, style: &Style);
}

/// Cloneable handle that marks the overlay as needing a repaint.
///
/// Handed to range-change subscriptions so the host chart can invalidate the
/// overlay without holding a reference to it.
#[derive(Debug, Clone)]
pub struct RepaintHandle(Rc<Cell<bool>>);

impl RepaintHandle {
    pub fn request(&self) {
        self.0.set(true);
    }
}

/// Coalescing repaint scheduler for the overlay.
#[derive(Debug)]
pub struct RenderLoop {
    dirty: Rc<Cell<bool>>,
    size: SurfaceSize,
    frames: u64,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    /// A loop with a pending first paint.
    pub fn new() -> Self {
        Self {
            dirty: Rc::new(Cell::new(true)),
            size: SurfaceSize::default(),
            frames: 0,
        }
    }

    pub fn handle(&self) -> RepaintHandle {
        RepaintHandle(Rc::clone(&self.dirty))
    }

    pub fn request(&self) {
        self.dirty.set(true);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Number of repaints performed so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Apply a new size and pixel ratio to the surface and repaint.
    ///
    /// The scale is re-established on every call since resizing a buffer
    /// resets its transform.
    pub fn resize(&mut self, size: SurfaceSize, surface: &mut dyn OverlaySurface) {
        log::debug!(
            "Overlay resized to {}x{} @{}x ({}x{} px)",
            size.width,
            size.height,
            size.device_pixel_ratio,
            size.buffer_width(),
            size.buffer_height()
        );
        self.size = size;
        surface.set_buffer_size(size.buffer_width(), size.buffer_height());
        surface.set_scale(size.device_pixel_ratio);
        self.request();
    }

    /// Paint if a repaint is pending. Returns whether a paint happened.
    ///
    /// `build` is only called when painting.
    pub fn frame<F>(&mut self, surface: &mut dyn OverlaySurface, build: F) -> bool
    where
        F: FnOnce() -> Vec<DrawCommand>,
    {
        if !self.dirty.get() {
            return false;
        }
        self.paint(surface, &build());
        true
    }

    /// Clear the surface and draw `commands` in order.
    pub fn paint(&mut self, surface: &mut dyn OverlaySurface, commands: &[DrawCommand]) {
        self.dirty.set(false);
        surface.clear();
        for command in commands {
            surface.draw_shape(&command.shape, &command.style);
        }
        self.frames += 1;
    }
}
