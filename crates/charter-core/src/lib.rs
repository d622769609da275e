//! Core types for the charter workstation.
//!
//! This crate provides the fundamental data structures shared by every
//! other crate:
//! - `TimePoint` - opaque, ordered chart time
//! - `Bar` - one bar of price history
//! - `TimeSeries` - indicator output aligned with its input
//! - `Annotation` - persistent chart drawings anchored in chart space

pub mod annotation;
pub mod bar;
pub mod series;
pub mod time;

pub use annotation::{
    Annotation, AnnotationError, AnnotationId, AnnotationKind, HorizontalLine, Point, Rectangle, Trendline,
};
pub use bar::Bar;
pub use series::TimeSeries;
pub use time::TimePoint;
