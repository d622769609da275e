//! Annotation types for persistent chart drawings.
//!
//! Annotations are anchored in chart space ([`Point`]: time and price), never
//! in pixels, so they stay put while the chart pans, zooms and resizes.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::time::TimePoint;

/// Unique identifier for an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationId(Uuid);

impl AnnotationId {
    /// Generate a new unique annotation ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnnotationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A logical anchor in chart space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub time: TimePoint,
    pub price: f64,
}

impl Point {
    pub fn new(time: TimePoint, price: f64) -> Self {
        Self { time, price }
    }
}

/// The shape kinds an annotation can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Trendline,
    HorizontalLine,
    Rectangle,
}

impl AnnotationKind {
    /// Whether this kind is specified by two anchors.
    pub fn needs_second_anchor(self) -> bool {
        !matches!(self, AnnotationKind::HorizontalLine)
    }

    pub fn name(self) -> &'static str {
        match self {
            AnnotationKind::Trendline => "trendline",
            AnnotationKind::HorizontalLine => "horizontal line",
            AnnotationKind::Rectangle => "rectangle",
        }
    }
}

/// Construction-time violations of the anchor invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("a {} needs a second anchor", .0.name())]
    MissingSecondAnchor(AnnotationKind),
    #[error("a horizontal line takes a single anchor")]
    UnexpectedSecondAnchor,
}

/// A horizontal price level spanning the visible width.
///
/// Only `level.price` is drawn; the time is kept for the record.
#[derive(Debug, Clone, PartialEq)]
pub struct HorizontalLine {
    pub id: AnnotationId,
    pub level: Point,
}

/// A line segment between two anchors.
#[derive(Debug, Clone, PartialEq)]
pub struct Trendline {
    pub id: AnnotationId,
    pub start: Point,
    pub end: Point,
}

/// An axis-aligned box defined by two opposite corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub id: AnnotationId,
    pub corner1: Point,
    pub corner2: Point,
}

impl Rectangle {
    pub fn price_min(&self) -> f64 {
        self.corner1.price.min(self.corner2.price)
    }

    pub fn price_max(&self) -> f64 {
        self.corner1.price.max(self.corner2.price)
    }

    pub fn time_min(&self) -> TimePoint {
        self.corner1.time.min(self.corner2.time)
    }

    pub fn time_max(&self) -> TimePoint {
        self.corner1.time.max(self.corner2.time)
    }
}

/// A persistent chart annotation.
///
/// The variant fixes the number of anchors, so a horizontal line with two
/// anchors or a rectangle with one cannot be represented. Persisted records
/// are validated on the way in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnnotationRecord", into = "AnnotationRecord")]
pub enum Annotation {
    HorizontalLine(HorizontalLine),
    Trendline(Trendline),
    Rectangle(Rectangle),
}

impl Annotation {
    /// Build an annotation with a fresh ID, checking the anchor invariant.
    pub fn new(kind: AnnotationKind, anchor1: Point, anchor2: Option<Point>) -> Result<Self, AnnotationError> {
        Self::with_id(AnnotationId::new(), kind, anchor1, anchor2)
    }

    /// Build an annotation with a known ID, checking the anchor invariant.
    pub fn with_id(
        id: AnnotationId,
        kind: AnnotationKind,
        anchor1: Point,
        anchor2: Option<Point>,
    ) -> Result<Self, AnnotationError> {
        match (kind, anchor2) {
            (AnnotationKind::HorizontalLine, None) => Ok(Annotation::HorizontalLine(HorizontalLine { id, level: anchor1 })),
            (AnnotationKind::HorizontalLine, Some(_)) => Err(AnnotationError::UnexpectedSecondAnchor),
            (AnnotationKind::Trendline, Some(end)) => Ok(Annotation::Trendline(Trendline {
                id,
                start: anchor1,
                end,
            })),
            (AnnotationKind::Rectangle, Some(corner2)) => Ok(Annotation::Rectangle(Rectangle {
                id,
                corner1: anchor1,
                corner2,
            })),
            (kind, None) => Err(AnnotationError::MissingSecondAnchor(kind)),
        }
    }

    pub fn horizontal_line(level: Point) -> Self {
        Annotation::HorizontalLine(HorizontalLine {
            id: AnnotationId::new(),
            level,
        })
    }

    pub fn trendline(start: Point, end: Point) -> Self {
        Annotation::Trendline(Trendline {
            id: AnnotationId::new(),
            start,
            end,
        })
    }

    pub fn rectangle(corner1: Point, corner2: Point) -> Self {
        Annotation::Rectangle(Rectangle {
            id: AnnotationId::new(),
            corner1,
            corner2,
        })
    }

    pub fn id(&self) -> AnnotationId {
        match self {
            Annotation::HorizontalLine(d) => d.id,
            Annotation::Trendline(d) => d.id,
            Annotation::Rectangle(d) => d.id,
        }
    }

    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::HorizontalLine(_) => AnnotationKind::HorizontalLine,
            Annotation::Trendline(_) => AnnotationKind::Trendline,
            Annotation::Rectangle(_) => AnnotationKind::Rectangle,
        }
    }

    /// First anchor (the level of a horizontal line).
    pub fn anchor1(&self) -> Point {
        match self {
            Annotation::HorizontalLine(d) => d.level,
            Annotation::Trendline(d) => d.start,
            Annotation::Rectangle(d) => d.corner1,
        }
    }

    /// Second anchor; `None` exactly for horizontal lines.
    pub fn anchor2(&self) -> Option<Point> {
        match self {
            Annotation::HorizontalLine(_) => None,
            Annotation::Trendline(d) => Some(d.end),
            Annotation::Rectangle(d) => Some(d.corner2),
        }
    }
}

/// Flat persisted form: `{ id, kind, anchor1, anchor2? }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnnotationRecord {
    id: AnnotationId,
    kind: AnnotationKind,
    anchor1: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anchor2: Option<Point>,
}

impl TryFrom<AnnotationRecord> for Annotation {
    type Error = AnnotationError;

    fn try_from(record: AnnotationRecord) -> Result<Self, Self::Error> {
        Annotation::with_id(record.id, record.kind, record.anchor1, record.anchor2)
    }
}

impl From<Annotation> for AnnotationRecord {
    fn from(annotation: Annotation) -> Self {
        Self {
            id: annotation.id(),
            kind: annotation.kind(),
            anchor1: annotation.anchor1(),
            anchor2: annotation.anchor2(),
        }
    }
}
