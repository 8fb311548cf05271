//! Core types for hidden-line rendering.

use std::collections::BTreeSet;

use linework_math::{canonical_pair3, Point3};
use serde::{Deserialize, Serialize};

/// A 2D point for serializable render output.
///
/// We use a custom type instead of nalgebra::Point2 to enable serde serialization
/// without requiring nalgebra's serde feature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point2D {
    /// Create a new 2D point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };
}

impl Default for Point2D {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl From<linework_math::Point2> for Point2D {
    fn from(p: linework_math::Point2) -> Self {
        Self { x: p.x, y: p.y }
    }
}

impl From<Point2D> for linework_math::Point2 {
    fn from(p: Point2D) -> Self {
        linework_math::Point2::new(p.x, p.y)
    }
}

/// Dash pattern of a drawn segment.
///
/// Serialized as the numeric dash code used by the host geometry tool
/// (0 solid, 10/15/20/30 dashed variants). Unknown codes read as solid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum LineType {
    /// Continuous line (code 0).
    #[default]
    Solid,
    /// Short dashes (code 10).
    ShortDash,
    /// Long dashes (code 15).
    LongDash,
    /// Dots (code 20).
    Dotted,
    /// Dash-dot (code 30).
    DashDot,
}

impl LineType {
    /// Numeric dash code.
    pub fn code(self) -> u32 {
        match self {
            LineType::Solid => 0,
            LineType::ShortDash => 10,
            LineType::LongDash => 15,
            LineType::Dotted => 20,
            LineType::DashDot => 30,
        }
    }

    /// Whether the line is drawn with a dash pattern.
    pub fn is_dashed(self) -> bool {
        self != LineType::Solid
    }
}

impl From<u32> for LineType {
    fn from(code: u32) -> Self {
        match code {
            10 => LineType::ShortDash,
            15 => LineType::LongDash,
            20 => LineType::Dotted,
            30 => LineType::DashDot,
            _ => LineType::Solid,
        }
    }
}

impl From<LineType> for u32 {
    fn from(line_type: LineType) -> Self {
        line_type.code()
    }
}

/// Stroke style carried by a segment through the whole pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Stroke thickness in host units (emitters scale it).
    pub thickness: f64,
    /// Dash pattern.
    pub line_type: LineType,
}

impl Style {
    /// Thickness of polygon edges and unstyled segments.
    pub const DEFAULT_THICKNESS: f64 = 5.0;

    /// Solid style with the given thickness.
    pub fn solid(thickness: f64) -> Self {
        Self {
            thickness,
            line_type: LineType::Solid,
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::solid(Self::DEFAULT_THICKNESS)
    }
}

/// A planar polygon in 3D, as an ordered vertex loop.
pub type Polygon3D = Vec<Point3>;

/// A styled 3D segment with the faces it lies on.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment3D {
    /// Lexicographically smaller endpoint.
    pub start: Point3,
    /// Lexicographically larger endpoint.
    pub end: Point3,
    /// Stroke style.
    pub style: Style,
    /// Indices of polygons that contain this segment. Those polygons are
    /// never tested as occluders of it.
    pub on_faces: BTreeSet<usize>,
}

impl Segment3D {
    /// Create a segment, ordering its endpoints canonically.
    pub fn new(a: Point3, b: Point3, style: Style) -> Self {
        let (start, end) = canonical_pair3(a, b);
        Self {
            start,
            end,
            style,
            on_faces: BTreeSet::new(),
        }
    }

    /// Builder: mark the segment as lying on the given faces.
    pub fn on_faces(mut self, faces: impl IntoIterator<Item = usize>) -> Self {
        self.on_faces.extend(faces);
        self
    }

    /// 3D length.
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

/// A styled segment on the projection screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedSegment {
    /// Lexicographically smaller endpoint.
    pub start: Point2D,
    /// Lexicographically larger endpoint.
    pub end: Point2D,
    /// Style inherited from the 3D segment.
    pub style: Style,
}

impl ProjectedSegment {
    pub(crate) fn key(&self) -> [u64; 4] {
        [
            self.start.x.to_bits(),
            self.start.y.to_bits(),
            self.end.x.to_bits(),
            self.end.y.to_bits(),
        ]
    }
}

/// Text placed next to a projected point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelAnchor {
    /// Text to draw.
    pub text: String,
    /// Projected position of the point, in model units.
    pub anchor: Point2D,
    /// Pixel offset of the text from the scaled anchor.
    pub offset: Point2D,
}

/// 2D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    /// Minimum X coordinate.
    pub min_x: f64,
    /// Minimum Y coordinate.
    pub min_y: f64,
    /// Maximum X coordinate.
    pub max_x: f64,
    /// Maximum Y coordinate.
    pub max_y: f64,
}

impl BoundingBox2D {
    /// Create an empty bounding box.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Expand the bounding box to include a point.
    pub fn include_point(&mut self, p: Point2D) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if the bounding box is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }
}

impl Default for BoundingBox2D {
    fn default() -> Self {
        Self::empty()
    }
}

/// Output of the visibility pass: what to draw solid and what is occluded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Visibility {
    /// Visible pieces, gap-notched when gaps are enabled.
    pub visible: Vec<ProjectedSegment>,
    /// Occluded pieces.
    pub hidden: Vec<ProjectedSegment>,
}

/// A complete render: visibility, label anchors, and visible bounds.
///
/// Owned by the caller and handed to any number of emitters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderResult {
    /// Visible pieces.
    pub visible: Vec<ProjectedSegment>,
    /// Occluded pieces.
    pub hidden: Vec<ProjectedSegment>,
    /// Labels of shown points.
    pub labels: Vec<LabelAnchor>,
    /// Bounds of the visible pieces in model units.
    pub bounds: BoundingBox2D,
}

impl RenderResult {
    /// Assemble a result, computing the bounds from the visible pieces.
    pub fn new(visibility: Visibility, labels: Vec<LabelAnchor>) -> Self {
        let mut bounds = BoundingBox2D::empty();
        for seg in &visibility.visible {
            bounds.include_point(seg.start);
            bounds.include_point(seg.end);
        }
        Self {
            visible: visibility.visible,
            hidden: visibility.hidden,
            labels,
            bounds,
        }
    }

    /// Number of visible pieces.
    pub fn num_visible(&self) -> usize {
        self.visible.len()
    }

    /// Number of hidden pieces.
    pub fn num_hidden(&self) -> usize {
        self.hidden.len()
    }

    /// True when nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_type_codes() {
        for code in [0, 10, 15, 20, 30] {
            assert_eq!(LineType::from(code).code(), code);
        }
        assert_eq!(LineType::from(7), LineType::Solid);
        assert!(LineType::DashDot.is_dashed());
        assert!(!LineType::Solid.is_dashed());
    }

    #[test]
    fn test_style_serde_uses_dash_code() {
        let style: Style = serde_json::from_str(r#"{"thickness": 3, "line_type": 15}"#).unwrap();
        assert_eq!(style.line_type, LineType::LongDash);
        assert_eq!(style.thickness, 3.0);

        let json = serde_json::to_string(&Style::default()).unwrap();
        assert!(json.contains("\"line_type\":0"), "got {json}");

        let defaulted: Style = serde_json::from_str("{}").unwrap();
        assert_eq!(defaulted, Style::default());
    }

    #[test]
    fn test_segment_endpoints_are_canonical() {
        let a = Point3::new(1.0, 0.0, 0.0);
        let b = Point3::new(0.0, 2.0, 0.0);
        let seg = Segment3D::new(a, b, Style::default()).on_faces([2, 0]);
        assert_eq!(seg.start, b);
        assert_eq!(seg.end, a);
        assert_eq!(seg.on_faces.iter().copied().collect::<Vec<_>>(), vec![0, 2]);
        assert!((seg.length() - 5.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_render_result_bounds() {
        let seg = |x0, y0, x1, y1| ProjectedSegment {
            start: Point2D::new(x0, y0),
            end: Point2D::new(x1, y1),
            style: Style::default(),
        };
        let visibility = Visibility {
            visible: vec![seg(-1.0, 0.0, 2.0, 1.0), seg(0.0, -3.0, 0.5, 0.5)],
            hidden: vec![seg(-10.0, -10.0, 10.0, 10.0)],
        };
        let result = RenderResult::new(visibility, Vec::new());
        assert_eq!(result.bounds.min_x, -1.0);
        assert_eq!(result.bounds.min_y, -3.0);
        assert_eq!(result.bounds.width(), 3.0);
        assert_eq!(result.bounds.height(), 4.0);
        assert_eq!(result.num_hidden(), 1);

        assert!(!RenderResult::default().bounds.is_valid());
    }
}
