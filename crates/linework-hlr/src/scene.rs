//! Scene description and assembly into engine inputs.
//!
//! A [`Scene`] is the serde-facing form: labeled points, polygons and
//! segments whose vertices are either point labels or literal coordinates.
//! [`Scene::assemble`] resolves references, adds polygon edges and
//! face-intersection lines, merges duplicates, and works out which faces
//! contain each segment.

use std::collections::HashMap;

use linework_math::plane::polygon_polygon_intersection;
use linework_math::{Plane, Point3, Tolerance};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::{HlrError, Result};
use crate::identity::SegmentIndex;
use crate::options::RenderOptions;
use crate::types::{Polygon3D, Segment3D, Style};

/// A vertex given by point label or by coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VertexRef {
    /// Literal `[x, y, z]`.
    Coords([f64; 3]),
    /// Label of a point in [`Scene::points`].
    Label(String),
}

/// A named point, optionally drawn with a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    /// Unique label used by vertex references.
    pub label: String,
    /// Scene coordinates.
    pub coords: [f64; 3],
    /// Whether to draw the label.
    #[serde(default)]
    pub show_label: bool,
    /// Text drawn instead of the label.
    #[serde(default)]
    pub caption: Option<String>,
    /// Pixel offset of the text from the point.
    #[serde(default)]
    pub label_offset: [f64; 2],
}

impl LabeledPoint {
    /// Text to draw next to the point.
    pub fn text(&self) -> &str {
        self.caption.as_deref().unwrap_or(&self.label)
    }
}

/// An opaque planar polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonSpec {
    /// Vertex loop, at least three.
    pub vertices: Vec<VertexRef>,
}

/// An explicitly drawn segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    /// First endpoint.
    pub start: VertexRef,
    /// Second endpoint.
    pub end: VertexRef,
    /// Stroke style.
    #[serde(default)]
    pub style: Style,
}

/// A complete diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scene {
    /// Viewpoint.
    pub camera: Camera,
    /// Named points.
    pub points: Vec<LabeledPoint>,
    /// Opaque faces.
    pub polygons: Vec<PolygonSpec>,
    /// Drawn segments.
    pub segments: Vec<SegmentSpec>,
}

/// Label text attached to a scene point.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSource {
    /// Text to draw.
    pub text: String,
    /// Scene position.
    pub position: Point3,
    /// Pixel offset.
    pub offset: [f64; 2],
}

/// Engine inputs in scene coordinates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assembly {
    /// Opaque faces.
    pub polygons: Vec<Polygon3D>,
    /// All segments: explicit, then edges, then face intersections.
    pub segments: Vec<Segment3D>,
    /// Labels of shown points.
    pub labels: Vec<LabelSource>,
    /// Number of segments added from face intersections.
    pub intersection_count: usize,
}

/// Segment list with near-duplicate merging.
struct SegmentSet {
    segments: Vec<Segment3D>,
    index: SegmentIndex,
    tolerance: Tolerance,
}

impl SegmentSet {
    fn new() -> Self {
        Self {
            segments: Vec::new(),
            index: SegmentIndex::default(),
            tolerance: Tolerance::DEFAULT,
        }
    }

    /// Add a segment, or merge its faces into an identical one.
    /// Returns true when the segment was new.
    fn add(&mut self, segment: Segment3D) -> bool {
        if self.tolerance.points_equal(&segment.start, &segment.end) {
            warn!(
                "dropping zero-length segment at ({}, {}, {})",
                segment.start.x, segment.start.y, segment.start.z
            );
            return false;
        }
        match self.index.find(&self.segments, &segment.start, &segment.end) {
            Some(existing) => {
                self.segments[existing].on_faces.extend(segment.on_faces);
                false
            }
            None => {
                let i = self.segments.len();
                self.index.insert(i, &segment);
                self.segments.push(segment);
                true
            }
        }
    }
}

fn resolve(points: &HashMap<&str, Point3>, v: &VertexRef) -> Result<Point3> {
    match v {
        VertexRef::Coords(c) => Ok(Point3::from(*c)),
        VertexRef::Label(name) => points
            .get(name.as_str())
            .copied()
            .ok_or_else(|| HlrError::UnknownPoint(name.clone())),
    }
}

impl Scene {
    /// Parse a scene from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Resolve the scene into engine inputs.
    pub fn assemble(&self, options: &RenderOptions) -> Result<Assembly> {
        let tol = Tolerance::DEFAULT;
        let points: HashMap<&str, Point3> = self
            .points
            .iter()
            .map(|p| (p.label.as_str(), Point3::from(p.coords)))
            .collect();

        let mut polygons: Vec<Polygon3D> = Vec::with_capacity(self.polygons.len());
        for (index, spec) in self.polygons.iter().enumerate() {
            if spec.vertices.len() < 3 {
                return Err(HlrError::DegeneratePolygon {
                    index,
                    vertices: spec.vertices.len(),
                });
            }
            let poly = spec
                .vertices
                .iter()
                .map(|v| resolve(&points, v))
                .collect::<Result<Polygon3D>>()?;
            polygons.push(poly);
        }

        let mut set = SegmentSet::new();
        for spec in &self.segments {
            let a = resolve(&points, &spec.start)?;
            let b = resolve(&points, &spec.end)?;
            set.add(Segment3D::new(a, b, spec.style));
        }

        if options.draw_edges {
            for (j, poly) in polygons.iter().enumerate() {
                let n = poly.len();
                for i in 0..n {
                    let edge = Segment3D::new(poly[i], poly[(i + 1) % n], Style::default())
                        .on_faces([j]);
                    set.add(edge);
                }
            }
        }

        let mut intersection_count = 0;
        if let Some(thickness) = options.intersection_thickness.filter(|&w| w > 0.0) {
            for i in 0..polygons.len() {
                for j in (i + 1)..polygons.len() {
                    for (a, b) in polygon_polygon_intersection(&polygons[i], &polygons[j])? {
                        let line = Segment3D::new(a, b, Style::solid(thickness))
                            .on_faces([i, j]);
                        if set.add(line) {
                            intersection_count += 1;
                        }
                    }
                }
            }
        }

        let mut segments = set.segments;
        for (j, poly) in polygons.iter().enumerate() {
            let is_vertex = |p: &Point3| poly.iter().any(|v| tol.points_equal(v, p));
            let plane = Plane::of_polygon(poly);
            let has_plane = plane.normal.norm_squared() > 0.0;
            for seg in segments.iter_mut() {
                if seg.on_faces.contains(&j) {
                    continue;
                }
                let by_vertices = is_vertex(&seg.start) && is_vertex(&seg.end);
                let in_plane = has_plane
                    && tol.is_zero(plane.eval(&seg.start))
                    && tol.is_zero(plane.eval(&seg.end));
                if by_vertices || in_plane {
                    seg.on_faces.insert(j);
                }
            }
        }

        let labels = self
            .points
            .iter()
            .filter(|p| p.show_label)
            .map(|p| LabelSource {
                text: p.text().to_string(),
                position: Point3::from(p.coords),
                offset: p.label_offset,
            })
            .collect();

        debug!(
            "assembled {} polygons, {} segments ({} from face intersections)",
            polygons.len(),
            segments.len(),
            intersection_count
        );

        Ok(Assembly {
            polygons,
            segments,
            labels,
            intersection_count,
        })
    }
}
