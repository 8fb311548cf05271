#![warn(missing_docs)]

//! Hidden-line removal for 3D wireframe diagrams.
//!
//! Takes a scene of labeled points, opaque planar polygons, and styled
//! segments, places it in front of a perspective camera, and splits every
//! segment into visible and hidden 2D pieces. Visible pieces can be notched
//! where a nearer segment crosses in front of them.
//!
//! # Example
//!
//! ```
//! use linework_hlr::{render, RenderOptions, Scene};
//!
//! let scene = Scene::from_json(r#"{
//!     "camera": {"eye_x": 50, "screen_x": 30, "x_angle": 0, "z_angle": 0},
//!     "polygons": [{"vertices": [[0, -2, -2], [0, 2, -2], [0, 2, 2], [0, -2, 2]]}],
//!     "segments": [{"start": [-5, -1, 0], "end": [-5, 1, 0]}]
//! }"#).unwrap();
//!
//! let options = RenderOptions::default();
//! let assembly = scene.assemble(&options).unwrap();
//! let result = render(&assembly, &scene.camera, &options).unwrap();
//! // The wall's four edges stay visible; the segment behind it is hidden.
//! assert_eq!(result.num_visible(), 4);
//! assert_eq!(result.num_hidden(), 1);
//! ```

pub mod camera;
pub mod error;
pub mod hidden_line;
pub mod identity;
pub mod options;
pub mod projection;
pub mod scene;
pub mod types;

pub use camera::Camera;
pub use error::{HlrError, Result};
pub use hidden_line::{render, visible_segments};
pub use identity::SegmentIndex;
pub use options::RenderOptions;
pub use scene::{Assembly, LabeledPoint, PolygonSpec, Scene, SegmentSpec, VertexRef};
pub use types::{
    BoundingBox2D, LabelAnchor, LineType, Point2D, Polygon3D, ProjectedSegment, RenderResult,
    Segment3D, Style, Visibility,
};
