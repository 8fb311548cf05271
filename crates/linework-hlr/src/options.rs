//! Render configuration.

use serde::{Deserialize, Serialize};

/// Knobs controlling scene assembly, visibility, and emitters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Width of the notch cut where a nearer segment crosses in front, in
    /// 3D units. `None` disables notching.
    pub gap: Option<f64>,
    /// Thickness of generated face-intersection lines. `None` disables
    /// intersection generation.
    pub intersection_thickness: Option<f64>,
    /// Register every polygon edge as a segment.
    pub draw_edges: bool,
    /// Emit occluded pieces as dashed lines.
    pub draw_hidden: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            gap: Some(0.2),
            intersection_thickness: Some(4.0),
            draw_edges: true,
            draw_hidden: true,
        }
    }
}

impl RenderOptions {
    /// Normalize non-positive widths to `None`.
    pub fn validate(mut self) -> Self {
        self.gap = self.gap.filter(|&g| g > 0.0);
        self.intersection_thickness = self.intersection_thickness.filter(|&w| w > 0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_drops_non_positive_widths() {
        let opts = RenderOptions {
            gap: Some(0.0),
            intersection_thickness: Some(-1.0),
            ..Default::default()
        }
        .validate();
        assert_eq!(opts.gap, None);
        assert_eq!(opts.intersection_thickness, None);

        let kept = RenderOptions::default().validate();
        assert_eq!(kept, RenderOptions::default());
    }

    #[test]
    fn test_partial_options_fill_defaults() {
        let opts: RenderOptions = serde_json::from_str(r#"{"draw_hidden": false}"#).unwrap();
        assert!(!opts.draw_hidden);
        assert_eq!(opts.gap, Some(0.2));
        assert!(opts.draw_edges);
    }
}
