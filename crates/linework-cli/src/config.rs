//! Render configuration from a TOML file plus command-line overrides.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use linework_hlr::RenderOptions;
use serde::Deserialize;

/// Contents of a `render.toml`.
///
/// ```toml
/// size = 480
///
/// [render]
/// gap = 0.15
/// draw_hidden = false
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Side of the SVG view box and PDF page.
    pub size: f64,
    /// Engine and emitter options.
    pub render: RenderOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: linework_export::SvgDocument::DEFAULT_SIZE,
            render: RenderOptions::default(),
        }
    }
}

/// Command-line flags that override the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub gap: Option<f64>,
    pub no_gap: bool,
    pub intersection_width: Option<f64>,
    pub no_edges: bool,
    pub no_hidden: bool,
    pub size: Option<f64>,
}

impl Config {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Apply flag overrides and normalize the render options.
    pub fn with_overrides(mut self, flags: &Overrides) -> Self {
        if let Some(gap) = flags.gap {
            self.render.gap = Some(gap);
        }
        if flags.no_gap {
            self.render.gap = None;
        }
        if let Some(width) = flags.intersection_width {
            self.render.intersection_thickness = Some(width);
        }
        if flags.no_edges {
            self.render.draw_edges = false;
        }
        if flags.no_hidden {
            self.render.draw_hidden = false;
        }
        if let Some(size) = flags.size {
            self.size = size;
        }
        self.render = self.render.validate();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_toml() {
        let config =
            Config::from_toml("size = 480\n[render]\ngap = 0.15\ndraw_hidden = false\n").unwrap();
        assert_eq!(config.size, 480.0);
        assert_eq!(config.render.gap, Some(0.15));
        assert!(!config.render.draw_hidden);
        assert_eq!(config.render.intersection_thickness, Some(4.0));
        assert!(config.render.draw_edges);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn test_flags_override_file() {
        let config = Config::from_toml("[render]\ngap = 0.3\n").unwrap();
        let flags = Overrides {
            no_gap: true,
            intersection_width: Some(0.0),
            no_edges: true,
            size: Some(200.0),
            ..Default::default()
        };
        let config = config.with_overrides(&flags);
        assert_eq!(config.render.gap, None);
        // Non-positive widths switch the feature off.
        assert_eq!(config.render.intersection_thickness, None);
        assert!(!config.render.draw_edges);
        assert_eq!(config.size, 200.0);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(Config::from_toml("size = \"big\"").is_err());
    }
}
