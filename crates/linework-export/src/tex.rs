//! LaTeX `picture` export using the `curve2e` package.
//!
//! Produces a standalone document. Coordinates are model units times the
//! camera scale, in the picture's default unit length. TeX has y pointing up
//! while label offsets have it pointing down, so the offset's y is negated.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use linework_hlr::{BoundingBox2D, LabelAnchor, LineType, ProjectedSegment, RenderResult};
use linework_math::EPS;

use crate::EmitOptions;

const HEADER: &str = "\\documentclass[a4paper,landscape]{article}
\\usepackage[margin=1in]{geometry}
\\usepackage[dvipdfmx]{curve2e}
\\begin{document}
";
const FOOTER: &str = "\\end{document}";

/// Dash length argument of `\Dline` for hidden lines.
const HIDDEN_DASH: u32 = 6;

fn dash_length(line_type: LineType) -> Option<u32> {
    match line_type {
        LineType::Solid => None,
        LineType::LongDash => Some(6),
        LineType::ShortDash => Some(4),
        LineType::Dotted => Some(2),
        LineType::DashDot => Some(1),
    }
}

/// TeX picture document builder.
pub struct TexDocument {
    scale: f64,
    bounds: BoundingBox2D,
    body: Vec<String>,
    thickness: Option<f64>,
    num_lines: usize,
}

impl TexDocument {
    /// Create an empty picture sized by `bounds` (model units).
    pub fn new(scale: f64, bounds: BoundingBox2D) -> Self {
        Self {
            scale,
            bounds,
            body: Vec::new(),
            thickness: None,
            num_lines: 0,
        }
    }

    /// Build a document from a render result.
    pub fn from_render(result: &RenderResult, scale: f64, options: &EmitOptions) -> Self {
        let mut doc = Self::new(scale, result.bounds);
        for seg in &result.visible {
            doc.add_visible(seg);
        }
        if options.draw_hidden {
            for seg in &result.hidden {
                doc.add_hidden(seg);
            }
        }
        for label in &result.labels {
            doc.add_label(label);
        }
        doc
    }

    fn set_thickness(&mut self, thickness: f64) {
        if self.thickness == Some(thickness) {
            return;
        }
        self.body.push(format!("\\linethickness{{{}mm}}", thickness / 10.0));
        self.thickness = Some(thickness);
    }

    fn push_line(&mut self, seg: &ProjectedSegment, dash: Option<u32>) {
        if (seg.start.x - seg.end.x).abs() + (seg.start.y - seg.end.y).abs() < EPS {
            return;
        }
        let s = self.scale;
        let (x1, y1) = (seg.start.x * s, seg.start.y * s);
        let (x2, y2) = (seg.end.x * s, seg.end.y * s);
        self.set_thickness(seg.style.thickness);
        let line = match dash {
            None => format!("\\Line({x1},{y1})({x2},{y2})"),
            Some(d) => format!("\\Dline({x1},{y1})({x2},{y2}){{{d}}}"),
        };
        self.body.push(line);
        self.num_lines += 1;
    }

    /// Add a visible segment, dashed according to its style.
    pub fn add_visible(&mut self, seg: &ProjectedSegment) {
        self.push_line(seg, dash_length(seg.style.line_type));
    }

    /// Add a hidden segment, always dashed.
    pub fn add_hidden(&mut self, seg: &ProjectedSegment) {
        self.push_line(seg, Some(HIDDEN_DASH));
    }

    /// Add a point label. The text is written verbatim, so it may contain
    /// TeX markup.
    pub fn add_label(&mut self, label: &LabelAnchor) {
        let x = label.anchor.x * self.scale + label.offset.x + 5.0;
        let y = label.anchor.y * self.scale - label.offset.y + 5.0;
        self.body.push(format!("\\put({x},{y}){{{}}}", label.text));
    }

    /// Number of `\Line`/`\Dline` commands.
    pub fn num_lines(&self) -> usize {
        self.num_lines
    }

    /// Export to a `.tex` file.
    pub fn export(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.export_to_writer(writer)
    }

    /// Export to a writer. Writes nothing when nothing visible was drawn.
    pub fn export_to_writer(&self, mut writer: impl Write) -> std::io::Result<()> {
        if !self.bounds.is_valid() {
            return Ok(());
        }
        let s = self.scale;
        writer.write_all(HEADER.as_bytes())?;
        writeln!(
            writer,
            "\\begin{{picture}}({},{})({},{})",
            self.bounds.width() * s,
            self.bounds.height() * s,
            self.bounds.min_x * s,
            self.bounds.min_y * s
        )?;
        for line in &self.body {
            writeln!(writer, "{line}")?;
        }
        writeln!(writer, "\\end{{picture}}")?;
        writeln!(writer, "{FOOTER}")?;
        writer.flush()
    }
}
