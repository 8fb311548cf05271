//! SVG export of render results.
//!
//! Model coordinates are scaled to pixels and mapped into a view box whose
//! centre is the origin, with y pointing up:
//! `(x, y) -> (x * scale + w / 2, -y * scale + h / 2)`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use linework_hlr::{LabelAnchor, LineType, ProjectedSegment, RenderResult};

use crate::EmitOptions;

/// Dash pattern for hidden lines.
const HIDDEN_DASH: &str = "6,3";

fn dash_array(line_type: LineType) -> Option<&'static str> {
    match line_type {
        LineType::Solid => None,
        LineType::LongDash => Some("6,6"),
        LineType::ShortDash => Some("4,4"),
        LineType::Dotted => Some("2,2"),
        LineType::DashDot => Some("6,3,1,3"),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

enum Element {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        dash: Option<&'static str>,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
    },
    /// Raw markup (typically MathML or HTML) placed as-is.
    Foreign {
        x: f64,
        y: f64,
        markup: String,
    },
}

/// SVG document builder.
pub struct SvgDocument {
    width: f64,
    height: f64,
    scale: f64,
    elements: Vec<Element>,
}

impl SvgDocument {
    /// Default side of the square view box, in pixels.
    pub const DEFAULT_SIZE: f64 = 360.0;

    /// Create an empty document with a `width` x `height` view box and
    /// `scale` pixels per model unit.
    pub fn new(width: f64, height: f64, scale: f64) -> Self {
        Self {
            width,
            height,
            scale,
            elements: Vec::new(),
        }
    }

    /// Build a document from a render result.
    pub fn from_render(result: &RenderResult, scale: f64, options: &EmitOptions) -> Self {
        let mut doc = Self::new(options.size, options.size, scale);
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

    fn to_view(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.scale + self.width / 2.0,
            -y * self.scale + self.height / 2.0,
        )
    }

    fn push_line(&mut self, seg: &ProjectedSegment, dash: Option<&'static str>) {
        let (x1, y1) = self.to_view(seg.start.x, seg.start.y);
        let (x2, y2) = self.to_view(seg.end.x, seg.end.y);
        self.elements.push(Element::Line {
            x1,
            y1,
            x2,
            y2,
            width: seg.style.thickness / 3.0,
            dash,
        });
    }

    /// Add a visible segment, dashed according to its style.
    pub fn add_visible(&mut self, seg: &ProjectedSegment) {
        self.push_line(seg, dash_array(seg.style.line_type));
    }

    /// Add a hidden segment, always dashed.
    pub fn add_hidden(&mut self, seg: &ProjectedSegment) {
        self.push_line(seg, Some(HIDDEN_DASH));
    }

    /// Add a point label. Text starting with `<` is treated as markup and
    /// wrapped in a `foreignObject`.
    pub fn add_label(&mut self, label: &LabelAnchor) {
        let (x, y) = self.to_view(label.anchor.x, label.anchor.y);
        // SVG and label offsets both have y pointing down.
        let x = x + label.offset.x + 5.0;
        let y = y + label.offset.y;
        if label.text.starts_with('<') {
            self.elements.push(Element::Foreign {
                x,
                y: y - 25.0,
                markup: label.text.clone(),
            });
        } else {
            self.elements.push(Element::Text {
                x,
                y: y - 5.0,
                text: escape(&label.text),
            });
        }
    }

    /// Number of line elements.
    pub fn num_lines(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, Element::Line { .. }))
            .count()
    }

    /// Export to an SVG file.
    pub fn export(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.export_to_writer(writer)
    }

    /// Export to a writer.
    pub fn export_to_writer(&self, mut writer: impl Write) -> std::io::Result<()> {
        writeln!(
            writer,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        )?;
        for element in &self.elements {
            match element {
                Element::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    width,
                    dash,
                } => {
                    write!(
                        writer,
                        r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="black" stroke-width="{width}""#
                    )?;
                    if let Some(dash) = dash {
                        write!(writer, r#" stroke-dasharray="{dash}""#)?;
                    }
                    writeln!(writer, "/>")?;
                }
                Element::Text { x, y, text } => {
                    writeln!(writer, r#"<text x="{x}" y="{y}">{text}</text>"#)?;
                }
                Element::Foreign { x, y, markup } => {
                    writeln!(
                        writer,
                        r#"<foreignObject x="{x}" y="{y}">{markup}</foreignObject>"#
                    )?;
                }
            }
        }
        writeln!(writer, "</svg>")?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linework_hlr::{Point2D, Style};

    fn render(doc: &SvgDocument) -> String {
        let mut buf = Vec::new();
        doc.export_to_writer(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64, style: Style) -> ProjectedSegment {
        ProjectedSegment {
            start: Point2D::new(x0, y0),
            end: Point2D::new(x1, y1),
            style,
        }
    }

    #[test]
    fn test_lines_are_centred_and_flipped() {
        let mut doc = SvgDocument::new(360.0, 360.0, 10.0);
        doc.add_visible(&seg(0.0, 0.0, 1.0, 2.0, Style::solid(6.0)));
        let svg = render(&doc);
        assert!(
            svg.contains(r#"<line x1="180" y1="180" x2="190" y2="160" stroke="black" stroke-width="2"/>"#),
            "{svg}"
        );
    }

    #[test]
    fn test_dash_patterns() {
        let mut doc = SvgDocument::new(100.0, 100.0, 1.0);
        let dotted = Style {
            thickness: 3.0,
            line_type: LineType::Dotted,
        };
        doc.add_visible(&seg(0.0, 0.0, 1.0, 0.0, dotted));
        doc.add_hidden(&seg(0.0, 1.0, 1.0, 1.0, Style::default()));
        let svg = render(&doc);
        assert!(svg.contains(r#"stroke-dasharray="2,2""#));
        assert!(svg.contains(r#"stroke-dasharray="6,3""#));
        assert_eq!(doc.num_lines(), 2);
    }

    #[test]
    fn test_labels_text_and_markup() {
        let mut doc = SvgDocument::new(100.0, 100.0, 10.0);
        doc.add_label(&LabelAnchor {
            text: "A&B".into(),
            anchor: Point2D::new(1.0, 1.0),
            offset: Point2D::new(2.0, 3.0),
        });
        doc.add_label(&LabelAnchor {
            text: "<math><mi>x</mi></math>".into(),
            anchor: Point2D::ORIGIN,
            offset: Point2D::ORIGIN,
        });
        let svg = render(&doc);
        // (1, 1) -> (60, 40), plus offset (2, 3) and text nudge (5, -5).
        assert!(svg.contains(r#"<text x="67" y="38">A&amp;B</text>"#), "{svg}");
        assert!(
            svg.contains(
                r#"<foreignObject x="55" y="25"><math><mi>x</mi></math></foreignObject>"#
            ),
            "{svg}"
        );
    }

    #[test]
    fn test_from_render_respects_hidden_flag() {
        let result = RenderResult {
            visible: vec![seg(0.0, 0.0, 1.0, 0.0, Style::default())],
            hidden: vec![seg(0.0, 1.0, 1.0, 1.0, Style::default())],
            ..Default::default()
        };
        let shown = SvgDocument::from_render(&result, 50.0, &EmitOptions::default());
        assert_eq!(shown.num_lines(), 2);

        let options = EmitOptions {
            draw_hidden: false,
            ..Default::default()
        };
        let omitted = SvgDocument::from_render(&result, 50.0, &options);
        assert_eq!(omitted.num_lines(), 1);
    }

    #[test]
    fn test_export_writes_file() {
        let mut doc = SvgDocument::new(50.0, 50.0, 1.0);
        doc.add_visible(&seg(0.0, 0.0, 1.0, 1.0, Style::default()));

        let path = std::env::temp_dir().join("linework_test_export.svg");
        doc.export(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<svg"));
        assert!(content.trim_end().ends_with("</svg>"));
    }
}
