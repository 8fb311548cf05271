//! Single-page PDF export of render results.
//!
//! The page is the same square as the SVG view box. PDF has y pointing up,
//! so model coordinates only need scaling and centring:
//! `(x, y) -> (x * scale + w / 2, y * scale + h / 2)`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use linework_hlr::{LabelAnchor, LineType, ProjectedSegment, RenderResult};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};

use crate::EmitOptions;

/// Dash pattern for hidden lines.
const HIDDEN_DASH: &[f32] = &[6.0, 3.0];

/// Label font size in points.
const FONT_SIZE: f32 = 14.0;

const FONT_NAME: Name<'static> = Name(b"F1");

fn dash_array(line_type: LineType) -> &'static [f32] {
    match line_type {
        LineType::Solid => &[],
        LineType::LongDash => &[6.0, 6.0],
        LineType::ShortDash => &[4.0, 4.0],
        LineType::Dotted => &[2.0, 2.0],
        LineType::DashDot => &[6.0, 3.0, 1.0, 3.0],
    }
}

enum Element {
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        dash: &'static [f32],
    },
    Text {
        x: f32,
        y: f32,
        text: String,
    },
}

/// PDF document builder.
pub struct PdfDocument {
    width: f64,
    height: f64,
    scale: f64,
    elements: Vec<Element>,
}

impl PdfDocument {
    /// Create an empty `width` x `height` page with `scale` points per
    /// model unit.
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

    fn to_page(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.scale + self.width / 2.0,
            y * self.scale + self.height / 2.0,
        )
    }

    fn push_line(&mut self, seg: &ProjectedSegment, dash: &'static [f32]) {
        let (x1, y1) = self.to_page(seg.start.x, seg.start.y);
        let (x2, y2) = self.to_page(seg.end.x, seg.end.y);
        self.elements.push(Element::Line {
            x1: x1 as f32,
            y1: y1 as f32,
            x2: x2 as f32,
            y2: y2 as f32,
            width: (seg.style.thickness / 3.0) as f32,
            dash,
        });
    }

    /// Add a visible segment, dashed according to its style.
    pub fn add_visible(&mut self, seg: &ProjectedSegment) {
        self.push_line(seg, dash_array(seg.style.line_type));
    }

    /// Add a hidden segment, always dashed.
    pub fn add_hidden(&mut self, seg: &ProjectedSegment) {
        self.push_line(seg, HIDDEN_DASH);
    }

    /// Add a point label. The text is drawn as-is, markup included.
    pub fn add_label(&mut self, label: &LabelAnchor) {
        let (x, y) = self.to_page(label.anchor.x, label.anchor.y);
        // Label offsets have y pointing down.
        let x = x + label.offset.x + 4.0;
        let y = y - label.offset.y + 2.0;
        self.elements.push(Element::Text {
            x: x as f32,
            y: y as f32,
            text: label.text.clone(),
        });
    }

    /// Number of line elements.
    pub fn num_lines(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, Element::Line { .. }))
            .count()
    }

    fn content(&self) -> Content {
        let mut content = Content::new();
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
                    content.set_line_width(*width);
                    content.set_dash_pattern(dash.iter().copied(), 0.0);
                    content.move_to(*x1, *y1);
                    content.line_to(*x2, *y2);
                    content.stroke();
                }
                Element::Text { x, y, text } => {
                    content.begin_text();
                    content.set_font(FONT_NAME, FONT_SIZE);
                    content.next_line(*x, *y);
                    content.show(Str(text.as_bytes()));
                    content.end_text();
                }
            }
        }
        content
    }

    /// Serialize the document to PDF bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let catalog_id = Ref::new(1);
        let page_tree_id = Ref::new(2);
        let page_id = Ref::new(3);
        let font_id = Ref::new(4);
        let content_id = Ref::new(5);

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id).kids([page_id]).count(1);

        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, self.width as f32, self.height as f32));
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources().fonts().pair(FONT_NAME, font_id);
        page.finish();

        pdf.type1_font(font_id).base_font(Name(b"Helvetica"));
        pdf.stream(content_id, &self.content().finish());
        pdf.finish()
    }

    /// Export to a PDF file.
    pub fn export(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        self.export_to_writer(writer)
    }

    /// Export to a writer.
    pub fn export_to_writer(&self, mut writer: impl Write) -> std::io::Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linework_hlr::{Point2D, Style};

    fn seg(x0: f64, y0: f64, x1: f64, y1: f64, style: Style) -> ProjectedSegment {
        ProjectedSegment {
            start: Point2D::new(x0, y0),
            end: Point2D::new(x1, y1),
            style,
        }
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_lines_are_centred_not_flipped() {
        let mut doc = PdfDocument::new(360.0, 360.0, 10.0);
        doc.add_visible(&seg(0.0, 0.0, 1.0, 2.0, Style::solid(6.0)));
        doc.add_hidden(&seg(1.0, 2.0, 2.0, 2.0, Style::default()));
        assert_eq!(doc.num_lines(), 2);

        match &doc.elements[0] {
            Element::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                dash,
            } => {
                assert_eq!((*x1, *y1, *x2, *y2), (180.0, 180.0, 190.0, 200.0));
                assert_eq!(*width, 2.0);
                assert!(dash.is_empty());
            }
            Element::Text { .. } => panic!("expected a line"),
        }
        match &doc.elements[1] {
            Element::Line { dash, .. } => assert_eq!(*dash, HIDDEN_DASH),
            Element::Text { .. } => panic!("expected a line"),
        }
    }

    #[test]
    fn test_label_position() {
        let mut doc = PdfDocument::new(100.0, 100.0, 10.0);
        doc.add_label(&LabelAnchor {
            text: "A".into(),
            anchor: Point2D::new(1.0, 1.0),
            offset: Point2D::new(2.0, 3.0),
        });
        // (1, 1) -> (60, 60), plus (2 + 4, -3 + 2).
        match &doc.elements[0] {
            Element::Text { x, y, text } => {
                assert_eq!((*x, *y), (66.0, 59.0));
                assert_eq!(text, "A");
            }
            Element::Line { .. } => panic!("expected text"),
        }
    }

    #[test]
    fn test_from_render_respects_hidden_flag() {
        let result = RenderResult {
            visible: vec![seg(0.0, 0.0, 1.0, 0.0, Style::default())],
            hidden: vec![seg(0.0, 1.0, 1.0, 1.0, Style::default())],
            ..Default::default()
        };
        let options = EmitOptions {
            draw_hidden: false,
            ..Default::default()
        };
        let shown = PdfDocument::from_render(&result, 50.0, &EmitOptions::default());
        assert_eq!(shown.num_lines(), 2);
        let omitted = PdfDocument::from_render(&result, 50.0, &options);
        assert_eq!(omitted.num_lines(), 1);
    }

    #[test]
    fn test_export_writes_pdf() {
        let mut doc = PdfDocument::new(360.0, 360.0, 10.0);
        doc.add_visible(&seg(0.0, 0.0, 1.0, 1.0, Style::default()));
        doc.add_label(&LabelAnchor {
            text: "P".into(),
            anchor: Point2D::ORIGIN,
            offset: Point2D::ORIGIN,
        });

        let path = std::env::temp_dir().join("linework_test_export.pdf");
        doc.export(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, b"/Helvetica"));
        assert!(contains(&bytes, b"(P) Tj"));
        assert!(contains(&bytes, b"%%EOF"));
    }
}
