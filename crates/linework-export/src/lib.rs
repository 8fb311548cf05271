#![warn(missing_docs)]

//! Vector output for linework render results.
//!
//! All writers are thin serializers over a [`RenderResult`]: they never
//! recompute visibility, so one result can be written in several formats.

use std::io::Write;
use std::path::Path;

use linework_hlr::{RenderOptions, RenderResult};
use log::debug;

pub mod pdf;
pub mod svg;
pub mod tex;

pub use pdf::PdfDocument;
pub use svg::SvgDocument;
pub use tex::TexDocument;

/// Settings shared by the writers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitOptions {
    /// Draw hidden pieces dashed; when false they are omitted.
    pub draw_hidden: bool,
    /// Side of the square SVG view box or PDF page.
    pub size: f64,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            draw_hidden: true,
            size: SvgDocument::DEFAULT_SIZE,
        }
    }
}

impl From<&RenderOptions> for EmitOptions {
    fn from(options: &RenderOptions) -> Self {
        Self {
            draw_hidden: options.draw_hidden,
            ..Default::default()
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Scalable vector graphics.
    Svg,
    /// LaTeX picture environment.
    Tex,
    /// Single-page PDF.
    Pdf,
}

impl Format {
    /// Pick a format by name or file extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "svg" => Some(Format::Svg),
            "tex" => Some(Format::Tex),
            "pdf" => Some(Format::Pdf),
            _ => None,
        }
    }

    /// Pick a format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(path.extension()?.to_str()?)
    }
}

/// Serialize `result` in `format` to `writer`.
pub fn emit(
    format: Format,
    result: &RenderResult,
    scale: f64,
    options: &EmitOptions,
    writer: impl Write,
) -> std::io::Result<()> {
    match format {
        Format::Svg => {
            let doc = SvgDocument::from_render(result, scale, options);
            doc.export_to_writer(writer)
        }
        Format::Tex => {
            let doc = TexDocument::from_render(result, scale, options);
            doc.export_to_writer(writer)
        }
        Format::Pdf => {
            let doc = PdfDocument::from_render(result, scale, options);
            doc.export_to_writer(writer)
        }
    }
}

/// Serialize `result` in `format` to the file at `path`.
pub fn write_to_path(
    path: impl AsRef<Path>,
    format: Format,
    result: &RenderResult,
    scale: f64,
    options: &EmitOptions,
) -> std::io::Result<()> {
    let path = path.as_ref();
    debug!("writing {format:?} to {}", path.display());
    match format {
        Format::Svg => {
            let doc = SvgDocument::from_render(result, scale, options);
            doc.export(path)
        }
        Format::Tex => {
            let doc = TexDocument::from_render(result, scale, options);
            doc.export(path)
        }
        Format::Pdf => {
            let doc = PdfDocument::from_render(result, scale, options);
            doc.export(path)
        }
    }
}
