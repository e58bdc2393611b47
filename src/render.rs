//! Document backends for laid-out transcripts, and the export operation that writes them.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use clap::ValueEnum;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect};
use tracing::info;

use crate::layout::{build_transcript, DrawOp, Rgb, TranscriptDocument};
use crate::metrics::{FontWeight, HelveticaMetrics};
use crate::models::ProcessedGradesData;
use crate::scale::GradeScale;

pub trait DocumentBackend {
    /// File extension without the leading dot.
    fn extension(&self) -> &'static str;

    fn render(&self, document: &TranscriptDocument) -> anyhow::Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pdf,
    Json,
}

impl OutputFormat {
    pub fn backend(self) -> Box<dyn DocumentBackend> {
        match self {
            OutputFormat::Pdf => Box::new(PdfBackend),
            OutputFormat::Json => Box::new(JsonBackend),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfBackend;

struct PdfFonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn pdf_color(color: Rgb) -> Color {
    let Rgb(r, g, b) = color;
    Color::Rgb(printpdf::Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

fn draw_op(layer: &PdfLayerReference, op: &DrawOp, page_height: f64, fonts: &PdfFonts) {
    // Layout y runs down from the top edge, PDF y runs up from the bottom edge.
    match op {
        DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        } => {
            layer.set_fill_color(pdf_color(*color));
            layer.add_rect(Rect::new(
                Mm(*x as f32),
                Mm((page_height - y - height) as f32),
                Mm((x + width) as f32),
                Mm((page_height - y) as f32),
            ));
        }
        DrawOp::Text {
            text,
            x,
            y,
            size,
            weight,
            color,
        } => {
            let font = match weight {
                FontWeight::Normal => &fonts.regular,
                FontWeight::Bold => &fonts.bold,
            };
            layer.set_fill_color(pdf_color(*color));
            layer.use_text(
                text.as_str(),
                *size as f32,
                Mm(*x as f32),
                Mm((page_height - y) as f32),
                font,
            );
        }
    }
}

impl DocumentBackend for PdfBackend {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, document: &TranscriptDocument) -> anyhow::Result<Vec<u8>> {
        let width = Mm(document.page_width as f32);
        let height = Mm(document.page_height as f32);
        let (pdf, first_page, first_layer) =
            PdfDocument::new(document.file_stem.as_str(), width, height, "Layer 1");

        let fonts = PdfFonts {
            regular: pdf
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| anyhow!("failed to load Helvetica: {e}"))?,
            bold: pdf
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| anyhow!("failed to load Helvetica-Bold: {e}"))?,
        };

        for (index, page) in document.pages.iter().enumerate() {
            let layer = if index == 0 {
                pdf.get_page(first_page).get_layer(first_layer)
            } else {
                let (page_index, layer_index) = pdf.add_page(width, height, "Layer 1");
                pdf.get_page(page_index).get_layer(layer_index)
            };
            for op in &page.ops {
                draw_op(&layer, op, document.page_height, &fonts);
            }
        }

        pdf.save_to_bytes()
            .map_err(|e| anyhow!("failed to serialize PDF: {e}"))
    }
}

/// The laid-out document itself, for renderers living outside this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBackend;

impl DocumentBackend for JsonBackend {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, document: &TranscriptDocument) -> anyhow::Result<Vec<u8>> {
        serde_json::to_vec_pretty(document).context("failed to serialize transcript layout")
    }
}

pub fn artifact_path(out_dir: &Path, document: &TranscriptDocument, backend: &dyn DocumentBackend) -> PathBuf {
    out_dir.join(format!("{}.{}", document.file_stem, backend.extension()))
}

/// Lay out, render and save a transcript, returning the written path.
pub fn export_transcript(
    data: &ProcessedGradesData,
    scale: &GradeScale,
    backend: &dyn DocumentBackend,
    out_dir: &Path,
    generated_on: NaiveDate,
) -> anyhow::Result<PathBuf> {
    let document = build_transcript(data, scale, &HelveticaMetrics, generated_on);
    let bytes = backend.render(&document)?;

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;
    let path = artifact_path(out_dir, &document, backend);
    std::fs::write(&path, &bytes).with_context(|| format!("failed to write {}", path.display()))?;

    info!(
        path = %path.display(),
        pages = document.page_count(),
        bytes = bytes.len(),
        "transcript exported"
    );
    Ok(path)
}
