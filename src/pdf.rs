use std::io::BufWriter;

use printpdf::path::PaintMode;
use printpdf::*;

use crate::error::{ReportError, Result};
use crate::layout::{
    Align, LayoutInstruction, Measure, PageGeometry, TableBlock, TableRow, AMOUNT_COLUMN,
};

const TITLE_SIZE: f32 = 18.0;
const SUBTITLE_SIZE: f32 = 14.0;
const DATE_SIZE: f32 = 10.0;
const SECTION_SIZE: f32 = 12.0;
const HEAD_SIZE: f32 = 9.0;
const BODY_SIZE: f32 = 8.0;
const SUBTOTAL_SIZE: f32 = 10.0;
const GRAND_TOTAL_SIZE: f32 = 14.0;

const HEAD_H: f32 = 7.0;
const LINE_H: f32 = 3.5;
const CELL_PAD: f32 = 1.5;

const SECTION_FILL: (u8, u8, u8) = (67, 97, 238);
const HEAD_FILL: (u8, u8, u8) = (100, 116, 139);
const STRIPE_FILL: (u8, u8, u8) = (245, 245, 245);
const WHITE: (u8, u8, u8) = (255, 255, 255);
const BLACK: (u8, u8, u8) = (0, 0, 0);

fn approx_text_width(text: &str, size: f32) -> f32 {
    text.len() as f32 * size * 0.18
}

fn color((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

// ---------------------------------------------------------------------------
// Table flow, shared by measurement and drawing
// ---------------------------------------------------------------------------

fn column_widths(table: &TableBlock, geometry: &PageGeometry) -> Vec<f32> {
    let width = geometry.content_width();
    table.columns.iter().map(|c| c.weight * width).collect()
}

fn wrap_cell(text: &str, width: f32) -> Vec<String> {
    let chars = ((width - 2.0 * CELL_PAD) / (BODY_SIZE * 0.18)).floor().max(1.0) as usize;
    let lines: Vec<String> = textwrap::wrap(text, chars)
        .into_iter()
        .map(|l| l.into_owned())
        .collect();
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

fn row_height(row: &TableRow, widths: &[f32]) -> f32 {
    let lines = row
        .cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| wrap_cell(cell, *w).len())
        .max()
        .unwrap_or(1);
    lines as f32 * LINE_H + 2.0 * CELL_PAD
}

struct RowSlot {
    top: f32,
    height: f32,
    /// Row starts a continuation page (with a repeated head row).
    new_page: bool,
}

struct TableFlow {
    slots: Vec<RowSlot>,
    end: f32,
}

fn flow_table(table: &TableBlock, start: f32, geometry: &PageGeometry) -> TableFlow {
    let widths = column_widths(table, geometry);
    let bottom = geometry.page_height - geometry.table_bottom_margin;
    let mut y = start + HEAD_H;
    let mut slots = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        let height = row_height(row, &widths);
        let new_page = y + height > bottom;
        if new_page {
            y = geometry.top_margin + HEAD_H;
        }
        slots.push(RowSlot {
            top: y,
            height,
            new_page,
        });
        y += height;
    }
    TableFlow { slots, end: y }
}

/// Measures tables the way [`render`] draws them: wrapped cells, and long
/// tables continued on a new page under a repeated head row.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfMeasure;

impl Measure for PdfMeasure {
    fn table_height(&self, table: &TableBlock, geometry: &PageGeometry) -> f32 {
        let widths = column_widths(table, geometry);
        HEAD_H + table.rows.iter().map(|r| row_height(r, &widths)).sum::<f32>()
    }

    fn table_end(&self, table: &TableBlock, start: f32, geometry: &PageGeometry) -> f32 {
        flow_table(table, start, geometry).end
    }

    fn lead_height(&self, table: &TableBlock, geometry: &PageGeometry) -> f32 {
        let widths = column_widths(table, geometry);
        HEAD_H + table.rows.first().map_or(0.0, |r| row_height(r, &widths))
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Weight {
    Regular,
    Bold,
    Italic,
}

struct PdfWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    font_bold: IndirectFontRef,
    font_italic: IndirectFontRef,
    current_page: PdfPageIndex,
    current_layer: PdfLayerIndex,
    geometry: PageGeometry,
    y: f32,
}

impl PdfWriter {
    fn new(title: &str, geometry: PageGeometry) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(geometry.page_width),
            Mm(geometry.page_height),
            "Layer 1",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(format!("{e:?}")))?;
        let font_bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Pdf(format!("{e:?}")))?;
        let font_italic = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(|e| ReportError::Pdf(format!("{e:?}")))?;
        Ok(Self {
            doc,
            font,
            font_bold,
            font_italic,
            current_page: page,
            current_layer: layer,
            geometry,
            y: geometry.first_page_top,
        })
    }

    fn layer(&self) -> PdfLayerReference {
        self.doc
            .get_page(self.current_page)
            .get_layer(self.current_layer)
    }

    fn pdf_y(&self, y: f32) -> f32 {
        self.geometry.page_height - y
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(
            Mm(self.geometry.page_width),
            Mm(self.geometry.page_height),
            "Layer",
        );
        self.current_page = page;
        self.current_layer = layer;
        self.y = self.geometry.top_margin;
    }

    fn text(&self, s: &str, x: f32, y: f32, size: f32, weight: Weight, rgb: (u8, u8, u8)) {
        let font = match weight {
            Weight::Regular => &self.font,
            Weight::Bold => &self.font_bold,
            Weight::Italic => &self.font_italic,
        };
        let layer = self.layer();
        layer.set_fill_color(color(rgb));
        layer.use_text(s, size, Mm(x), Mm(self.pdf_y(y)), font);
    }

    fn text_centered(&self, s: &str, y: f32, size: f32, weight: Weight, rgb: (u8, u8, u8)) {
        let x = (self.geometry.page_width - approx_text_width(s, size)) / 2.0;
        self.text(s, x, y, size, weight, rgb);
    }

    fn fill_rect(&self, x: f32, top: f32, width: f32, height: f32, rgb: (u8, u8, u8)) {
        let layer = self.layer();
        layer.set_fill_color(color(rgb));
        let rect = Rect::new(
            Mm(x),
            Mm(self.pdf_y(top + height)),
            Mm(x + width),
            Mm(self.pdf_y(top)),
        )
        .with_mode(PaintMode::Fill);
        layer.add_rect(rect);
    }

    fn report_header(&mut self, title: &str, subtitle: &str, date_label: Option<&str>) {
        self.text_centered(title, 15.0, TITLE_SIZE, Weight::Bold, BLACK);
        self.text_centered(subtitle, 23.0, SUBTITLE_SIZE, Weight::Regular, BLACK);
        if let Some(label) = date_label {
            let line = format!("Report Date: {label}");
            self.text_centered(&line, 30.0, DATE_SIZE, Weight::Regular, BLACK);
        }
        self.y = self.geometry.first_page_top;
    }

    fn section_header(&mut self, category: &str) {
        let left = self.geometry.side_margin;
        self.fill_rect(left, self.y - 5.0, self.geometry.content_width(), 8.0, SECTION_FILL);
        self.text(category, left + 2.0, self.y + 0.5, SECTION_SIZE, Weight::Bold, WHITE);
        self.y += self.geometry.header_height;
    }

    fn table_head(&self, table: &TableBlock, widths: &[f32], top: f32) {
        let width = self.geometry.content_width();
        self.fill_rect(self.geometry.side_margin, top, width, HEAD_H, HEAD_FILL);
        let baseline = top + HEAD_H - 2.2;
        let mut x = self.geometry.side_margin;
        for (col, w) in table.columns.iter().zip(widths) {
            let tx = match col.align {
                Align::Left => x + CELL_PAD,
                Align::Right => x + w - CELL_PAD - approx_text_width(col.title, HEAD_SIZE),
            };
            self.text(col.title, tx, baseline, HEAD_SIZE, Weight::Bold, WHITE);
            x += w;
        }
    }

    fn table_row(
        &self,
        table: &TableBlock,
        widths: &[f32],
        row: &TableRow,
        slot: &RowSlot,
        striped: bool,
    ) {
        if striped {
            let width = self.geometry.content_width();
            self.fill_rect(self.geometry.side_margin, slot.top, width, slot.height, STRIPE_FILL);
        }
        let amount_weight = if row.highlight.is_italic() {
            Weight::Italic
        } else {
            Weight::Bold
        };
        let mut x = self.geometry.side_margin;
        let cells = table.columns.iter().zip(widths).zip(&row.cells);
        for (idx, ((col, w), cell)) in cells.enumerate() {
            let (weight, rgb) = if idx == AMOUNT_COLUMN {
                (amount_weight, row.highlight.rgb())
            } else {
                (Weight::Regular, BLACK)
            };
            for (line_no, line) in wrap_cell(cell, *w).iter().enumerate() {
                let baseline = slot.top + CELL_PAD + LINE_H * (line_no as f32 + 1.0) - 0.8;
                let tx = match col.align {
                    Align::Left => x + CELL_PAD,
                    Align::Right => x + w - CELL_PAD - approx_text_width(line, BODY_SIZE),
                };
                self.text(line, tx, baseline, BODY_SIZE, weight, rgb);
            }
            x += w;
        }
    }

    fn table(&mut self, table: &TableBlock) {
        let widths = column_widths(table, &self.geometry);
        let flow = flow_table(table, self.y, &self.geometry);
        self.table_head(table, &widths, self.y);
        for (i, (row, slot)) in table.rows.iter().zip(&flow.slots).enumerate() {
            if slot.new_page {
                self.new_page();
                self.table_head(table, &widths, self.geometry.top_margin);
            }
            self.table_row(table, &widths, row, slot, i % 2 == 1);
        }
        self.y = flow.end + self.geometry.table_gap;
    }

    fn subtotal(&mut self, label: &str) {
        let right = self.geometry.page_width - self.geometry.side_margin - 2.0;
        let x = right - approx_text_width(label, SUBTOTAL_SIZE);
        self.text(label, x, self.y, SUBTOTAL_SIZE, Weight::Bold, BLACK);
        self.y += self.geometry.subtotal_height + self.geometry.subtotal_gap;
    }

    fn grand_total(&mut self, label: &str) {
        let left = self.geometry.side_margin;
        self.fill_rect(left, self.y - 3.0, self.geometry.content_width(), 10.0, BLACK);
        self.text_centered(label, self.y + 4.0, GRAND_TOTAL_SIZE, Weight::Bold, WHITE);
    }

    fn to_bytes(self) -> Result<Vec<u8>> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc
            .save(&mut buf)
            .map_err(|e| ReportError::Pdf(format!("{e:?}")))?;
        buf.into_inner().map_err(|e| ReportError::Pdf(e.to_string()))
    }
}

/// Replay layout instructions onto a PDF document.
pub fn render(
    instructions: &[LayoutInstruction],
    geometry: &PageGeometry,
    doc_title: &str,
) -> Result<Vec<u8>> {
    let mut pdf = PdfWriter::new(doc_title, *geometry)?;
    for instruction in instructions {
        match instruction {
            LayoutInstruction::ReportHeader {
                title,
                subtitle,
                date_label,
            } => pdf.report_header(title, subtitle, date_label.as_deref()),
            LayoutInstruction::SectionHeader(category) => pdf.section_header(category),
            LayoutInstruction::TableBlock(table) => pdf.table(table),
            LayoutInstruction::SubtotalLine { label, .. } => pdf.subtotal(label),
            LayoutInstruction::PageBreak => pdf.new_page(),
            LayoutInstruction::GrandTotalBlock { label, .. } => pdf.grand_total(label),
        }
    }
    pdf.to_bytes()
}
