//! PDF書き出し（printpdf）
//!
//! pdf_core が計算した描画コマンドを printpdf の Op に変換する。
//! 座標は mm・左上原点 → pt・左下原点。
//! 文字は埋め込みの DejaVu Sans で描く（折り返しの幅も同じフォント）。

use crate::error::{KitReportError, Result};
use crate::sources::LogoImage;
use kit_report_common::export::pdf_core::{DrawCommand, PageLayout, ReportLayout};
use kit_report_common::layout::mm_to_pt;
use kit_report_common::PageGeometry;
use printpdf::*;
use std::path::Path;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const BORDER_THICKNESS_PT: f32 = 0.57;

const FONT_REGULAR: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const FONT_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// 文書に登録したフォント
struct ReportFonts {
    regular: FontId,
    bold: FontId,
}

impl ReportFonts {
    fn register(doc: &mut PdfDocument) -> Result<Self> {
        let regular = parse_font(FONT_REGULAR, "DejaVuSans")?;
        let bold = parse_font(FONT_BOLD, "DejaVuSans-Bold")?;
        Ok(Self {
            regular: doc.add_font(&regular),
            bold: doc.add_font(&bold),
        })
    }

    fn get(&self, bold: bool) -> &FontId {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }
}

fn parse_font(bytes: &[u8], name: &str) -> Result<ParsedFont> {
    let mut warnings = Vec::new();
    ParsedFont::from_bytes(bytes, 0, &mut warnings)
        .ok_or_else(|| KitReportError::PdfGeneration(format!("fonte {} ilegível", name)))
}

fn black() -> Color {
    Color::Rgb(Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        icc_profile: None,
    })
}

/// mm（上から）→ PDF座標
fn point(geometry: &PageGeometry, x_mm: f32, y_from_top_mm: f32) -> Point {
    Point {
        x: Pt(mm_to_pt(x_mm)),
        y: Pt(mm_to_pt(geometry.page_height_mm - y_from_top_mm)),
    }
}

fn rect_ops(geometry: &PageGeometry, x: f32, y: f32, w: f32, h: f32) -> Op {
    let corners = [(x, y), (x + w, y), (x + w, y + h), (x, y + h)];
    Op::DrawLine {
        line: Line {
            points: corners
                .iter()
                .map(|&(cx, cy)| LinePoint {
                    p: point(geometry, cx, cy),
                    bezier: false,
                })
                .collect(),
            is_closed: true,
        },
    }
}

fn text_ops(geometry: &PageGeometry, font: &FontId, x: f32, baseline: f32, size: f32, text: &str) -> Vec<Op> {
    vec![
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: point(geometry, x, baseline),
        },
        Op::SetFontSize {
            size: Pt(size),
            font: font.clone(),
        },
        Op::WriteText {
            items: vec![TextItem::Text(text.to_string())],
            font: font.clone(),
        },
        Op::EndTextSection,
    ]
}

fn logo_op(geometry: &PageGeometry, id: &XObjectId, logo: &LogoImage, x: f32, y: f32, w: f32, h: f32) -> Op {
    // dpi=72 で 1px = 1pt
    let scale_x = mm_to_pt(w) / logo.width_px as f32;
    let scale_y = mm_to_pt(h) / logo.height_px as f32;
    let origin = point(geometry, x, y + h);
    Op::UseXobject {
        id: id.clone(),
        transform: XObjectTransform {
            translate_x: Some(origin.x),
            translate_y: Some(origin.y),
            scale_x: Some(scale_x),
            scale_y: Some(scale_y),
            dpi: Some(72.0),
            ..Default::default()
        },
    }
}

/// 1ページ分の Op
fn page_ops(
    page: &PageLayout,
    geometry: &PageGeometry,
    fonts: &ReportFonts,
    logo: Option<(&XObjectId, &LogoImage)>,
) -> Vec<Op> {
    let mut ops = vec![
        Op::SetOutlineColor { col: black() },
        Op::SetFillColor { col: black() },
        Op::SetOutlineThickness {
            pt: Pt(BORDER_THICKNESS_PT),
        },
    ];

    for command in &page.commands {
        match command {
            DrawCommand::Rect { x_mm, y_mm, width_mm, height_mm } => {
                ops.push(rect_ops(geometry, *x_mm, *y_mm, *width_mm, *height_mm));
            }
            DrawCommand::Text { x_mm, baseline_mm, font_size_pt, bold, text } => {
                ops.extend(text_ops(geometry, fonts.get(*bold), *x_mm, *baseline_mm, *font_size_pt, text));
            }
            DrawCommand::Logo { x_mm, y_mm, width_mm, height_mm } => {
                if let Some((id, image)) = logo {
                    ops.push(logo_op(geometry, id, image, *x_mm, *y_mm, *width_mm, *height_mm));
                }
            }
        }
    }

    ops
}

fn raw_image(logo: &LogoImage) -> RawImage {
    RawImage {
        pixels: RawImageData::U8(logo.rgb.clone()),
        width: logo.width_px as usize,
        height: logo.height_px as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    }
}

/// 描画コマンドから文書を組み立てる
fn build_document(
    layout: &ReportLayout,
    geometry: &PageGeometry,
    logo: Option<&LogoImage>,
    title: &str,
) -> Result<PdfDocument> {
    let mut doc = PdfDocument::new(title);
    let fonts = ReportFonts::register(&mut doc)?;

    let logo_id = logo.map(|image| doc.add_image(&raw_image(image)));
    let logo_ref = logo_id.as_ref().zip(logo);

    let pages: Vec<PdfPage> = layout
        .pages
        .iter()
        .map(|page| {
            PdfPage::new(
                Mm(geometry.page_width_mm),
                Mm(geometry.page_height_mm),
                page_ops(page, geometry, &fonts, logo_ref),
            )
        })
        .collect();

    doc.with_pages(pages);
    Ok(doc)
}

fn save_document(doc: &PdfDocument, options: &PdfSaveOptions) -> Result<Vec<u8>> {
    let mut warnings = Vec::new();
    let bytes = doc.save(options, &mut warnings);
    for warning in &warnings {
        tracing::debug!(?warning, "aviso do printpdf");
    }

    if bytes.is_empty() {
        return Err(KitReportError::PdfGeneration("documento vazio".into()));
    }
    Ok(bytes)
}

/// PDFをバイト列に生成
///
/// ページがなければ空のドキュメント。
pub fn render_pdf(
    layout: &ReportLayout,
    geometry: &PageGeometry,
    logo: Option<&LogoImage>,
    title: &str,
) -> Result<Vec<u8>> {
    let doc = build_document(layout, geometry, logo, title)?;
    save_document(&doc, &PdfSaveOptions::default())
}

/// PDFをファイルに保存
pub fn write_pdf(bytes: &[u8], output_path: &Path) -> Result<()> {
    super::write_atomic(output_path, bytes)
}
