//! PDF layout core shared by the writer and tests.
//!
//! 帳票のページ構成を描画コマンド（矩形・文字列・ロゴ）の列として計算する。
//! PDFへの書き出しはしない。

use crate::grouping::LocationGroup;
use crate::layout::{
    pt_to_mm, table_font_size, HeaderKey, PageGeometry, BLOCK_GAP_MM, CELL_PADDING_MM,
    HEADER_FIELDS, HEADER_FONT_PT, LOGO_WIDTH_MM, LOGO_X_MM, LOGO_Y_MM, NOTICE_HEIGHT_MM,
    TABLE_HEADERS, TABLE_LINE_HEIGHT_MM, TITLE_FONT_PT, TITLE_HEIGHT_MM,
};
use crate::metrics::wrap_text;
use crate::types::{MatchedRow, MaterialEntry, MaterialIndex};

/// 資材が見つからない行の表示
pub const NOT_REGISTERED_NOTICE: &str = "Kit não cadastrado ou sem materiais.";

/// ページタイトル
pub fn page_title(tag: &str) -> String {
    format!("Formulário de Materiais - Placa: {}", tag)
}

/// 描画コマンド（mm、左上原点）
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// 枠線のみの矩形
    Rect {
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
        height_mm: f32,
    },
    /// 1行の文字列（y はベースライン）
    Text {
        x_mm: f32,
        baseline_mm: f32,
        font_size_pt: f32,
        bold: bool,
        text: String,
    },
    Logo {
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
        height_mm: f32,
    },
}

/// 1ページ分の描画内容
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub location_tag: String,
    /// Placa の先頭ページか（続きのページは false）
    pub starts_group: bool,
    pub commands: Vec<DrawCommand>,
}

/// 帳票全体
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportLayout {
    pub pages: Vec<PageLayout>,
}

impl ReportLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// 表の1行の描画結果
#[derive(Debug, Clone, PartialEq)]
pub struct RowLayout {
    pub height_mm: f32,
    pub commands: Vec<DrawCommand>,
}

/// セル内で上下中央に置いた1行のベースライン
#[inline]
pub fn text_baseline_mm(cell_top_mm: f32, cell_height_mm: f32, font_size_pt: f32) -> f32 {
    cell_top_mm + cell_height_mm / 2.0 + 0.3 * pt_to_mm(font_size_pt)
}

/// 説明列を折り返した行高さ
pub fn table_row_height(description: &str, font_size_pt: f32, bold: bool, description_width_mm: f32) -> f32 {
    let lines = wrap_text(description, font_size_pt, bold, description_width_mm - CELL_PADDING_MM * 2.0);
    lines.len() as f32 * TABLE_LINE_HEIGHT_MM
}

/// 表の1行（ID / 説明 / 数量）
///
/// 説明は列幅で折り返し、ID・数量の枠は説明と同じ高さに揃える。
pub fn layout_table_row(
    cells: [&str; 3],
    x_mm: f32,
    y_mm: f32,
    font_size_pt: f32,
    bold: bool,
    widths_mm: [f32; 3],
) -> RowLayout {
    let lines = wrap_text(cells[1], font_size_pt, bold, widths_mm[1] - CELL_PADDING_MM * 2.0);
    layout_row_lines(cells[0], &lines, cells[2], x_mm, y_mm, font_size_pt, bold, widths_mm)
}

/// 折り返し済みの説明行から1行分の枠と文字列を作る
#[allow(clippy::too_many_arguments)]
fn layout_row_lines(
    id: &str,
    lines: &[String],
    quantity: &str,
    x_mm: f32,
    y_mm: f32,
    font_size_pt: f32,
    bold: bool,
    widths_mm: [f32; 3],
) -> RowLayout {
    let [id_w, desc_w, qty_w] = widths_mm;
    let height_mm = lines.len().max(1) as f32 * TABLE_LINE_HEIGHT_MM;

    let desc_x = x_mm + id_w;
    let qty_x = desc_x + desc_w;

    let mut commands = Vec::with_capacity(5 + lines.len());

    for (x, w) in [(x_mm, id_w), (desc_x, desc_w), (qty_x, qty_w)] {
        commands.push(DrawCommand::Rect {
            x_mm: x,
            y_mm,
            width_mm: w,
            height_mm,
        });
    }

    let mut push_text = |x: f32, baseline: f32, text: &str| {
        if !text.is_empty() {
            commands.push(DrawCommand::Text {
                x_mm: x + CELL_PADDING_MM,
                baseline_mm: baseline,
                font_size_pt,
                bold,
                text: text.to_string(),
            });
        }
    };

    let centered = text_baseline_mm(y_mm, height_mm, font_size_pt);
    push_text(x_mm, centered, id);
    for (i, line) in lines.iter().enumerate() {
        let top = y_mm + i as f32 * TABLE_LINE_HEIGHT_MM;
        push_text(desc_x, text_baseline_mm(top, TABLE_LINE_HEIGHT_MM, font_size_pt), line.as_str());
    }
    push_text(qty_x, centered, quantity);

    RowLayout { height_mm, commands }
}

fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}

/// 行ヘッダー1行分の文字列
pub fn header_line(row: &MatchedRow, key: HeaderKey, label: &str) -> String {
    let survey = &row.survey;
    match key {
        HeaderKey::KitDescription => format!("{}: {}", label, or_dash(row.kit_description_key.as_deref())),
        HeaderKey::OrderId => format!("{}: {}", label, or_dash(survey.order_id.as_deref())),
        HeaderKey::Area => format!("{}: {}", label, or_dash(survey.area.as_deref())),
        HeaderKey::Description => format!("{}: {}", label, or_dash(survey.free_text_description.as_deref())),
        HeaderKey::OperatorAndDate => format!(
            "{}: {}  Em: {}",
            label,
            or_dash(survey.operator_name.as_deref()),
            or_dash(survey.execution_date.as_deref()),
        ),
        HeaderKey::KitCode => format!("{}: {}", label, or_dash(row.kit_code.as_deref())),
    }
}

/// ページ送りを管理しながらコマンドを積む
struct PageWriter<'g> {
    geometry: &'g PageGeometry,
    pages: Vec<PageLayout>,
    y_mm: f32,
}

impl<'g> PageWriter<'g> {
    fn new(geometry: &'g PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            y_mm: geometry.content_start_y_mm(),
        }
    }

    fn start_page(&mut self, tag: &str, starts_group: bool) {
        self.pages.push(PageLayout {
            location_tag: tag.to_string(),
            starts_group,
            commands: Vec::new(),
        });
        self.y_mm = self.geometry.content_start_y_mm();
    }

    fn push(&mut self, command: DrawCommand) {
        if let Some(page) = self.pages.last_mut() {
            page.commands.push(command);
        }
    }

    /// 1ページに置ける高さ
    fn printable_height_mm(&self) -> f32 {
        self.geometry.page_break_trigger_mm() - self.geometry.content_start_y_mm()
    }

    /// 同じ Placa の続きのページ
    fn continue_page(&mut self) {
        let tag = self
            .pages
            .last()
            .map(|p| p.location_tag.clone())
            .unwrap_or_default();
        self.start_page(&tag, false);
    }

    /// 高さ h が下余白を越えるなら続きのページへ（ページ先頭では送らない）
    fn ensure_room(&mut self, height_mm: f32) {
        let at_top = self.y_mm <= self.geometry.content_start_y_mm();
        if !at_top && self.y_mm + height_mm > self.geometry.page_break_trigger_mm() {
            self.continue_page();
        }
    }

    fn line(&mut self, text: String, font_size_pt: f32, bold: bool, height_mm: f32) {
        self.ensure_room(height_mm);
        let baseline_mm = text_baseline_mm(self.y_mm, height_mm, font_size_pt);
        self.push(DrawCommand::Text {
            x_mm: self.geometry.margin_mm + CELL_PADDING_MM,
            baseline_mm,
            font_size_pt,
            bold,
            text,
        });
        self.y_mm += height_mm;
    }

    fn push_row(&mut self, row: RowLayout) {
        self.y_mm += row.height_mm;
        for command in row.commands {
            self.push(command);
        }
    }

    fn table_row(&mut self, cells: [&str; 3], font_size_pt: f32, bold: bool, keep_with_mm: f32) {
        let widths = self.geometry.column_widths_mm;
        let height = table_row_height(cells[1], font_size_pt, bold, widths[1]);
        if height > self.printable_height_mm() {
            self.split_table_row(cells, font_size_pt, bold);
            return;
        }

        self.ensure_room(height + keep_with_mm);
        let row = layout_table_row(cells, self.geometry.margin_mm, self.y_mm, font_size_pt, bold, widths);
        self.push_row(row);
    }

    /// 1ページに収まらない行は説明の行単位で続きのページへ分ける
    ///
    /// 分けた各片に ID と数量を入れる。
    fn split_table_row(&mut self, cells: [&str; 3], font_size_pt: f32, bold: bool) {
        let widths = self.geometry.column_widths_mm;
        let lines = wrap_text(cells[1], font_size_pt, bold, widths[1] - CELL_PADDING_MM * 2.0);
        let mut remaining = lines.as_slice();

        while !remaining.is_empty() {
            let room = self.geometry.page_break_trigger_mm() - self.y_mm;
            let fit = (room / TABLE_LINE_HEIGHT_MM).floor().max(0.0) as usize;
            let at_top = self.y_mm <= self.geometry.content_start_y_mm();
            if fit == 0 && !at_top {
                self.continue_page();
                continue;
            }

            // ページ先頭では少なくとも1行置く
            let (piece, rest) = remaining.split_at(fit.clamp(1, remaining.len()));
            let row = layout_row_lines(
                cells[0],
                piece,
                cells[2],
                self.geometry.margin_mm,
                self.y_mm,
                font_size_pt,
                bold,
                widths,
            );
            self.push_row(row);

            remaining = rest;
            if !remaining.is_empty() {
                self.continue_page();
            }
        }
    }

    fn materials_table(&mut self, materials: &[MaterialEntry]) {
        let font_size = table_font_size(materials.len());
        let widths = self.geometry.column_widths_mm;

        // 見出しは1行目と同じページに置く（分割される行なら最初の1行分）
        let first_row_height = materials
            .first()
            .map(|m| table_row_height(&m.description, font_size, false, widths[1]))
            .map(|h| if h > self.printable_height_mm() { TABLE_LINE_HEIGHT_MM } else { h })
            .unwrap_or(0.0);
        self.table_row(TABLE_HEADERS, font_size, true, first_row_height);

        for material in materials {
            self.table_row(
                [
                    material.material_id.as_str(),
                    material.description.as_str(),
                    material.quantity.as_str(),
                ],
                font_size,
                false,
                0.0,
            );
        }
    }

    fn gap(&mut self, height_mm: f32) {
        self.y_mm += height_mm;
    }
}

/// 帳票のレイアウトを計算
///
/// - Placa ごとに新しいページを開始（ロゴ・タイトル付き）
/// - 行ごとにヘッダー6行 + 資材表（または未登録の表示）
/// - 下余白を越える要素は続きのページへ
///
/// `logo_aspect` はロゴ画像の 高さ/幅。None ならロゴなし。
pub fn layout_report(
    groups: &[LocationGroup<'_>],
    materials: &MaterialIndex,
    geometry: &PageGeometry,
    logo_aspect: Option<f32>,
) -> ReportLayout {
    let mut writer = PageWriter::new(geometry);

    for group in groups {
        // group_by_location は空グループを作らない
        debug_assert!(!group.rows.is_empty(), "empty group for {}", group.tag);
        if group.rows.is_empty() {
            continue;
        }

        writer.start_page(group.tag, true);

        if let Some(aspect) = logo_aspect.filter(|a| a.is_finite() && *a > 0.0) {
            writer.push(DrawCommand::Logo {
                x_mm: LOGO_X_MM,
                y_mm: LOGO_Y_MM,
                width_mm: LOGO_WIDTH_MM,
                height_mm: LOGO_WIDTH_MM * aspect,
            });
        }

        writer.line(page_title(group.tag), TITLE_FONT_PT, true, TITLE_HEIGHT_MM);

        for row in &group.rows {
            for field in HEADER_FIELDS {
                writer.line(header_line(row, field.key, field.label), HEADER_FONT_PT, false, field.height_mm);
            }

            match materials.materials_for(row.kit_code.as_deref()) {
                Some(list) => writer.materials_table(list),
                None => writer.line(NOT_REGISTERED_NOTICE.to_string(), HEADER_FONT_PT, false, NOTICE_HEIGHT_MM),
            }

            writer.gap(BLOCK_GAP_MM);
        }
    }

    ReportLayout { pages: writer.pages }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_by_location;
    use crate::layout::{TABLE_FONT_DENSE_PT, TABLE_FONT_PT};
    use crate::types::SurveyRow;

    fn matched(tag: &str, code: Option<&str>) -> MatchedRow {
        MatchedRow {
            survey: SurveyRow {
                location_tag: Some(tag.to_string()),
                order_id: Some("4501".to_string()),
                area: Some("Caldeiraria".to_string()),
                free_text_description: Some("Montagem de andaime".to_string()),
                operator_name: Some("João".to_string()),
                execution_date: Some("10/05/2024".to_string()),
                kit_type: Some("Standard".to_string()),
                height: Some(2.0),
                width: Some(1.5),
                length: Some(3.0),
            },
            kit_description_key: Some("standard 2m x 1,5m x 3m".to_string()),
            kit_code: code.map(|c| c.to_string()),
        }
    }

    fn materials(code: &str, count: usize) -> Vec<MaterialEntry> {
        (1..=count)
            .map(|i| MaterialEntry {
                kit_code: code.to_string(),
                material_id: format!("{}", 1000 + i),
                description: format!("Material {}", i),
                quantity: format!("{}", i),
            })
            .collect()
    }

    fn rects(page: &PageLayout) -> Vec<&DrawCommand> {
        page.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect { .. }))
            .collect()
    }

    fn texts(page: &PageLayout) -> Vec<(&str, f32, bool)> {
        page.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, font_size_pt, bold, .. } => Some((text.as_str(), *font_size_pt, *bold)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_report_has_no_pages() {
        let layout = layout_report(&[], &MaterialIndex::default(), &PageGeometry::a4(), Some(0.5));
        assert_eq!(layout.page_count(), 0);
    }

    #[test]
    fn test_two_materials_table() {
        let rows = vec![matched("P-01", Some("K1"))];
        let groups = group_by_location(&rows);
        let index = MaterialIndex::new(materials("K1", 2));
        let layout = layout_report(&groups, &index, &PageGeometry::a4(), None);

        assert_eq!(layout.page_count(), 1);
        let page = &layout.pages[0];
        // 見出し1行 + 資材2行、各3セル
        assert_eq!(rects(page).len(), 9);

        let texts = texts(page);
        assert_eq!(texts[0].0, "Formulário de Materiais - Placa: P-01");
        assert!(texts[0].2);
        assert!(texts.contains(&("ID", TABLE_FONT_PT, true)));
        assert!(texts.contains(&("Quantidade", TABLE_FONT_PT, true)));
        assert!(texts.contains(&("Material 2", TABLE_FONT_PT, false)));
        assert!(!texts.iter().any(|t| t.0 == NOT_REGISTERED_NOTICE));
    }

    #[test]
    fn test_header_lines_in_order() {
        let rows = vec![matched("P-01", None)];
        let groups = group_by_location(&rows);
        let layout = layout_report(&groups, &MaterialIndex::default(), &PageGeometry::a4(), None);
        let texts: Vec<&str> = texts(&layout.pages[0]).into_iter().map(|t| t.0).collect();
        assert_eq!(
            texts,
            vec![
                "Formulário de Materiais - Placa: P-01",
                "Kit: standard 2m x 1,5m x 3m",
                "Número OS: 4501",
                "Área: Caldeiraria",
                "Descrição: Montagem de andaime",
                "Levantado por: João  Em: 10/05/2024",
                "Código do Kit: -",
                NOT_REGISTERED_NOTICE,
            ]
        );
        assert!(rects(&layout.pages[0]).is_empty());
    }

    #[test]
    fn test_dense_table_font() {
        let rows = vec![matched("P-01", Some("K1"))];
        let groups = group_by_location(&rows);
        let index = MaterialIndex::new(materials("K1", 11));
        let layout = layout_report(&groups, &index, &PageGeometry::a4(), None);

        let table_texts: Vec<(&str, f32, bool)> = layout
            .pages
            .iter()
            .flat_map(|p| texts(p))
            .filter(|t| t.0 == "ID" || t.0.starts_with("Material "))
            .collect();
        assert_eq!(table_texts.len(), 12);
        assert!(table_texts.iter().all(|t| t.1 == TABLE_FONT_DENSE_PT));

        let rect_count: usize = layout.pages.iter().map(|p| rects(p).len()).sum();
        assert_eq!(rect_count, 12 * 3);
    }

    #[test]
    fn test_wrapped_row_cells_align() {
        let long = "Braçadeira giratória forjada para tubo de 48,3 mm com parafuso e porca zincados, \
                    acabamento eletrolítico, fornecida em caixas com vinte unidades";
        let row = layout_table_row(["1001", long, "12"], 10.0, 50.0, TABLE_FONT_PT, false, [25.0, 95.0, 40.0]);
        assert!(row.height_mm >= 10.0);

        let heights: Vec<f32> = row
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { height_mm, y_mm, .. } => {
                    assert_eq!(*y_mm, 50.0);
                    Some(*height_mm)
                }
                _ => None,
            })
            .collect();
        assert_eq!(heights.len(), 3);
        assert!(heights.iter().all(|h| *h == row.height_mm));
        assert_eq!(row.height_mm, table_row_height(long, TABLE_FONT_PT, false, 95.0));
    }

    #[test]
    fn test_single_line_row_height() {
        assert_eq!(table_row_height("Tubo", TABLE_FONT_PT, false, 95.0), TABLE_LINE_HEIGHT_MM);
        assert_eq!(table_row_height("", TABLE_FONT_PT, false, 95.0), TABLE_LINE_HEIGHT_MM);
    }

    #[test]
    fn test_group_starts_new_page_with_logo() {
        let rows = vec![matched("P-01", None), matched("P-02", None), matched("P-01", None)];
        let groups = group_by_location(&rows);
        let layout = layout_report(&groups, &MaterialIndex::default(), &PageGeometry::a4(), Some(0.5));

        assert_eq!(layout.page_count(), 2);
        assert_eq!(layout.pages[0].location_tag, "P-01");
        assert_eq!(layout.pages[1].location_tag, "P-02");
        for page in &layout.pages {
            assert!(page.starts_group);
            let logo = page.commands.iter().find(|c| matches!(c, DrawCommand::Logo { .. }));
            assert_eq!(
                logo,
                Some(&DrawCommand::Logo { x_mm: 160.0, y_mm: 8.0, width_mm: 20.0, height_mm: 10.0 })
            );
        }
        let notices = texts(&layout.pages[0]).iter().filter(|t| t.0 == NOT_REGISTERED_NOTICE).count();
        assert_eq!(notices, 2);
    }

    #[test]
    fn test_automatic_page_break() {
        let rows: Vec<MatchedRow> = (0..6).map(|_| matched("P-01", Some("K1"))).collect();
        let groups = group_by_location(&rows);
        let index = MaterialIndex::new(materials("K1", 8));
        let geometry = PageGeometry::a4();
        let layout = layout_report(&groups, &index, &geometry, Some(0.5));

        assert!(layout.page_count() > 1);
        assert!(layout.pages[0].starts_group);
        for page in &layout.pages[1..] {
            assert!(!page.starts_group);
            assert_eq!(page.location_tag, "P-01");
            assert!(!page.commands.iter().any(|c| matches!(c, DrawCommand::Logo { .. })));
        }
        for page in &layout.pages {
            for command in &page.commands {
                if let DrawCommand::Rect { y_mm, height_mm, .. } = command {
                    assert!(y_mm + height_mm <= geometry.page_break_trigger_mm() + 0.001);
                }
            }
        }

        let body_rows: usize = layout
            .pages
            .iter()
            .flat_map(|p| texts(p))
            .filter(|t| t.0.starts_with("Material "))
            .count();
        assert_eq!(body_rows, 6 * 8);
    }

    #[test]
    fn test_row_taller_than_page_is_split() {
        let rows = vec![matched("P-01", Some("K1"))];
        let groups = group_by_location(&rows);
        let description = "palavra ".repeat(1200);
        let index = MaterialIndex::new(vec![MaterialEntry {
            kit_code: "K1".to_string(),
            material_id: "1001".to_string(),
            description: description.clone(),
            quantity: "7".to_string(),
        }]);
        let geometry = PageGeometry::a4();
        let layout = layout_report(&groups, &index, &geometry, None);

        assert!(layout.page_count() > 2);
        for page in &layout.pages {
            assert_eq!(page.location_tag, "P-01");
            for command in &page.commands {
                if let DrawCommand::Rect { y_mm, height_mm, .. } = command {
                    assert!(
                        y_mm + height_mm <= geometry.page_break_trigger_mm() + 0.001,
                        "枠が下余白を越えた: {} + {}",
                        y_mm,
                        height_mm
                    );
                }
            }
        }

        // 見出しと最初の片は同じページ
        let first = texts(&layout.pages[0]);
        assert!(first.iter().any(|t| t.0 == "Quantidade"));
        assert!(first.iter().any(|t| t.0.starts_with("palavra")));

        // どの片にも ID と数量
        for page in &layout.pages {
            let page_texts = texts(page);
            assert_eq!(page_texts.iter().filter(|t| t.0 == "1001").count(), 1);
            assert_eq!(page_texts.iter().filter(|t| t.0 == "7").count(), 1);
        }

        let words: usize = layout
            .pages
            .iter()
            .flat_map(|p| texts(p))
            .map(|t| t.0.matches("palavra").count())
            .sum();
        assert_eq!(words, 1200);
    }

    #[test]
    fn test_row_without_kit_type() {
        let mut row = matched("P-01", None);
        row.survey.kit_type = None;
        row.kit_description_key = None;
        let rows = vec![row];
        let groups = group_by_location(&rows);
        let index = MaterialIndex::new(materials("K1", 2));
        let layout = layout_report(&groups, &index, &PageGeometry::a4(), None);

        assert_eq!(layout.page_count(), 1);
        let texts: Vec<&str> = texts(&layout.pages[0]).into_iter().map(|t| t.0).collect();
        assert_eq!(texts[1], "Kit: -");
        assert!(texts.contains(&"Código do Kit: -"));
        assert_eq!(texts.last(), Some(&NOT_REGISTERED_NOTICE));
        assert!(rects(&layout.pages[0]).is_empty());
    }
}
