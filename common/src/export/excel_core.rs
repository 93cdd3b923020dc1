//! Excel生成（共通ライブラリ）
//!
//! 照合結果（左外部結合した SGS）を1シートに書き出す。
//! 台帳に一致しなかった行を確認するための補助出力。

use crate::normalizer::format_num;
use crate::types::{columns, MatchedRow};
use rust_xlsxwriter::*;

/// 出力列（見出し, 列幅）
const MATCH_COLUMNS: &[(&str, f64)] = &[
    (columns::LOCATION_TAG, 12.0),
    (columns::ORDER_ID, 12.0),
    (columns::AREA, 16.0),
    (columns::DESCRIPTION, 40.0),
    (columns::OPERATOR, 18.0),
    (columns::EXECUTION_DATE, 14.0),
    (columns::KIT_TYPE, 16.0),
    (columns::HEIGHT, 9.0),
    (columns::WIDTH, 9.0),
    (columns::LENGTH, 12.0),
    ("Descrição do Kit", 32.0),
    (columns::KIT_CODE, 12.0),
];

const SHEET_NAME: &str = "Conferência";

fn cell_values(row: &MatchedRow) -> [String; 12] {
    let s = &row.survey;
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    [
        text(&s.location_tag),
        text(&s.order_id),
        text(&s.area),
        text(&s.free_text_description),
        text(&s.operator_name),
        text(&s.execution_date),
        text(&s.kit_type),
        format_num(s.height),
        format_num(s.width),
        format_num(s.length),
        text(&row.kit_description_key),
        text(&row.kit_code),
    ]
}

/// 照合結果をバッファに生成
pub fn generate_match_workbook(rows: &[MatchedRow]) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_size(10.0)
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let unmatched_format = Format::new()
        .set_font_color(Color::RGB(0xC00000));

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    for (col, (title, width)) in MATCH_COLUMNS.iter().enumerate() {
        let col = col as u16;
        worksheet
            .write_string_with_format(0, col, *title, &header_format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
        worksheet
            .set_column_width(col, *width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let r = idx as u32 + 1;
        let unmatched = row.kit_code.is_none();
        for (col, value) in cell_values(row).iter().enumerate() {
            let col = col as u16;
            let written = if unmatched {
                worksheet.write_string_with_format(r, col, value.as_str(), &unmatched_format)
            } else {
                worksheet.write_string(r, col, value.as_str())
            };
            written.map_err(|e| format!("セル書き込みエラー: {}", e))?;
        }
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("ウィンドウ枠固定エラー: {}", e))?;
    if !rows.is_empty() {
        worksheet
            .autofilter(0, 0, rows.len() as u32, MATCH_COLUMNS.len() as u16 - 1)
            .map_err(|e| format!("フィルタ設定エラー: {}", e))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
