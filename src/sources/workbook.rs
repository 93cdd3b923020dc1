//! スプレッドシート読み込み（calamine）
//!
//! 先頭シートの1行目を見出し、2行目以降をデータとして Table に変換する。

use crate::error::{KitReportError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use kit_report_common::{Cell, Table};
use std::path::Path;

/// Excel のシリアル値（1900年方式）→ 日時
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    // 9999-12-31 まで
    if !serial.is_finite() || !(0.0..2_958_466.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc() as i64;
    let seconds = ((serial - serial.trunc()) * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::days(days) + Duration::seconds(seconds))
}

fn parse_iso_datetime(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// calamine のセル → Cell
pub fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            excel_serial_to_datetime(serial)
                .map(Cell::DateTime)
                .unwrap_or(Cell::Number(serial))
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        // #REF! などのエラーセルは空扱い
        _ => Cell::Empty,
    }
}

/// ワークブックの先頭シートを読み込む
pub fn read_first_sheet(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(KitReportError::FileNotFound(path.display().to_string()));
    }

    let mut workbook = open_workbook_auto(path)
        .map_err(|e| KitReportError::Workbook(format!("{}: {}", path.display(), e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| KitReportError::Workbook(format!("{}: nenhuma planilha", path.display())))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| KitReportError::Workbook(format!("{}: {}", path.display(), e)))?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        // 空シート: 見出しなし・行なし
        return Ok(Table::default());
    };

    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut table = Table::new(&headers);
    for data_row in rows {
        let cells: Vec<Cell> = data_row.iter().map(to_cell).collect();

        // 完全に空の行は読み飛ばす
        if cells.iter().all(Cell::is_blank) {
            continue;
        }

        table.push_row(cells);
    }

    tracing::debug!(
        path = %path.display(),
        sheet = %sheet_name,
        columns = table.headers().len(),
        rows = table.len(),
        "planilha carregada"
    );

    Ok(table)
}
