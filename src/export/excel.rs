//! 照合結果のExcel出力（CLI版）

use crate::error::{KitReportError, Result};
use kit_report_common::export::excel_core::generate_match_workbook;
use kit_report_common::MatchedRow;
use std::path::Path;

pub fn generate_excel(rows: &[MatchedRow], output_path: &Path) -> Result<()> {
    let buffer = generate_match_workbook(rows).map_err(KitReportError::ExcelGeneration)?;
    super::write_atomic(output_path, &buffer)
}
