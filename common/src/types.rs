//! 帳票で扱う型の定義
//!
//! - SurveyRow: 調査表（SGS）の1行
//! - CatalogEntry: キット台帳（Cadastro Kits）の1行
//! - MaterialEntry: キット資材表（Materias Kits）の1行
//! - MatchedRow: 調査行 + 照合で得たキットコード

use crate::error::Result;
use crate::normalizer::{build_key, normalize};
use crate::table::Table;
use std::collections::HashMap;

/// 列名
pub mod columns {
    pub const ORDER_ID: &str = "Número OS";
    pub const AREA: &str = "Área";
    pub const DESCRIPTION: &str = "Descrição";
    pub const OPERATOR: &str = "Executante";
    pub const LOCATION_TAG: &str = "Placa";
    pub const KIT_TYPE: &str = "Tipo de Kit";
    pub const HEIGHT: &str = "Altura";
    pub const WIDTH: &str = "Largura";
    pub const LENGTH: &str = "Comprimento";
    pub const EXECUTION_DATE: &str = "Data Execução";

    pub const KIT_CODE: &str = "Código";
    pub const KIT_DESCRIPTION: &str = "Descrição Kit";

    pub const MATERIAL_ID: &str = "ID";
    pub const QUANTITY: &str = "Quantidade";

    /// SGS の必須列
    pub const SURVEY_REQUIRED: &[&str] = &[
        ORDER_ID,
        AREA,
        DESCRIPTION,
        OPERATOR,
        LOCATION_TAG,
        KIT_TYPE,
        HEIGHT,
        WIDTH,
        LENGTH,
        EXECUTION_DATE,
    ];

    pub const CATALOG_REQUIRED: &[&str] = &[KIT_CODE, KIT_DESCRIPTION];

    pub const MATERIALS_REQUIRED: &[&str] = &[KIT_CODE, MATERIAL_ID, DESCRIPTION, QUANTITY];
}

/// 表の名前（エラーメッセージ用）
pub const SURVEY_TABLE: &str = "SGS";
pub const CATALOG_TABLE: &str = "Cadastro Kits";
pub const MATERIALS_TABLE: &str = "Materias Kits";

/// 調査表の1行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyRow {
    /// Placa（ページのグループ化に使用）
    pub location_tag: Option<String>,
    pub order_id: Option<String>,
    pub area: Option<String>,
    pub free_text_description: Option<String>,
    pub operator_name: Option<String>,
    pub execution_date: Option<String>,
    pub kit_type: Option<String>,
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub length: Option<f64>,
}

impl SurveyRow {
    pub fn kit_description_key(&self) -> Option<String> {
        build_key(self)
    }
}

/// SGS を SurveyRow に変換（必須列がなければエラー）
pub fn survey_rows(table: &Table) -> Result<Vec<SurveyRow>> {
    table.require_columns(SURVEY_TABLE, columns::SURVEY_REQUIRED)?;

    Ok(table
        .rows()
        .map(|row| SurveyRow {
            location_tag: row.text(columns::LOCATION_TAG),
            order_id: row.text(columns::ORDER_ID),
            area: row.text(columns::AREA),
            free_text_description: row.text(columns::DESCRIPTION),
            operator_name: row.text(columns::OPERATOR),
            execution_date: row.text(columns::EXECUTION_DATE),
            kit_type: row.text(columns::KIT_TYPE),
            height: row.number(columns::HEIGHT),
            width: row.number(columns::WIDTH),
            length: row.number(columns::LENGTH),
        })
        .collect())
}

/// キット台帳の1行（キーは正規化済み）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub kit_code: String,
    pub kit_description_key: String,
}

impl CatalogEntry {
    pub fn new(kit_code: impl Into<String>, description: &str) -> Self {
        Self {
            kit_code: kit_code.into(),
            kit_description_key: normalize(Some(description)),
        }
    }
}

/// 台帳を CatalogEntry に変換
///
/// コードが空の行は照合対象にならないので読み飛ばす。
pub fn catalog_entries(table: &Table) -> Result<Vec<CatalogEntry>> {
    table.require_columns(CATALOG_TABLE, columns::CATALOG_REQUIRED)?;

    Ok(table
        .rows()
        .filter_map(|row| {
            let kit_code = row.text(columns::KIT_CODE)?;
            let description = row.text(columns::KIT_DESCRIPTION);
            Some(CatalogEntry {
                kit_code,
                kit_description_key: normalize(description.as_deref()),
            })
        })
        .collect())
}

/// 資材表の1行
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialEntry {
    pub kit_code: String,
    pub material_id: String,
    pub description: String,
    pub quantity: String,
}

/// 資材表を MaterialEntry に変換（コードが空の行は除外）
pub fn material_entries(table: &Table) -> Result<Vec<MaterialEntry>> {
    table.require_columns(MATERIALS_TABLE, columns::MATERIALS_REQUIRED)?;

    Ok(table
        .rows()
        .filter_map(|row| {
            Some(MaterialEntry {
                kit_code: row.text(columns::KIT_CODE)?,
                material_id: row.get(columns::MATERIAL_ID).display(),
                description: row.get(columns::DESCRIPTION).display(),
                quantity: row.get(columns::QUANTITY).display(),
            })
        })
        .collect())
}

/// キットコード → 資材リスト（表の順序を保持）
#[derive(Debug, Clone, Default)]
pub struct MaterialIndex {
    by_code: HashMap<String, Vec<MaterialEntry>>,
}

impl MaterialIndex {
    pub fn new(entries: Vec<MaterialEntry>) -> Self {
        let mut by_code: HashMap<String, Vec<MaterialEntry>> = HashMap::new();
        for entry in entries {
            by_code.entry(entry.kit_code.clone()).or_default().push(entry);
        }
        Self { by_code }
    }

    /// コードなし・該当なしは None
    pub fn materials_for(&self, kit_code: Option<&str>) -> Option<&[MaterialEntry]> {
        let materials = self.by_code.get(kit_code?)?;
        if materials.is_empty() {
            None
        } else {
            Some(materials.as_slice())
        }
    }

    pub fn kit_count(&self) -> usize {
        self.by_code.len()
    }
}

/// 照合済みの行
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchedRow {
    pub survey: SurveyRow,
    pub kit_description_key: Option<String>,
    pub kit_code: Option<String>,
}

impl MatchedRow {
    pub fn location_tag(&self) -> Option<&str> {
        self.survey.location_tag.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::table::Cell;

    fn survey_table() -> Table {
        Table::with_rows(
            columns::SURVEY_REQUIRED,
            vec![vec![
                Cell::Number(4501.0),
                Cell::text("Caldeiraria"),
                Cell::text("Troca de guarda-corpo"),
                Cell::text("João"),
                Cell::text("P-01"),
                Cell::text("Standard"),
                Cell::Number(2.0),
                Cell::text("1,5"),
                Cell::Empty,
                Cell::text("10/05/2024"),
            ]],
        )
    }

    #[test]
    fn test_survey_rows_conversion() {
        let rows = survey_rows(&survey_table()).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.order_id.as_deref(), Some("4501"));
        assert_eq!(row.location_tag.as_deref(), Some("P-01"));
        assert_eq!(row.width, Some(1.5));
        assert_eq!(row.length, None);
        assert_eq!(row.kit_description_key(), Some("standard 2m x 1,5m x 0m".to_string()));
    }

    #[test]
    fn test_survey_rows_missing_columns() {
        let table = Table::new(&["Número OS", "Placa"]);
        let err = survey_rows(&table).unwrap_err();
        match err {
            Error::MissingColumns { table, columns } => {
                assert_eq!(table, SURVEY_TABLE);
                assert_eq!(columns.len(), 8);
                assert_eq!(columns[0], "Área");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_catalog_entries_normalized() {
        let table = Table::with_rows(
            &["Código", "Descrição Kit"],
            vec![
                vec![Cell::text("K-10"), Cell::text(" Standard 2M x 1,5M x 3M ")],
                vec![Cell::Empty, Cell::text("Sem código")],
                vec![Cell::Number(77.0), Cell::Empty],
            ],
        );
        let entries = catalog_entries(&table).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kit_description_key, "standard 2m x 1,5m x 3m");
        assert_eq!(entries[1].kit_code, "77");
        assert_eq!(entries[1].kit_description_key, "");
    }

    #[test]
    fn test_material_index_lookup() {
        let index = MaterialIndex::new(vec![
            MaterialEntry { kit_code: "K1".into(), material_id: "1".into(), description: "Tubo".into(), quantity: "4".into() },
            MaterialEntry { kit_code: "K2".into(), material_id: "9".into(), description: "Braçadeira".into(), quantity: "8".into() },
            MaterialEntry { kit_code: "K1".into(), material_id: "2".into(), description: "Prancha".into(), quantity: "2".into() },
        ]);
        let k1 = index.materials_for(Some("K1")).unwrap();
        assert_eq!(k1.len(), 2);
        assert_eq!(k1[0].material_id, "1");
        assert_eq!(k1[1].material_id, "2");
        assert!(index.materials_for(Some("K3")).is_none());
        assert!(index.materials_for(None).is_none());
        assert_eq!(index.kit_count(), 2);
    }
}
