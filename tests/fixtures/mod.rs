//! テスト用ワークブック（rust_xlsxwriter で生成）

#![allow(dead_code)]

use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

/// 文字列または数値のセル
pub enum Value<'a> {
    Text(&'a str),
    Number(f64),
    Date(f64),
    Empty,
}

pub fn write_workbook(path: &Path, headers: &[&str], rows: &[Vec<Value<'_>>]) {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    let worksheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (col, value) in row.iter().enumerate() {
            let col = col as u16;
            match value {
                Value::Text(s) => {
                    worksheet.write_string(r, col, *s).unwrap();
                }
                Value::Number(n) => {
                    worksheet.write_number(r, col, *n).unwrap();
                }
                Value::Date(serial) => {
                    worksheet.write_number_with_format(r, col, *serial, &date_format).unwrap();
                }
                Value::Empty => {}
            }
        }
    }

    workbook.save(path).unwrap();
}

pub const SURVEY_HEADERS: &[&str] = &[
    "Número OS",
    "Área",
    "Descrição",
    "Executante",
    "Placa",
    "Tipo de Kit",
    "Altura",
    "Largura",
    "Comprimento",
    "Data Execução",
];

/// SGS の1行（2024-05-10 実施）
pub fn survey_row<'a>(tag: &'a str, kit_type: &'a str, dims: (f64, f64, f64)) -> Vec<Value<'a>> {
    vec![
        Value::Text("4501"),
        Value::Text("Caldeiraria"),
        Value::Text("Montagem de andaime no tanque"),
        Value::Text("João Silva"),
        Value::Text(tag),
        Value::Text(kit_type),
        Value::Number(dims.0),
        Value::Number(dims.1),
        Value::Number(dims.2),
        Value::Date(45422.0),
    ]
}

/// 台帳・資材表を dir に書き出す
pub fn write_registries(dir: &Path) -> (PathBuf, PathBuf) {
    let catalog = dir.join("Cadastro Kits.xlsx");
    write_workbook(
        &catalog,
        &["Código", "Descrição Kit"],
        &[
            vec![Value::Text("K-100"), Value::Text("Andaime 2m x 1,5m x 3m")],
            vec![Value::Text("K-200"), Value::Text("Andaime 4m x 1,5m x 3m")],
            vec![Value::Empty, Value::Text("Linha sem código")],
        ],
    );

    let materials = dir.join("Materias Kits.xlsx");
    write_workbook(
        &materials,
        &["Código", "ID", "Descrição", "Quantidade"],
        &[
            vec![Value::Text("K-100"), Value::Number(1.0), Value::Text("Tubo 3m"), Value::Number(4.0)],
            vec![Value::Text("K-100"), Value::Number(2.0), Value::Text("Braçadeira giratória"), Value::Number(8.0)],
            vec![Value::Text("K-200"), Value::Number(1.0), Value::Text("Tubo 3m"), Value::Number(6.0)],
        ],
    );

    (catalog, materials)
}
