//! 表データモジュール
//!
//! スプレッドシートの1シートを「ヘッダー行 + データ行」として保持する。
//! 読み込み元（calamine / メモリ上のテスト用データ）には依存しない。

use crate::error::{Error, Result};
use crate::normalizer::parse_number;
use chrono::{NaiveDateTime, Timelike};

/// セル値
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    DateTime(NaiveDateTime),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// 空セル、または空白のみの文字列
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Number(_) | Cell::DateTime(_) => false,
            Cell::Text(s) => s.trim().is_empty(),
        }
    }

    /// 表示用文字列
    ///
    /// - 整数値の数値は小数点なし（"12"）
    /// - 日付は dd/mm/yyyy（時刻があれば HH:MM を付加）
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
                    format!("{}", *v as i64)
                } else {
                    format!("{}", v)
                }
            }
            Cell::Text(s) => s.trim().to_string(),
            Cell::DateTime(dt) => {
                if dt.hour() == 0 && dt.minute() == 0 && dt.second() == 0 {
                    dt.format("%d/%m/%Y").to_string()
                } else {
                    dt.format("%d/%m/%Y %H:%M").to_string()
                }
            }
        }
    }

    /// 空でなければ表示用文字列
    pub fn as_text(&self) -> Option<String> {
        if self.is_blank() {
            None
        } else {
            Some(self.display())
        }
    }

    /// 数値として解釈（文字列は "1,5" / "1.5" / "2 m" を許容）
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Text(s) => parse_number(s),
            Cell::Empty | Cell::DateTime(_) => None,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// ヘッダー付きの表
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.as_ref().trim().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// ヘッダーと行からまとめて構築（メモリ上のデータ用）
    pub fn with_rows<S: AsRef<str>>(headers: &[S], rows: Vec<Vec<Cell>>) -> Self {
        let mut table = Self::new(headers);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 列番号（同名列が複数あれば先頭）
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 存在しない列名の一覧（required の順序を保持）
    pub fn missing_columns(&self, required: &[&str]) -> Vec<String> {
        required
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect()
    }

    /// 必須列の検証
    pub fn require_columns(&self, table: &'static str, required: &[&str]) -> Result<()> {
        let columns = self.missing_columns(required);
        if columns.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingColumns { table, columns })
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        self.rows.iter().map(move |cells| RowRef { table: self, cells })
    }
}

/// 1行への参照（列名でアクセス）
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    table: &'a Table,
    cells: &'a [Cell],
}

impl<'a> RowRef<'a> {
    /// 列が存在しない・行が短い場合は空セル
    pub fn get(&self, column: &str) -> &'a Cell {
        self.table
            .column_index(column)
            .and_then(|idx| self.cells.get(idx))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column).as_text()
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).as_number()
    }
}
