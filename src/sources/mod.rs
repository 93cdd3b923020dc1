//! 入力データの取得元
//!
//! 台帳・資材表・ロゴはトレイト越しに受け取り、ファイルの代わりに
//! メモリ上のデータを差し込めるようにする。

pub mod logo;
pub mod workbook;

pub use logo::{decode_logo, load_logo, CachedRemoteLogo, LogoImage, LogoProvider, StaticLogo};
pub use workbook::read_first_sheet;

use crate::error::Result;
use kit_report_common::Table;
use std::path::PathBuf;

/// 表の取得元
pub trait TableSource {
    /// ログ・エラー表示用の名前
    fn describe(&self) -> String;

    fn load(&self) -> Result<Table>;
}

/// ワークブックファイル（先頭シート）
#[derive(Debug, Clone)]
pub struct WorkbookSource {
    pub path: PathBuf,
}

impl WorkbookSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for WorkbookSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Table> {
        read_first_sheet(&self.path)
    }
}

/// メモリ上の表
impl TableSource for Table {
    fn describe(&self) -> String {
        format!("<memória: {} linhas>", self.len())
    }

    fn load(&self) -> Result<Table> {
        Ok(self.clone())
    }
}
