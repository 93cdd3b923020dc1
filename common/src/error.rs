//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("planilha {table} não contém as colunas necessárias: {columns:?}")]
    MissingColumns {
        table: &'static str,
        columns: Vec<String>,
    },

    #[error("descrição de kit ambígua no cadastro: '{key}' aparece nos códigos {codes:?}")]
    AmbiguousCatalogKey { key: String, codes: Vec<String> },
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
