pub mod pdf;
pub mod excel;

use crate::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const DEFAULT_REPORT_FILE_NAME: &str = "Relatorio_Materiais.pdf";
pub const DEFAULT_MATCH_FILE_NAME: &str = "Conferencia_Kits.xlsx";

/// ディレクトリ（または拡張子なし）なら既定のファイル名を付ける
pub fn output_path_for(output: &Path, default_file_name: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(default_file_name)
    } else {
        output.to_path_buf()
    }
}

/// 同じディレクトリの一時ファイルに書いてから置き換える
///
/// 途中で失敗しても出力先に壊れたファイルは残らない。
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(bytes)?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "arquivo gravado");
    Ok(())
}
