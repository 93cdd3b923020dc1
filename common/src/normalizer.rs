//! 照合キーの正規化
//!
//! 調査行の「Tipo de Kit / Altura / Largura / Comprimento」から
//! 台帳の「Descrição Kit」と比較できる文字列を組み立てる。

use crate::types::SurveyRow;
use regex::Regex;

/// 寸法の表示形式
///
/// 小数1桁に丸め、末尾の ",0" を落とし、小数点はカンマ。
/// 値なし・NaN は "0"。
pub fn format_num(value: Option<f64>) -> String {
    let value = match value {
        Some(v) if !v.is_nan() => v,
        _ => return "0".to_string(),
    };

    let mut s = format!("{:.1}", value);
    if s.ends_with(".0") {
        s.truncate(s.len() - 2);
    }
    s.replace('.', ",")
}

/// 前後の空白を除去して小文字化（値なしは空文字）
pub fn normalize(value: Option<&str>) -> String {
    value
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default()
}

/// 照合キー "{tipo} {altura}m x {largura}m x {comprimento}m"（正規化済み）
///
/// 種類が空ならキーなし（どの台帳行とも一致しない）。
pub fn build_key(row: &SurveyRow) -> Option<String> {
    let kit_type = row.kit_type.as_deref().filter(|t| !t.trim().is_empty())?;
    let description = format!(
        "{} {}m x {}m x {}m",
        kit_type,
        format_num(row.height),
        format_num(row.width),
        format_num(row.length),
    );
    Some(normalize(Some(&description)))
}

/// 文字列セルの数値解釈
///
/// "1,5" / "1.5" / "2 m" / "-3" を受け付ける。それ以外は None。
pub fn parse_number(text: &str) -> Option<f64> {
    lazy_static::lazy_static! {
        static ref NUMBER_RE: Regex =
            Regex::new(r"(?i)^\s*([+-]?\d+(?:[.,]\d+)?)\s*m?\s*$").unwrap();
    }

    let cap = NUMBER_RE.captures(text)?;
    cap[1].replace(',', ".").parse::<f64>().ok()
}
