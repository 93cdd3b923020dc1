//! 台帳照合モジュール
//!
//! 調査行の照合キーと台帳の「Descrição Kit」（正規化済み）を完全一致で突き合わせる。
//! 左外部結合: 一致しない行も結果に残る（kit_code = None）。

use crate::error::{Error, Result};
use crate::types::{CatalogEntry, MatchedRow, SurveyRow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 台帳に同じキーが複数ある場合の扱い
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKeyPolicy {
    /// 表の先頭側を採用
    #[default]
    FirstWins,
    /// 照合前にエラー
    Reject,
}

/// 同じキーに複数のコードが登録されている台帳行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    pub key: String,
    pub codes: Vec<String>,
}

/// 正規化キー → キットコード
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    by_key: HashMap<String, String>,
    duplicates: Vec<DuplicateKey>,
}

impl Matcher {
    /// 台帳から照合表を構築
    ///
    /// 空のキーは登録しない（調査行のキーは空にならない）。
    pub fn new(catalog: &[CatalogEntry], policy: DuplicateKeyPolicy) -> Result<Self> {
        let mut by_key: HashMap<String, String> = HashMap::new();
        let mut duplicate_index: HashMap<String, usize> = HashMap::new();
        let mut duplicates: Vec<DuplicateKey> = Vec::new();

        for entry in catalog {
            let key = &entry.kit_description_key;
            if key.is_empty() {
                continue;
            }

            match by_key.get(key) {
                None => {
                    by_key.insert(key.clone(), entry.kit_code.clone());
                }
                Some(first) if *first == entry.kit_code => {}
                Some(first) => {
                    let idx = *duplicate_index.entry(key.clone()).or_insert_with(|| {
                        duplicates.push(DuplicateKey {
                            key: key.clone(),
                            codes: vec![first.clone()],
                        });
                        duplicates.len() - 1
                    });
                    let codes = &mut duplicates[idx].codes;
                    if !codes.contains(&entry.kit_code) {
                        codes.push(entry.kit_code.clone());
                    }
                }
            }
        }

        if policy == DuplicateKeyPolicy::Reject {
            if let Some(dup) = duplicates.first() {
                return Err(Error::AmbiguousCatalogKey {
                    key: dup.key.clone(),
                    codes: dup.codes.clone(),
                });
            }
        }

        Ok(Self { by_key, duplicates })
    }

    /// 複数コードを持つキー（台帳の出現順）
    pub fn duplicates(&self) -> &[DuplicateKey] {
        &self.duplicates
    }

    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }

    /// 全調査行を照合（件数・順序は入力と同じ）
    pub fn match_rows(&self, survey: &[SurveyRow]) -> Vec<MatchedRow> {
        survey
            .iter()
            .map(|row| {
                let key = row.kit_description_key();
                let kit_code = key
                    .as_deref()
                    .and_then(|k| self.lookup(k))
                    .map(str::to_string);
                MatchedRow {
                    survey: row.clone(),
                    kit_description_key: key,
                    kit_code,
                }
            })
            .collect()
    }
}

/// 先頭優先で照合
pub fn match_rows(survey: &[SurveyRow], catalog: &[CatalogEntry]) -> Vec<MatchedRow> {
    // FirstWins は失敗しない
    Matcher::new(catalog, DuplicateKeyPolicy::FirstWins)
        .map(|matcher| matcher.match_rows(survey))
        .unwrap_or_default()
}

/// 照合の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub total: usize,
    pub matched: usize,
    /// キーはあるが台帳にない
    pub unmatched: usize,
    /// Tipo de Kit が空でキーを作れない
    pub keyless: usize,
}

impl MatchSummary {
    pub fn from_rows(rows: &[MatchedRow]) -> Self {
        let mut summary = Self {
            total: rows.len(),
            ..Default::default()
        };
        for row in rows {
            match (&row.kit_description_key, &row.kit_code) {
                (_, Some(_)) => summary.matched += 1,
                (Some(_), None) => summary.unmatched += 1,
                (None, None) => summary.keyless += 1,
            }
        }
        summary
    }
}
