//! 帳票生成の流れ
//!
//! SGS検証 → 台帳・資材表読み込み → 照合 → Placa ごとにまとめる → ロゴ → レイアウト → PDF。
//! 入力はすべて `ReportSources` 経由で受け取る。

use crate::config::Config;
use crate::error::Result;
use crate::export::pdf::render_pdf;
use crate::sources::{load_logo, CachedRemoteLogo, LogoImage, LogoProvider, TableSource, WorkbookSource};
use kit_report_common::types::{catalog_entries, material_entries, survey_rows};
use kit_report_common::{
    group_by_location, layout_report, CatalogEntry, DuplicateKeyPolicy, MatchSummary, MatchedRow,
    MaterialIndex, Matcher, PageGeometry, SurveyRow, Table,
};
use std::time::Duration;

/// PDFの文書タイトル
pub const REPORT_TITLE: &str = "Relatório de Materiais";

/// 台帳・資材表・ロゴの取得元
pub struct ReportSources {
    pub catalog: Box<dyn TableSource>,
    pub materials: Box<dyn TableSource>,
    pub logo: Option<Box<dyn LogoProvider>>,
}

impl ReportSources {
    pub fn from_config(config: &Config) -> Self {
        let logo = config.logo_source.as_ref().map(|url| {
            Box::new(CachedRemoteLogo::new(
                url.clone(),
                config.resolved_logo_cache_path(),
                Duration::from_secs(config.logo_timeout_seconds),
            )) as Box<dyn LogoProvider>
        });

        Self {
            catalog: Box::new(WorkbookSource::new(&config.catalog_source)),
            materials: Box::new(WorkbookSource::new(&config.materials_source)),
            logo,
        }
    }
}

/// 生成結果
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub bytes: Vec<u8>,
    pub summary: MatchSummary,
    pub page_count: usize,
    pub location_count: usize,
    pub logo_included: bool,
}

/// SGS の必須列を確認して行に変換
pub fn validate_survey(survey: &Table) -> Result<Vec<SurveyRow>> {
    let rows = survey_rows(survey)?;
    tracing::debug!(rows = rows.len(), "SGS validado");
    Ok(rows)
}

pub fn load_catalog(source: &dyn TableSource) -> Result<Vec<CatalogEntry>> {
    let table = source.load()?;
    let entries = catalog_entries(&table)?;
    tracing::info!(source = %source.describe(), kits = entries.len(), "cadastro de kits carregado");
    Ok(entries)
}

pub fn load_materials(source: &dyn TableSource) -> Result<MaterialIndex> {
    let table = source.load()?;
    let entries = material_entries(&table)?;
    let count = entries.len();
    let index = MaterialIndex::new(entries);
    tracing::info!(
        source = %source.describe(),
        materials = count,
        kits = index.kit_count(),
        "materiais carregados"
    );
    Ok(index)
}

/// 台帳と照合（重複キーは警告ログ）
pub fn match_survey(
    rows: &[SurveyRow],
    catalog: &[CatalogEntry],
    policy: DuplicateKeyPolicy,
) -> Result<Vec<MatchedRow>> {
    let matcher = Matcher::new(catalog, policy)?;
    for duplicate in matcher.duplicates() {
        tracing::warn!(
            key = %duplicate.key,
            codes = ?duplicate.codes,
            "descrição de kit repetida no cadastro, usando o primeiro código"
        );
    }

    let matched = matcher.match_rows(rows);
    let summary = MatchSummary::from_rows(&matched);
    tracing::info!(
        total = summary.total,
        matched = summary.matched,
        unmatched = summary.unmatched,
        keyless = summary.keyless,
        "conferência concluída"
    );
    Ok(matched)
}

/// SGS と台帳の照合だけ行う（PDFなし）
pub fn match_only(survey: &Table, catalog: &dyn TableSource, policy: DuplicateKeyPolicy) -> Result<Vec<MatchedRow>> {
    let rows = validate_survey(survey)?;
    let catalog = load_catalog(catalog)?;
    match_survey(&rows, &catalog, policy)
}

/// SGS から帳票PDFを生成
///
/// 列の検証は台帳の読み込みやロゴ取得より先に行う。
pub fn generate_report(survey: &Table, sources: &ReportSources, policy: DuplicateKeyPolicy) -> Result<ReportOutput> {
    let rows = validate_survey(survey)?;
    let catalog = load_catalog(sources.catalog.as_ref())?;
    let materials = load_materials(sources.materials.as_ref())?;

    let matched = match_survey(&rows, &catalog, policy)?;
    let summary = MatchSummary::from_rows(&matched);

    let groups = group_by_location(&matched);
    let skipped = matched.len() - groups.iter().map(|g| g.rows.len()).sum::<usize>();
    if skipped > 0 {
        tracing::warn!(rows = skipped, "linhas sem Placa ignoradas");
    }

    // ページがなければロゴは取りに行かない
    let logo: Option<LogoImage> = match &sources.logo {
        Some(provider) if !groups.is_empty() => load_logo(provider.as_ref()),
        _ => None,
    };

    let geometry = PageGeometry::a4();
    let layout = layout_report(&groups, &materials, &geometry, logo.as_ref().map(LogoImage::aspect));
    tracing::debug!(pages = layout.page_count(), placas = groups.len(), "layout calculado");

    let bytes = render_pdf(&layout, &geometry, logo.as_ref(), REPORT_TITLE)?;

    Ok(ReportOutput {
        bytes,
        summary,
        page_count: layout.page_count(),
        location_count: groups.len(),
        logo_included: logo.is_some(),
    })
}
