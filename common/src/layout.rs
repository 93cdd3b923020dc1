//! レイアウト設定モジュール
//!
//! mm基準のレイアウト定義。座標はページ左上が原点、下向きが +y。
//! PDF座標（左下原点、pt）への変換は書き出し側で行う。

// ============================================
// ページ
// ============================================

/// A4サイズ（mm）
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// 余白（mm）: 左・上・右
pub const MARGIN_MM: f32 = 10.0;
/// 下余白（自動改ページの基準）
pub const BOTTOM_MARGIN_MM: f32 = 15.0;
/// セル内の左右パディング
pub const CELL_PADDING_MM: f32 = 1.0;

// ============================================
// 変換係数
// ============================================

/// mm → pt変換 (1mm = 72/25.4 pt ≈ 2.835pt)
pub const MM_TO_PT: f32 = 72.0 / 25.4;
pub const PT_TO_MM: f32 = 25.4 / 72.0;

// ============================================
// ロゴ・タイトル
// ============================================

pub const LOGO_X_MM: f32 = 160.0;
pub const LOGO_Y_MM: f32 = 8.0;
pub const LOGO_WIDTH_MM: f32 = 20.0;

pub const TITLE_FONT_PT: f32 = 12.0;
pub const TITLE_HEIGHT_MM: f32 = 10.0;

// ============================================
// 行ブロック
// ============================================

pub const HEADER_FONT_PT: f32 = 9.0;
pub const NOTICE_HEIGHT_MM: f32 = 6.0;
/// 行ブロック間の余白
pub const BLOCK_GAP_MM: f32 = 3.0;

/// 行ヘッダーの項目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKey {
    KitDescription,
    OrderId,
    Area,
    Description,
    OperatorAndDate,
    KitCode,
}

/// 行ヘッダーの1行
#[derive(Debug, Clone, Copy)]
pub struct HeaderField {
    pub key: HeaderKey,
    pub label: &'static str,
    pub height_mm: f32,
}

/// 行ヘッダー（この順で1行ずつ出力）
pub const HEADER_FIELDS: &[HeaderField] = &[
    HeaderField { key: HeaderKey::KitDescription, label: "Kit", height_mm: 6.0 },
    HeaderField { key: HeaderKey::OrderId, label: "Número OS", height_mm: 5.0 },
    HeaderField { key: HeaderKey::Area, label: "Área", height_mm: 5.0 },
    HeaderField { key: HeaderKey::Description, label: "Descrição", height_mm: 5.0 },
    HeaderField { key: HeaderKey::OperatorAndDate, label: "Levantado por", height_mm: 5.0 },
    HeaderField { key: HeaderKey::KitCode, label: "Código do Kit", height_mm: 5.0 },
];

// ============================================
// 資材テーブル
// ============================================

pub const COL_ID_WIDTH_MM: f32 = 25.0;
pub const COL_DESCRIPTION_WIDTH_MM: f32 = 95.0;
pub const COL_QUANTITY_WIDTH_MM: f32 = 40.0;

/// 1行の高さ（折り返し1行あたり）
pub const TABLE_LINE_HEIGHT_MM: f32 = 5.0;

pub const TABLE_FONT_PT: f32 = 9.0;
/// 資材が多いキットの文字サイズ
pub const TABLE_FONT_DENSE_PT: f32 = 8.0;
/// この件数を超えると TABLE_FONT_DENSE_PT
pub const DENSE_TABLE_THRESHOLD: usize = 10;

pub const TABLE_HEADERS: [&str; 3] = ["ID", "Descrição", "Quantidade"];

/// 資材件数から表の文字サイズを決定
pub fn table_font_size(material_count: usize) -> f32 {
    if material_count > DENSE_TABLE_THRESHOLD {
        TABLE_FONT_DENSE_PT
    } else {
        TABLE_FONT_PT
    }
}

// ============================================
// レイアウト設定構造体
// ============================================

/// ページ設定
#[derive(Debug, Clone)]
pub struct PageGeometry {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    pub bottom_margin_mm: f32,
    pub column_widths_mm: [f32; 3],
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageGeometry {
    pub fn a4() -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            margin_mm: MARGIN_MM,
            bottom_margin_mm: BOTTOM_MARGIN_MM,
            column_widths_mm: [COL_ID_WIDTH_MM, COL_DESCRIPTION_WIDTH_MM, COL_QUANTITY_WIDTH_MM],
        }
    }

    /// 利用可能幅（mm）
    pub fn usable_width_mm(&self) -> f32 {
        self.page_width_mm - self.margin_mm * 2.0
    }

    /// コンテンツ開始Y座標（mm、上から）
    pub fn content_start_y_mm(&self) -> f32 {
        self.margin_mm
    }

    /// これを超える要素は次ページへ
    pub fn page_break_trigger_mm(&self) -> f32 {
        self.page_height_mm - self.bottom_margin_mm
    }

    pub fn table_width_mm(&self) -> f32 {
        self.column_widths_mm.iter().sum()
    }
}

// ============================================
// ヘルパー関数
// ============================================

/// mm → pt 変換
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

/// pt → mm 変換
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt * PT_TO_MM
}
