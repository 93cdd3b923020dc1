//! Kit Report Common Library
//!
//! SGS（調査表）とキット台帳の照合、Placa ごとの帳票レイアウト。
//! ファイル・ネットワークには触れない。

pub mod error;
pub mod table;
pub mod types;
pub mod normalizer;
pub mod matcher;
pub mod grouping;
pub mod layout;
pub mod metrics;
pub mod export;

pub use error::{Error, Result};
pub use table::{Cell, Table};
pub use types::{CatalogEntry, MatchedRow, MaterialEntry, MaterialIndex, SurveyRow};
pub use normalizer::{build_key, format_num, normalize};
pub use matcher::{match_rows, DuplicateKeyPolicy, MatchSummary, Matcher};
pub use grouping::{group_by_location, LocationGroup};
pub use layout::PageGeometry;
pub use export::pdf_core::{layout_report, DrawCommand, PageLayout, ReportLayout};
