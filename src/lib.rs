//! kit-report
//!
//! 調査表（SGS）のキット種別・寸法をキット台帳と照合し、
//! Placa ごとの資材リストをPDFにまとめる。

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod logging;
pub mod pipeline;
pub mod sources;

pub use error::{KitReportError, Result};
pub use pipeline::{generate_report, ReportOutput, ReportSources};
