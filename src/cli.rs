use clap::{Args, Parser, Subcommand};
use crate::config::ConfigOverrides;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kit-report")]
#[command(about = "Relatório de materiais por Placa a partir do levantamento SGS", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log detalhado (debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// 台帳の指定（report / check / export-match 共通）
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// Planilha Cadastro Kits
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Erro se a mesma descrição de kit tiver mais de um código
    #[arg(long)]
    pub strict_catalog: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Gera o PDF de materiais a partir da planilha SGS
    Report {
        /// Planilha SGS
        #[arg(required = true)]
        survey: PathBuf,

        /// Arquivo ou pasta de saída (padrão: Relatorio_Materiais.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        catalog: CatalogArgs,

        /// Planilha Materias Kits
        #[arg(long)]
        materials: Option<PathBuf>,

        /// URL do logo
        #[arg(long)]
        logo_url: Option<String>,

        /// Arquivo de cache do logo
        #[arg(long)]
        logo_cache: Option<PathBuf>,

        /// Gera sem logo
        #[arg(long, conflicts_with = "logo_url")]
        no_logo: bool,
    },

    /// Confere a planilha SGS com o cadastro, sem gerar PDF
    Check {
        /// Planilha SGS
        #[arg(required = true)]
        survey: PathBuf,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Exporta a conferência SGS x cadastro para Excel
    ExportMatch {
        /// Planilha SGS
        #[arg(required = true)]
        survey: PathBuf,

        /// Arquivo ou pasta de saída (padrão: Conferencia_Kits.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Mostra/edita a configuração
    Config {
        /// Mostra a configuração
        #[arg(long)]
        show: bool,

        #[arg(long)]
        set_catalog: Option<PathBuf>,

        #[arg(long)]
        set_materials: Option<PathBuf>,

        #[arg(long)]
        set_logo_url: Option<String>,

        #[arg(long)]
        set_logo_cache: Option<PathBuf>,
    },
}

impl CatalogArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            catalog_source: self.catalog.clone(),
            strict_catalog: self.strict_catalog,
            ..Default::default()
        }
    }
}
