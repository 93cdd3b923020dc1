use thiserror::Error;

#[derive(Error, Debug)]
pub enum KitReportError {
    #[error("erro de configuração: {0}")]
    Config(String),

    #[error(transparent)]
    Common(#[from] kit_report_common::Error),

    #[error("arquivo não encontrado: {0}")]
    FileNotFound(String),

    #[error("erro ao ler planilha {0}")]
    Workbook(String),

    #[error("erro ao obter logo: {0}")]
    LogoFetch(String),

    #[error("erro ao carregar imagem: {0}")]
    ImageLoad(String),

    #[error("erro ao gerar PDF: {0}")]
    PdfGeneration(String),

    #[error("erro ao gerar Excel: {0}")]
    ExcelGeneration(String),

    #[error("erro de JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KitReportError>;
