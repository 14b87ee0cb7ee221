use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("No reports to generate")]
    NothingToGenerate,
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Failed to decode image: {0}")]
    ImageError(String),
    #[error("Failed to read report data: {0}")]
    InputError(String),
    #[error("Failed to load configuration: {0}")]
    ConfigError(String),
    #[error("Invalid month: {0}")]
    DateError(String),
    #[error("Failed to deliver document: {0}")]
    DeliveryError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<::image::ImageError> for ReportError {
    fn from(err: ::image::ImageError) -> Self {
        ReportError::ImageError(err.to_string())
    }
}

pub type Result<T, E = ReportError> = std::result::Result<T, E>;
