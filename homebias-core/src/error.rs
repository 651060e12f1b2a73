use thiserror::Error;

#[derive(Error, Debug)]
pub enum HomeBiasError {
    #[error("Missing required column '{column}' in {source_name}")]
    MissingColumn { column: String, source_name: String },

    #[error("No pairwise distance recorded for {country1} -> {country2}")]
    MissingPair { country1: String, country2: String },

    #[error("No influence value supplied for country '{0}'")]
    MissingInfluence(String),

    #[error("Invalid influence value '{value}' for country '{country}'")]
    InvalidInfluence { country: String, value: String },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HomeBiasError>;
