use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set, please check your .env file.")]
    MissingVar(&'static str),
    #[error("{var} must be a port number, found '{value}'.")]
    InvalidPort { var: &'static str, value: String },
}

#[derive(Debug, Error)]
#[error("Failed to get table schema for '{table}': {source}")]
pub struct SchemaLookupError {
    pub table: String,
    #[source]
    pub source: sqlx::Error,
}

#[derive(Debug, Error)]
#[error("Failed to read contract document {}: {source}", path.display())]
pub struct ContractLoadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

#[derive(Debug, Error)]
pub enum GenerationServiceError {
    #[error("OPENAI_API_KEY is not set in environment variables")]
    MissingCredential,
    #[error("AI generation failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("AI generation failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("AI generation failed: reply carried no content")]
    EmptyReply,
    #[error("AI generation failed: reply is not valid JSON: {0}")]
    MalformedPayload(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidResponseShapeError {
    #[error("Invalid AI response format: missing '{0}'")]
    Missing(&'static str),
    #[error("Invalid AI response format: '{0}' is empty")]
    Empty(&'static str),
    #[error("Invalid AI response format: '{field}' is not an identifier: {value:?}")]
    NotAnIdentifier { field: &'static str, value: String },
}

#[derive(Debug, Error)]
#[error("Failed to write {}: {source}", path.display())]
pub struct PersistenceError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Any pipeline failure, wrapped once with its cause preserved.
#[derive(Debug, Error)]
pub enum GenerationFailed {
    #[error("Generation failed: {0}")]
    Configuration(#[from] ConfigError),
    #[error("Generation failed: {0}")]
    SchemaLookup(#[from] SchemaLookupError),
    #[error("Generation failed: {0}")]
    ContractLoad(#[from] ContractLoadError),
    #[error("Generation failed: {0}")]
    GenerationService(#[from] GenerationServiceError),
    #[error("Generation failed: {0}")]
    InvalidResponseShape(#[from] InvalidResponseShapeError),
    #[error("Generation failed: {0}")]
    Persistence(#[from] PersistenceError),
}
