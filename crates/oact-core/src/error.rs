use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid reference format: {0}")]
    InvalidRefFormat(String),

    #[error("reference target not found: {0}")]
    RefTargetNotFound(String),
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),
}

/// Errors raised by a [`CodeGenerator`](crate::CodeGenerator) while rendering artifacts.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("template {name} failed: {message}")]
    Template { name: String, message: String },
}

/// Errors that abort a generation run. Nothing is reported as written once one occurs.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("OpenAPI spec file not found: {}", .0.display())]
    SpecNotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to process {}: {source}", path.display())]
    Transform {
        path: PathBuf,
        source: TransformError,
    },

    #[error(transparent)]
    Generate(#[from] GeneratorError),

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
