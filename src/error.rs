//! Error types for loading stages and configuration

use std::path::PathBuf;

use thiserror::Error;

/// Problems reading a stage file or a block catalog
#[derive(Error, Debug)]
pub enum StageError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("stage has no size header")]
    MissingHeader,

    #[error("invalid size header {0:?}, expected \"<rows> <cols>\"")]
    BadHeader(String),

    #[error("expected {expected} rows, found {found}")]
    RowCount { expected: usize, found: usize },

    #[error("row {row}: expected {expected} cells, found {found}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column {col}: unknown block key {key:?}")]
    UnknownKey { row: usize, col: usize, key: String },

    #[error("catalog line {line}: expected \"<key>: <BlockType>\", got {text:?}")]
    BadCatalogLine { line: usize, text: String },

    #[error("catalog line {line}: unknown block type {name:?}")]
    UnknownBlockType { line: usize, name: String },
}

/// Problems loading the game configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}
