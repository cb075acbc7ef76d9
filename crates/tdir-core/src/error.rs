//! Error types for tdir.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level result type for tdir operations.
pub type Result<T> = std::result::Result<T, TdirError>;

/// Top-level error type for tdir.
#[derive(Debug, Error)]
pub enum TdirError {
    #[error("template folder \"{0}\" not found")]
    TemplateFolderNotFound(String),

    #[error("invalid name: {0}")]
    InvalidName(#[from] NameError),

    #[error("already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("target {} is inside folder template {}", .target.display(), .template.display())]
    TargetInsideTemplate { template: PathBuf, target: PathBuf },

    #[error("no template config for \"{0}\"")]
    UnknownTemplate(String),

    #[error("settings error: {0}")]
    Settings(String),

    #[error("watch error: {0}")]
    Watch(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a file or folder name is rejected before anything is created.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Contains illegal characters: < > : \" | ? * \\ /")]
    IllegalCharacter,

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("\"{name}\" is a reserved name")]
    ReservedName { name: String },
}
