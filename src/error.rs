use std::path::PathBuf;

use thiserror::Error;

pub type StudyResult<T> = Result<T, StudyError>;

#[derive(Debug, Error)]
pub enum StudyError {
    #[error("failed to read `{path}`: {message}")]
    Io { path: PathBuf, message: String },

    #[error("data file not found: `{0}`")]
    MissingFile(PathBuf),

    #[error("data file has no header row: `{0}`")]
    MissingHeader(PathBuf),

    #[error("malformed delimited data in `{path}`: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("invalid study descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("invalid import configuration: {0}")]
    InvalidConfig(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("unknown entity id: {0}")]
    UnknownEntity(i32),

    #[error("failed to build import worker pool: {0}")]
    ThreadPool(String),

    #[error("no study is loaded")]
    NoStudyLoaded,
}
