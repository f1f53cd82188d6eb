use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("corpus has no sentences to draw from")]
    EmptyCorpus,

    #[error("corpus group '{0}' has no sentences")]
    EmptyGroup(String),

    #[error("corpus '{0}' has both sentences and chapters; use one or the other")]
    MixedCorpus(String),

    #[error("unknown bundled corpus: {0}")]
    UnknownCorpus(String),

    #[error("failed to read corpus file {path}: {source}")]
    CorpusFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid corpus json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
