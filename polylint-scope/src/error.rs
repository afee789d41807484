use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScopeError {
    #[error("invalid glob pattern `{pattern}`: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("read project descriptor {path}: {message}")]
    DescriptorIo { path: Utf8PathBuf, message: String },

    #[error("parse project descriptor {path}: {message}")]
    DescriptorParse { path: Utf8PathBuf, message: String },
}
