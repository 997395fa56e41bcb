use std::path::PathBuf;
use thiserror::Error;

/// Why a snapshot could not be written.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid snapshot label: '{0}'")]
    InvalidLabel(String),
    #[error("writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("encoding snapshot: {0}")]
    Csv(#[from] csv::Error),
}
