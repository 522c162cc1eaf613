use std::path::PathBuf;
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),

    #[error("image service at {url} answered {status}")]
    Service { url: String, status: StatusCode },

    #[error("failed to fetch image from URL: {url} ({status})")]
    Download { url: String, status: StatusCode },

    #[error("cannot derive a file name from URL: {0}")]
    FileName(String),

    #[error("failed to write image to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
