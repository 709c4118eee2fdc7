//! Errors that can happen when interacting with `xkcd.com`.

use std::path::PathBuf;
use thiserror::Error;

#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    ClientError(#[from] ClientError),
    #[error(transparent)]
    MetadataError(#[from] MetadataError),
    #[error(transparent)]
    DestinationError(#[from] DestinationError),
    #[error(transparent)]
    ImageError(#[from] ImageError),
    #[error(transparent)]
    DownloadError(#[from] DownloadError),
}

#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("concurrency must be at least `1`")]
    InvalidConcurrency,
    #[error(transparent)]
    MalformedUrl(#[from] url::ParseError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        Self::Unexpected(anyhow::Error::from(error))
    }
}

/// Failure to get the metadata of a single comic.
///
/// These are never fatal to a batch: the comic is skipped.
#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status `{0}`")]
    Status(u16),
    #[error("malformed metadata: {0}")]
    Decode(#[from] serde_json::Error),
}

impl MetadataError {
    /// Short name of the failure category, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Request(err) if err.is_timeout() => "timeout",
            Self::Request(err) if err.is_connect() => "connect",
            Self::Request(_) => "request",
            Self::Status(_) => "status",
            Self::Decode(_) => "decode",
        }
    }
}

/// Problems with the directory comics are saved into.
///
/// Always checked before any network activity.
#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DestinationError {
    #[error("no such directory: `{}`", .0.display())]
    NotFound(PathBuf),
    #[error("`{}` is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("directory `{}`: permission denied", .0.display())]
    ReadOnly(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure to download or save the image of a single comic.
#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status `{0}`")]
    Status(u16),
    #[error("failed to write `{}`: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The image url of a comic didn't end in one of `png`, `jpg`, `jpeg` or `gif`.
///
/// Holds the extension that was found, which is empty if there was none.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected extension: `{0}`")]
pub struct UnsupportedExtension(pub String);

#[allow(missing_docs)]
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Destination(#[from] DestinationError),
    #[error("failed to get the latest comic: {0}")]
    Latest(#[source] MetadataError),
    #[error("failed to download comic #{index}: {source}")]
    Image {
        index: u32,
        #[source]
        source: ImageError,
    },
}
