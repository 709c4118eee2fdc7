//! Downloading comic images to disk, one at a time or the whole archive at once.

use super::{
    Client,
    client::ImageErrorPolicy,
    comic::{Comic, Extension},
    errors::{DestinationError, DownloadError, ImageError},
};
use futures::{StreamExt, stream};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{debug, error, info, warn};

/// Comic `404` was never published. Its url serves the site's "not found" page instead.
pub const MISSING_COMIC: u32 = 404;

/// A directory that has been checked to exist and be writable.
///
/// Images are saved in it as `<number>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    path: PathBuf,
}

impl Destination {
    /// Checks that `path` is an existing, writable directory.
    ///
    /// The directory is never created.
    ///
    /// # Errors
    ///
    /// - [`DestinationError::NotFound`] if nothing exists at `path`.
    /// - [`DestinationError::NotADirectory`] if `path` is a file.
    /// - [`DestinationError::ReadOnly`] if a file cannot be created in the directory.
    ///
    /// Writability is checked by creating, then removing, an anonymous temporary file.
    pub async fn new<P>(path: P) -> Result<Self, DestinationError>
    where
        P: AsRef<Path> + Send,
    {
        let path = path.as_ref();

        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(DestinationError::NotFound(path.to_path_buf()));
            }
            Err(err) => return Err(DestinationError::Io(err)),
        };

        if !metadata.is_dir() {
            return Err(DestinationError::NotADirectory(path.to_path_buf()));
        }

        let path = path.to_path_buf();

        let directory = path.clone();
        let writable = tokio::task::spawn_blocking(move || tempfile::tempfile_in(directory))
            .await
            .map_err(|err| DestinationError::Io(std::io::Error::other(err)))?;

        match writable {
            Ok(_file) => Ok(Self { path }),
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::PermissionDenied | ErrorKind::ReadOnlyFilesystem
                ) =>
            {
                Err(DestinationError::ReadOnly(path))
            }
            Err(err) => Err(DestinationError::Io(err)),
        }
    }

    /// Returns the directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns where the image of comic `index` is saved.
    #[must_use]
    pub fn target(&self, index: u32, extension: Extension) -> PathBuf {
        self.path.join(format!("{index}.{extension}"))
    }
}

/// Why a comic was not saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The comic is [`MISSING_COMIC`]. Nothing was requested.
    Missing,
    /// The metadata could not be fetched or decoded.
    NoMetadata,
    /// The image has an extension other than `png`, `jpg`, `jpeg` or `gif`.
    UnsupportedExtension(String),
    /// The image could not be downloaded or written. Only with [`ImageErrorPolicy::Skip`].
    Image(String),
}

/// A comic image that was written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    index: u32,
    path: PathBuf,
    size: usize,
}

impl Saved {
    /// Returns the comic's number.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the file the image was written to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the size of the image in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }
}

/// A comic that was not saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    index: u32,
    reason: SkipReason,
}

impl Skipped {
    /// Returns the comic's number.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns why the comic was not saved.
    #[must_use]
    pub fn reason(&self) -> &SkipReason {
        &self.reason
    }
}

/// The result of handling a single comic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The image was written to disk.
    Saved(Saved),
    /// Nothing was written.
    Skipped(SkipReason),
}

/// Summary of a batch download, ordered by comic number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    latest: u32,
    saved: Vec<Saved>,
    skipped: Vec<Skipped>,
}

impl Report {
    /// Returns the number of the latest comic, which was the upper bound of the batch.
    #[must_use]
    pub fn latest(&self) -> u32 {
        self.latest
    }

    /// Returns every comic that was written to disk.
    #[must_use]
    pub fn saved(&self) -> &[Saved] {
        &self.saved
    }

    /// Returns every comic that was not written, with the reason.
    #[must_use]
    pub fn skipped(&self) -> &[Skipped] {
        &self.skipped
    }
}

impl Client {
    /// Downloads the image of comic `index` and saves it in `destination`.
    ///
    /// # Behavior
    ///
    /// - [`MISSING_COMIC`] is skipped without any request.
    /// - Absent metadata is skipped.
    /// - An image with an unsupported extension is skipped with a warning naming the extension.
    /// - Otherwise the image is saved as `<index>.<extension>`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an [`ImageError`] if the image request fails, the archive answers with a
    /// non-success status, or the file cannot be written.
    pub async fn fetch_and_save(
        &self,
        index: u32,
        comic: Option<&Comic>,
        destination: &Destination,
    ) -> Result<Outcome, ImageError> {
        if index == MISSING_COMIC {
            debug!(index, "skipping comic that was never published");
            return Ok(Outcome::Skipped(SkipReason::Missing));
        }

        let Some(comic) = comic else {
            return Ok(Outcome::Skipped(SkipReason::NoMetadata));
        };

        let extension = match comic.extension() {
            Ok(extension) => extension,
            Err(unsupported) => {
                warn!(
                    index,
                    extension = %unsupported.0,
                    "unexpected extension: `{}` (comic #{})",
                    unsupported.0,
                    index
                );
                return Ok(Outcome::Skipped(SkipReason::UnsupportedExtension(
                    unsupported.0,
                )));
            }
        };

        let bytes = self.get_image(comic.image_url()).await?;

        let path = destination.target(index, extension);

        write(&path, &bytes)
            .await
            .map_err(|source| ImageError::Write {
                path: path.clone(),
                source,
            })?;

        debug!(index, path = %path.display(), size = bytes.len(), "saved comic");

        Ok(Outcome::Saved(Saved {
            index,
            path,
            size: bytes.len(),
        }))
    }

    /// Downloads every comic in the archive into `directory`.
    ///
    /// `directory` must already exist and be writable. This is checked before any request is
    /// made. The latest comic's metadata sets the upper bound, then comics `1..=latest` are
    /// downloaded by a pool of [`concurrency`](Client::concurrency) workers. Each comic has its
    /// metadata fetched, then its image fetched and saved. Comics are independent of each other
    /// and finish in no particular order.
    ///
    /// Comics that are skipped never fail the batch. What happens on an image failure depends
    /// on the [`ImageErrorPolicy`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use xkcd::archive::{Client, errors::Error};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Error> {
    /// let client = Client::builder().concurrency(8).build()?;
    ///
    /// let report = client.download_all("xkcd").await?;
    /// println!("saved {} of {}", report.saved().len(), report.latest());
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// - [`DownloadError::Destination`] if `directory` is missing or not writable.
    /// - [`DownloadError::Latest`] if the latest comic's metadata could not be fetched.
    /// - [`DownloadError::Image`] for the first image failure, with [`ImageErrorPolicy::Abort`].
    pub async fn download_all<P>(&self, directory: P) -> Result<Report, DownloadError>
    where
        P: AsRef<Path> + Send,
    {
        let destination = Destination::new(directory).await?;

        let latest = self
            .latest()
            .await
            .map_err(DownloadError::Latest)?
            .number();

        info!(
            latest,
            concurrency = self.concurrency,
            directory = %destination.path().display(),
            "downloading comics"
        );

        let mut report = Report {
            latest,
            ..Report::default()
        };
        let mut first_error = None;

        let destination = &destination;
        let mut downloads = stream::iter(1..=latest)
            .map(|index| async move { (index, self.download(index, destination).await) })
            .buffer_unordered(self.concurrency);

        while let Some((index, outcome)) = downloads.next().await {
            match outcome {
                Ok(Outcome::Saved(saved)) => report.saved.push(saved),
                Ok(Outcome::Skipped(reason)) => report.skipped.push(Skipped { index, reason }),
                Err(err) => match self.on_image_error {
                    ImageErrorPolicy::Skip => {
                        warn!(index, error = %err, "failed to download comic image");
                        report.skipped.push(Skipped {
                            index,
                            reason: SkipReason::Image(err.to_string()),
                        });
                    }
                    ImageErrorPolicy::Abort => {
                        error!(index, error = %err, "failed to download comic image");
                        if first_error.is_none() {
                            first_error = Some(DownloadError::Image { index, source: err });
                        }
                    }
                },
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        report.saved.sort_by_key(Saved::index);
        report.skipped.sort_by_key(Skipped::index);

        info!(
            saved = report.saved.len(),
            skipped = report.skipped.len(),
            "finished downloading comics"
        );

        Ok(report)
    }

    /// Metadata, then image, then file, for a single comic.
    async fn download(&self, index: u32, destination: &Destination) -> Result<Outcome, ImageError> {
        if index == MISSING_COMIC {
            return self.fetch_and_save(index, None, destination).await;
        }

        let comic = self.metadata(index).await;
        self.fetch_and_save(index, comic.as_ref(), destination).await
    }
}

/// Creates or truncates `path` and writes all of `bytes` to it.
async fn write(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await
}
