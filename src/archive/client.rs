//! Represents a client abstraction for `xkcd.com`, both public and private methods.

use super::{
    comic::Comic,
    errors::{ClientError, ImageError, MetadataError},
};
use crate::stdx::http::{self, DEFAULT_USER_AGENT};
use reqwest::Response;
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};
use url::Url;

/// Where comics are fetched from unless overridden with [`ClientBuilder::base_url`].
pub const DEFAULT_BASE_URL: &str = "https://xkcd.com";

/// How many comics are downloaded at the same time unless overridden with
/// [`ClientBuilder::concurrency`].
pub const DEFAULT_CONCURRENCY: usize = 16;

/// What a batch download does when the image of a comic fails to download or save.
///
/// Metadata failures and unsupported extensions are always skipped; this only
/// governs the image request and the file write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageErrorPolicy {
    /// Record the comic as skipped and carry on with the rest.
    #[default]
    Skip,
    /// Let every other comic finish, then fail the batch with the first image error.
    Abort,
}

/// A builder for configuring and creating instances of [`Client`] with custom settings.
///
/// # Example
///
/// ```
/// # use xkcd::archive::{ClientBuilder, ImageErrorPolicy};
/// # use std::time::Duration;
/// let client = ClientBuilder::new()
///     .user_agent("custom-agent/1.0")
///     .concurrency(4)
///     .timeout(Duration::from_secs(30))
///     .on_image_error(ImageErrorPolicy::Abort)
///     .build()?;
/// # Ok::<(), xkcd::archive::errors::ClientError>(())
/// ```
#[derive(Debug)]
pub struct ClientBuilder {
    builder: reqwest::ClientBuilder,
    base_url: String,
    concurrency: usize,
    on_image_error: ImageErrorPolicy,
}

impl Default for ClientBuilder {
    #[must_use]
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    ///
    /// This includes a default user agent (`xkcd/VERSION`), [`DEFAULT_BASE_URL`] and
    /// [`DEFAULT_CONCURRENCY`], and no request timeout.
    #[must_use]
    pub fn new() -> Self {
        let builder = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .use_rustls_tls()
            .brotli(true);

        Self {
            builder,
            base_url: DEFAULT_BASE_URL.to_owned(),
            concurrency: DEFAULT_CONCURRENCY,
            on_image_error: ImageErrorPolicy::default(),
        }
    }

    /// Sets a custom `User-Agent` header for the [`Client`].
    #[must_use]
    pub fn user_agent(self, user_agent: &str) -> Self {
        Self {
            builder: self.builder.user_agent(user_agent),
            ..self
        }
    }

    /// Sets the archive host metadata is requested from, e.g. `http://localhost:8080`.
    ///
    /// Image urls are taken verbatim from the metadata and are not affected.
    #[must_use]
    pub fn base_url(self, base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            ..self
        }
    }

    /// Sets how many comics are in flight at once during a batch download.
    ///
    /// Must be at least `1`, otherwise [`build`](Self::build) fails.
    #[must_use]
    pub fn concurrency(self, concurrency: usize) -> Self {
        Self {
            concurrency,
            ..self
        }
    }

    /// Sets a deadline for every request, from connecting until the body has been read.
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        Self {
            builder: self.builder.timeout(timeout),
            ..self
        }
    }

    /// Sets what a batch download does when an image fails. Defaults to [`ImageErrorPolicy::Skip`].
    #[must_use]
    pub fn on_image_error(self, policy: ImageErrorPolicy) -> Self {
        Self {
            on_image_error: policy,
            ..self
        }
    }

    /// Consumes the `ClientBuilder` and returns a fully-configured [`Client`].
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidConcurrency`] if the concurrency was set to `0`.
    /// - [`ClientError::MalformedUrl`] if the base url doesn't parse.
    /// - [`ClientError::Unexpected`] if the underlying HTTP client could not be built,
    ///   such as when TLS initialization fails.
    pub fn build(self) -> Result<Client, ClientError> {
        if self.concurrency == 0 {
            return Err(ClientError::InvalidConcurrency);
        }

        Url::parse(&self.base_url)?;

        Ok(Client {
            http: self.builder.build()?,
            base_url: self.base_url.into(),
            concurrency: self.concurrency,
            on_image_error: self.on_image_error,
        })
    }
}

/// A high-level, asynchronous client to interact with `xkcd.com`.
///
/// The `Client` owns the single connection pool shared by every request it makes.
/// Cloning is cheap and shares that pool. The pool is released when the last clone
/// is dropped.
///
/// # Example
///
/// ```
/// # use xkcd::archive::Client;
/// let client = Client::new();
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    pub(super) http: reqwest::Client,
    base_url: Arc<str>,
    pub(super) concurrency: usize,
    pub(super) on_image_error: ImageErrorPolicy,
}

// Creation impls
impl Client {
    /// Instantiates a new [`Client`] with the default settings.
    ///
    /// # Panics
    ///
    /// This function will panic if the TLS backend cannot be initialized. For a
    /// safer alternative, use the [`ClientBuilder`].
    #[must_use]
    pub fn new() -> Self {
        ClientBuilder::new().build().expect("Client::new()")
    }

    /// Returns a [`ClientBuilder`] for creating a custom-configured `Client`.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

// Public facing impls
impl Client {
    /// Fetches the metadata of the comic numbered `index`.
    ///
    /// An `index` of `0` fetches the latest comic instead, whose [`number`](Comic::number)
    /// is the number of comics in the archive. No retries are made.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use xkcd::archive::{Client, errors::Error};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Error> {
    /// let client = Client::new();
    ///
    /// let comic = client.comic(614).await?;
    /// assert_eq!("Woodpecker", comic.title());
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a [`MetadataError`] if the request fails, the archive answers with a
    /// non-success status, or the body isn't valid metadata.
    pub async fn comic(&self, index: u32) -> Result<Comic, MetadataError> {
        let response = self.get_comic_json(index).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetadataError::Status(status.as_u16()));
        }

        let comic: Comic = serde_json::from_str(&response.text().await?)?;

        Ok(comic)
    }

    /// Fetches the metadata of the latest comic.
    pub async fn latest(&self) -> Result<Comic, MetadataError> {
        self.comic(0).await
    }

    /// Like [`comic`](Self::comic), but a failure is logged and reported as `None`.
    ///
    /// Callers should treat `None` as "skip this comic".
    pub async fn metadata(&self, index: u32) -> Option<Comic> {
        match self.comic(index).await {
            Ok(comic) => Some(comic),
            Err(err) => {
                warn!(
                    index,
                    kind = err.kind(),
                    error = %err,
                    "failed to fetch comic metadata"
                );
                None
            }
        }
    }

    /// Returns the number of comics downloaded at the same time during a batch.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns what a batch download does when an image fails.
    #[must_use]
    pub fn image_error_policy(&self) -> ImageErrorPolicy {
        self.on_image_error
    }

    /// Returns the metadata url for `index`, `0` being the latest comic.
    #[must_use]
    pub fn metadata_url(&self, index: u32) -> String {
        if index == 0 {
            http::join(&self.base_url, "info.0.json")
        } else {
            http::join(&self.base_url, &format!("{index}/info.0.json"))
        }
    }
}

// Internal only impls
impl Client {
    pub(super) async fn get_comic_json(&self, index: u32) -> Result<Response, reqwest::Error> {
        let url = self.metadata_url(index);
        debug!(index, %url, "requesting comic metadata");
        self.http.get(&url).send().await
    }

    pub(super) async fn get_image(&self, url: &str) -> Result<Vec<u8>, ImageError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
