//! Metadata of a single comic, as served by `info.0.json`.

use super::errors::UnsupportedExtension;
use crate::stdx::serde::optional_number;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use url::Url;

/// Represents the metadata of a comic on `xkcd.com`.
///
/// Only `num` and `img` are required to be present. Everything else is passed
/// through as the archive supplies it, and defaults to empty when missing.
///
/// # Example
///
/// ```
/// # use xkcd::archive::{Comic, Extension};
/// let comic: Comic = serde_json::from_str(r#"{
///     "num": 614,
///     "img": "https://imgs.xkcd.com/comics/woodpecker.png",
///     "title": "Woodpecker"
/// }"#)?;
///
/// assert_eq!(614, comic.number());
/// assert_eq!(Ok(Extension::Png), comic.extension());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comic {
    num: u32,
    img: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    safe_title: String,
    #[serde(default)]
    alt: String,
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    news: String,
    #[serde(default, deserialize_with = "optional_number")]
    year: Option<i32>,
    #[serde(default, deserialize_with = "optional_number")]
    month: Option<u32>,
    #[serde(default, deserialize_with = "optional_number")]
    day: Option<u32>,
}

impl Comic {
    /// Returns the comic's own number.
    ///
    /// For the metadata of the latest comic, this is the number of comics in the archive.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.num
    }

    /// Returns the absolute url of the comic's image.
    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.img
    }

    /// Returns the title of the comic.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the title stripped of any markup.
    #[must_use]
    pub fn safe_title(&self) -> &str {
        &self.safe_title
    }

    /// Returns the hover text of the comic.
    #[must_use]
    pub fn alt(&self) -> &str {
        &self.alt
    }

    /// Returns the transcript of the comic. Empty for most recent comics.
    #[must_use]
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Returns the link the comic image points to, if any.
    #[must_use]
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Returns the news blurb published alongside the comic, if any.
    #[must_use]
    pub fn news(&self) -> &str {
        &self.news
    }

    /// Returns the date the comic was published.
    ///
    /// `None` if the archive omitted any part of the date, sent something that isn't a number,
    /// or the parts don't form a valid calendar date.
    #[must_use]
    pub fn published(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)
    }

    /// Returns the file extension of the comic's image.
    ///
    /// The extension is the text after the final `.` of the last path segment of
    /// [`image_url`](Self::image_url). Query strings and fragments are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedExtension`] if the extension isn't one of `png`, `jpg`,
    /// `jpeg` or `gif`. Interactive comics have an image url ending in `/` and report an
    /// empty extension.
    pub fn extension(&self) -> Result<Extension, UnsupportedExtension> {
        let url = Url::parse(&self.img).ok();

        let segment = match &url {
            Some(url) => url
                .path_segments()
                .and_then(|mut segments| segments.next_back())
                .unwrap_or_default(),
            None => self.img.rsplit('/').next().unwrap_or_default(),
        };

        let extension = segment
            .rsplit_once('.')
            .map_or("", |(_, extension)| extension);

        extension.parse()
    }
}

/// Image formats the archive is known to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    /// `png`
    Png,
    /// `jpg`
    Jpg,
    /// `jpeg`
    Jpeg,
    /// `gif`
    Gif,
}

impl Extension {
    /// Returns the extension as it appears in a file name, without the leading `.`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
        }
    }
}

impl FromStr for Extension {
    type Err = UnsupportedExtension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(Self::Png),
            "jpg" => Ok(Self::Jpg),
            "jpeg" => Ok(Self::Jpeg),
            "gif" => Ok(Self::Gif),
            _ => Err(UnsupportedExtension(s.to_owned())),
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
