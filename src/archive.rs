//! An abstraction for the `xkcd.com` comic archive.
//!
//! Comics are numbered sequentially from `1`, and each one has a JSON metadata document at
//! `/{number}/info.0.json` holding, among other things, the absolute url of its image. The
//! latest comic's document is also served at `/info.0.json`, which is how the size of the
//! archive is found.
//!
//! Comic `404` was never published: its url lands on the site's error page.

pub mod client;
pub mod comic;
pub mod download;
pub mod errors;

pub use client::{Client, ClientBuilder, ImageErrorPolicy};
pub use comic::{Comic, Extension};
pub use download::{Destination, Outcome, Report, Saved, SkipReason, Skipped};
