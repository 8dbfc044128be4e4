//! # remzip
//!
//! Extract single members from remote ZIP archives using HTTP Range
//! requests.
//!
//! A ZIP archive keeps its authoritative index, the Central Directory, near
//! the end of the file. This crate fetches only the archive's tail to build
//! a filename index, then one more range per extracted member - so pulling
//! one file out of a multi-gigabyte remote archive transfers a few kilobytes
//! plus that member's compressed bytes.
//!
//! The API is two-phase: [`DirectoryLocator::locate`] builds a
//! [`DirectoryIndex`] once, and [`MemberExtractor::extract`] resolves names
//! against it. Both operate through the [`RangeFetch`] transport trait, with
//! HTTP and local-file implementations provided.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use remzip::{DirectoryLocator, HttpRangeFetcher, MemberExtractor};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let fetcher =
//!         Arc::new(HttpRangeFetcher::new("https://example.com/archive.zip".to_string()).await?);
//!
//!     let index = DirectoryLocator::new(fetcher.clone()).locate().await?;
//!     for record in index.iter() {
//!         println!("{}", record.file_name);
//!     }
//!
//!     let extractor = MemberExtractor::new(fetcher);
//!     let data = extractor.extract(&index, "README.md").await?;
//!     println!("{} bytes", data.len());
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod zip;

pub use cli::Cli;
pub use error::ZipError;
pub use io::{FetchedRange, HttpRangeFetcher, LocalRangeFetcher, RangeFetch};
pub use zip::{
    CentralDirectoryRecord, CompressionMethod, DirectoryIndex, DirectoryLocator, DosDateTime,
    MemberExtractor,
};
