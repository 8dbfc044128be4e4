//! ZIP container model and the two-phase locate/extract algorithm.
//!
//! ## Architecture
//!
//! - [`records`]: typed decoders for the wire-format records (EOCD, Central
//!   Directory record, Local File Header) and the filename index
//! - [`locator`]: finds and parses the Central Directory from the archive's
//!   tail, producing a [`DirectoryIndex`]
//! - [`extractor`]: resolves one index entry to a byte range and turns it
//!   back into file data
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each member
//! 2. The Central Directory with metadata for all members
//! 3. The End of Central Directory (EOCD) record at the end
//!
//! Because the authoritative index hangs off the trailer, an archive can be
//! indexed from its last 64 KiB and members fetched individually - which is
//! the whole point when the archive lives behind an HTTP server.
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - STORED (no compression) and DEFLATE members
//!
//! ## Limitations
//!
//! - No ZIP64 or multi-disk archives (rejected explicitly, never mis-parsed)
//! - No encryption support
//! - Compressed payloads are buffered in memory

mod extractor;
mod locator;
mod records;

pub use extractor::MemberExtractor;
pub use locator::DirectoryLocator;
pub use records::{
    CentralDirectoryRecord, CompressionMethod, DirectoryIndex, DosDateTime,
    EndOfCentralDirectory, LocalFileHeader,
};

use crate::error::ZipError;
use crate::io::RangeFetch;

/// Fetch an inclusive range and insist the server honored it.
///
/// An unconfirmed response (typically a 200 with the whole resource) must
/// never be parsed as if it were the requested slice.
pub(crate) async fn fetch_confirmed<F: RangeFetch + ?Sized>(
    fetcher: &F,
    start: u64,
    end: u64,
) -> Result<Vec<u8>, ZipError> {
    let range = fetcher
        .fetch_range(start, end)
        .await
        .map_err(ZipError::Transport)?;

    if !range.confirmed {
        return Err(ZipError::RangeUnsupported { start, end });
    }

    let expected = end - start + 1;
    if range.body.len() as u64 != expected {
        return Err(ZipError::Transport(anyhow::anyhow!(
            "range {}-{} returned {} bytes, expected {}",
            start,
            end,
            range.body.len(),
            expected
        )));
    }

    Ok(range.body)
}
