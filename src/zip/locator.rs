//! Central Directory discovery and parsing.
//!
//! ZIP archives are indexed from the end: the End of Central Directory
//! (EOCD) trailer points at the Central Directory, which in turn points at
//! every member's local header. Locating the directory therefore needs only
//! the archive's tail, which is what makes extraction over HTTP Range
//! requests cheap.
//!
//! The locator fetches a single trailing window, finds the EOCD inside it,
//! and walks the directory records into a [`DirectoryIndex`]. When the
//! directory starts before the window (large archives with big directories),
//! exactly one additional prefix fetch covers the gap.

use std::sync::Arc;

use crate::error::ZipError;
use crate::io::RangeFetch;

use super::fetch_confirmed;
use super::records::{CentralDirectoryRecord, DirectoryIndex, EndOfCentralDirectory};

/// Size of the trailing window fetched to find the EOCD.
///
/// The EOCD is 22 bytes plus a comment of up to 65535 bytes, so a 64 KiB
/// window covers all but pathologically commented archives; those fail with
/// `DirectoryNotFound`, a known limitation.
const TAIL_WINDOW: u64 = 65536;

/// Locates and decodes the Central Directory of one remote archive.
///
/// Holds the archive size (captured from the fetcher at construction) and a
/// shared handle to the range-fetch transport. `locate` is the first half of
/// the two-phase API; the returned index feeds
/// [`MemberExtractor::extract`](super::MemberExtractor::extract).
pub struct DirectoryLocator<F: RangeFetch> {
    fetcher: Arc<F>,
    size: u64,
}

impl<F: RangeFetch> DirectoryLocator<F> {
    pub fn new(fetcher: Arc<F>) -> Self {
        let size = fetcher.size();
        Self { fetcher, size }
    }

    /// Build the filename index from the archive's Central Directory.
    ///
    /// Issues one range fetch for the trailing window and, only when the
    /// directory starts before that window, a second fetch for the missing
    /// prefix.
    ///
    /// # Errors
    ///
    /// `DirectoryNotFound` when no EOCD signature is present in the window,
    /// `UnsupportedArchiveFormat` for ZIP64 or multi-disk archives,
    /// `DirectoryCorrupt` when the directory fails to decode before yielding
    /// a single record, `RangeUnsupported` when the server ignores a range
    /// request, and `Transport` for request-level failures.
    pub async fn locate(&self) -> Result<DirectoryIndex, ZipError> {
        if self.size < EndOfCentralDirectory::SIZE as u64 {
            return Err(ZipError::DirectoryNotFound { window: self.size });
        }

        let window_len = TAIL_WINDOW.min(self.size);
        let mut window_start = self.size - window_len;
        let mut window = fetch_confirmed(&*self.fetcher, window_start, self.size - 1).await?;

        let eocd_pos = find_eocd(&window).ok_or(ZipError::DirectoryNotFound {
            window: window_len,
        })?;
        let eocd = EndOfCentralDirectory::from_bytes(&window[eocd_pos..]).map_err(|_| {
            ZipError::DirectoryCorrupt {
                offset: window_start + eocd_pos as u64,
            }
        })?;

        if eocd.is_zip64() || eocd.spans_disks() {
            return Err(ZipError::UnsupportedArchiveFormat);
        }

        let cd_offset = eocd.cd_offset as u64;
        let cd_size = eocd.cd_size as u64;

        tracing::debug!(
            eocd = window_start + eocd_pos as u64,
            cd_offset,
            cd_size,
            declared_entries = eocd.total_entries,
            "located end of central directory"
        );

        if cd_offset >= self.size {
            return Err(ZipError::DirectoryCorrupt { offset: cd_offset });
        }

        // The trailer may point at a directory that starts before the tail
        // window; fetch the missing prefix and prepend it.
        if cd_offset < window_start {
            let mut prefix = fetch_confirmed(&*self.fetcher, cd_offset, window_start - 1).await?;
            tracing::debug!(
                prefix_start = cd_offset,
                prefix_len = prefix.len(),
                "directory precedes tail window, fetched prefix"
            );
            prefix.extend(window);
            window = prefix;
            window_start = cd_offset;
        }

        let dir_start = (cd_offset - window_start) as usize;
        let dir_end = dir_start
            .saturating_add(cd_size as usize)
            .min(window.len());

        let mut index = DirectoryIndex::default();
        let mut pos = dir_start;

        // Walk records until the declared directory end, stopping early when
        // fewer than a fixed header remains or a record fails to decode. A
        // decode failure after at least one record is the end of the
        // directory; before any record, the directory itself is bad.
        while dir_end - pos >= CentralDirectoryRecord::SIZE {
            match CentralDirectoryRecord::parse(&window[pos..dir_end]) {
                Ok((record, consumed)) => {
                    index.insert(record);
                    pos += consumed;
                }
                Err(_) if index.is_empty() => {
                    return Err(ZipError::DirectoryCorrupt {
                        offset: window_start + pos as u64,
                    });
                }
                Err(_) => break,
            }
        }

        if index.len() != eocd.total_entries as usize {
            tracing::warn!(
                parsed = index.len(),
                declared = eocd.total_entries,
                "directory entry count differs from trailer"
            );
        }
        tracing::debug!(members = index.len(), "parsed central directory");

        Ok(index)
    }
}

/// Find the EOCD within a window that ends at the archive's last byte.
///
/// Scans backwards and accepts a signature hit only when its comment-length
/// field accounts for every byte after the record, which rules out signature
/// bytes that happen to appear inside member data or the comment itself.
fn find_eocd(window: &[u8]) -> Option<usize> {
    if window.len() < EndOfCentralDirectory::SIZE {
        return None;
    }

    for i in (0..=window.len() - EndOfCentralDirectory::SIZE).rev() {
        if &window[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
            let comment_len = u16::from_le_bytes([window[i + 20], window[i + 21]]) as usize;
            if i + EndOfCentralDirectory::SIZE + comment_len == window.len() {
                return Some(i);
            }
        }
    }

    None
}
