use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::ZipError;
use crate::io::RangeFetch;

use super::fetch_confirmed;
use super::records::{CompressionMethod, DirectoryIndex, LocalFileHeader};

/// Extra bytes fetched past the compressed payload to cover the local
/// header's variable-length filename and extra fields, whose sizes are not
/// known until the header itself is read. Headers larger than this fail with
/// `HeaderOverflow` instead of truncating.
const LOCAL_HEADER_HEADROOM: u64 = 1024;

/// Extracts single members resolved through a [`DirectoryIndex`].
///
/// One range fetch per member: the local header and the compressed payload
/// come down together, the header is reconciled against the directory
/// record, and the payload is inflated (or passed through when stored).
/// Extractions are independent and stateless given a built index.
pub struct MemberExtractor<F: RangeFetch> {
    fetcher: Arc<F>,
    size: u64,
}

impl<F: RangeFetch> MemberExtractor<F> {
    pub fn new(fetcher: Arc<F>) -> Self {
        let size = fetcher.size();
        Self { fetcher, size }
    }

    /// Fetch and decompress one member by name.
    ///
    /// # Errors
    ///
    /// `MemberNotFound` for names absent from the index (checked before any
    /// fetch), `DirectoryCorrupt` when the directory points outside the
    /// archive or at an invalid local header, `SizeMismatch` when local
    /// header and directory disagree on the compressed size,
    /// `HeaderOverflow` when the header's variable fields exceed the fetch
    /// headroom, and `UnsupportedCompression` for methods other than stored
    /// or deflate. Transport and inflate failures propagate.
    pub async fn extract(&self, index: &DirectoryIndex, name: &str) -> Result<Vec<u8>, ZipError> {
        let record = index.get(name).ok_or_else(|| ZipError::MemberNotFound {
            name: name.to_string(),
        })?;

        let header_offset = record.local_header_offset as u64;
        if header_offset >= self.size {
            // the directory is authoritative; an offset past the archive
            // end means it lied
            return Err(ZipError::DirectoryCorrupt {
                offset: header_offset,
            });
        }

        let end = (header_offset + record.compressed_size as u64 + LOCAL_HEADER_HEADROOM)
            .min(self.size)
            - 1;
        let body = fetch_confirmed(&*self.fetcher, header_offset, end).await?;

        tracing::debug!(
            member = name,
            header_offset,
            fetched = body.len(),
            "fetched member range"
        );

        let header =
            LocalFileHeader::from_bytes(&body).map_err(|_| ZipError::DirectoryCorrupt {
                offset: header_offset,
            })?;

        // The local header of a streamed member carries zero sizes and
        // defers to a data descriptor; the directory's size is authoritative
        // there. In every other case the two must agree exactly.
        let compressed_size = if header.compressed_size == 0 && header.has_deferred_sizes() {
            record.compressed_size
        } else if header.compressed_size != record.compressed_size {
            return Err(ZipError::SizeMismatch {
                name: name.to_string(),
                local: header.compressed_size,
                directory: record.compressed_size,
            });
        } else {
            header.compressed_size
        };

        let data_start = header.data_offset();
        let data_end = data_start + compressed_size as usize;
        if data_end > body.len() {
            return Err(ZipError::HeaderOverflow {
                name: name.to_string(),
                headroom: LOCAL_HEADER_HEADROOM,
            });
        }
        let payload = &body[data_start..data_end];

        match CompressionMethod::from_u16(header.compression_method) {
            CompressionMethod::Stored => Ok(payload.to_vec()),
            CompressionMethod::Deflate => {
                inflate_raw(payload, record.uncompressed_size as usize)
            }
            CompressionMethod::Unknown(method) => Err(ZipError::UnsupportedCompression {
                name: name.to_string(),
                method,
            }),
        }
    }

    /// Extract a member and write it to disk, creating parent directories
    pub async fn extract_to_file(
        &self,
        index: &DirectoryIndex,
        name: &str,
        output_path: &Path,
    ) -> anyhow::Result<()> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let data = self.extract(index, name).await?;

        let mut file = fs::File::create(output_path).await?;
        file.write_all(&data).await?;

        Ok(())
    }

    /// Extract a member to stdout
    pub async fn extract_to_stdout(&self, index: &DirectoryIndex, name: &str) -> anyhow::Result<()> {
        let data = self.extract(index, name).await?;

        let mut stdout = tokio::io::stdout();
        stdout.write_all(&data).await?;

        Ok(())
    }
}

/// Inflate a raw DEFLATE stream (no zlib header or trailing checksum).
fn inflate_raw(data: &[u8], size_hint: usize) -> Result<Vec<u8>, ZipError> {
    let mut decoder = flate2::read::DeflateDecoder::new(data);
    let mut out = Vec::with_capacity(size_hint);
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
