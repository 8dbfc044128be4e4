use thiserror::Error;

/// Failures surfaced by the locate and extract operations.
///
/// Every variant is terminal for the operation that produced it: there is no
/// retry or fallback logic anywhere in the crate. Variants carry the offsets
/// and names needed to diagnose what went wrong against which archive region.
#[derive(Debug, Error)]
pub enum ZipError {
    /// The size probe could not determine the archive's total length.
    #[error("could not determine archive size (no Content-Length)")]
    SizeUnknown,

    /// The server answered a Range request with something other than the
    /// exact partial content asked for (typically the whole resource).
    #[error("server did not honor range request for bytes {start}-{end}")]
    RangeUnsupported { start: u64, end: u64 },

    /// No End of Central Directory signature in the trailing window. Either
    /// this is not a ZIP archive, or its comment is longer than the window.
    #[error("end of central directory not found in trailing {window} bytes")]
    DirectoryNotFound { window: u64 },

    /// A directory or local header failed to decode where a valid one is
    /// required, or a directory offset points outside the archive.
    #[error("malformed archive structure at offset {offset}")]
    DirectoryCorrupt { offset: u64 },

    /// ZIP64 sentinel values or multi-disk markers in the trailer.
    #[error("zip64 or multi-disk archives are not supported")]
    UnsupportedArchiveFormat,

    /// The requested filename is not in the directory index.
    #[error("member not found in archive: {name}")]
    MemberNotFound { name: String },

    /// Local header and central directory disagree on the compressed size.
    #[error(
        "local header for {name} declares compressed size {local}, central directory says {directory}"
    )]
    SizeMismatch {
        name: String,
        local: u32,
        directory: u32,
    },

    /// The local header's filename/extra fields pushed the payload past the
    /// fetched range.
    #[error("local header for {name} exceeds the {headroom}-byte fetch headroom")]
    HeaderOverflow { name: String, headroom: u64 },

    /// Compression method other than stored (0) or deflate (8).
    #[error("unsupported compression method {method} for {name}")]
    UnsupportedCompression { name: String, method: u16 },

    /// A range fetch or size probe failed at the transport level.
    #[error("transport request failed: {0}")]
    Transport(anyhow::Error),

    /// The raw DEFLATE stream failed to decompress.
    #[error("failed to inflate member data: {0}")]
    Inflate(#[from] std::io::Error),
}

impl From<anyhow::Error> for ZipError {
    fn from(err: anyhow::Error) -> Self {
        ZipError::Transport(err)
    }
}
