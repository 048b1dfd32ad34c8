//! Materializing base64 uploads as files on disk.
//!
//! An oversized payload is rejected from its encoded length, before it is
//! decoded. The payload is decoded in full before any storage is touched, so
//! a malformed or oversized upload never leaves an artifact behind. The
//! artifact is written through a [`tempfile::NamedTempFile`] and only kept
//! once every byte is flushed; on any failure the temp file is removed when
//! it drops.

use std::io::Write;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use paramkit_config::UploadSettings;
use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::value::FileRef;

/// Standard alphabet; padding optional, as browsers and CLI tools disagree on it.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a base64 payload for field `name` into a freshly created file.
///
/// ASCII whitespace in the payload (line-wrapped MIME output) is ignored.
pub fn decode_upload(
    name: &str,
    payload: &str,
    settings: &UploadSettings,
) -> Result<FileRef, ValidationError> {
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if let Some(limit) = settings.max_bytes {
        let actual = decoded_len(&compact);
        if actual > limit {
            return Err(ValidationError::UploadTooLarge {
                name: name.to_string(),
                limit,
                actual,
            });
        }
    }
    let bytes = LENIENT
        .decode(compact.as_bytes())
        .map_err(|e| ValidationError::InvalidBase64 {
            name: name.to_string(),
            message: e.to_string(),
        })?;
    let actual = bytes.len() as u64;

    let storage = |source: std::io::Error| {
        warn!(field = %name, error = %source, "failed to store upload");
        ValidationError::Storage {
            name: name.to_string(),
            source,
        }
    };

    let dir = settings.resolved_temp_dir();
    let mut file = tempfile::Builder::new()
        .prefix(&settings.prefix)
        .tempfile_in(&dir)
        .map_err(storage)?;
    file.write_all(&bytes).map_err(storage)?;
    file.flush().map_err(storage)?;
    let (_, path) = file.keep().map_err(|e| storage(e.error))?;

    debug!(field = %name, path = %path.display(), bytes = actual, "stored upload");
    Ok(FileRef::new(path))
}

/// Decoded size of a whitespace-free base64 payload, from its length alone.
///
/// Exact for well-formed input, padded or not.
fn decoded_len(compact: &str) -> u64 {
    let symbols = compact.trim_end_matches('=').len() as u64;
    symbols / 4 * 3 + (symbols % 4) * 3 / 4
}
