use percent_encoding::percent_decode_str;
use regex::Regex;

use super::AppError;

/// Name used when the response does not carry a usable filename.
pub const DEFAULT_FILENAME: &str = "audio.mp4";

// Either `filename*=utf-8''<percent-encoded>` or `filename="<literal>"`.
const FILENAME_PATTERN: &str = r#"(?i)filename\*?=utf-8''([^;]+)|filename="([^"]+)""#;

/// Extract the filename from a raw `Content-Disposition` header value.
///
/// The leftmost match wins. The extended form is percent-decoded and must
/// decode to valid UTF-8; the quoted form is returned verbatim.
pub fn decode_filename(header: Option<&str>) -> Result<String, AppError> {
    let header = header
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| AppError::Filename("missing content-disposition header".to_string()))?;

    let re = Regex::new(FILENAME_PATTERN).map_err(|e| AppError::Filename(e.to_string()))?;
    let caps = re
        .captures(header)
        .ok_or_else(|| AppError::Filename(format!("no filename in {:?}", header)))?;

    let filename = if let Some(encoded) = caps.get(1) {
        percent_decode(encoded.as_str())?
    } else if let Some(literal) = caps.get(2) {
        literal.as_str().to_string()
    } else {
        String::new()
    };

    if filename.is_empty() {
        return Err(AppError::Filename("empty filename".to_string()));
    }

    Ok(filename)
}

/// Like [`decode_filename`], but falls back to [`DEFAULT_FILENAME`].
///
/// The error is handed back so the caller can report it once.
pub fn resolve_filename(header: Option<&str>) -> (String, Option<AppError>) {
    match decode_filename(header) {
        Ok(filename) => (filename, None),
        Err(e) => {
            tracing::warn!("Falling back to {}: {}", DEFAULT_FILENAME, e);
            (DEFAULT_FILENAME.to_string(), Some(e))
        }
    }
}

fn percent_decode(encoded: &str) -> Result<String, AppError> {
    // Reject truncated or non-hex escapes instead of passing them through.
    let bytes = encoded.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(AppError::Filename(format!(
                    "malformed escape in {:?}",
                    encoded
                )));
            }
        }
    }

    percent_decode_str(encoded)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| AppError::Filename(e.to_string()))
}
