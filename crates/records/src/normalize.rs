//! Translation-lookup message normalization.

use crate::RecordError;

/// Percent-decode `raw`, then trim leading and trailing whitespace.
///
/// `+` is left as is; only `%XX` escapes are decoded. Fails when the decoded
/// bytes are not UTF-8.
pub fn normalize_message(raw: &str) -> Result<String, RecordError> {
    let decoded = urlencoding::decode(raw)
        .map_err(|_| RecordError::bad_request("Invalid message encoding"))?;
    Ok(decoded.trim().to_owned())
}
